//! Core types for the calculator.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Point in time a calculation was made (UTC, microsecond precision).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Current time, truncated to microseconds so it survives a text round trip.
    pub fn now() -> Self {
        let now = Utc::now();
        let truncated = now.with_nanosecond(now.nanosecond() / 1_000 * 1_000);
        Timestamp(truncated.unwrap_or(now))
    }

    /// Sortable textual form (RFC 3339, microseconds, `Z` suffix).
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Parse RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS[.f]` taken as UTC.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Timestamp(dt.with_timezone(&Utc)));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| Timestamp(Utc.from_utc_datetime(&naive)))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.to_rfc3339())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Built-in arithmetic operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Root,
    Modulus,
    IntDivide,
    Percent,
    AbsDiff,
}

impl OperationKind {
    /// All built-ins, in help order.
    pub const ALL: [OperationKind; 10] = [
        OperationKind::Add,
        OperationKind::Subtract,
        OperationKind::Multiply,
        OperationKind::Divide,
        OperationKind::Power,
        OperationKind::Root,
        OperationKind::Modulus,
        OperationKind::IntDivide,
        OperationKind::Percent,
        OperationKind::AbsDiff,
    ];

    /// Command word for this operation.
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Subtract => "subtract",
            OperationKind::Multiply => "multiply",
            OperationKind::Divide => "divide",
            OperationKind::Power => "power",
            OperationKind::Root => "root",
            OperationKind::Modulus => "modulus",
            OperationKind::IntDivide => "int_divide",
            OperationKind::Percent => "percent",
            OperationKind::AbsDiff => "abs_diff",
        }
    }

    /// One-line description for help output.
    pub fn description(self) -> &'static str {
        match self {
            OperationKind::Add => "Add two numbers",
            OperationKind::Subtract => "Subtract <b> from <a>",
            OperationKind::Multiply => "Multiply two numbers",
            OperationKind::Divide => "Divide <a> by <b>",
            OperationKind::Power => "Raise <a> to the power <b>",
            OperationKind::Root => "Take the <b>-th root of <a>",
            OperationKind::Modulus => "Remainder of <a> / <b> (sign of <b>)",
            OperationKind::IntDivide => "Floor of <a> / <b>",
            OperationKind::Percent => "<a> as a percentage of <b>",
            OperationKind::AbsDiff => "Absolute difference of <a> and <b>",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

//! CSV persistence for calculation history.
//!
//! File layout: a header row `Timestamp,OperandA,OperandB,Command,Result`
//! followed by one row per calculation, oldest first. Numbers are written in
//! their shortest round-trip form and timestamps as RFC 3339.
//!
//! Loading is lenient about individual rows (bad numbers, bad timestamps and
//! unknown operations are skipped) but strict about structure: the header
//! must name exactly the five columns and every row must have five fields.

use crate::calculation::Calculation;
use crate::error::{CalcError, Result};
use crate::operations::OperationRegistry;
use crate::types::Timestamp;
use csv::{ByteRecord, ReaderBuilder, Trim, WriterBuilder};
use fs2::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Column names written to the header row.
pub const HEADER: [&str; 5] = ["Timestamp", "OperandA", "OperandB", "Command", "Result"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    Timestamp,
    OperandA,
    OperandB,
    Command,
    Result,
}

impl Column {
    /// Map a header cell to a column, accepting the common spellings.
    fn from_header(cell: &str) -> Option<Self> {
        let key: String = cell
            .chars()
            .filter(|c| !matches!(c, '_' | ' ' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "timestamp" | "time" => Some(Column::Timestamp),
            "operanda" | "operand1" => Some(Column::OperandA),
            "operandb" | "operand2" => Some(Column::OperandB),
            "command" | "operation" => Some(Column::Command),
            "result" => Some(Column::Result),
            _ => None,
        }
    }
}

/// Field positions resolved from the header row.
struct Layout {
    positions: [usize; 5],
}

impl Layout {
    fn from_header(header: &ByteRecord) -> Result<Self> {
        if header.len() != HEADER.len() {
            return Err(CalcError::Parse(format!(
                "expected {} columns, found {}",
                HEADER.len(),
                header.len()
            )));
        }
        let mut positions: [Option<usize>; 5] = [None; 5];
        for (idx, cell) in header.iter().enumerate() {
            let text = String::from_utf8_lossy(cell);
            let column = Column::from_header(&text)
                .ok_or_else(|| CalcError::Parse(format!("unexpected column '{text}'")))?;
            let slot = &mut positions[column as usize];
            if slot.is_some() {
                return Err(CalcError::Parse(format!("duplicate column '{text}'")));
            }
            *slot = Some(idx);
        }
        let mut resolved = [0usize; 5];
        for (slot, position) in resolved.iter_mut().zip(positions) {
            // Five distinct known columns in a five-column header cover every slot.
            *slot = position.ok_or_else(|| CalcError::Parse("missing column".into()))?;
        }
        Ok(Self {
            positions: resolved,
        })
    }

    fn field<'r>(&self, row: &'r ByteRecord, column: Column) -> Option<&'r str> {
        row.get(self.positions[column as usize])
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

/// The history file on disk.
#[derive(Clone, Debug)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all records, replacing any existing file.
    pub fn save(&self, records: &[Calculation]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let _lock = self.acquire_lock()?;

        let tmp_path = self.sibling("tmp");
        let written = Self::write_rows(&tmp_path, records)
            .and_then(|()| fs::rename(&tmp_path, &self.path).map_err(CalcError::from));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %tmp_path.display(),
                        error = %cleanup,
                        "failed to remove temporary history file"
                    );
                }
            }
            return Err(e);
        }

        tracing::debug!(path = %self.path.display(), count = records.len(), "history saved");
        Ok(())
    }

    fn write_rows(path: &Path, records: &[Calculation]) -> Result<()> {
        let mut writer = WriterBuilder::new().from_path(path)?;
        writer.write_record(HEADER)?;
        for record in records {
            writer.write_record([
                record.timestamp().to_rfc3339(),
                record.operand_a().to_string(),
                record.operand_b().to_string(),
                record.operation().to_string(),
                record.result().to_string(),
            ])?;
        }
        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| CalcError::Io(e.into_error()))?;
        file.sync_all()?;
        Ok(())
    }

    /// Read all well-formed records. A missing file yields an empty history.
    pub fn load(&self, registry: &OperationRegistry) -> Result<Vec<Calculation>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no history file; starting empty");
            return Ok(Vec::new());
        }
        let _lock = self.acquire_lock()?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(Trim::All)
            .from_path(&self.path)?;

        let layout = Layout::from_header(reader.byte_headers()?)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        let mut row = ByteRecord::new();
        while reader.read_byte_record(&mut row)? {
            match Self::parse_row(&layout, &row, registry) {
                Some(calc) => records.push(calc),
                None => {
                    skipped += 1;
                    tracing::debug!(
                        line = ?row.position().map(|p| p.line()),
                        "skipping malformed history row"
                    );
                }
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            loaded = records.len(),
            skipped,
            "history loaded"
        );
        Ok(records)
    }

    fn parse_row(
        layout: &Layout,
        row: &ByteRecord,
        registry: &OperationRegistry,
    ) -> Option<Calculation> {
        let number = |column: Column| {
            layout
                .field(row, column)?
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
        };
        let a = number(Column::OperandA)?;
        let b = number(Column::OperandB)?;
        let result = number(Column::Result)?;
        let timestamp = Timestamp::parse(layout.field(row, Column::Timestamp)?)?;
        let operation = layout.field(row, Column::Command)?;
        Calculation::restore(registry, operation, a, b, result, timestamp).ok()
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn acquire_lock(&self) -> Result<File> {
        let lock_file = File::create(self.sibling("lock"))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| CalcError::Locked)?;

        Ok(lock_file)
    }
}

//! Dataset loading, schema validation and mark coercion.
//!
//! Loading is the only failure boundary of the pipeline. A source must expose
//! the `question`, `student_id` and `marks` columns (extra columns are
//! ignored). Rows whose marks cannot be coerced to a finite, non-negative
//! number are dropped and counted rather than reported as errors; the
//! empty-dataset check runs after that cleaning step.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::dataset::{Dataset, Response};
use crate::error::{AnalyticsError, Result};

/// Columns every source must provide, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 3] = ["question", "student_id", "marks"];

/// A parsed but not yet validated table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Metadata about where a dataset came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    pub location: String,
    pub accessed_at: chrono::DateTime<chrono::Utc>,
    pub row_count: usize,
}

/// Anything that can produce a raw response table.
pub trait ResponseSource {
    /// Read the whole source into memory.
    fn read_table(&self) -> Result<RawTable>;

    /// Human-readable location, used in logs and [`SourceInfo`].
    fn location(&self) -> String;
}

// ---------------------------------------------------------------------------
// CsvSource
// ---------------------------------------------------------------------------

enum CsvInput {
    File(PathBuf),
    Text(String),
}

/// Delimited-text source, backed by a file or by text already in memory.
pub struct CsvSource {
    input: CsvInput,
    delimiter: char,
    label: Option<String>,
}

impl CsvSource {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            input: CsvInput::File(path.into()),
            delimiter: ',',
            label: None,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            input: CsvInput::Text(text.into()),
            delimiter: ',',
            label: None,
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Report `label` as the location instead of the path or `"<memory>"`.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl ResponseSource for CsvSource {
    fn read_table(&self) -> Result<RawTable> {
        match &self.input {
            CsvInput::File(path) => {
                let content = std::fs::read_to_string(path)?;
                Ok(parse_csv(&content, self.delimiter))
            }
            CsvInput::Text(text) => Ok(parse_csv(text, self.delimiter)),
        }
    }

    fn location(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        match &self.input {
            CsvInput::File(path) => path.display().to_string(),
            CsvInput::Text(_) => "<memory>".to_string(),
        }
    }
}

/// Parse delimited text into a [`RawTable`].
///
/// The first non-blank line is the header. Fields may be double-quoted, in
/// which case they can contain the delimiter and `""` stands for a literal
/// quote. Quoted fields cannot span lines.
pub fn parse_csv(content: &str, delimiter: char) -> RawTable {
    let mut lines = content
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());

    let Some(header) = lines.next() else {
        return RawTable::default();
    };

    let columns = split_record(header, delimiter)
        .into_iter()
        .map(|c| c.trim().trim_start_matches('\u{feff}').to_string())
        .collect();
    let rows = lines.map(|line| split_record(line, delimiter)).collect();

    RawTable { columns, rows }
}

fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }
    fields.push(field);
    fields
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Why a row was dropped during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The marks field was absent or blank.
    MissingMarks,
    /// The marks field was not a number.
    UnparsableMarks,
    /// The marks field parsed to infinity or NaN.
    NonFiniteMarks,
    NegativeMarks,
    /// The question or student id was blank.
    MissingIdentifier,
}

/// Row accounting for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped_rows: usize,
    pub missing_marks: usize,
    pub unparsable_marks: usize,
    pub non_finite_marks: usize,
    pub negative_marks: usize,
    pub missing_identifier: usize,
}

impl LoadStats {
    fn record_drop(&mut self, reason: DropReason) {
        self.dropped_rows += 1;
        match reason {
            DropReason::MissingMarks => self.missing_marks += 1,
            DropReason::UnparsableMarks => self.unparsable_marks += 1,
            DropReason::NonFiniteMarks => self.non_finite_marks += 1,
            DropReason::NegativeMarks => self.negative_marks += 1,
            DropReason::MissingIdentifier => self.missing_identifier += 1,
        }
    }
}

/// A validated dataset together with its load accounting.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub stats: LoadStats,
    pub source: SourceInfo,
}

/// Coerce a raw marks field into a usable score.
pub fn coerce_marks(raw: &str) -> std::result::Result<f64, DropReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DropReason::MissingMarks);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| DropReason::UnparsableMarks)?;
    if !value.is_finite() {
        return Err(DropReason::NonFiniteMarks);
    }
    if value < 0.0 {
        return Err(DropReason::NegativeMarks);
    }
    // normalise -0
    Ok(if value == 0.0 { 0.0 } else { value })
}

/// Validate the schema of a raw table and clean its rows.
pub fn clean_table(table: &RawTable) -> Result<(Vec<Response>, LoadStats)> {
    if table.columns.is_empty() {
        return Err(AnalyticsError::EmptyDataset { dropped: 0 });
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| table.column_index(c).is_none())
        .map(|c| c.to_string())
        .collect();
    let (Some(q_idx), Some(s_idx), Some(m_idx)) = (
        table.column_index("question"),
        table.column_index("student_id"),
        table.column_index("marks"),
    ) else {
        return Err(AnalyticsError::schema(missing));
    };

    let mut stats = LoadStats {
        total_rows: table.row_count(),
        ..LoadStats::default()
    };
    let mut responses = Vec::with_capacity(table.row_count());

    for (row_idx, row) in table.rows.iter().enumerate() {
        let field = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or("");
        let (question, student) = (field(q_idx), field(s_idx));

        let outcome = if question.is_empty() || student.is_empty() {
            Err(DropReason::MissingIdentifier)
        } else {
            coerce_marks(field(m_idx))
        };

        match outcome {
            Ok(marks) => responses.push(Response::new(question, student, marks)),
            Err(reason) => {
                tracing::debug!(row = row_idx + 1, ?reason, "Dropping response row");
                stats.record_drop(reason);
            }
        }
    }

    stats.kept_rows = responses.len();
    Ok((responses, stats))
}

/// Load and validate a dataset, discarding load accounting.
pub fn load(source: &dyn ResponseSource) -> Result<Dataset> {
    load_with_stats(source).map(|loaded| loaded.dataset)
}

/// Load and validate a dataset from any [`ResponseSource`].
pub fn load_with_stats(source: &dyn ResponseSource) -> Result<LoadedDataset> {
    let location = source.location();
    let table = source.read_table()?;
    let (responses, stats) = clean_table(&table)?;

    if stats.dropped_rows > 0 {
        tracing::warn!(
            source = %location,
            dropped = stats.dropped_rows,
            total = stats.total_rows,
            "Dropped rows with unusable marks or identifiers"
        );
    }
    if responses.is_empty() {
        return Err(AnalyticsError::EmptyDataset {
            dropped: stats.dropped_rows,
        });
    }

    let dataset = Dataset::new(responses)?;
    tracing::info!(
        source = %location,
        responses = dataset.len(),
        questions = dataset.question_count(),
        students = dataset.student_count(),
        "Loaded exam responses"
    );

    Ok(LoadedDataset {
        source: SourceInfo {
            location,
            accessed_at: chrono::Utc::now(),
            row_count: stats.total_rows,
        },
        dataset,
        stats,
    })
}

use std::error::Error;
use std::fmt::Display;

/// Errors raised while assembling the rows of a survey.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StructureError {
    /// An insertion asked for a position past the end of the list.
    MergeIndex { position: usize, len: usize },
    /// A record carries a field that is not part of the schema.
    SchemaMismatch { field: String, record: String },
    /// A question row that cannot be turned into records.
    MalformedRow {
        lineno: usize,
        field: String,
        value: String,
    },
    /// The answer format is known but has no row generator yet.
    UnsupportedFormat {
        lineno: usize,
        code: String,
        format: String,
    },
}

impl Error for StructureError {}

impl Display for StructureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureError::MergeIndex { position, len } => write!(
                f,
                "cannot insert at position {} in a list of {} records",
                position, len
            ),
            StructureError::SchemaMismatch { field, record } => write!(
                f,
                "field {:?} of record {:?} is not in the schema",
                field, record
            ),
            StructureError::MalformedRow {
                lineno,
                field,
                value,
            } => write!(
                f,
                "line {}: invalid value {:?} for field {:?}",
                lineno, value, field
            ),
            StructureError::UnsupportedFormat {
                lineno,
                code,
                format,
            } => write!(
                f,
                "line {}: question {:?} uses answer format {:?}, which is not implemented",
                lineno, code, format
            ),
        }
    }
}

use std::fmt;

use thiserror::Error;

/// One of the five mandatory whitespace-delimited fields of a maps line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AddressRange,
    Permissions,
    Offset,
    Device,
    Inode,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::AddressRange => "address range",
            Field::Permissions => "permissions",
            Field::Offset => "offset",
            Field::Device => "device",
            Field::Inode => "inode",
        };
        f.write_str(name)
    }
}

/// Errors from capturing or parsing a memory-map snapshot.
///
/// Every parse error aborts the whole snapshot: a partially-parsed map
/// cannot be trusted for comparison, so there is no best-effort mode.
#[derive(Debug, Error)]
pub enum MapsError {
    #[error("failed to read memory map: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: missing {field} field")]
    MissingField { line: usize, field: Field },

    #[error("line {line}: malformed address range '{token}'")]
    MalformedAddressRange { line: usize, token: String },

    #[error("line {line}: malformed device '{token}'")]
    MalformedDevice { line: usize, token: String },

    #[error("line {line}: malformed {field} '{token}'")]
    MalformedNumber {
        line: usize,
        field: Field,
        token: String,
    },

    #[error("snapshot too large: {what} exceeds {limit}")]
    SnapshotTooLarge { what: &'static str, limit: usize },
}

use std::fmt;
use std::io;

use serde::Serialize;
use thiserror::Error;

/// When a numeric PDB field is ill-formatted, this enum tells what field has the issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldError {
    Serial,
    ResidueSequence,
    PositionX,
    PositionY,
    PositionZ,
    Occupancy,
    TemperatureFactor,
    SerialNumber,
    ResidueCount,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Serial => "serial",
            Self::ResidueSequence => "resSeq",
            Self::PositionX => "x",
            Self::PositionY => "y",
            Self::PositionZ => "z",
            Self::Occupancy => "occupancy",
            Self::TemperatureFactor => "tempFactor",
            Self::SerialNumber => "serNum",
            Self::ResidueCount => "numRes",
        };
        f.write_str(name)
    }
}

/// The kind of record a warning was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordKind {
    Atom,
    SeqRes,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom => f.write_str("ATOM"),
            Self::SeqRes => f.write_str("SEQRES"),
        }
    }
}

/// A numeric field could not be read. The line is still used, with the
/// field left empty.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("line {lineno}: {record} field {field} is not a number")]
pub struct ParseWarning {
    /// Zero-based index of the line in the input.
    pub lineno: usize,
    pub record: RecordKind,
    pub field: FieldError,
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("The input is not valid text.")]
    InvalidInput,
    #[error("Error while reading line {1}: {0}")]
    IOError(io::Error, usize),
}

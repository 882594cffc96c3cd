use serde::Serialize;

use crate::parsers::errors::{FieldError, ParseWarning, RecordKind};
use crate::parsers::Position;

/// Record name of an ATOM line, padded to the six columns of the tag.
pub const ATOM_TAG: &str = "ATOM  ";
/// Record name of a SEQRES line.
pub const SEQRES_TAG: &str = "SEQRES";

/// The parsed fields from an ATOM line in a PDB file.
///
/// Text fields are trimmed. Integer fields that cannot be read are `None`,
/// floating point fields that cannot be read are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Atom {
    pub serial: Option<isize>,
    pub name: String,
    pub alt_loc: String,
    pub res_name: String,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub res_seq: Option<isize>,
    pub i_code: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub occupancy: f64,
    pub temp_factor: f64,
    pub element: String,
    pub charge: String,
}

impl Atom {
    pub fn position(&self) -> Position {
        [self.x, self.y, self.z]
    }
}

/// One physical SEQRES line. A chain sequence usually spans several of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeqResEntry {
    pub ser_num: Option<isize>,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub num_res: Option<isize>,
    pub res_names: Vec<String>,
}

/// Slice a line on the half-open column range `[start, end)`.
///
/// Columns past the end of the line read as empty, so short lines never
/// cause a panic. A range that does not fall on character boundaries also
/// reads as empty.
pub(crate) fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}

/// Accumulates the warnings raised while reading the fields of one line.
struct FieldReader<'a> {
    line: &'a str,
    lineno: usize,
    record: RecordKind,
    warnings: Vec<ParseWarning>,
}

impl<'a> FieldReader<'a> {
    fn new(line: &'a str, lineno: usize, record: RecordKind) -> Self {
        Self {
            line,
            lineno,
            record,
            warnings: Vec::new(),
        }
    }

    fn text(&self, start: usize, end: usize) -> String {
        column(self.line, start, end).trim().to_owned()
    }

    fn warn(&mut self, field: FieldError) {
        self.warnings.push(ParseWarning {
            lineno: self.lineno,
            record: self.record,
            field,
        });
    }

    fn integer(&mut self, start: usize, end: usize, field: FieldError) -> Option<isize> {
        let value = column(self.line, start, end).trim().parse().ok();
        if value.is_none() {
            self.warn(field);
        }
        value
    }

    /// A float that must be present, such as a coordinate.
    fn required_float(&mut self, start: usize, end: usize, field: FieldError) -> f64 {
        match column(self.line, start, end).trim().parse() {
            Ok(value) => value,
            Err(_) => {
                self.warn(field);
                f64::NAN
            }
        }
    }

    /// A float that may be left blank; only garbage is reported.
    fn optional_float(&mut self, start: usize, end: usize, field: FieldError) -> f64 {
        let text = column(self.line, start, end).trim();
        if text.is_empty() {
            return f64::NAN;
        }
        match text.parse() {
            Ok(value) => value,
            Err(_) => {
                self.warn(field);
                f64::NAN
            }
        }
    }
}

/// Read an ATOM line using the wwPDB 3.3 column layout.
pub fn parse_atom_line(line: &str, lineno: usize) -> (Atom, Vec<ParseWarning>) {
    let mut reader = FieldReader::new(line, lineno, RecordKind::Atom);
    let atom = Atom {
        serial: reader.integer(6, 11, FieldError::Serial),
        name: reader.text(12, 16),
        alt_loc: reader.text(16, 17),
        res_name: reader.text(17, 20),
        chain_id: reader.text(21, 22),
        res_seq: reader.integer(22, 26, FieldError::ResidueSequence),
        i_code: reader.text(26, 27),
        x: reader.required_float(30, 38, FieldError::PositionX),
        y: reader.required_float(38, 46, FieldError::PositionY),
        z: reader.required_float(46, 54, FieldError::PositionZ),
        occupancy: reader.optional_float(54, 60, FieldError::Occupancy),
        temp_factor: reader.optional_float(60, 66, FieldError::TemperatureFactor),
        element: reader.text(76, 78),
        charge: reader.text(78, 80),
    };
    (atom, reader.warnings)
}

/// Read a SEQRES line using the wwPDB 3.3 column layout.
pub fn parse_seqres_line(line: &str, lineno: usize) -> (SeqResEntry, Vec<ParseWarning>) {
    let mut reader = FieldReader::new(line, lineno, RecordKind::SeqRes);
    let entry = SeqResEntry {
        ser_num: reader.integer(7, 10, FieldError::SerialNumber),
        chain_id: reader.text(11, 12),
        num_res: reader.integer(13, 17, FieldError::ResidueCount),
        res_names: column(line, 19, 70)
            .split_whitespace()
            .map(String::from)
            .collect(),
    };
    (entry, reader.warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;
    use rstest::rstest;

    #[rstest]
    // Full line
    #[case("ATOM      1  N   MET A   1      20.154  29.699   5.276  1.00 49.05           N  ")]
    // Truncated after the element symbol
    #[case("ATOM      1  N   MET A   1      20.154  29.699   5.276  1.00 49.05           N")]
    fn test_parse_atom_line(#[case] line: &str) {
        let (atom, warnings) = parse_atom_line(line, 0);
        assert!(warnings.is_empty());
        assert_eq!(atom.serial, Some(1));
        assert_eq!(atom.name, "N");
        assert_eq!(atom.alt_loc, "");
        assert_eq!(atom.res_name, "MET");
        assert_eq!(atom.chain_id, "A");
        assert_eq!(atom.res_seq, Some(1));
        assert_eq!(atom.i_code, "");
        assert_f64_near!(atom.x, 20.154);
        assert_f64_near!(atom.y, 29.699);
        assert_f64_near!(atom.z, 5.276);
        assert_f64_near!(atom.occupancy, 1.0);
        assert_f64_near!(atom.temp_factor, 49.05);
        assert_eq!(atom.element, "N");
        assert_eq!(atom.charge, "");
    }

    #[test]
    fn test_atom_line_stopping_after_positions() {
        let line = "ATOM      2  CA  MET A   1      21.618  29.605   5.481";
        let (atom, warnings) = parse_atom_line(line, 3);
        assert!(warnings.is_empty());
        assert_eq!(atom.name, "CA");
        assert!(atom.occupancy.is_nan());
        assert!(atom.temp_factor.is_nan());
        assert_eq!(atom.element, "");
    }

    #[test]
    fn test_short_atom_line_does_not_panic() {
        let (atom, warnings) = parse_atom_line("ATOM      7  CA  GLY", 12);
        assert_eq!(atom.serial, Some(7));
        assert_eq!(atom.res_name, "GLY");
        assert_eq!(atom.chain_id, "");
        assert_eq!(atom.res_seq, None);
        assert!(atom.x.is_nan());
        let fields: Vec<FieldError> = warnings.iter().map(|w| w.field).collect();
        assert_eq!(
            fields,
            vec![
                FieldError::ResidueSequence,
                FieldError::PositionX,
                FieldError::PositionY,
                FieldError::PositionZ,
            ]
        );
        assert!(warnings.iter().all(|w| w.lineno == 12));
    }

    #[test]
    fn test_garbage_occupancy_is_reported() {
        let line = "ATOM      1  N   MET A   1      20.154  29.699   5.276  x.xx 49.05           N";
        let (atom, warnings) = parse_atom_line(line, 0);
        assert!(atom.occupancy.is_nan());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, FieldError::Occupancy);
    }

    #[rstest]
    #[case("SEQRES   1 A  141  MET THR LEU", 1, "A", 141, vec!["MET", "THR", "LEU"])]
    #[case(
        "SEQRES   2 B   21  ALA GLY SER  ",
        2,
        "B",
        21,
        vec!["ALA", "GLY", "SER"]
    )]
    fn test_parse_seqres_line(
        #[case] line: &str,
        #[case] ser_num: isize,
        #[case] chain_id: &str,
        #[case] num_res: isize,
        #[case] res_names: Vec<&str>,
    ) {
        let (entry, warnings) = parse_seqres_line(line, 0);
        assert!(warnings.is_empty());
        assert_eq!(entry.ser_num, Some(ser_num));
        assert_eq!(entry.chain_id, chain_id);
        assert_eq!(entry.num_res, Some(num_res));
        assert_eq!(entry.res_names, res_names);
    }

    #[test]
    fn test_seqres_without_residue_names() {
        let (entry, warnings) = parse_seqres_line("SEQRES   1 A", 0);
        assert!(entry.res_names.is_empty());
        assert_eq!(entry.num_res, None);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, FieldError::ResidueCount);
    }

    #[rstest]
    #[case("ATOM", 6, 11, "")]
    #[case("ATOM      1", 6, 11, "    1")]
    #[case("ATOM      12345", 6, 11, "    1")]
    #[case("ATOM", 2, 11, "OM")]
    fn test_column(#[case] line: &str, #[case] start: usize, #[case] end: usize, #[case] expected: &str) {
        assert_eq!(column(line, start, end), expected);
    }
}

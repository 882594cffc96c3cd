use log::trace;
use std::io::BufRead;

use crate::parsers::errors::ReadError;
use crate::parsers::line::{column, parse_atom_line, parse_seqres_line, ATOM_TAG, SEQRES_TAG};
use crate::parsers::structure::{Structure, StructureBuilder};

/// Parse the text of a PDB file.
///
/// Only ATOM and SEQRES records are read; every other line is skipped.
/// Parsing is best effort: fields that cannot be read are left empty and
/// reported in [`Structure::warnings`].
pub fn parse_pdb(text: &str) -> Structure {
    let mut builder = StructureBuilder::default();
    for (lineno, line) in text.lines().enumerate() {
        read_line(&mut builder, line, lineno);
    }
    builder.build()
}

/// Same as [`parse_pdb`] for raw bytes, which must be UTF-8 text.
pub fn parse_pdb_bytes(bytes: &[u8]) -> Result<Structure, ReadError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ReadError::InvalidInput)?;
    Ok(parse_pdb(text))
}

/// Same as [`parse_pdb`], reading from a buffer.
pub fn read_pdb<F>(input: F) -> Result<Structure, ReadError>
where
    F: BufRead,
{
    let mut builder = StructureBuilder::default();
    for (lineno, line) in input.lines().enumerate() {
        let line = line.map_err(|error| match error.kind() {
            std::io::ErrorKind::InvalidData => ReadError::InvalidInput,
            _ => ReadError::IOError(error, lineno),
        })?;
        read_line(&mut builder, &line, lineno);
    }
    Ok(builder.build())
}

fn read_line(builder: &mut StructureBuilder, line: &str, lineno: usize) {
    match column(line, 0, 6) {
        ATOM_TAG => {
            let (atom, warnings) = parse_atom_line(line, lineno);
            trace!("Line {lineno}: ATOM {:?}", atom.serial);
            builder.add_atom(atom);
            builder.add_warnings(warnings);
        }
        SEQRES_TAG => {
            let (entry, warnings) = parse_seqres_line(line, lineno);
            trace!(
                "Line {lineno}: SEQRES chain {} with {} residues",
                entry.chain_id,
                entry.res_names.len()
            );
            builder.add_seq_res(entry);
            builder.add_warnings(warnings);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::errors::{FieldError, RecordKind};
    use crate::test_ressource;
    use std::fs::File;
    use std::io::BufReader;

    const SMALL_PDB: &str = "\
HEADER    TEST STRUCTURE
SEQRES   1 A    3  MET THR LEU
SEQRES   1 B    1  GLY
HETATM    9  O   HOH A 101      30.000  30.000  30.000  1.00 20.00           O
ATOM      1  N   MET A   1      20.154  29.699   5.276  1.00 49.05           N
ATOM      2  CA  MET A   1      21.618  29.605   5.481  1.00 49.05           C
ATOM      3  CA  THR A   2      24.000  28.000   6.000  1.00 40.00           C
ATOM      4  CA  GLY B   1      10.000  10.000  10.000  1.00 40.00           C
END
";

    #[test]
    fn test_other_records_are_ignored() {
        let structure = parse_pdb(SMALL_PDB);
        assert_eq!(structure.atoms.len(), 4);
        assert_eq!(structure.seq_res.len(), 2);
        assert_eq!(structure.residues.len(), 4);
        assert_eq!(structure.chains.len(), 2);
        assert!(structure.warnings.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_pdb(SMALL_PDB);
        let second = parse_pdb(SMALL_PDB);
        assert_eq!(first, second);
    }

    #[test]
    fn test_crlf_line_endings() {
        let structure = parse_pdb(&SMALL_PDB.replace('\n', "\r\n"));
        assert_eq!(structure, parse_pdb(SMALL_PDB));
    }

    #[test]
    fn test_bytes_must_be_text() {
        let error = parse_pdb_bytes(&[b'A', b'T', 0xff, 0xfe]).unwrap_err();
        assert!(matches!(error, ReadError::InvalidInput));
        let structure = parse_pdb_bytes(SMALL_PDB.as_bytes()).unwrap();
        assert_eq!(structure.atoms.len(), 4);
    }

    #[test]
    fn test_read_matches_parse() {
        let structure = read_pdb(SMALL_PDB.as_bytes()).expect("Error parsing the text.");
        assert_eq!(structure, parse_pdb(SMALL_PDB));
    }

    #[test]
    fn test_empty_input() {
        let structure = parse_pdb("");
        assert!(structure.atoms.is_empty());
        assert!(structure.chains.is_empty());
    }

    #[test]
    fn test_warnings_carry_line_numbers() {
        let text = "\
SEQRES   1 A    1  MET
ATOM      1  CA  MET A   1      20.154 abcdefg   5.276  1.00 49.05           C
";
        let structure = parse_pdb(text);
        assert_eq!(structure.warnings.len(), 1);
        let warning = &structure.warnings[0];
        assert_eq!(warning.lineno, 1);
        assert_eq!(warning.record, RecordKind::Atom);
        assert_eq!(warning.field, FieldError::PositionY);
        assert!(structure.atoms[0].y.is_nan());
        // The atom is still attached to its residue.
        assert_eq!(structure.residues[0].atoms, vec![0]);
    }

    #[test]
    fn test_read_file() {
        let filepath = test_ressource!("/two_chains.pdb");
        let file = File::open(filepath).expect("Could not open test file.");
        let buffer = BufReader::new(file);
        let structure = read_pdb(buffer).expect("Error parsing the file.");
        let identifiers: Vec<&str> = structure.chain_identifiers().collect();
        assert_eq!(identifiers, vec!["A", "B"]);
        assert_eq!(structure.seq_res.len(), 3);
        assert_eq!(structure.residues.len(), 12);
        assert_eq!(structure.atoms.len(), 25);
        assert!(structure.warnings.is_empty());
    }
}

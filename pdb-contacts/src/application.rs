use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};
use thiserror::Error;

use crate::contacts::{compare_chains, ContactError, ContactReport};
use crate::parsers::errors::ReadError;
use crate::parsers::read_pdb;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("The input file cannot be opened: {0}")]
    CannotOpen(io::Error),
    #[error("Error while reading the PDB file: {0}")]
    ReadError(#[from] ReadError),
    #[error("{0}")]
    ContactError(#[from] ContactError),
    #[error("The output cannot be written: {0}")]
    CannotWrite(#[from] io::Error),
    #[error("The report cannot be serialized: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Compute residue contacts from a PDB file and write them as JSON.
#[derive(Parser, Debug, Clone, PartialEq)]
#[clap(author, version, about)]
pub struct Cli {
    /// The path to the PDB file to read.
    #[clap(value_parser)]
    pub input_path: PathBuf,
    /// Chain to compute the contacts for.
    #[clap(short = 'a', long, value_parser, default_value = "A")]
    pub chain_a: String,
    /// Second chain; when it differs from the first one, the contacts
    /// between the two chains are computed.
    #[clap(short = 'b', long, value_parser)]
    pub chain_b: Option<String>,
    /// Largest distance, in Ångström, kept as a contact [default: 5 within
    /// a chain, 30 between chains].
    #[clap(short = 'd', long, value_parser)]
    pub max_distance: Option<f64>,
    /// Write the report in this file rather than on the standard output.
    #[clap(short, long, value_parser)]
    pub output: Option<PathBuf>,
    /// Indent the JSON output.
    #[clap(long, value_parser, default_value_t = false)]
    pub pretty: bool,
    /// Display more information about what the software does.
    #[clap(short, long, value_parser, default_value_t = false)]
    pub verbose: bool,
    /// Be very verbose about what the software does.
    #[clap(short, long, value_parser, default_value_t = false)]
    pub trace: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Cli {
            input_path: PathBuf::new(),
            chain_a: String::from("A"),
            chain_b: None,
            max_distance: None,
            output: None,
            pretty: false,
            verbose: false,
            trace: false,
        }
    }
}

impl Cli {
    pub fn second_chain(&self) -> &str {
        self.chain_b.as_deref().unwrap_or(&self.chain_a)
    }
}

/// Read the structure, compute the contacts, and build the report.
pub fn build_report(cli: &Cli) -> Result<ContactReport, AppError> {
    let file = File::open(&cli.input_path).map_err(AppError::CannotOpen)?;
    let structure = read_pdb(BufReader::new(file))?;
    for warning in &structure.warnings {
        warn!("{warning}");
    }
    let chain_identifiers: Vec<&str> = structure.chain_identifiers().collect();
    info!(
        "Read {} residues in chains {:?} from {}.",
        structure.residues.len(),
        chain_identifiers,
        cli.input_path.display()
    );

    let report = compare_chains(
        &structure,
        &cli.chain_a,
        cli.second_chain(),
        cli.max_distance,
    )?;
    info!("{report}");
    info!("{} contacts retained.", report.chords.len());
    Ok(report)
}

pub fn run(cli: Cli) -> Result<(), AppError> {
    let report = build_report(&cli)?;
    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    if cli.pretty {
        serde_json::to_writer_pretty(&mut writer, &report)?;
    } else {
        serde_json::to_writer(&mut writer, &report)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["pdb-contacts-cli", "1abc.pdb"], "A", "A", None)]
    #[case(&["pdb-contacts-cli", "1abc.pdb", "-a", "B"], "B", "B", None)]
    #[case(&["pdb-contacts-cli", "1abc.pdb", "-b", "C", "-d", "12.5"], "A", "C", Some(12.5))]
    fn test_cli_arguments(
        #[case] arguments: &[&str],
        #[case] first: &str,
        #[case] second: &str,
        #[case] max_distance: Option<f64>,
    ) {
        let cli = Cli::try_parse_from(arguments).unwrap();
        assert_eq!(cli.input_path, PathBuf::from("1abc.pdb"));
        assert_eq!(cli.chain_a, first);
        assert_eq!(cli.second_chain(), second);
        assert_eq!(cli.max_distance, max_distance);
    }

    #[test]
    fn test_missing_file() {
        let cli = Cli {
            input_path: PathBuf::from("/this/file/does/not/exist.pdb"),
            ..Default::default()
        };
        let error = build_report(&cli).unwrap_err();
        assert!(matches!(error, AppError::CannotOpen(_)));
    }
}

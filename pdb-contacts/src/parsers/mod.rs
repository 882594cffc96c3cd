pub type Position = [f64; 3];

pub mod errors;
pub mod line;
pub mod pdb;
pub mod structure;

pub use pdb::{parse_pdb, parse_pdb_bytes, read_pdb};
pub use structure::Structure;

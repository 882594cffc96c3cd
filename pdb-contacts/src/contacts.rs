use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::distances::{
    external_distances, internal_distances, ContactMap, ContactMode, DistanceRange,
};
use crate::parsers::structure::Structure;

/// Default upper bound, in Ångström, for contacts within a chain.
pub const DEFAULT_INTERNAL_MAX_DISTANCE: f64 = 5.0;
/// Default upper bound, in Ångström, for contacts between two chains.
pub const DEFAULT_EXTERNAL_MAX_DISTANCE: f64 = 30.0;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContactError {
    #[error("Chain {0:?} is not defined in the SEQRES records.")]
    ChainNotFound(String),
}

/// The distances retained as contacts.
///
/// Both bounds are compared without tolerance. `NaN` is never retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceWindow {
    pub min: f64,
    pub max: f64,
    pub include_min: bool,
}

impl DistanceWindow {
    /// `[0, max]`: the self pairs are retained.
    pub fn internal(max: f64) -> Self {
        Self {
            min: 0.0,
            max,
            include_min: true,
        }
    }

    /// `(0, max]`
    pub fn external(max: f64) -> Self {
        Self {
            min: 0.0,
            max,
            include_min: false,
        }
    }

    pub fn for_mode(mode: ContactMode, max: Option<f64>) -> Self {
        match mode {
            ContactMode::Internal => Self::internal(max.unwrap_or(DEFAULT_INTERNAL_MAX_DISTANCE)),
            ContactMode::External => Self::external(max.unwrap_or(DEFAULT_EXTERNAL_MAX_DISTANCE)),
        }
    }

    pub fn contains(&self, distance: f64) -> bool {
        let above_min = if self.include_min {
            distance >= self.min
        } else {
            distance > self.min
        };
        above_min && distance <= self.max
    }
}

/// A retained contact, between two comparison indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Chord {
    pub source: usize,
    pub target: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelledResidue {
    pub index: usize,
    pub residue_id: usize,
    pub chain: String,
    pub label: String,
}

impl ContactMap {
    /// The links that fall within the window, in residue then link order.
    pub fn chords(&self, window: &DistanceWindow) -> Vec<Chord> {
        self.residues
            .iter()
            .flat_map(|residue| {
                residue
                    .links_for(self.mode)
                    .iter()
                    .filter(|link| window.contains(link.distance))
                    .map(|link| Chord {
                        source: residue.index,
                        target: link.to,
                        distance: link.distance,
                    })
            })
            .collect()
    }

    /// Display labels; residues are numbered from 1.
    pub fn labels(&self) -> Vec<LabelledResidue> {
        self.residues
            .iter()
            .map(|residue| {
                let label = match self.mode {
                    ContactMode::Internal => format!("{}:{}", residue.res_name, residue.index + 1),
                    ContactMode::External => format!(
                        "{}|{}:{}",
                        residue.chain,
                        residue.res_name,
                        residue.index + 1
                    ),
                };
                LabelledResidue {
                    index: residue.index,
                    residue_id: residue.residue_id,
                    chain: residue.chain.clone(),
                    label,
                }
            })
            .collect()
    }
}

/// Everything a chord diagram needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReport {
    pub mode: ContactMode,
    pub chains: Vec<String>,
    pub range: Option<DistanceRange>,
    pub window: DistanceWindow,
    pub residues: Vec<LabelledResidue>,
    pub chords: Vec<Chord>,
}

impl ContactReport {
    pub fn new(map: &ContactMap, chains: Vec<String>, window: DistanceWindow) -> Self {
        Self {
            mode: map.mode,
            chains,
            range: map.range,
            window,
            residues: map.labels(),
            chords: map.chords(&window),
        }
    }
}

impl fmt::Display for ContactReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some(DistanceRange { min, max }) => write!(
                f,
                "Distances: min {min}, max:{max}, cutoff:{}",
                self.window.max
            ),
            None => write!(f, "Distances: none, cutoff:{}", self.window.max),
        }
    }
}

/// Compute the contacts of one chain with itself, or between two chains.
///
/// The external mode is used when the identifiers differ. `max_distance`
/// falls back to the default of the mode.
pub fn compare_chains(
    structure: &Structure,
    first: &str,
    second: &str,
    max_distance: Option<f64>,
) -> Result<ContactReport, ContactError> {
    let lookup = |chain_id: &str| {
        structure
            .chain(chain_id)
            .ok_or_else(|| ContactError::ChainNotFound(chain_id.to_owned()))
    };
    let first_chain = lookup(first)?;
    let (map, chains) = if first == second {
        (internal_distances(first_chain), vec![first.to_owned()])
    } else {
        let second_chain = lookup(second)?;
        (
            external_distances(first_chain, second_chain),
            vec![first.to_owned(), second.to_owned()],
        )
    };
    let window = DistanceWindow::for_mode(map.mode, max_distance);
    Ok(ContactReport::new(&map, chains, window))
}

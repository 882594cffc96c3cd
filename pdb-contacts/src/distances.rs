//! Pairwise distances between the alpha carbons of residues.
//!
//! Distances are computed for every pair and recorded without any
//! filtering; selecting the pairs to display is left to
//! [`crate::contacts`]. The parsed [`Structure`](crate::parsers::structure::Structure)
//! is never modified: the engine returns a [`ContactMap`] holding its own
//! numbering of the compared residues.
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::parsers::structure::{ChainView, ResidueView};
use crate::parsers::Position;

/// Name of the atom that stands for the position of a residue.
pub const ALPHA_CARBON: &str = "CA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMode {
    /// All the pairs within one chain.
    Internal,
    /// All the pairs between two chains.
    External,
}

/// A distance from the residue holding the link to the residue with
/// comparison index `to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Link {
    pub to: usize,
    pub distance: f64,
}

/// Smallest and largest finite distance seen during a computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceRange {
    pub min: f64,
    pub max: f64,
}

impl DistanceRange {
    fn include(range: Option<Self>, distance: f64) -> Option<Self> {
        if !distance.is_finite() {
            return range;
        }
        match range {
            None => Some(Self {
                min: distance,
                max: distance,
            }),
            Some(Self { min, max }) => Some(Self {
                min: min.min(distance),
                max: max.max(distance),
            }),
        }
    }
}

/// A residue as seen by one distance computation.
///
/// `index` is the position of the residue in the compared sequence; in
/// external mode the residues of the second chain come after the ones of
/// the first. `residue_id` is the global identifier given at parse time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedResidue {
    pub index: usize,
    pub residue_id: usize,
    pub chain: String,
    pub res_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exlinks: Vec<Link>,
}

impl AnnotatedResidue {
    fn new(index: usize, residue: &ResidueView, chain: &str) -> Self {
        Self {
            index,
            residue_id: residue.residue().id,
            chain: chain.to_owned(),
            res_name: residue.name().to_owned(),
            links: Vec::new(),
            exlinks: Vec::new(),
        }
    }

    /// The links computed for this residue in the given mode.
    pub fn links_for(&self, mode: ContactMode) -> &[Link] {
        match mode {
            ContactMode::Internal => &self.links,
            ContactMode::External => &self.exlinks,
        }
    }
}

/// The result of a distance computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMap {
    pub mode: ContactMode,
    pub residues: Vec<AnnotatedResidue>,
    /// `None` when no pair of residues could be compared.
    pub range: Option<DistanceRange>,
}

impl ContactMap {
    pub fn link_count(&self) -> usize {
        self.residues
            .iter()
            .map(|residue| residue.links_for(self.mode).len())
            .sum()
    }
}

/// Euclidean distance, in the unit of the coordinates.
pub fn distance(a: &Position, b: &Position) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Position of the first alpha carbon of the residue, if it has one.
pub fn representative_position(residue: &ResidueView) -> Option<Position> {
    residue
        .find_atom(ALPHA_CARBON)
        .map(|atom| atom.position())
}

/// Links from one residue to `targets`; residues without an alpha carbon
/// on either side are skipped.
fn link_row(origin: Option<Position>, targets: &[Option<Position>], offset: usize) -> Vec<Link> {
    let Some(origin) = origin else {
        return Vec::new();
    };
    targets
        .iter()
        .enumerate()
        .filter_map(|(index, target)| {
            target.map(|target| Link {
                to: index + offset,
                distance: distance(&origin, &target),
            })
        })
        .collect()
}

fn observed_range<'a>(rows: impl Iterator<Item = &'a Vec<Link>>) -> Option<DistanceRange> {
    rows.flatten()
        .fold(None, |range, link| DistanceRange::include(range, link.distance))
}

/// Distances between every pair `(i, j)` with `i <= j` of residues in a chain.
///
/// The links are stored on residue `i` with `to = j`. The self pair is kept,
/// with a distance of 0.
pub fn internal_distances(chain: ChainView) -> ContactMap {
    let chain_id = chain.chain_id();
    let residues: Vec<ResidueView> = chain.iter_residues().collect();
    let positions: Vec<Option<Position>> =
        residues.iter().map(representative_position).collect();

    let rows: Vec<Vec<Link>> = (0..positions.len())
        .into_par_iter()
        .map(|i| link_row(positions[i], &positions[i..], i))
        .collect();
    let range = observed_range(rows.iter());

    let residues: Vec<AnnotatedResidue> = residues
        .iter()
        .zip(rows)
        .enumerate()
        .map(|(index, (residue, links))| AnnotatedResidue {
            links,
            ..AnnotatedResidue::new(index, residue, chain_id)
        })
        .collect();

    let map = ContactMap {
        mode: ContactMode::Internal,
        residues,
        range,
    };
    debug!(
        "Computed {} distances within chain {}.",
        map.link_count(),
        chain_id
    );
    map
}

/// Distances between every residue of `first` and every residue of `second`.
///
/// Residues of `second` are numbered after the ones of `first`, so a link
/// from residue `i` of `first` to residue `j` of `second` has
/// `to = j + first.residue_count()`. Only the residues of `first` carry
/// links.
pub fn external_distances(first: ChainView, second: ChainView) -> ContactMap {
    let first_residues: Vec<ResidueView> = first.iter_residues().collect();
    let second_residues: Vec<ResidueView> = second.iter_residues().collect();
    let offset = first_residues.len();
    let first_positions: Vec<Option<Position>> =
        first_residues.iter().map(representative_position).collect();
    let second_positions: Vec<Option<Position>> =
        second_residues.iter().map(representative_position).collect();

    let rows: Vec<Vec<Link>> = first_positions
        .par_iter()
        .map(|&origin| link_row(origin, &second_positions, offset))
        .collect();
    let range = observed_range(rows.iter());

    let mut residues: Vec<AnnotatedResidue> = first_residues
        .iter()
        .zip(rows)
        .enumerate()
        .map(|(index, (residue, exlinks))| AnnotatedResidue {
            exlinks,
            ..AnnotatedResidue::new(index, residue, first.chain_id())
        })
        .collect();
    residues.extend(
        second_residues
            .iter()
            .enumerate()
            .map(|(index, residue)| AnnotatedResidue::new(index + offset, residue, second.chain_id())),
    );

    let map = ContactMap {
        mode: ContactMode::External,
        residues,
        range,
    };
    debug!(
        "Computed {} distances between chains {} and {}.",
        map.link_count(),
        first.chain_id(),
        second.chain_id()
    );
    map
}

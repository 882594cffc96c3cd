use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::parsers::errors::ParseWarning;
use crate::parsers::line::{Atom, SeqResEntry};

/// A residue from the SEQRES sequence of a chain.
///
/// `atoms` holds indices into [`Structure::atoms`], in file order. It is
/// empty for residues without coordinates, which is common for disordered
/// regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Residue {
    pub id: usize,
    pub ser_num: usize,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub res_name: String,
    pub atoms: Vec<usize>,
}

/// `residues` holds indices into [`Structure::residues`], in SEQRES order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub id: usize,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub residues: Vec<usize>,
}

/// Everything read from a PDB file.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Structure {
    pub atoms: Vec<Atom>,
    pub seq_res: Vec<SeqResEntry>,
    pub residues: Vec<Residue>,
    /// Chains keyed on their identifier, in the order they first appear.
    pub chains: IndexMap<String, Chain>,
    pub warnings: Vec<ParseWarning>,
}

impl Structure {
    pub fn chain(&self, chain_id: &str) -> Option<ChainView<'_>> {
        self.chains.get(chain_id).map(|chain| ChainView {
            structure: self,
            chain,
        })
    }

    pub fn iter_chains(&self) -> impl Iterator<Item = ChainView<'_>> {
        self.chains.values().map(move |chain| ChainView {
            structure: self,
            chain,
        })
    }

    pub fn iter_residues(&self) -> impl Iterator<Item = ResidueView<'_>> {
        self.residues.iter().map(move |residue| ResidueView {
            structure: self,
            residue,
        })
    }

    pub fn chain_identifiers(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }
}

#[derive(Clone, Copy)]
pub struct ChainView<'a> {
    structure: &'a Structure,
    chain: &'a Chain,
}

impl<'a> ChainView<'a> {
    pub fn chain(&self) -> &'a Chain {
        self.chain
    }

    pub fn chain_id(&self) -> &'a str {
        &self.chain.chain_id
    }

    pub fn residue_count(&self) -> usize {
        self.chain.residues.len()
    }

    pub fn iter_residues(&self) -> impl Iterator<Item = ResidueView<'a>> + 'a {
        let structure = self.structure;
        let chain = self.chain;
        chain.residues.iter().map(move |&index| ResidueView {
            structure,
            residue: &structure.residues[index],
        })
    }
}

#[derive(Clone, Copy)]
pub struct ResidueView<'a> {
    structure: &'a Structure,
    residue: &'a Residue,
}

impl<'a> ResidueView<'a> {
    pub fn residue(&self) -> &'a Residue {
        self.residue
    }

    pub fn name(&self) -> &'a str {
        &self.residue.res_name
    }

    pub fn iter_atoms(&self) -> impl Iterator<Item = &'a Atom> + 'a {
        let structure = self.structure;
        let residue = self.residue;
        residue
            .atoms
            .iter()
            .map(move |&index| &structure.atoms[index])
    }

    /// The first atom of the residue with the given name.
    pub fn find_atom(&self, name: &str) -> Option<&'a Atom> {
        self.iter_atoms().find(|atom| atom.name == name)
    }
}

/// Accumulates the records of a parse, then derives residues and chains from them.
#[derive(Default)]
pub(crate) struct StructureBuilder {
    atoms: Vec<Atom>,
    seq_res: Vec<SeqResEntry>,
    warnings: Vec<ParseWarning>,
    residues: Vec<Residue>,
    chains: IndexMap<String, Chain>,
}

impl StructureBuilder {
    pub fn add_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn add_warnings(&mut self, warnings: Vec<ParseWarning>) {
        self.warnings.extend(warnings);
    }

    pub fn add_seq_res(&mut self, entry: SeqResEntry) {
        let next_chain_id = self.chains.len();
        let chain = self
            .chains
            .entry(entry.chain_id.clone())
            .or_insert_with(|| Chain {
                id: next_chain_id,
                chain_id: entry.chain_id.clone(),
                residues: Vec::new(),
            });
        for res_name in &entry.res_names {
            let id = self.residues.len();
            chain.residues.push(id);
            self.residues.push(Residue {
                id,
                ser_num: chain.residues.len(),
                chain_id: entry.chain_id.clone(),
                res_name: res_name.clone(),
                atoms: Vec::new(),
            });
        }
        self.seq_res.push(entry);
    }

    pub fn build(mut self) -> Structure {
        let mut residue_lookup: HashMap<(&str, isize), usize> =
            HashMap::with_capacity(self.residues.len());
        for residue in &self.residues {
            // Keys are unique: serNum counts up within each chain.
            residue_lookup.insert(
                (residue.chain_id.as_str(), residue.ser_num as isize),
                residue.id,
            );
        }

        let mut residue_atoms: Vec<Vec<usize>> = vec![Vec::new(); self.residues.len()];
        let mut unassigned = 0;
        for (index, atom) in self.atoms.iter().enumerate() {
            let target = atom
                .res_seq
                .and_then(|res_seq| residue_lookup.get(&(atom.chain_id.as_str(), res_seq)));
            match target {
                Some(&residue) => residue_atoms[residue].push(index),
                None => unassigned += 1,
            }
        }
        drop(residue_lookup);
        for (residue, atoms) in self.residues.iter_mut().zip(residue_atoms) {
            residue.atoms = atoms;
        }

        debug!(
            "Read {} atoms ({} outside of the sequence), {} SEQRES entries, {} residues in {} chains.",
            self.atoms.len(),
            unassigned,
            self.seq_res.len(),
            self.residues.len(),
            self.chains.len(),
        );

        Structure {
            atoms: self.atoms,
            seq_res: self.seq_res,
            residues: self.residues,
            chains: self.chains,
            warnings: self.warnings,
        }
    }
}

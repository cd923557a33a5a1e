//! Picks out a single, canonical way of writing cyclic polymers, which could otherwise start at any group

// External Crate Imports
use log::trace;

// Local Crate Imports
use crate::{
    CanonicalEntry, MonomerRegistry, Nucleotide, PolymerKind, SimplePolymer,
    errors::{CyclizationError, Result},
    reconstruct::{nucleotide_notation, simple_notation},
    tokenizer::GROUP_SEPARATOR,
};

// Public API ==========================================================================================================

impl<R: MonomerRegistry + ?Sized> SimplePolymer<'_, R> {
    /// The lexicographically smallest rotation of this notation, splitting only between groups.
    ///
    /// Nucleic acids must be cyclisable: if they start with a sugar, they need to end with a linker, and if they start
    /// with a linker, they must not end with one. A leading linker is moved onto the end of the last nucleotide before
    /// any rotations are tried.
    pub fn canonical_notation(&self) -> Result<String> {
        if self.is_trivially_canonical() {
            return Ok(self.notation.clone());
        }

        let mut notation = self.notation.clone();
        if self.kind == PolymerKind::NucleicAcid {
            let nucleotides = self.nucleotides()?;
            if self.leading_linker(&nucleotides)? {
                if let Some((front, back)) = notation.split_once(GROUP_SEPARATOR) {
                    notation = format!("{back}{front}");
                }
            }
        }

        Ok(rotations(&notation).min().unwrap_or(notation))
    }

    /// Like [`Self::canonical_notation`], but also returns how many monomers were moved from the front of the
    /// notation to the back to reach the canonical rotation
    pub fn canonical_entry(&self) -> Result<CanonicalEntry> {
        if self.is_trivially_canonical() {
            return Ok(CanonicalEntry {
                offset: 0,
                notation: self.notation.clone(),
            });
        }

        let candidates = match self.kind {
            PolymerKind::NucleicAcid => self.nucleotide_rotations()?,
            PolymerKind::Peptide | PolymerKind::Chemical => self.monomer_rotations()?,
        };

        // NOTE: Ties between identical rotations go to the smallest offset, compared as a number (so 2 beats 10)
        let entry = candidates
            .into_iter()
            .min_by(|a, b| (&a.notation, a.offset).cmp(&(&b.notation, b.offset)))
            .unwrap_or_else(|| CanonicalEntry {
                offset: 0,
                notation: self.notation.clone(),
            });
        trace!("canonical form of {:?} is {:?} at offset {}", self.notation, entry.notation, entry.offset);
        Ok(entry)
    }
}

// Private Helper Functions ============================================================================================

impl<R: MonomerRegistry + ?Sized> SimplePolymer<'_, R> {
    // NOTE: Chemical modifiers are a single unit, and a single group has no other rotations to compare against
    fn is_trivially_canonical(&self) -> bool {
        self.kind == PolymerKind::Chemical || !self.notation.contains(GROUP_SEPARATOR)
    }

    /// Checks that the ends of a nucleic acid can be joined, returning `true` if it starts with a bare linker
    fn leading_linker(&self, nucleotides: &[Nucleotide]) -> Result<bool> {
        let (Some(first), Some(last)) = (nucleotides.first(), nucleotides.last()) else {
            return Ok(false);
        };

        let notation = self.notation.clone();
        let starts_with_sugar = first.sugar_monomer(self.registry).is_some();
        let ends_with_linker = last.phosphate_monomer(self.registry).is_some();
        match (starts_with_sugar, ends_with_linker) {
            (true, true) => Ok(false),
            (true, false) => Err(CyclizationError::MissingLinker { notation }.into()),
            (false, true) => Err(CyclizationError::DuplicateLinkers { notation }.into()),
            (false, false) => Ok(true),
        }
    }

    fn nucleotide_rotations(&self) -> Result<Vec<CanonicalEntry>> {
        let mut nucleotides = self.nucleotides()?;
        let mut offset = 0;
        if self.leading_linker(&nucleotides)? && nucleotides.len() > 1 {
            let first = nucleotides.remove(0);
            if let Some(last) = nucleotides.last_mut() {
                last.notation.push_str(&first.notation);
            }
            offset = 1;
        }

        let mut candidates = Vec::with_capacity(nucleotides.len());
        for _ in 0..nucleotides.len() {
            candidates.push(CanonicalEntry {
                offset,
                notation: nucleotide_notation(&nucleotides),
            });
            offset += self.monomers_in(&nucleotides[0]);
            nucleotides.rotate_left(1);
        }
        Ok(candidates)
    }

    fn monomer_rotations(&self) -> Result<Vec<CanonicalEntry>> {
        let mut ids: Vec<_> = self.monomer_ids().collect();
        (0..ids.len())
            .map(|offset| {
                let notation = simple_notation(self.registry, self.kind, &ids)?;
                ids.rotate_left(1);
                Ok(CanonicalEntry { offset, notation })
            })
            .collect()
    }

    fn monomers_in(&self, nucleotide: &Nucleotide) -> usize {
        [
            nucleotide.sugar_monomer(self.registry),
            nucleotide.base_monomer(self.registry),
            nucleotide.phosphate_monomer(self.registry),
        ]
        .iter()
        .flatten()
        .count()
    }
}

/// Every way of splitting `notation` between two groups and swapping the halves, starting with `notation` itself
fn rotations(notation: &str) -> impl Iterator<Item = String> {
    let splits = notation
        .match_indices(GROUP_SEPARATOR)
        .filter(|&(i, _)| i > 0)
        .map(move |(i, _)| {
            let (front, back) = (&notation[..i], &notation[i + GROUP_SEPARATOR.len_utf8()..]);
            format!("{back}{GROUP_SEPARATOR}{front}")
        });
    std::iter::once(notation.to_owned()).chain(splits)
}

// Module Tests ========================================================================================================

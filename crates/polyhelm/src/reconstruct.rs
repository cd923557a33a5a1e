//! Writes monomer ids back out as simple notation

// External Crate Imports
use itertools::Itertools;

// Local Crate Imports
use crate::{
    MonomerRegistry, MonomerRole, Nucleotide, PolymerKind,
    errors::Result,
    tokenizer::{BRACKET_CLOSE, BRACKET_OPEN, BRANCH_CLOSE, BRANCH_OPEN, GROUP_SEPARATOR},
};

// NOTE: Only sugars start a new nucleotide group
const SUGAR_ANALOG: &str = "R";

// Public API ==========================================================================================================

/// Rebuilds the simple notation for a list of monomer ids.
///
/// For nucleic acids, a group separator is written before every sugar (a backbone monomer with an `R` natural analog)
/// except the first, and branch monomers are wrapped in parentheses. Peptide ids are all separated, and chemical
/// modifiers are written as their only id. Multi-character ids are bracketed in every case.
pub fn simple_notation<R: MonomerRegistry + ?Sized>(
    registry: &R,
    kind: PolymerKind,
    ids: &[impl AsRef<str>],
) -> Result<String> {
    match kind {
        PolymerKind::NucleicAcid => {
            let mut notation = String::new();
            for id in ids {
                let id = id.as_ref();
                let monomer = registry.monomer(kind, id)?;
                if monomer.role == MonomerRole::Backbone {
                    if monomer.natural_analog.as_deref() == Some(SUGAR_ANALOG) && !notation.is_empty() {
                        notation.push(GROUP_SEPARATOR);
                    }
                    notation.push_str(&bracketed(id));
                } else {
                    notation.push(BRANCH_OPEN);
                    notation.push_str(&bracketed(id));
                    notation.push(BRANCH_CLOSE);
                }
            }
            Ok(notation)
        }
        PolymerKind::Peptide => Ok(ids
            .iter()
            .map(|id| bracketed(id.as_ref()))
            .join(&GROUP_SEPARATOR.to_string())),
        PolymerKind::Chemical => Ok(ids.first().map(|id| id.as_ref().to_owned()).unwrap_or_default()),
    }
}

/// Joins the notation of each nucleotide back together with group separators
pub fn nucleotide_notation(nucleotides: &[Nucleotide]) -> String {
    nucleotides
        .iter()
        .map(|n| n.notation.as_str())
        .join(&GROUP_SEPARATOR.to_string())
}

// Private Helper Functions ============================================================================================

fn bracketed(id: &str) -> String {
    if id.chars().nth(1).is_some() {
        format!("{BRACKET_OPEN}{id}{BRACKET_CLOSE}")
    } else {
        id.to_owned()
    }
}

// Module Tests ========================================================================================================

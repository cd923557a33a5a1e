// External Crate Imports
use log::debug;

// Local Crate Imports
use crate::{
    MonomerRegistry, MonomerRole, PolymerKind, SimplePolymer,
    errors::{ReplacementError, Result},
    nucleotides::UNKNOWN_SYMBOL,
    reconstruct::simple_notation,
};

// Public API ==========================================================================================================

/// Checks that every `existing` monomer in a polymer could be swapped out for `new` without changing how the polymer
/// is connected.
///
/// Both monomers must be registered for `kind` and declare exactly the same attachment points. Nucleic acid monomers
/// must also share a role, and backbone monomers a natural analog, so that sugars are only swapped for sugars and
/// linkers for linkers.
pub fn validate_replacement<R: MonomerRegistry + ?Sized>(
    registry: &R,
    kind: PolymerKind,
    existing: &str,
    new: &str,
) -> Result<()> {
    if existing.is_empty() {
        return Err(ReplacementError::MissingExistingId.into());
    }
    if new.is_empty() {
        return Err(ReplacementError::MissingNewId.into());
    }

    let lookup = |id: &str| {
        registry.monomer(kind, id).map_err(|_| ReplacementError::UnknownMonomer {
            kind,
            id: id.to_owned(),
        })
    };
    let existing_monomer = lookup(existing)?;
    let new_monomer = lookup(new)?;

    if kind == PolymerKind::NucleicAcid {
        if existing_monomer.role != new_monomer.role {
            return Err(ReplacementError::RoleMismatch {
                existing: existing.to_owned(),
                existing_role: existing_monomer.role,
                new: new.to_owned(),
                new_role: new_monomer.role,
            }
            .into());
        }

        if existing_monomer.role == MonomerRole::Backbone
            && existing_monomer.natural_analog != new_monomer.natural_analog
        {
            let analog = |analog: &Option<String>| analog.as_deref().unwrap_or(UNKNOWN_SYMBOL).to_owned();
            return Err(ReplacementError::NaturalAnalogMismatch {
                existing: existing.to_owned(),
                existing_analog: analog(&existing_monomer.natural_analog),
                new: new.to_owned(),
                new_analog: analog(&new_monomer.natural_analog),
            }
            .into());
        }
    }

    let existing_labels = existing_monomer.attachment_labels();
    let new_labels = new_monomer.attachment_labels();
    if existing_labels != new_labels {
        let owned = |labels: Vec<&str>| -> Vec<String> { labels.into_iter().map(str::to_owned).collect() };
        return Err(ReplacementError::AttachmentMismatch {
            existing: existing.to_owned(),
            existing_labels: owned(existing_labels),
            new: new.to_owned(),
            new_labels: owned(new_labels),
        }
        .into());
    }

    Ok(())
}

impl<R: MonomerRegistry + ?Sized> SimplePolymer<'_, R> {
    /// Swaps every `existing` monomer for `new` (see [`validate_replacement`]), returning the updated notation
    pub fn replace_monomer(&self, existing: &str, new: &str) -> Result<String> {
        validate_replacement(self.registry, self.kind, existing, new)?;

        let ids: Vec<_> = self
            .monomer_ids()
            .map(|id| if id == existing { new } else { id })
            .collect();
        let notation = simple_notation(self.registry, self.kind, &ids)?;
        debug!("replaced {existing:?} with {new:?}: {:?} -> {notation:?}", self.notation);
        Ok(notation)
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::{MonomerDatabase, NotationError, NotationParser, testing_tools::assert_miette_snapshot};

    static DB: LazyLock<MonomerDatabase> = LazyLock::new(MonomerDatabase::default);
    static PARSER: LazyLock<NotationParser<MonomerDatabase>> = LazyLock::new(|| NotationParser::new(&*DB));

    fn replace(kind: PolymerKind, notation: &str, existing: &str, new: &str) -> Result<String> {
        PARSER.parse(kind, notation).unwrap().replace_monomer(existing, new)
    }

    fn replacement_error(kind: PolymerKind, existing: &str, new: &str) -> ReplacementError {
        match *validate_replacement(&*DB, kind, existing, new).unwrap_err() {
            NotationError::Replacement(error) => error,
            error => panic!("expected a replacement error, found {error:?}"),
        }
    }

    #[test]
    fn replace_sugars() {
        let notation = replace(PolymerKind::NucleicAcid, "R(A)P.R(C)P.R(G)", "R", "dR").unwrap();
        assert_eq!(notation, "[dR](A)P.[dR](C)P.[dR](G)");
    }

    #[test]
    fn replace_linkers_and_bases() {
        let notation = replace(PolymerKind::NucleicAcid, "R(A)P.R(C)P.R(G)", "P", "sP").unwrap();
        assert_eq!(notation, "R(A)[sP].R(C)[sP].R(G)");
        let notation = replace(PolymerKind::NucleicAcid, "R(A)P.R(C)P.R(A)", "A", "6meA").unwrap();
        assert_eq!(notation, "R([6meA])P.R(C)P.R([6meA])");
        // NOTE: Bases are free to change their natural analog
        let notation = replace(PolymerKind::NucleicAcid, "R(A)P.R(C)P", "C", "U").unwrap();
        assert_eq!(notation, "R(A)P.R(U)P");
    }

    #[test]
    fn replace_absent_monomers() {
        let notation = replace(PolymerKind::NucleicAcid, "R(A)P.R(C)P", "G", "In").unwrap();
        assert_eq!(notation, "R(A)P.R(C)P");
    }

    #[test]
    fn replace_peptide_residues() {
        let notation = replace(PolymerKind::Peptide, "A.G.A.L", "A", "dA").unwrap();
        assert_eq!(notation, "[dA].G.[dA].L");
        // NOTE: Peptide residues aren't restricted by their natural analog
        let notation = replace(PolymerKind::Peptide, "A.G.A.L", "G", "L").unwrap();
        assert_eq!(notation, "A.L.A.L");
    }

    #[test]
    fn replace_chemical_modifiers() {
        let notation = replace(PolymerKind::Chemical, "PEG2", "PEG2", "SMCC").unwrap();
        assert_eq!(notation, "SMCC");
    }

    #[test]
    fn replacement_is_reversible() {
        for (kind, notation, a, b) in [
            (PolymerKind::NucleicAcid, "[mR](A)[sP].R([5meC])P.R(G)", "R", "fR"),
            (PolymerKind::NucleicAcid, "P.R(U)P.[LR](U)P", "U", "T"),
            (PolymerKind::Peptide, "C.[meA].K.[Nal]", "meA", "Aib"),
        ] {
            let forward = replace(kind, notation, a, b).unwrap();
            assert_ne!(forward, notation);
            assert_eq!(replace(kind, &forward, b, a).unwrap(), notation);
        }
    }

    #[test]
    fn missing_ids() {
        assert_eq!(
            replacement_error(PolymerKind::Peptide, "", "A"),
            ReplacementError::MissingExistingId
        );
        assert_eq!(
            replacement_error(PolymerKind::Peptide, "A", ""),
            ReplacementError::MissingNewId
        );
    }

    #[test]
    fn unknown_monomers() {
        assert_eq!(
            replacement_error(PolymerKind::Peptide, "A", "T"),
            ReplacementError::UnknownMonomer {
                kind: PolymerKind::Peptide,
                id: "T".to_owned()
            }
        );
        assert_eq!(
            replacement_error(PolymerKind::NucleicAcid, "Zz", "R"),
            ReplacementError::UnknownMonomer {
                kind: PolymerKind::NucleicAcid,
                id: "Zz".to_owned()
            }
        );
    }

    #[test]
    fn mismatched_roles() {
        assert_eq!(
            replacement_error(PolymerKind::NucleicAcid, "A", "R"),
            ReplacementError::RoleMismatch {
                existing: "A".to_owned(),
                existing_role: MonomerRole::Branch,
                new: "R".to_owned(),
                new_role: MonomerRole::Backbone
            }
        );
    }

    #[test]
    fn mismatched_natural_analogs() {
        assert_eq!(
            replacement_error(PolymerKind::NucleicAcid, "R", "P"),
            ReplacementError::NaturalAnalogMismatch {
                existing: "R".to_owned(),
                existing_analog: "R".to_owned(),
                new: "P".to_owned(),
                new_analog: "P".to_owned()
            }
        );
    }

    #[test]
    fn mismatched_attachments() {
        let error = replacement_error(PolymerKind::Peptide, "A", "C");
        assert_eq!(
            error,
            ReplacementError::AttachmentMismatch {
                existing: "A".to_owned(),
                existing_labels: vec!["R1".to_owned(), "R2".to_owned()],
                new: "C".to_owned(),
                new_labels: vec!["R1".to_owned(), "R2".to_owned(), "R3".to_owned()]
            }
        );
        let mismatch = validate_replacement(&*DB, PolymerKind::Peptide, "A", "C");
        assert_miette_snapshot!(mismatch);

        assert!(matches!(
            replacement_error(PolymerKind::Chemical, "PEG2", "sDBL"),
            ReplacementError::AttachmentMismatch { .. }
        ));
    }
}

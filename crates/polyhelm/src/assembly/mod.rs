//! Joins monomer structures into a single polymer by pairing up their attachment points

pub mod connectivity;
pub mod errors;

// Standard Library Imports
use std::sync::Arc;

// External Crate Imports
use ahash::HashMap;
use log::trace;

// Local Crate Imports
use self::errors::AssemblyError;
use crate::{
    AssembledPolymer, AttachmentKey, ChemistryEngine, Monomer, MonomerRole, OpenAttachments, PolymerKind,
    RGroupStructure, errors::Result,
};

pub const BACKBONE_LEFT: &str = "R1";
pub const BACKBONE_RIGHT: &str = "R2";
pub const BRANCH_POINT: &str = "R3";
pub const BRANCH_MONOMER_POINT: &str = "R1";

// Public API ==========================================================================================================

/// Builds every monomer's structure with `engine`, then joins them with [`assemble_structures`]
pub fn assemble<E: ChemistryEngine + ?Sized>(
    engine: &E,
    kind: PolymerKind,
    monomers: &[Arc<Monomer>],
) -> Result<AssembledPolymer<E::Structure, E::Attachment>> {
    let structures = monomers
        .iter()
        .enumerate()
        .map(|(i, monomer)| {
            let descriptor = monomer.structure.as_deref().ok_or_else(|| {
                AssemblyError::NonSpecificStructure {
                    ordinal: i + 1,
                    id: monomer.id.clone(),
                }
            })?;
            engine.structure_for(descriptor)
        })
        .collect::<Result<_>>()?;

    assemble_structures(engine, kind, monomers, structures)
}

/// Joins pre-built monomer structures into a single polymer.
///
/// Chemical modifiers are a single monomer, so all of their attachment points are left open. Otherwise, the first
/// monomer's `R1` stays open, each backbone monomer's `R1` is bonded to the previous backbone monomer's `R2`, and each
/// branch monomer's `R1` is bonded to the `R3` of the backbone monomer it follows. Every attachment point that isn't
/// consumed by a bond is returned as open, keyed by the 1-based ordinal of the monomer it belongs to.
pub fn assemble_structures<E: ChemistryEngine + ?Sized>(
    engine: &E,
    kind: PolymerKind,
    monomers: &[Arc<Monomer>],
    structures: Vec<RGroupStructure<E::Structure, E::Attachment>>,
) -> Result<AssembledPolymer<E::Structure, E::Attachment>> {
    if monomers.len() != structures.len() {
        return Err(AssemblyError::CountMismatch {
            monomers: monomers.len(),
            structures: structures.len(),
        }
        .into());
    }

    let (structures, mut attachments): (Vec<_>, Vec<_>) = structures
        .into_iter()
        .map(|s| (s.structure, s.attachments))
        .unzip();
    let mut structures = structures.into_iter();
    let Some(mut merged) = structures.next() else {
        return Err(AssemblyError::NoMonomers.into());
    };

    let mut open_attachments = OpenAttachments::new();
    if kind == PolymerKind::Chemical {
        // NOTE: Chemical modifiers are only ever a single monomer, so any others have nothing to bond to
        expose(&mut open_attachments, 0, &mut attachments[0]);
        return Ok(AssembledPolymer {
            structure: merged,
            open_attachments,
        });
    }

    if let Some(point) = attachments[0].remove(BACKBONE_LEFT) {
        open_attachments.insert(AttachmentKey::new(1, BACKBONE_LEFT), point);
    }

    let mut previous = 0;
    for (i, structure) in (1..).zip(structures) {
        let monomer = &monomers[i];
        match monomer.role {
            MonomerRole::Backbone => {
                let target_point = take_point(&mut attachments, monomers, previous, BACKBONE_RIGHT)?;
                let point = take_point(&mut attachments, monomers, i, BACKBONE_LEFT)?;
                engine.merge(&mut merged, target_point, structure, point)?;
                trace!("joined backbone monomer {} onto {}", i + 1, previous + 1);

                expose(&mut open_attachments, previous, &mut attachments[previous]);
                previous = i;
            }
            MonomerRole::Branch => {
                let target_point = take_point(&mut attachments, monomers, previous, BRANCH_POINT)?;
                let point = take_point(&mut attachments, monomers, i, BRANCH_MONOMER_POINT)?;
                engine.merge(&mut merged, target_point, structure, point)?;
                trace!("joined branch monomer {} onto {}", i + 1, previous + 1);

                expose(&mut open_attachments, i, &mut attachments[i]);
            }
            MonomerRole::Undefined => {
                return Err(AssemblyError::UndefinedMonomerRole {
                    ordinal: i + 1,
                    id: monomer.id.clone(),
                }
                .into());
            }
        }
    }
    expose(&mut open_attachments, previous, &mut attachments[previous]);

    Ok(AssembledPolymer {
        structure: merged,
        open_attachments,
    })
}

impl AttachmentKey {
    pub fn new(ordinal: usize, label: impl Into<String>) -> Self {
        let label = label.into();
        Self { ordinal, label }
    }
}

// Private Helper Functions ============================================================================================

fn take_point<A>(
    attachments: &mut [HashMap<String, A>],
    monomers: &[Arc<Monomer>],
    index: usize,
    label: &str,
) -> Result<A> {
    attachments[index].remove(label).ok_or_else(|| {
        AssemblyError::MissingAttachmentPoint {
            ordinal: index + 1,
            id: monomers[index].id.clone(),
            label: label.to_owned(),
        }
        .into()
    })
}

fn expose<A>(open_attachments: &mut OpenAttachments<A>, index: usize, attachments: &mut HashMap<String, A>) {
    for (label, point) in attachments.drain() {
        open_attachments.insert(AttachmentKey::new(index + 1, label), point);
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::{
        ConnectivityEngine, MonomerDatabase, MonomerRegistry, NotationError, tokenizer::monomer_tokens,
    };

    static DB: LazyLock<MonomerDatabase> = LazyLock::new(MonomerDatabase::default);

    fn monomers(kind: PolymerKind, notation: &str) -> Vec<Arc<Monomer>> {
        monomer_tokens(&*DB, kind, notation)
            .unwrap()
            .into_iter()
            .map(|t| DB.monomer(kind, &t.id).unwrap())
            .collect()
    }

    fn open_keys(kind: PolymerKind, notation: &str) -> Vec<String> {
        let engine = ConnectivityEngine::new();
        let polymer = assemble(&engine, kind, &monomers(kind, notation)).unwrap();
        polymer.open_attachments.keys().map(ToString::to_string).collect()
    }

    fn custom(id: &str, role: MonomerRole, structure: Option<&str>) -> Arc<Monomer> {
        Arc::new(Monomer {
            id: id.to_owned(),
            name: id.to_owned(),
            kind: PolymerKind::Peptide,
            role,
            natural_analog: None,
            attachments: Vec::new(),
            structure: structure.map(str::to_owned),
        })
    }

    #[test]
    fn assemble_rna() {
        assert_eq!(open_keys(PolymerKind::NucleicAcid, "R(A)P.R(C)P"), ["1:R1", "6:R2"]);
        assert_eq!(open_keys(PolymerKind::NucleicAcid, "R(A)"), ["1:R1", "1:R2"]);
    }

    #[test]
    fn assemble_peptides() {
        assert_eq!(open_keys(PolymerKind::Peptide, "A.C.G"), ["1:R1", "2:R3", "3:R2"]);
        assert_eq!(open_keys(PolymerKind::Peptide, "G"), ["1:R1", "1:R2"]);
        assert_eq!(open_keys(PolymerKind::Peptide, "K.K"), ["1:R1", "1:R3", "2:R2", "2:R3"]);
    }

    #[test]
    fn assemble_chemicals() {
        assert_eq!(open_keys(PolymerKind::Chemical, "sDBL"), ["1:R1", "1:R2", "1:R3"]);
        assert_eq!(open_keys(PolymerKind::Chemical, "Az"), ["1:R1"]);
    }

    #[test]
    fn branch_leftovers_use_their_own_ordinal() {
        let engine = ConnectivityEngine::new();
        let monomers = vec![
            DB.monomer(PolymerKind::NucleicAcid, "R").unwrap(),
            custom("Fl", MonomerRole::Branch, Some("[*]c1ccccc1[*] |$_R1;;;;;;;_R2$|")),
            DB.monomer(PolymerKind::NucleicAcid, "P").unwrap(),
        ];
        let polymer = assemble(&engine, PolymerKind::NucleicAcid, &monomers).unwrap();
        let keys: Vec<_> = polymer.open_attachments.keys().map(ToString::to_string).collect();
        assert_eq!(keys, ["1:R1", "2:R2", "3:R2"]);
    }

    #[test]
    fn every_attachment_point_is_accounted_for() {
        let engine = ConnectivityEngine::new();
        for (kind, notation) in [
            (PolymerKind::NucleicAcid, "[mR]([5meC])[sP].R(A)P.[dR](T)"),
            (PolymerKind::Peptide, "C.K.D.E.[Aib].L"),
        ] {
            let monomers = monomers(kind, notation);
            let declared: usize = monomers.iter().map(|m| m.attachments.len()).sum();
            let polymer = assemble(&engine, kind, &monomers).unwrap();

            let bonds = polymer.structure.bonds().len();
            assert_eq!(bonds, monomers.len() - 1);
            assert_eq!(declared, 2 * bonds + polymer.open_attachments.len());
            assert_eq!(polymer.structure.open_points().count(), polymer.open_attachments.len());
        }
    }

    #[test]
    fn missing_attachment_points() {
        let engine = ConnectivityEngine::new();
        let monomers = vec![
            DB.monomer(PolymerKind::Peptide, "A").unwrap(),
            custom("Ac", MonomerRole::Backbone, Some("CC([*])=O |$;;_R2;$|")),
        ];
        let error = *assemble(&engine, PolymerKind::Peptide, &monomers).unwrap_err();
        assert_eq!(
            error,
            NotationError::Assembly(AssemblyError::MissingAttachmentPoint {
                ordinal: 2,
                id: "Ac".to_owned(),
                label: "R1".to_owned()
            })
        );
    }

    #[test]
    fn undefined_roles() {
        let engine = ConnectivityEngine::new();
        let monomers = vec![
            DB.monomer(PolymerKind::Peptide, "A").unwrap(),
            DB.monomer(PolymerKind::Chemical, "PEG2").unwrap(),
        ];
        let error = *assemble(&engine, PolymerKind::Peptide, &monomers).unwrap_err();
        assert_eq!(
            error,
            NotationError::Assembly(AssemblyError::UndefinedMonomerRole {
                ordinal: 2,
                id: "PEG2".to_owned()
            })
        );
    }

    #[test]
    fn non_specific_structures() {
        let engine = ConnectivityEngine::new();
        let monomers = vec![custom("Xaa", MonomerRole::Undefined, None)];
        let error = *assemble(&engine, PolymerKind::Chemical, &monomers).unwrap_err();
        assert!(matches!(
            error,
            NotationError::Assembly(AssemblyError::NonSpecificStructure { ordinal: 1, .. })
        ));

        let monomers = vec![custom("Blank", MonomerRole::Undefined, Some(" "))];
        let error = *assemble(&engine, PolymerKind::Chemical, &monomers).unwrap_err();
        assert!(matches!(
            error,
            NotationError::Assembly(AssemblyError::UnresolvableStructure { .. })
        ));
    }

    #[test]
    fn count_mismatches() {
        let engine = ConnectivityEngine::new();
        let monomers = monomers(PolymerKind::Peptide, "A.G");
        let structures = vec![engine.structure_for("[*]C[*] |$_R1;;_R2$|").unwrap()];
        let error = *assemble_structures(&engine, PolymerKind::Peptide, &monomers, structures).unwrap_err();
        assert_eq!(
            error,
            NotationError::Assembly(AssemblyError::CountMismatch {
                monomers: 2,
                structures: 1
            })
        );

        let error = *assemble_structures(&engine, PolymerKind::Peptide, &[], Vec::new()).unwrap_err();
        assert_eq!(error, NotationError::Assembly(AssemblyError::NoMonomers));
    }
}

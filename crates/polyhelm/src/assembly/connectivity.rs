// Standard Library Imports
use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicUsize, Ordering},
};

// External Crate Imports
use ahash::HashMap;
use derive_more::Display;
use log::trace;
use serde::Serialize;

// Local Crate Imports
use super::errors::AssemblyError;
use crate::{ChemistryEngine, RGroupStructure, errors::Result, monomers::ad_hoc::attachment_labels};

// Public API ==========================================================================================================

/// A [`ChemistryEngine`] that tracks which monomer fragments are bonded through which attachment points, without
/// modelling any atoms
///
/// Every structure built by the same engine gets a distinct [`FragmentId`], so fragments can be told apart after they
/// have been merged together.
#[derive(Debug, Default)]
pub struct ConnectivityEngine {
    next_fragment: AtomicUsize,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Serialize)]
pub struct FragmentId(usize);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Serialize)]
#[display("{fragment}:{label}")]
pub struct AttachmentPoint {
    pub fragment: FragmentId,
    pub label: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Fragment {
    pub id: FragmentId,
    pub descriptor: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize)]
pub struct ConnectivityGraph {
    fragments: Vec<Fragment>,
    bonds: Vec<(AttachmentPoint, AttachmentPoint)>,
    open: BTreeSet<AttachmentPoint>,
}

impl ConnectivityEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConnectivityGraph {
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    #[must_use]
    pub fn bonds(&self) -> &[(AttachmentPoint, AttachmentPoint)] {
        &self.bonds
    }

    pub fn open_points(&self) -> impl Iterator<Item = &AttachmentPoint> {
        self.open.iter()
    }
}

impl ChemistryEngine for ConnectivityEngine {
    type Structure = ConnectivityGraph;
    type Attachment = AttachmentPoint;

    fn structure_for(&self, descriptor: &str) -> Result<RGroupStructure<ConnectivityGraph, AttachmentPoint>> {
        if descriptor.trim().is_empty() {
            let descriptor = descriptor.to_owned();
            return Err(AssemblyError::UnresolvableStructure { descriptor }.into());
        }

        let id = FragmentId(self.next_fragment.fetch_add(1, Ordering::Relaxed));
        let attachments: HashMap<_, _> = attachment_labels(descriptor)
            .into_iter()
            .map(|label| {
                let point = AttachmentPoint {
                    fragment: id,
                    label: label.clone(),
                };
                (label, point)
            })
            .collect();

        let structure = ConnectivityGraph {
            fragments: vec![Fragment {
                id,
                descriptor: descriptor.to_owned(),
            }],
            bonds: Vec::new(),
            open: attachment_set(&attachments),
        };
        trace!("built fragment {id} from {descriptor:?}");

        Ok(RGroupStructure {
            structure,
            attachments,
        })
    }

    fn merge(
        &self,
        target: &mut ConnectivityGraph,
        target_point: AttachmentPoint,
        other: ConnectivityGraph,
        other_point: AttachmentPoint,
    ) -> Result<()> {
        let ConnectivityGraph {
            fragments,
            bonds,
            mut open,
        } = other;

        for (points, point) in [(&target.open, &target_point), (&open, &other_point)] {
            if !points.contains(point) {
                return Err(AssemblyError::ClosedAttachmentPoint {
                    fragment: point.fragment.0,
                    label: point.label.clone(),
                }
                .into());
            }
        }

        target.open.remove(&target_point);
        open.remove(&other_point);

        target.fragments.extend(fragments);
        target.bonds.extend(bonds);
        target.open.append(&mut open);
        trace!("bonded {target_point} to {other_point}");
        target.bonds.push((target_point, other_point));

        Ok(())
    }
}

// Private Helper Functions ============================================================================================

fn attachment_set(attachments: &HashMap<String, AttachmentPoint>) -> BTreeSet<AttachmentPoint> {
    attachments.values().cloned().collect()
}

// Module Tests ========================================================================================================

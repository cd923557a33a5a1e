// Standard Library Imports
use std::sync::LazyLock;

// External Crate Imports
use itertools::Itertools;
use log::debug;
use regex::Regex;

// Local Crate Imports
use crate::{Attachment, Monomer, MonomerRole, PolymerKind};

pub const DEFAULT_PREFIX: &str = "CM#";
pub const DEFAULT_CAP: &str = "H";

// Public API ==========================================================================================================

/// Hands out fresh ids for chemical modifiers that are only known by their structure descriptor
///
/// A minter isn't synchronised on its own: it's meant to live inside whatever lock guards the table that its ids are
/// being inserted into, so that picking an id and registering it happen in a single critical section.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AdHocMinter {
    prefix: String,
    seed: usize,
}

impl AdHocMinter {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self { prefix, seed: 0 }
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: usize) -> Self {
        self.seed = seed;
        self
    }

    /// Advances the seed until it lands on an id that isn't `taken`
    pub fn next_id(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            self.seed += 1;
            let id = format!("{}{}", self.prefix, self.seed);
            if !taken(&id) {
                debug!("minted the ad-hoc monomer id {id:?}");
                return id;
            }
        }
    }
}

impl Default for AdHocMinter {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl Monomer {
    /// Builds a chemical modifier straight from a structure descriptor, capping every attachment point in it with a
    /// hydrogen
    pub(crate) fn ad_hoc(id: String, descriptor: &str) -> Self {
        let attachments = attachment_labels(descriptor)
            .into_iter()
            .map(|label| Attachment {
                label,
                cap: DEFAULT_CAP.to_owned(),
            })
            .collect();

        Self {
            name: id.clone(),
            id,
            kind: PolymerKind::Chemical,
            role: MonomerRole::Undefined,
            natural_analog: None,
            attachments,
            structure: Some(descriptor.to_owned()),
        }
    }
}

/// Finds every attachment point label (`R` followed by one or more digits) in a structure descriptor, in order of
/// first appearance
#[must_use]
pub fn attachment_labels(descriptor: &str) -> Vec<String> {
    static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("R[0-9]+").unwrap());

    LABEL_RE
        .find_iter(descriptor)
        .map(|label| label.as_str().to_owned())
        .unique()
        .collect()
}

// Module Tests ========================================================================================================

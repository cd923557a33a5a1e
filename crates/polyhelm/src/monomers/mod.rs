pub mod ad_hoc;
pub mod monomer_database;

// Standard Library Imports
use std::str::FromStr;

// Local Crate Imports
use crate::{
    Monomer, MonomerRole, PolymerKind,
    errors::{LookupError, Result},
};

impl PolymerKind {
    pub const ALL: [Self; 3] = [Self::NucleicAcid, Self::Peptide, Self::Chemical];
}

impl FromStr for PolymerKind {
    type Err = Box<crate::NotationError>;

    fn from_str(tag: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == tag)
            .ok_or_else(|| LookupError::polymer_kind(tag).into())
    }
}

impl FromStr for MonomerRole {
    type Err = String;

    fn from_str(role: &str) -> Result<Self, Self::Err> {
        [Self::Backbone, Self::Branch, Self::Undefined]
            .into_iter()
            .find(|r| r.to_string() == role)
            .ok_or_else(|| role.to_owned())
    }
}

impl Monomer {
    /// The attachment labels this monomer declares, sorted
    #[must_use]
    pub fn attachment_labels(&self) -> Vec<&str> {
        let mut labels: Vec<_> = self.attachments.iter().map(|a| a.label.as_str()).collect();
        labels.sort_unstable();
        labels
    }
}

// Module Tests ========================================================================================================

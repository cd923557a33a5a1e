//! Parsing, validation, and canonicalisation of simple polymer notation

pub mod assembly;
mod canonical;
pub mod errors;
pub mod monomers;
pub mod nucleotides;
mod polymer;
mod reconstruct;
mod replacer;
#[cfg(test)]
mod testing_tools;
pub mod tokenizer;

// Standard Library Imports
use std::{collections::BTreeMap, ops::Range, sync::Arc};

// External Crate Imports
use ahash::HashMap;
use derive_more::{Display, IsVariant};
use serde::Serialize;

// Local Crate Imports
use errors::Result;

// FIXME: Work out what should be publicly exported, maybe with a prelude?
pub use assembly::connectivity::ConnectivityEngine;
pub use errors::NotationError;
pub use monomers::monomer_database::MonomerDatabase;
pub use reconstruct::{nucleotide_notation, simple_notation};
pub use replacer::validate_replacement;

// Polymer Kinds and Roles =============================================================================================

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, IsVariant, Serialize)]
pub enum PolymerKind {
    #[display("RNA")]
    NucleicAcid,
    #[display("PEPTIDE")]
    Peptide,
    #[display("CHEM")]
    Chemical,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, IsVariant, Serialize)]
pub enum MonomerRole {
    #[display("backbone")]
    Backbone,
    #[display("branch")]
    Branch,
    #[display("undefined")]
    Undefined,
}

// Monomers ============================================================================================================

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Monomer {
    pub id: String,
    pub name: String,
    pub kind: PolymerKind,
    pub role: MonomerRole,
    pub natural_analog: Option<String>,
    pub attachments: Vec<Attachment>,
    pub structure: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub struct Attachment {
    pub label: String,
    pub cap: String,
}

// Tokens ==============================================================================================================

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, IsVariant, Serialize)]
pub enum TokenRole {
    Backbone,
    Branch,
}

/// A single monomer identifier pulled out of a notation, along with the byte range it was read from
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MonomerToken {
    pub id: String,
    pub role: TokenRole,
    pub span: Range<usize>,
}

// Nucleotides =========================================================================================================

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize)]
pub enum PositionType {
    Start,
    #[default]
    Middle,
    End,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct Nucleotide {
    pub symbol: String,
    pub notation: String,
    pub position: PositionType,
}

// Assembly ============================================================================================================

/// Identifies an attachment point left open after assembly: the 1-based ordinal of the monomer it came from, and its
/// label (e.g. `3:R2`)
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Serialize)]
#[display("{ordinal}:{label}")]
pub struct AttachmentKey {
    pub ordinal: usize,
    pub label: String,
}

pub type OpenAttachments<A> = BTreeMap<AttachmentKey, A>;

/// A monomer structure, along with the attachment points it exposes, keyed by label
#[derive(Clone, Debug)]
pub struct RGroupStructure<S, A> {
    pub structure: S,
    pub attachments: HashMap<String, A>,
}

#[derive(Clone, Debug)]
pub struct AssembledPolymer<S, A> {
    pub structure: S,
    pub open_attachments: OpenAttachments<A>,
}

// Canonical Forms =====================================================================================================

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct CanonicalEntry {
    pub offset: usize,
    pub notation: String,
}

// Parsed Polymers =====================================================================================================

#[derive(Debug)]
pub struct NotationParser<'r, R: ?Sized> {
    registry: &'r R,
}

// NOTE: Manually implemented so that `R` itself doesn't need to be `Copy`
impl<R: ?Sized> Clone for NotationParser<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: ?Sized> Copy for NotationParser<'_, R> {}

/// A validated notation of a single polymer kind, holding the monomers it resolved to
#[derive(Clone, Debug)]
pub struct SimplePolymer<'r, R: ?Sized> {
    registry: &'r R,
    kind: PolymerKind,
    notation: String,
    tokens: Vec<MonomerToken>,
    monomers: Vec<Arc<Monomer>>,
}

// Seams ===============================================================================================================

/// Read access to the monomer definitions that notations are resolved against
pub trait MonomerRegistry {
    fn monomer(&self, kind: PolymerKind, id: &str) -> Result<Arc<Monomer>>;

    /// Maps complete nucleotide notations (like `R(A)P`) back to their one-letter symbol
    fn reverse_nucleotide_templates(&self) -> &HashMap<String, String>;

    /// Returns the id of the chemical modifier that `node` names: either `node` itself, when it's a registered id, or
    /// the ad-hoc monomer registered under the structure descriptor `node`.
    ///
    /// Unknown descriptors must be minted and registered in the same step as the lookup, so that concurrent callers
    /// never end up with two ids for a single structure.
    fn resolve_chemical_node(&self, node: &str) -> Result<String>;

    fn contains_monomer(&self, kind: PolymerKind, id: &str) -> bool {
        self.monomer(kind, id).is_ok()
    }
}

/// Builds and joins concrete monomer structures during assembly
pub trait ChemistryEngine {
    type Structure;
    type Attachment;

    fn structure_for(
        &self,
        descriptor: &str,
    ) -> Result<RGroupStructure<Self::Structure, Self::Attachment>>;

    /// Bonds `other` onto `target`, consuming one attachment point from each
    fn merge(
        &self,
        target: &mut Self::Structure,
        target_point: Self::Attachment,
        other: Self::Structure,
        other_point: Self::Attachment,
    ) -> Result<()>;
}

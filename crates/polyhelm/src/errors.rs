// External Crate Imports
use miette::Diagnostic;
use thiserror::Error;

// Local Crate Imports
use crate::{assembly::errors::AssemblyError, tokenizer::errors::GrammarError, MonomerRole, PolymerKind};

pub type Result<T, E = Box<NotationError>> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum NotationError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Cyclization(#[from] CyclizationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Replacement(#[from] ReplacementError),
}

// NOTE: Saves wrapping every sub-error in `NotationError::from()` and then `Box::new()` before using `?`
macro_rules! boxed_error_impls {
    ($($error:ty),+ $(,)?) => {
        $(
            impl From<$error> for Box<NotationError> {
                fn from(error: $error) -> Self {
                    Box::new(NotationError::from(error))
                }
            }
        )+
    };
}

boxed_error_impls!(
    GrammarError,
    LookupError,
    AssemblyError,
    CyclizationError,
    ReplacementError,
);

// Lookup Errors =======================================================================================================

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum LookupError {
    #[error("the {kind} monomer {id:?} could not be found in the monomer database")]
    #[diagnostic(help("double-check for typos, or add {id:?} to the monomer database"))]
    Monomer { kind: PolymerKind, id: String },

    #[error("{tag:?} is not a known polymer type")]
    #[diagnostic(help("supported polymer types are RNA, PEPTIDE, and CHEM"))]
    PolymerKind { tag: String },

    #[error("the structure {descriptor:?} is already registered as the {kind} monomer {id:?}")]
    ForeignStructure {
        descriptor: String,
        kind: PolymerKind,
        id: String,
    },

    #[error("this operation expects a {expected} polymer, but was given a {found} polymer")]
    WrongPolymerKind {
        expected: PolymerKind,
        found: PolymerKind,
    },
}

impl LookupError {
    pub(crate) fn monomer(kind: PolymerKind, id: &str) -> Self {
        let id = id.to_owned();

        Self::Monomer { kind, id }
    }

    pub(crate) fn polymer_kind(tag: &str) -> Self {
        let tag = tag.to_owned();

        Self::PolymerKind { tag }
    }
}

// Cyclization Errors ==================================================================================================

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum CyclizationError {
    #[error("the nucleic acid {notation:?} cannot be cyclised, as it has no linker between its ends")]
    #[diagnostic(help("a cyclic nucleotide sequence needs a terminal phosphate to close the ring"))]
    MissingLinker { notation: String },

    #[error("the nucleic acid {notation:?} cannot be cyclised, as it has linkers on both of its ends")]
    #[diagnostic(help("remove either the leading or the trailing phosphate"))]
    DuplicateLinkers { notation: String },
}

// Replacement Errors ==================================================================================================

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum ReplacementError {
    #[error("an existing monomer id is required")]
    MissingExistingId,

    #[error("a new monomer id is required")]
    MissingNewId,

    #[error("the {kind} monomer {id:?} could not be found in the monomer database")]
    UnknownMonomer { kind: PolymerKind, id: String },

    #[error("cannot replace the {existing_role} monomer {existing:?} with the {new_role} monomer {new:?}")]
    RoleMismatch {
        existing: String,
        existing_role: MonomerRole,
        new: String,
        new_role: MonomerRole,
    },

    #[error(
        "cannot replace {existing:?} (a {existing_analog} analog) with {new:?} (a {new_analog} analog)"
    )]
    #[diagnostic(help("backbone monomers can only be swapped for ones with the same natural analog"))]
    NaturalAnalogMismatch {
        existing: String,
        existing_analog: String,
        new: String,
        new_analog: String,
    },

    #[error("cannot replace {existing:?} with {new:?}, as their attachment points differ")]
    #[diagnostic(help("{existing:?} has {existing_labels:?}, but {new:?} has {new_labels:?}"))]
    AttachmentMismatch {
        existing: String,
        existing_labels: Vec<String>,
        new: String,
        new_labels: Vec<String>,
    },
}

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum AssemblyError {
    #[error("there are no monomers to assemble")]
    NoMonomers,

    #[error("found {monomers} monomers but {structures} structures")]
    CountMismatch { monomers: usize, structures: usize },

    #[error("monomer {ordinal} ({id:?}) has an undefined role, so it can't be joined onto the chain")]
    #[diagnostic(help("only backbone and branch monomers can follow the first monomer of a chain"))]
    UndefinedMonomerRole { ordinal: usize, id: String },

    #[error("monomer {ordinal} ({id:?}) is non-specific and has no structure")]
    NonSpecificStructure { ordinal: usize, id: String },

    #[error("the structure {descriptor:?} could not be resolved")]
    UnresolvableStructure { descriptor: String },

    #[error("monomer {ordinal} ({id:?}) has no free {label} attachment point")]
    #[diagnostic(help("check that the monomer declares {label}, and that nothing else is already bonded to it"))]
    MissingAttachmentPoint {
        ordinal: usize,
        id: String,
        label: String,
    },

    #[error("the {label} attachment point of fragment {fragment} is not open")]
    ClosedAttachmentPoint { fragment: usize, label: String },
}

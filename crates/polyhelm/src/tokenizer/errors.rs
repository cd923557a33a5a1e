// Standard Library Imports
use std::ops::Range;

// External Crate Imports
use miette::{Diagnostic, LabeledSpan, SourceCode, SourceSpan};
use thiserror::Error;

// Public API ==========================================================================================================

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("{kind}")]
pub struct GrammarError {
    notation: String,
    span: SourceSpan,
    kind: GrammarErrorKind,
}

impl GrammarError {
    pub(crate) fn new(notation: &str, span: Range<usize>, kind: GrammarErrorKind) -> Self {
        let notation = notation.to_owned();
        let span = span.into();

        Self {
            notation,
            span,
            kind,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &GrammarErrorKind {
        &self.kind
    }

    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        self.span
    }
}

// NOTE: This is manually implemented so that the label and help text can be pulled out of `self.kind`
impl Diagnostic for GrammarError {
    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.notation)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.kind.label().to_owned()), self.span);
        Some(Box::new(std::iter::once(label)))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.kind.help()
    }
}

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum GrammarErrorKind {
    #[error("no monomers were found in the notation")]
    EmptyNotation,

    #[error("found an empty group between two separators")]
    #[diagnostic(help("remove the extra '.'"))]
    EmptyGroup,

    #[error("found an empty pair of square brackets")]
    #[diagnostic(help("square brackets must contain a monomer id"))]
    EmptyIdentifier,

    #[error("unterminated square bracket")]
    #[diagnostic(help("close the monomer id with a matching ']'"))]
    UnterminatedBracket,

    #[error("unterminated branch")]
    #[diagnostic(help("close the branch with a matching ')'"))]
    UnterminatedBranch,

    #[error("found a branch without a preceding backbone monomer")]
    #[diagnostic(help("branches must follow the backbone monomer they're attached to"))]
    BranchAtStart,

    #[error("found two branches attached to the same backbone monomer")]
    #[diagnostic(help("each backbone monomer can carry at most one branch"))]
    AdjacentBranches,

    #[error("found an empty branch")]
    #[diagnostic(help("branches must contain exactly one monomer id"))]
    EmptyBranch,

    #[error("the multi-character branch monomer {0:?} must be wrapped in square brackets")]
    #[diagnostic(help("try writing the branch as ([{0}])"))]
    UnbracketedBranchMonomer(String),

    #[error("peptide notation cannot contain branches")]
    #[diagnostic(help("remove the parentheses, or check that this is really a peptide"))]
    BranchInPeptide,
}

impl GrammarErrorKind {
    const fn label(&self) -> &'static str {
        match self {
            Self::EmptyNotation => "no monomers",
            Self::EmptyGroup => "empty group",
            Self::EmptyIdentifier => "empty id",
            Self::UnterminatedBracket => "this bracket is never closed",
            Self::UnterminatedBranch => "this branch is never closed",
            Self::BranchAtStart => "nothing to attach to",
            Self::AdjacentBranches => "second branch",
            Self::EmptyBranch => "empty branch",
            Self::UnbracketedBranchMonomer(_) => "expected square brackets",
            Self::BranchInPeptide => "branch found here",
        }
    }
}

//! Splits simple polymer notation into the monomer ids it's made from

mod cursor;
pub mod errors;

// Standard Library Imports
use std::ops::Range;

// Local Crate Imports
use self::{
    cursor::Cursor,
    errors::{GrammarError, GrammarErrorKind},
};
use crate::{MonomerRegistry, MonomerToken, PolymerKind, TokenRole, errors::Result};

// Grammar Constants ===================================================================================================

pub const GROUP_SEPARATOR: char = '.';
pub const BRACKET_OPEN: char = '[';
pub const BRACKET_CLOSE: char = ']';
pub const BRANCH_OPEN: char = '(';
pub const BRANCH_CLOSE: char = ')';

// Public API ==========================================================================================================

/// Tokenizes `notation` as the given kind of polymer.
///
/// Nucleic acids and peptides are scanned with [`Tokenizer`] (peptides additionally reject branches outright), while
/// chemical modifiers are a single unit whose id is resolved through `registry`, minting a new ad-hoc monomer if the
/// notation is an unregistered structure descriptor.
pub fn monomer_tokens<R: MonomerRegistry + ?Sized>(
    registry: &R,
    kind: PolymerKind,
    notation: &str,
) -> Result<Vec<MonomerToken>> {
    if notation.trim().is_empty() {
        return Err(GrammarError::new(notation, 0..notation.len(), GrammarErrorKind::EmptyNotation).into());
    }

    match kind {
        PolymerKind::NucleicAcid => tokenize(notation),
        PolymerKind::Peptide => {
            if let Some(i) = notation.find([BRANCH_OPEN, BRANCH_CLOSE]) {
                let error = GrammarError::new(notation, i..i + 1, GrammarErrorKind::BranchInPeptide);
                return Err(error.into());
            }
            tokenize(notation)
        }
        PolymerKind::Chemical => {
            let id = registry.resolve_chemical_node(notation)?;
            Ok(vec![MonomerToken::backbone(id, 0..notation.len())])
        }
    }
}

/// Tokenizes nucleic acid or peptide notation, failing at the first grammar error
pub fn tokenize(notation: &str) -> Result<Vec<MonomerToken>> {
    check_groups(notation)?;
    let tokens: Vec<_> = Tokenizer::new(notation).collect::<Result<_, _>>()?;
    if tokens.is_empty() {
        return Err(GrammarError::new(notation, 0..notation.len(), GrammarErrorKind::EmptyNotation).into());
    }
    Ok(tokens)
}

/// A pull-based scanner yielding one [`MonomerToken`] per monomer id in a notation
///
/// Once an error has been yielded, the iterator is exhausted.
#[derive(Clone, Debug)]
pub struct Tokenizer<'s> {
    notation: &'s str,
    cursor: Cursor<'s>,
    last_role: Option<TokenRole>,
    failed: bool,
}

impl<'s> Tokenizer<'s> {
    #[must_use]
    pub fn new(notation: &'s str) -> Self {
        Self {
            notation,
            cursor: Cursor::new(notation),
            last_role: None,
            failed: false,
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<MonomerToken, GrammarError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let scanned = self.scan()?;
        match &scanned {
            Ok(token) => self.last_role = Some(token.role),
            Err(_) => self.failed = true,
        }
        Some(scanned)
    }
}

impl MonomerToken {
    pub(crate) fn backbone(id: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            id: id.into(),
            role: TokenRole::Backbone,
            span,
        }
    }

    pub(crate) fn branch(id: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            id: id.into(),
            role: TokenRole::Branch,
            span,
        }
    }
}

// Scanner State Machine ===============================================================================================

#[derive(Copy, Clone, Debug)]
enum State {
    Backbone,
    InBracket { open: usize },
    InBranch { open: usize },
}

impl Tokenizer<'_> {
    fn scan(&mut self) -> Option<Result<MonomerToken, GrammarError>> {
        let mut state = State::Backbone;
        let mut content = String::new();

        loop {
            state = match (state, self.cursor.next()) {
                (State::Backbone, None) => return None,
                (State::Backbone, Some((i, BRACKET_OPEN))) => State::InBracket { open: i },
                (State::Backbone, Some((i, BRANCH_OPEN))) => match self.last_role {
                    None => return Some(Err(self.error(i..i + 1, GrammarErrorKind::BranchAtStart))),
                    Some(TokenRole::Branch) => {
                        return Some(Err(self.error(i..i + 1, GrammarErrorKind::AdjacentBranches)));
                    }
                    Some(TokenRole::Backbone) => State::InBranch { open: i },
                },
                (State::Backbone, Some((i, c))) => {
                    return Some(Ok(MonomerToken::backbone(c, i..i + c.len_utf8())));
                }

                (State::InBracket { open }, None) => {
                    let span = open..self.cursor.end();
                    return Some(Err(self.error(span, GrammarErrorKind::UnterminatedBracket)));
                }
                (State::InBracket { open }, Some((i, BRACKET_CLOSE))) => {
                    let span = open..i + 1;
                    return Some(if content.is_empty() {
                        Err(self.error(span, GrammarErrorKind::EmptyIdentifier))
                    } else {
                        Ok(MonomerToken::backbone(content, span))
                    });
                }
                (state @ State::InBracket { .. }, Some((_, c))) => {
                    content.push(c);
                    state
                }

                (State::InBranch { open }, None) => {
                    let span = open..self.cursor.end();
                    return Some(Err(self.error(span, GrammarErrorKind::UnterminatedBranch)));
                }
                (State::InBranch { open }, Some((i, BRANCH_CLOSE))) => {
                    return Some(self.branch(&content, open..i + 1));
                }
                (state @ State::InBranch { .. }, Some((_, c))) => {
                    content.push(c);
                    state
                }
            };
        }
    }

    fn branch(&self, content: &str, span: Range<usize>) -> Result<MonomerToken, GrammarError> {
        let mut chars = content.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(self.error(span, GrammarErrorKind::EmptyBranch)),
            (Some(_), None) => Ok(MonomerToken::branch(content, span)),
            _ if content.starts_with(BRACKET_OPEN) && content.ends_with(BRACKET_CLOSE) => {
                let id = content.replace([BRACKET_OPEN, BRACKET_CLOSE], "");
                if id.is_empty() {
                    Err(self.error(span, GrammarErrorKind::EmptyIdentifier))
                } else {
                    Ok(MonomerToken::branch(id, span))
                }
            }
            _ => Err(self.error(
                span,
                GrammarErrorKind::UnbracketedBranchMonomer(content.to_owned()),
            )),
        }
    }

    fn error(&self, span: Range<usize>, kind: GrammarErrorKind) -> GrammarError {
        GrammarError::new(self.notation, span, kind)
    }
}

// Private Helper Functions ============================================================================================

fn check_groups(notation: &str) -> Result<(), GrammarError> {
    if notation.is_empty() {
        return Err(GrammarError::new(notation, 0..0, GrammarErrorKind::EmptyNotation));
    }

    let mut start = 0;
    for group in notation.split(GROUP_SEPARATOR) {
        if group.is_empty() {
            // NOTE: Points at the offending separator, or the end of the notation if it's the last group
            let at = start.min(notation.len() - 1);
            return Err(GrammarError::new(notation, at..at + 1, GrammarErrorKind::EmptyGroup));
        }
        start += group.len() + GROUP_SEPARATOR.len_utf8();
    }
    Ok(())
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use miette::SourceSpan;

    use super::*;
    use crate::{MonomerDatabase, testing_tools::assert_miette_snapshot};

    static DB: LazyLock<MonomerDatabase> = LazyLock::new(MonomerDatabase::default);

    fn ids(notation: &str) -> Vec<String> {
        tokenize(notation).unwrap().into_iter().map(|t| t.id).collect()
    }

    fn error_kind(notation: &str) -> GrammarErrorKind {
        Tokenizer::new(notation)
            .find_map(Result::err)
            .map(|e| e.kind().clone())
            .unwrap()
    }

    #[test]
    fn natural_rna() {
        assert_eq!(ids("R(A)P.R(C)P.R(G)P"), ["R", "A", "P", "R", "C", "P", "R", "G", "P"]);
    }

    #[test]
    fn token_roles() {
        let roles: Vec<_> = tokenize("R(A)P").unwrap().into_iter().map(|t| t.role).collect();
        assert_eq!(roles, [TokenRole::Backbone, TokenRole::Branch, TokenRole::Backbone]);
    }

    #[test]
    fn bracketed_ids() {
        assert_eq!(ids("[dR](A)[sP].[mR]([5meC])P"), ["dR", "A", "sP", "mR", "5meC", "P"]);
        assert_eq!(ids("A.[dA].G"), ["A", "dA", "G"]);
    }

    #[test]
    fn spans_point_into_original_notation() {
        let tokens = tokenize("A.[dA].G").unwrap();
        let spans: Vec<_> = tokens.iter().map(|t| t.span.clone()).collect();
        assert_eq!(spans, [0..1, 2..6, 7..8]);

        let tokens = tokenize("R([5meC])P").unwrap();
        assert_eq!(tokens[1].span, 1..9);
        assert_eq!(&"R([5meC])P"[tokens[1].span.clone()], "([5meC])");
    }

    #[test]
    fn unterminated_bracket() {
        assert_eq!(error_kind("R(A)P.[dR"), GrammarErrorKind::UnterminatedBracket);
        let error = Tokenizer::new("A.[dA").find_map(Result::err).unwrap();
        assert_eq!(error.span(), SourceSpan::from(2..5));
    }

    #[test]
    fn unterminated_branch() {
        assert_eq!(error_kind("R(A"), GrammarErrorKind::UnterminatedBranch);
    }

    #[test]
    fn illegal_branch_placement() {
        assert_eq!(error_kind("(A)P"), GrammarErrorKind::BranchAtStart);
        assert_eq!(error_kind("R(A)(C)P"), GrammarErrorKind::AdjacentBranches);
    }

    #[test]
    fn branch_contents() {
        assert_eq!(error_kind("R()P"), GrammarErrorKind::EmptyBranch);
        assert_eq!(
            error_kind("R(5meC)P"),
            GrammarErrorKind::UnbracketedBranchMonomer("5meC".to_owned())
        );
        assert_eq!(error_kind("R([])P"), GrammarErrorKind::EmptyIdentifier);
        assert_eq!(error_kind("R.[]"), GrammarErrorKind::EmptyIdentifier);
    }

    #[test]
    fn stops_after_first_error() {
        let results: Vec<_> = Tokenizer::new("R(A)(C)P.R(G").collect();
        assert_eq!(results.len(), 3);
        assert!(results[2].is_err());
    }

    #[test]
    fn empty_groups() {
        for notation in ["A..G", ".A", "A."] {
            let error = *tokenize(notation).unwrap_err();
            assert!(
                matches!(&error, crate::NotationError::Grammar(e) if *e.kind() == GrammarErrorKind::EmptyGroup),
                "{notation}: {error:?}"
            );
        }
    }

    #[test]
    fn peptides_reject_branches() {
        for notation in ["A(C)", "A.G.C)", "(", "[Aib].(L"] {
            let error = *monomer_tokens(&*DB, PolymerKind::Peptide, notation).unwrap_err();
            assert!(
                matches!(&error, crate::NotationError::Grammar(e) if *e.kind() == GrammarErrorKind::BranchInPeptide),
                "{notation}: {error:?}"
            );
        }
    }

    #[test]
    fn peptide_ids() {
        let tokens = monomer_tokens(&*DB, PolymerKind::Peptide, "A.G.[dA].K").unwrap();
        let ids: Vec<_> = tokens.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["A", "G", "dA", "K"]);
    }

    #[test]
    fn empty_notation() {
        for kind in [PolymerKind::NucleicAcid, PolymerKind::Peptide, PolymerKind::Chemical] {
            let error = *monomer_tokens(&*DB, kind, "  ").unwrap_err();
            assert!(matches!(
                &error,
                crate::NotationError::Grammar(e) if *e.kind() == GrammarErrorKind::EmptyNotation
            ));
        }
    }

    #[test]
    fn registered_chemical_ids_pass_through() {
        let tokens = monomer_tokens(&*DB, PolymerKind::Chemical, "PEG2").unwrap();
        assert_eq!(tokens, [MonomerToken::backbone("PEG2", 0..4)]);
    }

    #[test]
    fn grammar_error_diagnostics() {
        let adjacent_branches = tokenize("R(A)(C)P");
        assert_miette_snapshot!(adjacent_branches);
    }

    #[test]
    fn trailing_separator() {
        let error = match *tokenize("R(A)P.").unwrap_err() {
            crate::NotationError::Grammar(error) => error,
            error => panic!("expected a grammar error, found {error:?}"),
        };
        assert_eq!(error.kind(), &GrammarErrorKind::EmptyGroup);
        assert_eq!(error.span(), SourceSpan::from(5..6));

        let trailing_separator = tokenize("R(A)P.");
        assert_miette_snapshot!(trailing_separator);
    }
}

//! Nucleotide-level views of nucleic acid notation

mod resolver;

pub use resolver::{nucleotide_list, strict_nucleotide_list};

// Standard Library Imports
use std::sync::Arc;

// Local Crate Imports
use crate::{
    Monomer, MonomerRegistry, Nucleotide, PolymerKind, PositionType,
    tokenizer::{BRACKET_CLOSE, BRACKET_OPEN, BRANCH_CLOSE, BRANCH_OPEN},
};

pub const UNKNOWN_SYMBOL: &str = "X";
pub const MODIFIED_PREFIX: &str = "mod";
pub const TRUNCATED_PREFIX: &str = "end";

// Public API ==========================================================================================================

impl Nucleotide {
    pub fn new(symbol: impl Into<String>, notation: impl Into<String>, position: PositionType) -> Self {
        Self {
            symbol: symbol.into(),
            notation: notation.into(),
            position,
        }
    }

    /// Anything bracketed, an unknown base, or a missing phosphate counts as a modification
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.notation.contains(BRACKET_OPEN)
            || self.notation.contains("(X)")
            || self.notation.ends_with(BRANCH_CLOSE)
    }

    /// True when the only thing setting this nucleotide apart from a natural one is a missing phosphate
    #[must_use]
    pub fn is_unmodified_without_phosphate(&self) -> bool {
        !(self.notation.contains(BRACKET_OPEN) || self.notation.contains(UNKNOWN_SYMBOL))
    }

    #[must_use]
    pub fn sugar_symbol(&self) -> Option<String> {
        let notation = self.notation.as_str();
        let sugar = if let Some(open) = notation.find(BRANCH_OPEN) {
            strip_brackets(&notation[..open])
        } else if self.position == PositionType::Start {
            // NOTE: A base-less starting chunk is a sugar followed by a phosphate, and the phosphate is always the last
            // token, so the sugar is everything before it
            if notation.ends_with(BRACKET_CLOSE) {
                strip_brackets(&notation[..=notation.rfind(BRACKET_OPEN)?])
            } else {
                strip_brackets(without_last_char(notation))
            }
        } else if notation.starts_with(BRACKET_OPEN) {
            strip_brackets(&notation[..notation.find(BRACKET_CLOSE)?])
        } else {
            first_char(notation).to_owned()
        };
        non_empty(sugar)
    }

    #[must_use]
    pub fn base_symbol(&self) -> Option<String> {
        let open = self.notation.find(BRANCH_OPEN)?;
        let close = self.notation.find(BRANCH_CLOSE).filter(|&close| close > open)?;
        non_empty(strip_brackets(&self.notation[open + 1..close]))
    }

    #[must_use]
    pub fn phosphate_symbol(&self) -> Option<String> {
        let notation = self.notation.as_str();
        let phosphate = if notation.contains(BRANCH_OPEN) {
            strip_brackets(&notation[notation.find(BRANCH_CLOSE)? + 1..])
        } else if self.position == PositionType::End {
            if notation.starts_with(BRACKET_OPEN) {
                strip_brackets(&notation[notation.find(BRACKET_CLOSE)? + 1..])
            } else {
                strip_brackets(&notation[first_char(notation).len()..])
            }
        } else if notation.ends_with(BRACKET_CLOSE) {
            strip_brackets(&notation[notation.rfind(BRACKET_OPEN)?..])
        } else {
            notation[without_last_char(notation).len()..].to_owned()
        };
        non_empty(phosphate)
    }

    /// The phosphate as it would be written in notation (bracketed if it's more than one character), or an empty
    /// string if there isn't one
    #[must_use]
    pub fn linker_notation(&self) -> String {
        match self.phosphate_symbol() {
            Some(phosphate) if phosphate.chars().count() > 1 => {
                format!("{BRACKET_OPEN}{phosphate}{BRACKET_CLOSE}")
            }
            Some(phosphate) => phosphate,
            None => String::new(),
        }
    }

    /// Everything but the linker
    #[must_use]
    pub fn nucleoside_notation(&self) -> &str {
        let linker = self.linker_notation();
        self.notation
            .strip_suffix(linker.as_str())
            .unwrap_or(self.notation.as_str())
    }

    /// The natural analog of this nucleotide's base, falling back to `X` when there's no base or the base doesn't
    /// have one
    pub fn natural_analog<R: MonomerRegistry + ?Sized>(&self, registry: &R) -> String {
        self.base_monomer(registry)
            .and_then(|base| base.natural_analog.clone())
            .unwrap_or_else(|| UNKNOWN_SYMBOL.to_owned())
    }

    pub fn sugar_monomer<R: MonomerRegistry + ?Sized>(&self, registry: &R) -> Option<Arc<Monomer>> {
        lookup(registry, self.sugar_symbol())
    }

    pub fn base_monomer<R: MonomerRegistry + ?Sized>(&self, registry: &R) -> Option<Arc<Monomer>> {
        lookup(registry, self.base_symbol())
    }

    pub fn phosphate_monomer<R: MonomerRegistry + ?Sized>(&self, registry: &R) -> Option<Arc<Monomer>> {
        lookup(registry, self.phosphate_symbol())
    }
}

// Private Helper Functions ============================================================================================

fn lookup<R: MonomerRegistry + ?Sized>(registry: &R, symbol: Option<String>) -> Option<Arc<Monomer>> {
    symbol.and_then(|symbol| registry.monomer(PolymerKind::NucleicAcid, &symbol).ok())
}

pub(crate) fn strip_brackets(notation: &str) -> String {
    notation.replace([BRACKET_OPEN, BRACKET_CLOSE], "")
}

fn first_char(notation: &str) -> &str {
    notation
        .char_indices()
        .nth(1)
        .map_or(notation, |(i, _)| &notation[..i])
}

fn without_last_char(notation: &str) -> &str {
    notation
        .char_indices()
        .next_back()
        .map_or(notation, |(i, _)| &notation[..i])
}

fn non_empty(symbol: String) -> Option<String> {
    (!symbol.is_empty()).then_some(symbol)
}

// Module Tests ========================================================================================================

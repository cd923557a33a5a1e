// Standard Library Imports
use std::str::CharIndices;

// Local Crate Imports
use super::GROUP_SEPARATOR;

/// Pulls characters (and their byte offsets) out of a notation, silently stepping over group separators
#[derive(Clone, Debug)]
pub(super) struct Cursor<'s> {
    chars: CharIndices<'s>,
    len: usize,
}

impl<'s> Cursor<'s> {
    pub(super) fn new(notation: &'s str) -> Self {
        Self {
            chars: notation.char_indices(),
            len: notation.len(),
        }
    }

    /// The byte offset one past the end of the notation
    pub(super) const fn end(&self) -> usize {
        self.len
    }
}

impl Iterator for Cursor<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        self.chars.by_ref().find(|&(_, c)| c != GROUP_SEPARATOR)
    }
}

// Module Tests ========================================================================================================

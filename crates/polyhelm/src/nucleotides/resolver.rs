// Local Crate Imports
use super::{MODIFIED_PREFIX, TRUNCATED_PREFIX, UNKNOWN_SYMBOL, strip_brackets};
use crate::{
    MonomerRegistry, Nucleotide, PolymerKind, PositionType,
    errors::Result,
    tokenizer::{
        BRANCH_CLOSE, BRANCH_OPEN, GROUP_SEPARATOR,
        errors::{GrammarError, GrammarErrorKind},
    },
};

// NOTE: Terminal nucleotides are often written without their phosphate
const PHOSPHATE: &str = "P";

// Public API ==========================================================================================================

/// Splits nucleic acid notation into nucleotides, labelling each with the natural nucleotide it's closest to
pub fn nucleotide_list<R: MonomerRegistry + ?Sized>(registry: &R, notation: &str) -> Result<Vec<Nucleotide>> {
    let chunks = chunks(notation)?;
    let last = chunks.len() - 1;
    let mut nucleotides = chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let symbol = match template_symbol(registry, chunk, i == last) {
                Some(symbol) => symbol.to_owned(),
                None => base_symbol(registry, chunk)?,
            };
            Ok(Nucleotide::new(symbol, chunk, PositionType::Middle))
        })
        .collect::<Result<Vec<_>>>()?;

    assign_positions(&mut nucleotides);
    Ok(nucleotides)
}

/// Like [`nucleotide_list`], but only exact template matches get a bare symbol: everything else is tagged as `mod` (or
/// `end`, for a natural nucleotide missing its final phosphate) ahead of its natural analog
pub fn strict_nucleotide_list<R: MonomerRegistry + ?Sized>(
    registry: &R,
    notation: &str,
) -> Result<Vec<Nucleotide>> {
    let templates = registry.reverse_nucleotide_templates();
    let chunks = chunks(notation)?;
    let last = chunks.len() - 1;
    let mut nucleotides: Vec<_> = chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            if let Some(symbol) = templates.get(chunk) {
                return Nucleotide::new(symbol.as_str(), chunk, PositionType::Middle);
            }

            let mut nucleotide = Nucleotide::new(UNKNOWN_SYMBOL, chunk, PositionType::Middle);
            let analog = nucleotide.natural_analog(registry);
            nucleotide.symbol = if !nucleotide.is_modified() {
                analog
            } else if i == last && nucleotide.is_unmodified_without_phosphate() {
                format!("{TRUNCATED_PREFIX}{analog}")
            } else {
                format!("{MODIFIED_PREFIX}{analog}")
            };
            nucleotide
        })
        .collect();

    assign_positions(&mut nucleotides);
    Ok(nucleotides)
}

// Private Helper Functions ============================================================================================

fn chunks(notation: &str) -> Result<Vec<&str>> {
    if notation.is_empty() {
        return Err(GrammarError::new(notation, 0..0, GrammarErrorKind::EmptyNotation).into());
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    for chunk in notation.split(GROUP_SEPARATOR) {
        if chunk.is_empty() {
            let at = start.min(notation.len() - 1);
            return Err(GrammarError::new(notation, at..at + 1, GrammarErrorKind::EmptyGroup).into());
        }
        chunks.push(chunk);
        start += chunk.len() + GROUP_SEPARATOR.len_utf8();
    }
    Ok(chunks)
}

fn template_symbol<'r, R: MonomerRegistry + ?Sized>(
    registry: &'r R,
    chunk: &str,
    is_last: bool,
) -> Option<&'r str> {
    let templates = registry.reverse_nucleotide_templates();
    templates
        .get(chunk)
        .or_else(|| {
            // NOTE: Only the last nucleotide gets a second chance, with its missing phosphate filled back in
            (is_last && chunk.ends_with(BRANCH_CLOSE))
                .then(|| templates.get(&format!("{chunk}{PHOSPHATE}")))
                .flatten()
        })
        .map(String::as_str)
}

fn base_symbol<R: MonomerRegistry + ?Sized>(registry: &R, chunk: &str) -> Result<String> {
    let Some(base) = chunk.split([BRANCH_OPEN, BRANCH_CLOSE]).nth(1) else {
        return Ok(UNKNOWN_SYMBOL.to_owned());
    };

    let base = strip_brackets(base);
    let mut chars = base.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(UNKNOWN_SYMBOL.to_owned()),
        (Some(_), None) => Ok(base),
        _ => {
            let monomer = registry.monomer(PolymerKind::NucleicAcid, &base)?;
            Ok(monomer
                .natural_analog
                .clone()
                .unwrap_or_else(|| UNKNOWN_SYMBOL.to_owned()))
        }
    }
}

// NOTE: A lone nucleotide is left in the middle
fn assign_positions(nucleotides: &mut [Nucleotide]) {
    if let [first, .., last] = nucleotides {
        first.position = PositionType::Start;
        last.position = PositionType::End;
    }
}

// Module Tests ========================================================================================================

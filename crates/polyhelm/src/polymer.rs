// Standard Library Imports
use std::sync::Arc;

// External Crate Imports
use itertools::Itertools;

// Local Crate Imports
use crate::{
    AssembledPolymer, ChemistryEngine, Monomer, MonomerRegistry, MonomerToken, NotationParser, Nucleotide,
    PolymerKind, SimplePolymer,
    assembly,
    errors::{LookupError, Result},
    nucleotides::{self, UNKNOWN_SYMBOL},
};

const SENSE_STRAND: &str = "ss";
const ANTISENSE_STRAND: &str = "as";

// Public API ==========================================================================================================

impl<'r, R: MonomerRegistry + ?Sized> NotationParser<'r, R> {
    pub const fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    #[must_use]
    pub const fn registry(&self) -> &'r R {
        self.registry
    }

    /// Tokenizes `notation` and looks up every monomer it names, failing if any can't be found
    pub fn parse(&self, kind: PolymerKind, notation: impl AsRef<str>) -> Result<SimplePolymer<'r, R>> {
        let notation = notation.as_ref();
        let tokens = crate::tokenizer::monomer_tokens(self.registry, kind, notation)?;
        let monomers = tokens
            .iter()
            .map(|token| self.registry.monomer(kind, &token.id))
            .collect::<Result<_>>()?;

        Ok(SimplePolymer {
            registry: self.registry,
            kind,
            notation: notation.to_owned(),
            tokens,
            monomers,
        })
    }
}

impl<'r, R: MonomerRegistry + ?Sized> SimplePolymer<'r, R> {
    #[must_use]
    pub const fn kind(&self) -> PolymerKind {
        self.kind
    }

    #[must_use]
    pub fn notation(&self) -> &str {
        &self.notation
    }

    #[must_use]
    pub fn tokens(&self) -> &[MonomerToken] {
        &self.tokens
    }

    pub fn monomer_ids(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.id.as_str())
    }

    #[must_use]
    pub fn monomers(&self) -> &[Arc<Monomer>] {
        &self.monomers
    }

    #[must_use]
    pub fn monomer_count(&self) -> usize {
        self.monomers.len()
    }

    pub fn nucleotides(&self) -> Result<Vec<Nucleotide>> {
        self.expect_kind(PolymerKind::NucleicAcid)?;
        nucleotides::nucleotide_list(self.registry, &self.notation)
    }

    pub fn strict_nucleotides(&self) -> Result<Vec<Nucleotide>> {
        self.expect_kind(PolymerKind::NucleicAcid)?;
        nucleotides::strict_nucleotide_list(self.registry, &self.notation)
    }

    /// The natural analog of every nucleotide, written as a string of single letters
    pub fn nucleotide_sequence(&self) -> Result<String> {
        let nucleotides = self.nucleotides()?;
        Ok(self.analog_sequence(&nucleotides))
    }

    /// Like [`Self::nucleotide_sequence`], but leading and trailing nucleotides without a base are left off
    pub fn trimmed_nucleotide_sequence(&self) -> Result<String> {
        let nucleotides = self.nucleotides()?;
        let has_base = |n: &Nucleotide| n.base_monomer(self.registry).is_some();
        let trimmed: &[_] = match (
            nucleotides.iter().position(has_base),
            nucleotides.iter().rposition(has_base),
        ) {
            (Some(start), Some(end)) => &nucleotides[start..=end],
            _ => &[],
        };
        Ok(self.analog_sequence(trimmed))
    }

    /// The symbol of every nucleotide (see [`nucleotides::nucleotide_list`]), concatenated
    pub fn modified_nucleotide_sequence(&self) -> Result<String> {
        Ok(self.nucleotides()?.iter().map(|n| n.symbol.as_str()).collect())
    }

    pub fn peptide_sequence(&self) -> Result<String> {
        self.expect_kind(PolymerKind::Peptide)?;
        Ok(self
            .monomers
            .iter()
            .map(|m| m.natural_analog.as_deref().unwrap_or(UNKNOWN_SYMBOL))
            .collect())
    }

    pub fn modified_peptide_sequence(&self, delimiter: &str) -> Result<String> {
        self.expect_kind(PolymerKind::Peptide)?;
        Ok(self.monomer_ids().join(delimiter))
    }

    /// Wraps this notation up as a complete, single-polymer complex notation (e.g. `PEPTIDE1{A.G}$$$$`)
    #[must_use]
    pub fn complex_notation(&self) -> String {
        format!("{}1{{{}}}$$$$", self.kind, self.notation)
    }

    pub fn sense_complex_notation(&self) -> Result<String> {
        self.annotated_complex_notation(SENSE_STRAND)
    }

    pub fn antisense_complex_notation(&self) -> Result<String> {
        self.annotated_complex_notation(ANTISENSE_STRAND)
    }

    pub fn assemble<E: ChemistryEngine + ?Sized>(
        &self,
        engine: &E,
    ) -> Result<AssembledPolymer<E::Structure, E::Attachment>> {
        assembly::assemble(engine, self.kind, &self.monomers)
    }

    pub(crate) fn expect_kind(&self, expected: PolymerKind) -> Result<()> {
        if self.kind == expected {
            Ok(())
        } else {
            let found = self.kind;
            Err(LookupError::WrongPolymerKind { expected, found }.into())
        }
    }
}

// Private Helper Functions ============================================================================================

impl<R: MonomerRegistry + ?Sized> SimplePolymer<'_, R> {
    fn analog_sequence(&self, nucleotides: &[Nucleotide]) -> String {
        nucleotides.iter().map(|n| n.natural_analog(self.registry)).collect()
    }

    fn annotated_complex_notation(&self, strand: &str) -> Result<String> {
        self.expect_kind(PolymerKind::NucleicAcid)?;
        let mut notation = self.complex_notation();
        notation.pop();
        Ok(format!("{notation}{}1{{{strand}}}$", PolymerKind::NucleicAcid))
    }
}

// Module Tests ========================================================================================================

// Standard Library Imports
use std::{
    collections::hash_map::Entry,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use knuffel::{Decode, span::Span};
use log::debug;
use miette::{Diagnostic, LabeledSpan, NamedSource};
use static_assertions::assert_impl_all;
use thiserror::Error;

// Local Crate Imports
use super::ad_hoc::AdHocMinter;
use crate::{
    Attachment, Monomer, MonomerRegistry, MonomerRole, PolymerKind,
    errors::{LookupError, Result},
};

pub const DEFAULT_KDL: &str = include_str!("../../data/monomer_database.kdl");

// Public API ==========================================================================================================

/// Monomer definitions and nucleotide templates, loaded from KDL
///
/// Ad-hoc chemical modifiers can be registered at any time through [`MonomerRegistry::resolve_chemical_node`], so the
/// monomer tables sit behind a lock; templates are fixed once the database is built.
#[derive(Debug)]
pub struct MonomerDatabase {
    templates: HashMap<String, String>,
    tables: RwLock<MonomerTables>,
}

assert_impl_all!(MonomerDatabase: Send, Sync);

impl MonomerDatabase {
    pub fn new(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> miette::Result<Self> {
        let parsed_db: MonomerDatabaseKdl = knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let db = parsed_db
            .validate(())
            .map_err(|e| e.finalize(file_name.as_ref(), kdl_text))?;

        debug!(
            "loaded {} monomers and {} nucleotide templates from {:?}",
            db.read().monomers.values().map(HashMap::len).sum::<usize>(),
            db.templates.len(),
            file_name.as_ref()
        );
        Ok(db)
    }

    /// Swaps out the minter used to name ad-hoc chemical modifiers
    #[must_use]
    pub fn with_minter(self, minter: AdHocMinter) -> Self {
        {
            let mut tables = self.write();
            tables.minter = minter;
        }
        self
    }

    #[must_use]
    pub fn monomer_count(&self, kind: PolymerKind) -> usize {
        self.read().monomers.get(&kind).map_or(0, HashMap::len)
    }

    fn read(&self) -> RwLockReadGuard<'_, MonomerTables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MonomerTables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MonomerDatabase {
    fn default() -> Self {
        Self::new("monomer_database.kdl", DEFAULT_KDL).expect("bundled monomer database is valid")
    }
}

impl MonomerRegistry for MonomerDatabase {
    fn monomer(&self, kind: PolymerKind, id: &str) -> Result<Arc<Monomer>> {
        self.read()
            .lookup(kind, id)
            .cloned()
            .ok_or_else(|| LookupError::monomer(kind, id).into())
    }

    fn reverse_nucleotide_templates(&self) -> &HashMap<String, String> {
        &self.templates
    }

    fn resolve_chemical_node(&self, node: &str) -> Result<String> {
        if let Some(id) = self.read().resolve(node) {
            return id;
        }

        // NOTE: Another thread may have registered `node` between dropping the read lock and taking the write lock, so
        // the lookup needs repeating before minting anything
        let mut tables = self.write();
        if let Some(id) = tables.resolve(node) {
            return id;
        }
        Ok(tables.register_ad_hoc(node))
    }
}

// Private Types =======================================================================================================

#[derive(Debug)]
struct MonomerTables {
    monomers: HashMap<PolymerKind, Monomers>,
    structures: HashMap<String, Arc<Monomer>>,
    minter: AdHocMinter,
}

type Monomers = HashMap<String, Arc<Monomer>>;

impl MonomerTables {
    fn new(monomers: HashMap<PolymerKind, Monomers>) -> Self {
        let mut structures = HashMap::new();
        for monomer in monomers.values().flat_map(HashMap::values) {
            if let Some(descriptor) = &monomer.structure {
                structures
                    .entry(descriptor.clone())
                    .or_insert_with(|| Arc::clone(monomer));
            }
        }

        Self {
            monomers,
            structures,
            minter: AdHocMinter::default(),
        }
    }

    fn lookup(&self, kind: PolymerKind, id: &str) -> Option<&Arc<Monomer>> {
        self.monomers.get(&kind).and_then(|monomers| monomers.get(id))
    }

    fn resolve(&self, node: &str) -> Option<Result<String>> {
        if self.lookup(PolymerKind::Chemical, node).is_some() {
            return Some(Ok(node.to_owned()));
        }

        self.structures.get(node).map(|monomer| {
            if monomer.kind == PolymerKind::Chemical {
                Ok(monomer.id.clone())
            } else {
                Err(LookupError::ForeignStructure {
                    descriptor: node.to_owned(),
                    kind: monomer.kind,
                    id: monomer.id.clone(),
                }
                .into())
            }
        })
    }

    fn register_ad_hoc(&mut self, descriptor: &str) -> String {
        let chemicals = self.monomers.entry(PolymerKind::Chemical).or_default();
        let id = self.minter.next_id(|id| chemicals.contains_key(id));
        let monomer = Arc::new(Monomer::ad_hoc(id.clone(), descriptor));

        chemicals.insert(id.clone(), Arc::clone(&monomer));
        self.structures.insert(descriptor.to_owned(), monomer);

        debug!("registered {descriptor:?} as the ad-hoc monomer {id:?}");
        id
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct MonomerDatabaseKdl {
    #[knuffel(child, unwrap(children))]
    templates: Vec<TemplateKdl>,
    #[knuffel(children(name = "polymer"))]
    polymers: Vec<PolymerKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct TemplateKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(node_name)]
    symbol: String,
    #[knuffel(argument)]
    notation: String,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct PolymerKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(argument)]
    kind: String,
    #[knuffel(children)]
    monomers: Vec<MonomerKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct MonomerKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(node_name)]
    role: String,
    #[knuffel(argument)]
    id: String,
    #[knuffel(argument)]
    name: String,
    #[knuffel(property(name = "analog"))]
    natural_analog: Option<String>,
    #[knuffel(child, unwrap(argument))]
    structure: Option<String>,
    #[knuffel(children(name = "attachment"))]
    attachments: Vec<AttachmentKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct AttachmentKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(argument)]
    label: String,
    #[knuffel(property(name = "cap"))]
    cap: String,
}

// Contextual Validation Trait  ========================================================================================

type DatabaseResult<T> = std::result::Result<T, DatabaseErrorKind>;

trait ValidateInto<T> {
    type Context;

    fn validate(self, ctx: Self::Context) -> DatabaseResult<T>;
}

// Monomer Database Validation =========================================================================================

impl ValidateInto<MonomerDatabase> for MonomerDatabaseKdl {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> DatabaseResult<MonomerDatabase> {
        let templates = self.templates.validate(())?;

        let mut seen_kinds: HashMap<PolymerKind, (Span, Monomers)> = HashMap::new();
        for polymer in self.polymers {
            let span = polymer.span;
            let (kind, monomers) = polymer.validate(())?;
            match seen_kinds.entry(kind) {
                Entry::Occupied(e) => {
                    let (first_defined_at, _) = e.get();
                    return Err(DatabaseErrorKind::DuplicatePolymer(
                        *first_defined_at,
                        span,
                        kind,
                    ));
                }
                Entry::Vacant(e) => e.insert((span, monomers)),
            };
        }

        let monomers = seen_kinds.into_iter().map(|(k, (_, v))| (k, v)).collect();
        Ok(MonomerDatabase {
            templates,
            tables: RwLock::new(MonomerTables::new(monomers)),
        })
    }
}

// NOTE: Maps each template's notation back to its symbol, since notations are what get looked up while parsing
impl ValidateInto<HashMap<String, String>> for Vec<TemplateKdl> {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> DatabaseResult<HashMap<String, String>> {
        let mut seen_notations: HashMap<String, (Span, String)> = HashMap::new();

        for template in self {
            match seen_notations.entry(template.notation) {
                Entry::Occupied(e) => {
                    let (notation, (first_defined_at, _)) = e.remove_entry();
                    return Err(DatabaseErrorKind::DuplicateTemplate(
                        first_defined_at,
                        template.span,
                        notation,
                    ));
                }
                Entry::Vacant(e) => e.insert((template.span, template.symbol)),
            };
        }

        Ok(seen_notations
            .into_iter()
            .map(|(notation, (_, symbol))| (notation, symbol))
            .collect())
    }
}

// Validate Polymers and Monomers ======================================================================================

impl ValidateInto<(PolymerKind, Monomers)> for PolymerKdl {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> DatabaseResult<(PolymerKind, Monomers)> {
        let kind: PolymerKind = self
            .kind
            .parse()
            .map_err(|_| DatabaseErrorKind::UnknownPolymerKind(self.span, self.kind.clone()))?;

        let mut seen_monomers: HashMap<String, (Span, Arc<Monomer>)> = HashMap::new();
        for monomer in self.monomers {
            let span = monomer.span;
            let monomer = monomer.validate(kind)?;
            match seen_monomers.entry(monomer.id.clone()) {
                Entry::Occupied(e) => {
                    let (id, (first_defined_at, _)) = e.remove_entry();
                    return Err(DatabaseErrorKind::DuplicateMonomer(first_defined_at, span, id));
                }
                Entry::Vacant(e) => e.insert((span, Arc::new(monomer))),
            };
        }

        let monomers = seen_monomers
            .into_iter()
            .map(|(id, (_, monomer))| (id, monomer))
            .collect();
        Ok((kind, monomers))
    }
}

impl ValidateInto<Monomer> for MonomerKdl {
    type Context = PolymerKind;

    fn validate(self, kind: Self::Context) -> DatabaseResult<Monomer> {
        let role: MonomerRole = self
            .role
            .parse()
            .map_err(|role| DatabaseErrorKind::UnknownMonomerRole(self.span, role))?;

        Ok(Monomer {
            id: self.id,
            name: self.name,
            kind,
            role,
            natural_analog: self.natural_analog,
            attachments: self.attachments.validate(())?,
            structure: self.structure,
        })
    }
}

impl ValidateInto<Vec<Attachment>> for Vec<AttachmentKdl> {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> DatabaseResult<Vec<Attachment>> {
        let mut seen_labels: HashMap<String, Span> = HashMap::new();
        let mut attachments = Vec::with_capacity(self.len());

        for attachment in self {
            match seen_labels.entry(attachment.label.clone()) {
                Entry::Occupied(e) => {
                    let (label, first_defined_at) = e.remove_entry();
                    return Err(DatabaseErrorKind::DuplicateAttachment(
                        first_defined_at,
                        attachment.span,
                        label,
                    ));
                }
                Entry::Vacant(e) => e.insert(attachment.span),
            };
            attachments.push(Attachment {
                label: attachment.label,
                cap: attachment.cap,
            });
        }

        Ok(attachments)
    }
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Debug, Error)]
#[error("failed to validate monomer database file")]
struct DatabaseError {
    kdl: NamedSource<String>,
    #[source]
    kind: DatabaseErrorKind,
}

// NOTE: This is manually implemented because the list of labels is dynamic and needs to be extracted from `self.kind`
impl Diagnostic for DatabaseError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.kdl)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.kind.labels().into_iter().map(|(s, l)| {
            LabeledSpan::new_with_span(Some(l.to_owned()), *s)
        })))
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        Some(&self.kind)
    }
}

#[derive(Clone, Debug, Diagnostic, Error)]
enum DatabaseErrorKind {
    #[error("the polymer type {1:?} is not supported")]
    #[diagnostic(help("polymer sections must be one of \"RNA\", \"PEPTIDE\", or \"CHEM\""))]
    UnknownPolymerKind(Span, String),

    #[error("the {2} polymer section has already been defined")]
    #[diagnostic(help("merge the monomers from both sections into a single section"))]
    DuplicatePolymer(Span, Span, PolymerKind),

    #[error("the monomer role {1:?} is not supported")]
    #[diagnostic(help("monomers must be declared as \"backbone\", \"branch\", or \"undefined\""))]
    UnknownMonomerRole(Span, String),

    #[error("the monomer {2:?} has already been defined")]
    #[diagnostic(help("double-check for typos, or remove the duplicate monomer"))]
    DuplicateMonomer(Span, Span, String),

    #[error("the attachment point {2:?} has already been defined")]
    #[diagnostic(help("double-check for typos, or remove the duplicate attachment point"))]
    DuplicateAttachment(Span, Span, String),

    #[error("a template for the nucleotide {2:?} has already been defined")]
    #[diagnostic(help("each nucleotide notation can only map to a single symbol"))]
    DuplicateTemplate(Span, Span, String),
}

impl DatabaseErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicatePolymer(s1, s2, _)
            | Self::DuplicateMonomer(s1, s2, _)
            | Self::DuplicateAttachment(s1, s2, _)
            | Self::DuplicateTemplate(s1, s2, _) => {
                vec![(s1, "first defined here"), (s2, "then again here")]
            }
            Self::UnknownPolymerKind(s, _) => vec![(s, "unknown polymer type")],
            Self::UnknownMonomerRole(s, _) => vec![(s, "unknown monomer role")],
        }
    }

    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> DatabaseError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        DatabaseError { kdl, kind: self }
    }
}

// Module Tests ========================================================================================================

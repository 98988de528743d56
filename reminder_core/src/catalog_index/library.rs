//! A pool of loaded documents with import resolution.
//!
//! Catalogs name the documents they import through catalogue links. The
//! library resolves those names against whatever documents were loaded;
//! links that cannot be resolved are logged and skipped so an index can
//! still be built from the subset that is available.

use catalog_rules::{CatalogResult, Document};
use std::path::Path;
use tracing::{debug, warn};

use super::{CatalogIndex, NameMatch, NameMatcher};

/// Faction prefixes that catalog links and roster army names include but
/// catalog file names often drop.
const REDUNDANT_PREFIXES: [&str; 2] = ["adeptus astartes - ", "astartes - "];

/// Every loaded catalog and rules document.
#[derive(Debug, Default)]
pub struct CatalogLibrary {
    documents: Vec<Document>,
    matcher: NameMatcher,
}

impl CatalogLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.add(document);
        self
    }

    pub fn add(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Load every `*.json` file in a directory, in file-name order.
    pub fn load_dir(dir: &Path) -> CatalogResult<Self> {
        let mut paths = Vec::new();
        let read_dir = std::fs::read_dir(dir).map_err(|source| catalog_rules::CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        for entry in read_dir.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut library = Self::new();
        for path in paths {
            debug!(path = %path.display(), "loading catalog");
            library.add(Document::load(&path)?);
        }
        Ok(library)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Find a document by display name, tolerating redundant faction
    /// prefixes and partial names.
    pub fn find(&self, name: &str) -> NameMatch<'_, Document> {
        let keys: Vec<String> = self
            .documents
            .iter()
            .map(|d| normalize_catalog_name(d.name()))
            .collect();
        let pool: Vec<(&str, &Document)> = keys
            .iter()
            .map(String::as_str)
            .zip(self.documents.iter())
            .collect();
        self.matcher.find(&normalize_catalog_name(name), &pool)
    }

    /// Documents the primary imports through its catalogue links, in link
    /// order. A link resolves by target id first, then by name.
    pub fn imports_for(&self, primary: &Document) -> Vec<&Document> {
        let mut imports: Vec<&Document> = Vec::new();

        for link in &primary.catalogue_links {
            let by_id = self
                .documents
                .iter()
                .find(|d| !link.target_id.is_empty() && d.id() == link.target_id);

            let resolved = match by_id {
                Some(doc) => Some(doc),
                None => match self.find(&link.name) {
                    NameMatch::Found { item, .. } => Some(item),
                    NameMatch::Ambiguous(hits) => {
                        warn!(
                            link = %link.name,
                            candidates = ?hits.iter().map(|d| d.name()).collect::<Vec<_>>(),
                            "ambiguous catalogue link skipped"
                        );
                        None
                    }
                    NameMatch::NoMatch => {
                        warn!(link = %link.name, "catalogue link not loaded; skipped");
                        None
                    }
                },
            };

            if let Some(doc) = resolved {
                let is_primary = std::ptr::eq(doc, primary) || (doc.id() == primary.id() && !doc.id().is_empty());
                let seen = imports.iter().any(|d| std::ptr::eq(*d, doc));
                if !is_primary && !seen {
                    imports.push(doc);
                }
            }
        }

        imports
    }

    /// Build an index for `primary` with its resolved imports.
    pub fn build_index(&self, primary: &Document, base: Option<&Document>) -> CatalogIndex {
        CatalogIndex::build(primary, self.imports_for(primary), base)
    }
}

/// Lower-case and strip redundant faction prefixes.
pub fn normalize_catalog_name(name: &str) -> String {
    let mut normalized = name.trim().to_lowercase();
    for prefix in REDUNDANT_PREFIXES {
        normalized = normalized.replace(prefix, "");
    }
    normalized
}

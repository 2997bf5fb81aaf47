//! Sidebar tree compilation.
//!
//! [`compile`] turns an [`OpenApiDocument`] into a [`SidebarTree`]: the
//! overview entry followed by one [`NavCategory`] per tag, in the order each
//! tag is first seen while scanning operations top-to-bottom. Entries keep
//! the document's declaration order within their category.
//!
//! Compilation is a pure function of the document and options: the same
//! input always yields an equal tree.

use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::document::{HttpMethod, Info, OpenApiDocument, OperationSpec};
use crate::slug::{SlugRegistry, humanize, slugify};

/// Category label for operations without tags.
pub const UNTAGGED: &str = "UNTAGGED";

/// Overview id used when the API title yields no slug.
const FALLBACK_OVERVIEW_ID: &str = "overview";

/// Error returned when a document cannot be compiled.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Document file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Document is not a syntactically valid OpenAPI document.
    #[error("Malformed OpenAPI document: {0}")]
    MalformedSpec(String),
    /// Two navigation items resolved to the same id.
    #[error("Duplicate doc id `{id}` for operations: {}", operation_ids.join(", "))]
    DuplicateOperationId {
        id: String,
        operation_ids: Vec<String>,
    },
}

/// Options for [`compile_with`].
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Explicit overview id. Derived from the API title when `None`.
    pub overview_id: Option<String>,
}

/// Root overview entry, always first in the sidebar.
#[derive(Clone, Debug, PartialEq)]
pub struct OverviewEntry {
    pub id: String,
    pub info: Info,
}

/// One operation in the sidebar.
#[derive(Clone, Debug, PartialEq)]
pub struct NavEntry {
    pub id: String,
    pub label: String,
    pub method: HttpMethod,
    /// The operation this entry documents.
    pub operation: OperationSpec,
}

/// Operations sharing a tag.
#[derive(Clone, Debug, PartialEq)]
pub struct NavCategory {
    /// Tag name, or [`UNTAGGED`].
    pub label: String,
    /// Id of the category's own page.
    pub id: String,
    /// Description from the document's `tags` list.
    pub description: Option<String>,
    pub entries: Vec<NavEntry>,
}

/// Compiled navigation: the overview entry followed by ordered categories.
#[derive(Clone, Debug, PartialEq)]
pub struct SidebarTree {
    pub overview: OverviewEntry,
    pub categories: Vec<NavCategory>,
}

impl SidebarTree {
    /// Iterate over all entries in sidebar order.
    pub fn entries(&self) -> impl Iterator<Item = &NavEntry> {
        self.categories.iter().flat_map(|c| c.entries.iter())
    }

    /// Check that no two items share an id.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::DuplicateOperationId`] naming the first
    /// colliding id and the operations that claim it.
    pub fn verify_unique_ids(&self) -> Result<(), CompileError> {
        let mut owners: IndexMap<&str, Vec<String>> = IndexMap::new();
        owners
            .entry(self.overview.id.as_str())
            .or_default()
            .push(format!("overview `{}`", self.overview.info.title));
        for category in &self.categories {
            owners
                .entry(category.id.as_str())
                .or_default()
                .push(format!("tag `{}`", category.label));
            for entry in &category.entries {
                owners
                    .entry(entry.id.as_str())
                    .or_default()
                    .push(entry.operation.reference());
            }
        }

        match owners.into_iter().find(|(_, claims)| claims.len() > 1) {
            Some((id, operation_ids)) => Err(CompileError::DuplicateOperationId {
                id: id.to_owned(),
                operation_ids,
            }),
            None => Ok(()),
        }
    }
}

/// Compile a document with default options.
///
/// # Errors
///
/// See [`compile_with`].
pub fn compile(document: &OpenApiDocument) -> Result<SidebarTree, CompileError> {
    compile_with(document, &CompileOptions::default())
}

/// Compile a document into a sidebar tree.
///
/// Ids are claimed in one namespace in this order: the overview, then for
/// each operation its category page (when the tag is first seen) and the
/// entry itself. Colliding ids get `-2`, `-3`, ... suffixes.
///
/// # Errors
///
/// Returns [`CompileError::DuplicateOperationId`] if ids are still not
/// unique after collision resolution.
pub fn compile_with(
    document: &OpenApiDocument,
    options: &CompileOptions,
) -> Result<SidebarTree, CompileError> {
    let mut registry = SlugRegistry::default();

    let overview_base = options
        .overview_id
        .clone()
        .unwrap_or_else(|| non_empty_or(slugify(&document.info.title), FALLBACK_OVERVIEW_ID));
    let overview = OverviewEntry {
        id: registry.claim(&overview_base),
        info: document.info.clone(),
    };

    warn_duplicate_operation_ids(&document.operations);

    let mut categories: IndexMap<&str, NavCategory> = IndexMap::new();
    for operation in &document.operations {
        let tag = primary_tag(operation);
        let category = categories.entry(tag).or_insert_with(|| NavCategory {
            label: tag.to_owned(),
            id: registry.claim(&non_empty_or(slugify(tag), "tag")),
            description: document.tag_description(tag).map(str::to_owned),
            entries: Vec::new(),
        });

        category.entries.push(NavEntry {
            id: registry.claim(&entry_base_slug(operation)),
            label: entry_label(operation),
            method: operation.method,
            operation: operation.clone(),
        });
    }

    let tree = SidebarTree {
        overview,
        categories: categories.into_values().collect(),
    };
    tree.verify_unique_ids()?;

    tracing::debug!(
        categories = tree.categories.len(),
        entries = tree.entries().count(),
        "Compiled sidebar"
    );

    Ok(tree)
}

/// Tag an operation is grouped under: its first non-blank tag.
fn primary_tag(operation: &OperationSpec) -> &str {
    operation
        .tags
        .first()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTAGGED)
}

/// Base slug from the operationId, the summary, or method and path.
fn entry_base_slug(operation: &OperationSpec) -> String {
    let candidates = [
        operation.operation_id.as_deref().map(slugify),
        operation.summary.as_deref().map(slugify),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|slug| !slug.is_empty())
        .unwrap_or_else(|| slugify(&format!("{} {}", operation.method, operation.path)))
}

/// Display label from the summary, the operationId, or method and path.
fn entry_label(operation: &OperationSpec) -> String {
    if let Some(summary) = operation.summary.as_deref().map(str::trim)
        && !summary.is_empty()
    {
        return summary.to_owned();
    }
    if let Some(id) = &operation.operation_id {
        let label = humanize(id);
        if !label.is_empty() {
            return label;
        }
    }
    format!(
        "{} {}",
        operation.method.as_str().to_uppercase(),
        operation.path
    )
}

fn non_empty_or(slug: String, fallback: &str) -> String {
    if slug.is_empty() {
        fallback.to_owned()
    } else {
        slug
    }
}

fn warn_duplicate_operation_ids(operations: &[OperationSpec]) {
    let mut seen: HashMap<&str, &OperationSpec> = HashMap::new();
    for operation in operations {
        let Some(id) = operation.operation_id.as_deref() else {
            continue;
        };
        if let Some(first) = seen.get(id) {
            tracing::warn!(
                operation_id = id,
                first = %format!("{} {}", first.method, first.path),
                duplicate = %format!("{} {}", operation.method, operation.path),
                "Duplicate operationId"
            );
        } else {
            seen.insert(id, operation);
        }
    }
}

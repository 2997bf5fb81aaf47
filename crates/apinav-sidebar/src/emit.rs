//! Writing generated docs to disk.
//!
//! [`emit`] replaces every previously generated file in the destination
//! directory with the output for a [`SidebarTree`]:
//!
//! ```text
//! {dest}/
//! +-- sidebar.json                       # NavItem[] array
//! +-- sidebar.ts                         # same array as a TypeScript module
//! +-- pahlawan-pangan-public-api.info.mdx
//! +-- search.tag.mdx                     # one per category (when linked)
//! +-- cari-makanan-murah-b-2-c.api.mdx   # one per operation
//! ```
//!
//! Files that were not generated (hand-written docs) are left alone.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::SidebarTree;
use crate::content::{
    PageOptions, render_category_page, render_operation_page, render_overview_page,
};
use crate::sidebar::{NavItem, referenced_ids, to_json, to_typescript};

const SIDEBAR_JSON: &str = "sidebar.json";
const SIDEBAR_TS: &str = "sidebar.ts";
const OVERVIEW_SUFFIX: &str = ".info.mdx";
const CATEGORY_SUFFIX: &str = ".tag.mdx";
const OPERATION_SUFFIX: &str = ".api.mdx";

/// Error returned when generated docs cannot be written.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// I/O error on a file or directory.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Sidebar or front matter serialization error.
    #[error("Failed to serialize {what}: {message}")]
    Serialize { what: String, message: String },
}

impl EmitError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn serialize(what: &str, err: impl fmt::Display) -> Self {
        Self::Serialize {
            what: what.to_owned(),
            message: err.to_string(),
        }
    }
}

/// Options for [`emit`].
#[derive(Clone, Debug)]
pub struct EmitOptions {
    pub pages: PageOptions,
    /// Write the overview page. When false it is expected to be hand-written.
    pub generate_overview: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            pages: PageOptions::default(),
            generate_overview: true,
        }
    }
}

/// Summary of an [`emit`] run.
#[derive(Debug, Default)]
pub struct EmitReport {
    /// Sidebar items that were written.
    pub items: Vec<NavItem>,
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
    /// Number of stale generated files removed first.
    pub removed: usize,
}

/// Sidebar entry whose doc id has no content document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrokenReference {
    pub id: String,
}

impl fmt::Display for BrokenReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Broken reference: sidebar doc `{}` has no content document",
            self.id
        )
    }
}

/// Write the sidebar and all pages for `tree` into `dest`.
///
/// Previously generated files are removed first, so pages of operations
/// that no longer exist do not linger.
///
/// # Errors
///
/// Returns [`EmitError`] if a file cannot be removed, serialized or written.
pub fn emit(
    tree: &SidebarTree,
    dest: &Path,
    options: &EmitOptions,
) -> Result<EmitReport, EmitError> {
    fs::create_dir_all(dest).map_err(EmitError::io(dest))?;
    let removed = clean(dest)?;

    let pages = &options.pages;
    let mut written = Vec::new();
    let mut write = |name: String, content: String| -> Result<(), EmitError> {
        let path = dest.join(name);
        fs::write(&path, content).map_err(EmitError::io(&path))?;
        written.push(path);
        Ok(())
    };

    let items = tree.nav_items(&pages.sidebar);
    write(
        SIDEBAR_JSON.to_owned(),
        to_json(&items).map_err(|e| EmitError::serialize(SIDEBAR_JSON, e))?,
    )?;
    write(
        SIDEBAR_TS.to_owned(),
        to_typescript(&items).map_err(|e| EmitError::serialize(SIDEBAR_TS, e))?,
    )?;

    if options.generate_overview {
        let page = render_overview_page(tree, pages)
            .map_err(|e| EmitError::serialize(&tree.overview.id, e))?;
        write(format!("{}{OVERVIEW_SUFFIX}", tree.overview.id), page)?;
    }

    for category in &tree.categories {
        if pages.sidebar.category_links {
            let page = render_category_page(category, pages)
                .map_err(|e| EmitError::serialize(&category.id, e))?;
            write(format!("{}{CATEGORY_SUFFIX}", category.id), page)?;
        }
        for entry in &category.entries {
            let page = render_operation_page(entry, pages)
                .map_err(|e| EmitError::serialize(&entry.id, e))?;
            write(format!("{}{OPERATION_SUFFIX}", entry.id), page)?;
        }
    }

    tracing::info!(
        dest = %dest.display(),
        written = written.len(),
        removed,
        "Emitted API docs"
    );

    Ok(EmitReport {
        items,
        written,
        removed,
    })
}

/// Whether a file name is one [`emit`] produces.
fn is_generated(name: &str) -> bool {
    name == SIDEBAR_JSON
        || name == SIDEBAR_TS
        || name.ends_with(OVERVIEW_SUFFIX)
        || name.ends_with(CATEGORY_SUFFIX)
        || name.ends_with(OPERATION_SUFFIX)
}

/// Remove every generated file from `dest`, returning how many were removed.
///
/// A missing directory counts as clean.
///
/// # Errors
///
/// Returns [`EmitError::Io`] if the directory cannot be listed or a file
/// cannot be removed.
pub fn clean(dest: &Path) -> Result<usize, EmitError> {
    let entries = match fs::read_dir(dest) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(EmitError::io(dest)(e)),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(EmitError::io(dest))?;
        let path = entry.path();
        let is_file = entry.file_type().map_err(EmitError::io(&path))?.is_file();
        let generated = entry.file_name().to_str().is_some_and(is_generated);
        if is_file && generated {
            fs::remove_file(&path).map_err(EmitError::io(&path))?;
            tracing::debug!(path = %path.display(), "Removed generated file");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Find sidebar doc ids without a content document in `dest`.
///
/// A doc `prefix/slug` is satisfied by `slug.md`, `slug.mdx` or any
/// `slug.<kind>.mdx` file. Missing documents are reported, not fatal.
///
/// # Errors
///
/// Returns [`EmitError::Io`] if the directory exists but cannot be listed.
pub fn check_references(
    items: &[NavItem],
    dest: &Path,
    pages: &PageOptions,
) -> Result<Vec<BrokenReference>, EmitError> {
    let mut slugs = std::collections::HashSet::new();
    match fs::read_dir(dest) {
        Ok(entries) => {
            for entry in entries {
                let entry = entry.map_err(EmitError::io(dest))?;
                let name = entry.file_name();
                let Some(name) = name.to_str() else {
                    continue;
                };
                if name.ends_with(".md") || name.ends_with(".mdx") {
                    let slug = name.split('.').next().unwrap_or_default();
                    slugs.insert(slug.to_owned());
                }
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(EmitError::io(dest)(e)),
    }

    let broken: Vec<BrokenReference> = referenced_ids(items)
        .into_iter()
        .filter(|id| !slugs.contains(pages.sidebar.slug_of(id)))
        .map(|id| BrokenReference { id: id.to_owned() })
        .collect();

    for reference in &broken {
        tracing::warn!(id = %reference.id, "Sidebar references missing document");
    }

    Ok(broken)
}

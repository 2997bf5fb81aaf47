//! OpenAPI to documentation sidebar compiler.
//!
//! This crate provides:
//! - [`OpenApiDocument`]: OpenAPI document loading (YAML or JSON)
//! - [`compile`]: Grouping operations into an ordered [`SidebarTree`]
//! - [`emit`]: Writing the sidebar and one content page per item
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use apinav_sidebar::{EmitOptions, OpenApiDocument, check_references, compile, emit};
//!
//! let document = OpenApiDocument::load(Path::new("api/openapi.yaml"))?;
//! let tree = compile(&document)?;
//!
//! let options = EmitOptions::default();
//! let report = emit(&tree, Path::new("docs/api"), &options)?;
//! for warning in check_references(&report.items, Path::new("docs/api"), &options.pages)? {
//!     eprintln!("{warning}");
//! }
//! # Ok(())
//! # }
//! ```

mod compiler;
mod content;
mod document;
mod emit;
mod sidebar;
mod slug;

pub use compiler::{
    CompileError, CompileOptions, NavCategory, NavEntry, OverviewEntry, SidebarTree, UNTAGGED,
    compile, compile_with,
};
pub use content::{
    Locale, PageOptions, render_category_page, render_operation_page, render_overview_page,
};
pub use document::{
    DocumentFormat, HttpMethod, Info, OpenApiDocument, OperationSpec, Parameter, RequestBody,
    Response, TagObject,
};
pub use emit::{BrokenReference, EmitError, EmitOptions, EmitReport, check_references, clean, emit};
pub use sidebar::{
    CategoryItem, CategoryLink, DocItem, NavItem, SidebarOptions, referenced_ids, to_json,
    to_typescript,
};
pub use slug::{humanize, slugify};

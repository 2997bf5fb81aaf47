//! Content page rendering.
//!
//! Renders one MDX page per sidebar item: the API overview, each category
//! (tag) and each operation. Pages start with YAML front matter so the
//! documentation renderer can pick up ids and titles.

use std::fmt::Write;

use serde::Serialize;

use crate::sidebar::SidebarOptions;
use crate::{NavCategory, NavEntry, SidebarTree};

/// Locale of generated headings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Id,
}

impl Locale {
    /// Match a BCP 47 tag by its primary language (`en-US` -> `En`).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let language = tag.split(['-', '_']).next().unwrap_or_default();
        match language.to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "id" => Some(Self::Id),
            _ => None,
        }
    }

    /// Like [`Locale::from_tag`], falling back to English.
    #[must_use]
    pub fn resolve(tag: &str) -> Self {
        Self::from_tag(tag).unwrap_or_else(|| {
            tracing::warn!(locale = tag, "Unsupported locale, using en");
            Self::En
        })
    }

    fn labels(self) -> &'static Labels {
        match self {
            Self::En => &EN,
            Self::Id => &ID,
        }
    }
}

struct Labels {
    version: &'static str,
    endpoints: &'static str,
    operations: &'static str,
    tag: &'static str,
    method: &'static str,
    operation: &'static str,
    path: &'static str,
    parameters: &'static str,
    name: &'static str,
    location: &'static str,
    required: &'static str,
    description: &'static str,
    request_body: &'static str,
    content_types: &'static str,
    responses: &'static str,
    status: &'static str,
    deprecated: &'static str,
    yes: &'static str,
    no: &'static str,
}

const EN: Labels = Labels {
    version: "Version",
    endpoints: "Endpoints",
    operations: "Operations",
    tag: "Tag",
    method: "Method",
    operation: "Operation",
    path: "Path",
    parameters: "Parameters",
    name: "Name",
    location: "In",
    required: "Required",
    description: "Description",
    request_body: "Request Body",
    content_types: "Content types",
    responses: "Responses",
    status: "Status",
    deprecated: "This operation is deprecated.",
    yes: "yes",
    no: "no",
};

const ID: Labels = Labels {
    version: "Versi",
    endpoints: "Endpoint",
    operations: "Operasi",
    tag: "Tag",
    method: "Metode",
    operation: "Operasi",
    path: "Path",
    parameters: "Parameter",
    name: "Nama",
    location: "Lokasi",
    required: "Wajib",
    description: "Deskripsi",
    request_body: "Badan Permintaan",
    content_types: "Tipe konten",
    responses: "Respons",
    status: "Status",
    deprecated: "Operasi ini sudah usang.",
    yes: "ya",
    no: "tidak",
};

/// Options for page rendering.
#[derive(Clone, Debug)]
pub struct PageOptions {
    pub sidebar: SidebarOptions,
    /// Base URL path the site is served under, with surrounding slashes.
    pub base_url: String,
    pub locale: Locale,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            sidebar: SidebarOptions::default(),
            base_url: "/".to_owned(),
            locale: Locale::En,
        }
    }
}

impl PageOptions {
    /// Site URL of a generated doc.
    fn link(&self, slug: &str) -> String {
        format!("{}docs/{}", self.base_url, self.sidebar.doc_id(slug))
    }
}

#[derive(Serialize)]
struct FrontMatter<'a> {
    id: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sidebar_label: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_method: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_path: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    deprecated: bool,
    /// Generated pages have no source to edit.
    custom_edit_url: Option<&'a str>,
}

impl<'a> FrontMatter<'a> {
    fn new(id: &'a str, title: &'a str) -> Self {
        Self {
            id,
            title,
            description: None,
            sidebar_label: None,
            api_method: None,
            api_path: None,
            deprecated: false,
            custom_edit_url: None,
        }
    }

    fn render(&self, out: &mut String) -> Result<(), serde_yaml::Error> {
        out.push_str("---\n");
        out.push_str(&serde_yaml::to_string(self)?);
        out.push_str("---\n\n");
        Ok(())
    }
}

/// Render the API overview page.
///
/// # Errors
///
/// Returns an error if the front matter cannot be serialized.
pub fn render_overview_page(
    tree: &SidebarTree,
    options: &PageOptions,
) -> Result<String, serde_yaml::Error> {
    let labels = options.locale.labels();
    let info = &tree.overview.info;
    let mut page = String::with_capacity(2048);

    let mut front = FrontMatter::new(&tree.overview.id, &info.title);
    front.description = info.description.as_deref().and_then(first_line);
    front.render(&mut page)?;

    let _ = writeln!(page, "# {}\n", escape_mdx(&info.title));
    if let Some(version) = &info.version {
        let _ = writeln!(page, "{}: `{}`\n", labels.version, version);
    }
    if let Some(description) = &info.description {
        let _ = writeln!(page, "{}\n", escape_mdx(description.trim()));
    }

    if tree.entries().next().is_some() {
        let _ = writeln!(page, "## {}\n", labels.endpoints);
        let _ = writeln!(
            page,
            "| {} | {} | {} | {} |\n| --- | --- | --- | --- |",
            labels.tag, labels.method, labels.operation, labels.path
        );
        for category in &tree.categories {
            for entry in &category.entries {
                let _ = writeln!(
                    page,
                    "| {} | {} | [{}]({}) | `{}` |",
                    escape_cell(&category.label),
                    method_label(entry),
                    escape_link_text(&entry.label),
                    options.link(&entry.id),
                    entry.operation.path
                );
            }
        }
    }

    Ok(page)
}

/// Render the landing page of a category.
///
/// # Errors
///
/// Returns an error if the front matter cannot be serialized.
pub fn render_category_page(
    category: &NavCategory,
    options: &PageOptions,
) -> Result<String, serde_yaml::Error> {
    let labels = options.locale.labels();
    let mut page = String::with_capacity(1024);

    let mut front = FrontMatter::new(&category.id, &category.label);
    front.description = category.description.as_deref().and_then(first_line);
    front.render(&mut page)?;

    let _ = writeln!(page, "# {}\n", escape_mdx(&category.label));
    if let Some(description) = &category.description {
        let _ = writeln!(page, "{}\n", escape_mdx(description.trim()));
    }

    let _ = writeln!(page, "## {}\n", labels.operations);
    let _ = writeln!(
        page,
        "| {} | {} | {} |\n| --- | --- | --- |",
        labels.method, labels.operation, labels.path
    );
    for entry in &category.entries {
        let _ = writeln!(
            page,
            "| {} | [{}]({}) | `{}` |",
            method_label(entry),
            escape_link_text(&entry.label),
            options.link(&entry.id),
            entry.operation.path
        );
    }

    Ok(page)
}

/// Render the page of one operation.
///
/// # Errors
///
/// Returns an error if the front matter cannot be serialized.
pub fn render_operation_page(
    entry: &NavEntry,
    options: &PageOptions,
) -> Result<String, serde_yaml::Error> {
    let labels = options.locale.labels();
    let operation = &entry.operation;
    let mut page = String::with_capacity(2048);

    let mut front = FrontMatter::new(&entry.id, &entry.label);
    front.sidebar_label = Some(&entry.label);
    front.description = operation
        .description
        .as_deref()
        .and_then(first_line)
        .or(operation.summary.as_deref());
    front.api_method = Some(entry.method.as_str());
    front.api_path = Some(&operation.path);
    front.deprecated = operation.deprecated;
    front.render(&mut page)?;

    let _ = writeln!(page, "# {}\n", escape_mdx(&entry.label));
    let _ = writeln!(
        page,
        "<span className=\"{}\">{}</span> `{}`\n",
        entry.method.class_name(),
        method_label(entry),
        operation.path
    );

    if operation.deprecated {
        let _ = writeln!(page, ":::caution\n\n{}\n\n:::\n", labels.deprecated);
    }

    if let Some(description) = &operation.description {
        let _ = writeln!(page, "{}\n", escape_mdx(description.trim()));
    }

    if !operation.parameters.is_empty() {
        let _ = writeln!(page, "## {}\n", labels.parameters);
        let _ = writeln!(
            page,
            "| {} | {} | {} | {} |\n| --- | --- | --- | --- |",
            labels.name, labels.location, labels.required, labels.description
        );
        for param in &operation.parameters {
            let description = match (&param.description, &param.reference) {
                (Some(d), _) => escape_cell(d),
                (None, Some(r)) => format!("`{r}`"),
                (None, None) => String::new(),
            };
            let _ = writeln!(
                page,
                "| `{}` | {} | {} | {} |",
                param.display_name(),
                escape_cell(&param.location),
                if param.required { labels.yes } else { labels.no },
                description
            );
        }
        page.push('\n');
    }

    if let Some(body) = &operation.request_body {
        let _ = writeln!(page, "## {}\n", labels.request_body);
        if let Some(description) = &body.description {
            let _ = writeln!(page, "{}\n", escape_mdx(description.trim()));
        }
        if let Some(reference) = &body.reference {
            let _ = writeln!(page, "`{reference}`\n");
        }
        if !body.content.is_empty() {
            let _ = writeln!(page, "{}:\n", labels.content_types);
            for media_type in body.content.keys() {
                let _ = writeln!(page, "- `{media_type}`");
            }
            page.push('\n');
        }
    }

    if !operation.responses.is_empty() {
        let _ = writeln!(page, "## {}\n", labels.responses);
        let _ = writeln!(
            page,
            "| {} | {} |\n| --- | --- |",
            labels.status, labels.description
        );
        for (status, response) in &operation.responses {
            let description = match (&response.description, &response.reference) {
                (Some(d), _) => escape_cell(d),
                (None, Some(r)) => format!("`{r}`"),
                (None, None) => String::new(),
            };
            let _ = writeln!(page, "| `{status}` | {description} |");
        }
    }

    Ok(page)
}

fn method_label(entry: &NavEntry) -> String {
    entry.method.as_str().to_uppercase()
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Escape characters MDX would treat as JSX or expressions.
fn escape_mdx(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape text for a single Markdown table cell.
fn escape_cell(text: &str) -> String {
    escape_mdx(text.trim())
        .replace('|', "\\|")
        .replace(['\r', '\n'], " ")
}

/// Escape link text inside a table cell.
fn escape_link_text(text: &str) -> String {
    escape_cell(text).replace('[', "\\[").replace(']', "\\]")
}

//! Sidebar serialization.
//!
//! Converts a [`SidebarTree`] into the item list consumed by the
//! documentation renderer:
//!
//! ```json
//! [
//!   { "type": "doc", "id": "api/pahlawan-pangan-public-api" },
//!   {
//!     "type": "category",
//!     "label": "Search",
//!     "link": { "type": "doc", "id": "api/search" },
//!     "items": [
//!       {
//!         "type": "doc",
//!         "id": "api/cari-makanan-murah-b-2-c",
//!         "label": "Cari Makanan Murah (B2C)",
//!         "className": "api-method get"
//!       }
//!     ]
//!   }
//! ]
//! ```

use serde::Serialize;

use crate::SidebarTree;

/// One sidebar item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavItem {
    Doc(DocItem),
    Category(CategoryItem),
}

/// Reference to a content document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// Group of items with an optional landing page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryItem {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<CategoryLink>,
    pub items: Vec<NavItem>,
}

/// Landing page of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CategoryLink {
    Doc { id: String },
}

/// Options controlling sidebar output.
#[derive(Clone, Debug)]
pub struct SidebarOptions {
    /// Prefix joined to every id with `/` (empty for none).
    pub id_prefix: String,
    /// Link categories to their tag pages.
    pub category_links: bool,
}

impl Default for SidebarOptions {
    fn default() -> Self {
        Self {
            id_prefix: "api".to_owned(),
            category_links: true,
        }
    }
}

impl SidebarOptions {
    /// Full doc id for a slug.
    #[must_use]
    pub fn doc_id(&self, slug: &str) -> String {
        if self.id_prefix.is_empty() {
            slug.to_owned()
        } else {
            format!("{}/{slug}", self.id_prefix)
        }
    }

    /// Strip the prefix from a full doc id.
    #[must_use]
    pub fn slug_of<'a>(&self, doc_id: &'a str) -> &'a str {
        if self.id_prefix.is_empty() {
            return doc_id;
        }
        doc_id
            .strip_prefix(self.id_prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(doc_id)
    }
}

impl SidebarTree {
    /// Build sidebar items: the overview doc, then one category per tag.
    #[must_use]
    pub fn nav_items(&self, options: &SidebarOptions) -> Vec<NavItem> {
        let mut items = Vec::with_capacity(self.categories.len() + 1);
        items.push(NavItem::Doc(DocItem {
            id: options.doc_id(&self.overview.id),
            label: None,
            class_name: None,
        }));

        items.extend(self.categories.iter().map(|category| {
            NavItem::Category(CategoryItem {
                label: category.label.clone(),
                link: options.category_links.then(|| CategoryLink::Doc {
                    id: options.doc_id(&category.id),
                }),
                items: category
                    .entries
                    .iter()
                    .map(|entry| {
                        NavItem::Doc(DocItem {
                            id: options.doc_id(&entry.id),
                            label: Some(entry.label.clone()),
                            class_name: Some(entry.method.class_name()),
                        })
                    })
                    .collect(),
            })
        }));

        items
    }
}

/// Every doc id referenced by `items`, depth-first.
#[must_use]
pub fn referenced_ids(items: &[NavItem]) -> Vec<&str> {
    let mut ids = Vec::new();
    for item in items {
        match item {
            NavItem::Doc(doc) => ids.push(doc.id.as_str()),
            NavItem::Category(category) => {
                if let Some(CategoryLink::Doc { id }) = &category.link {
                    ids.push(id.as_str());
                }
                ids.extend(referenced_ids(&category.items));
            }
        }
    }
    ids
}

/// Serialize items as pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(items: &[NavItem]) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(items)?;
    json.push('\n');
    Ok(json)
}

/// Serialize items as a TypeScript sidebar module.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_typescript(items: &[NavItem]) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(items)?;
    let indented = json.replace('\n', "\n  ");

    Ok(format!(
        "import type {{ SidebarsConfig }} from \"@docusaurus/plugin-content-docs\";\n\
         \n\
         const sidebar: SidebarsConfig = {{\n  \
         apisidebar: {indented},\n\
         }};\n\
         \n\
         export default sidebar.apisidebar;\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentFormat, OpenApiDocument};
    use crate::compile;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const YAML: &str = r"
openapi: 3.0.3
info:
  title: Pahlawan Pangan Public API
paths:
  /food:
    get:
      summary: Cari Makanan Murah (B2C)
      tags: [Search]
    post:
      summary: Posting Makanan Surplus (Provider Only)
      tags: [Provider]
  /courier-request:
    post:
      summary: Request Kurir Penyelamat
";

    fn tree() -> SidebarTree {
        compile(&OpenApiDocument::parse(YAML, DocumentFormat::Yaml).unwrap()).unwrap()
    }

    #[test]
    fn test_nav_items_json_shape() {
        let items = tree().nav_items(&SidebarOptions::default());

        let value = serde_json::to_value(&items).unwrap();

        assert_eq!(
            value,
            json!([
                {"type": "doc", "id": "api/pahlawan-pangan-public-api"},
                {
                    "type": "category",
                    "label": "Search",
                    "link": {"type": "doc", "id": "api/search"},
                    "items": [{
                        "type": "doc",
                        "id": "api/cari-makanan-murah-b-2-c",
                        "label": "Cari Makanan Murah (B2C)",
                        "className": "api-method get"
                    }]
                },
                {
                    "type": "category",
                    "label": "Provider",
                    "link": {"type": "doc", "id": "api/provider"},
                    "items": [{
                        "type": "doc",
                        "id": "api/posting-makanan-surplus-provider-only",
                        "label": "Posting Makanan Surplus (Provider Only)",
                        "className": "api-method post"
                    }]
                },
                {
                    "type": "category",
                    "label": "UNTAGGED",
                    "link": {"type": "doc", "id": "api/untagged"},
                    "items": [{
                        "type": "doc",
                        "id": "api/request-kurir-penyelamat",
                        "label": "Request Kurir Penyelamat",
                        "className": "api-method post"
                    }]
                }
            ])
        );
    }

    #[test]
    fn test_root_item_is_first() {
        let items = tree().nav_items(&SidebarOptions::default());
        assert!(matches!(&items[0], NavItem::Doc(doc) if doc.id == "api/pahlawan-pangan-public-api"));
    }

    #[test]
    fn test_without_category_links_or_prefix() {
        let options = SidebarOptions {
            id_prefix: String::new(),
            category_links: false,
        };
        let items = tree().nav_items(&options);

        let NavItem::Category(category) = &items[1] else {
            panic!("Expected category, got {:?}", items[1]);
        };
        assert!(category.link.is_none());
        let value = serde_json::to_value(&items[1]).unwrap();
        assert!(value.get("link").is_none());
        assert_eq!(value["items"][0]["id"], "cari-makanan-murah-b-2-c");
    }

    #[test]
    fn test_json_is_byte_identical_across_runs() {
        let options = SidebarOptions::default();
        let first = to_json(&tree().nav_items(&options)).unwrap();
        let second = to_json(&tree().nav_items(&options)).unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with("]\n"));
    }

    #[test]
    fn test_json_field_order() {
        let json = to_json(&tree().nav_items(&SidebarOptions::default())).unwrap();
        let type_pos = json.find("\"type\": \"category\"").unwrap();
        let label_pos = json.find("\"label\": \"Search\"").unwrap();
        let items_pos = json[label_pos..].find("\"items\"").unwrap();
        assert!(type_pos < label_pos);
        assert!(items_pos > 0);
    }

    #[test]
    fn test_referenced_ids() {
        let items = tree().nav_items(&SidebarOptions::default());
        let ids = referenced_ids(&items);
        assert_eq!(
            ids,
            vec![
                "api/pahlawan-pangan-public-api",
                "api/search",
                "api/cari-makanan-murah-b-2-c",
                "api/provider",
                "api/posting-makanan-surplus-provider-only",
                "api/untagged",
                "api/request-kurir-penyelamat",
            ]
        );
    }

    #[test]
    fn test_typescript_module() {
        let ts = to_typescript(&tree().nav_items(&SidebarOptions::default())).unwrap();
        assert!(ts.starts_with("import type { SidebarsConfig }"));
        assert!(ts.contains("const sidebar: SidebarsConfig = {\n  apisidebar: [\n    {"));
        assert!(ts.contains("\"className\": \"api-method get\""));
        assert!(ts.ends_with("export default sidebar.apisidebar;\n"));
    }

    #[test]
    fn test_doc_id_and_slug_of() {
        let options = SidebarOptions::default();
        assert_eq!(options.doc_id("search"), "api/search");
        assert_eq!(options.slug_of("api/search"), "search");
        assert_eq!(options.slug_of("other/search"), "other/search");

        let nested = SidebarOptions {
            id_prefix: "docs/api".to_owned(),
            category_links: true,
        };
        assert_eq!(nested.slug_of("docs/api/search"), "search");
    }
}

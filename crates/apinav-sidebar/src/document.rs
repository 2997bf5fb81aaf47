//! OpenAPI document loading.
//!
//! Parses an OpenAPI (or Swagger) document from YAML or JSON into an
//! [`OpenApiDocument`]: the API info, the declared tags, and a flat list of
//! [`OperationSpec`] in declaration order (paths top-to-bottom, methods in
//! the order they appear within each path item).
//!
//! Only the parts needed to build navigation and content pages are
//! modelled. Schemas are kept as opaque JSON values.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CompileError;

/// HTTP method of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Parse a path item key into a method.
    ///
    /// OpenAPI field names are case-sensitive, so only lowercase keys match.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "patch" => Some(Self::Patch),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Lowercase method name, as used in CSS class names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }

    /// Sidebar class name for styling, e.g. `api-method get`.
    #[must_use]
    pub fn class_name(self) -> String {
        format!("api-method {}", self.as_str())
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP verbs that are valid path item keys but have no sidebar style.
const UNSUPPORTED_METHODS: &[&str] = &["head", "options", "trace"];

/// Source format of an OpenAPI document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension. Anything but `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// API metadata from the `info` object.
#[derive(Clone, Debug, PartialEq)]
pub struct Info {
    pub title: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// A tag declared in the document's top-level `tags` list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TagObject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Operation or path-level parameter.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub description: Option<String>,
    pub deprecated: bool,
    /// Reference to a shared parameter (`#/components/parameters/...`).
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

impl Parameter {
    /// Name to display, falling back to the last segment of a `$ref`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        self.reference
            .as_deref()
            .and_then(|r| r.rsplit('/').next())
            .unwrap_or_default()
    }

    fn same_slot(&self, other: &Self) -> bool {
        match (&self.reference, &other.reference) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.name == other.name && self.location == other.location,
            _ => false,
        }
    }
}

/// Request body of an operation.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RequestBody {
    pub description: Option<String>,
    pub required: bool,
    /// Media type to media type object (schemas are not interpreted).
    pub content: IndexMap<String, Value>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

/// One documented response.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Response {
    pub description: Option<String>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

/// One API endpoint definition.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationSpec {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    /// Path-level parameters merged with operation-level ones.
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    /// Status code (or `default`) to response, in declaration order.
    pub responses: IndexMap<String, Response>,
}

impl OperationSpec {
    /// Human reference used in diagnostics: the operationId or `METHOD /path`.
    #[must_use]
    pub fn reference(&self) -> String {
        match &self.operation_id {
            Some(id) => id.clone(),
            None => format!("{} {}", self.method.as_str().to_uppercase(), self.path),
        }
    }
}

/// Parsed OpenAPI document.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenApiDocument {
    /// Value of the `openapi` (or legacy `swagger`) field.
    pub version: String,
    pub info: Info,
    pub tags: Vec<TagObject>,
    pub operations: Vec<OperationSpec>,
}

/// Version-like scalar that YAML may type as a number (`openapi: 3.1`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    title: String,
    #[serde(default)]
    version: Option<Scalar>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    openapi: Option<Scalar>,
    #[serde(default)]
    swagger: Option<Scalar>,
    info: RawInfo,
    #[serde(default)]
    tags: Vec<TagObject>,
    #[serde(default)]
    paths: IndexMap<String, Option<IndexMap<String, Value>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawOperation {
    operation_id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    deprecated: bool,
    parameters: Vec<Parameter>,
    request_body: Option<RequestBody>,
    responses: IndexMap<String, Response>,
}

impl OpenApiDocument {
    /// Read and parse a document, picking the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Io`] if the file cannot be read and
    /// [`CompileError::MalformedSpec`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, CompileError> {
        let content = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded OpenAPI document");
        Self::parse(&content, DocumentFormat::from_path(path))
    }

    /// Parse a document from a string.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::MalformedSpec`] if the content is not a
    /// syntactically valid OpenAPI document.
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self, CompileError> {
        let raw: RawDocument = match format {
            DocumentFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| CompileError::MalformedSpec(format!("Invalid YAML: {e}")))?,
            DocumentFormat::Json => serde_json::from_str(content)
                .map_err(|e| CompileError::MalformedSpec(format!("Invalid JSON: {e}")))?,
        };
        Self::from_raw(raw)
    }

    /// Description of a declared tag, if the document lists one.
    #[must_use]
    pub fn tag_description(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.name == name)
            .and_then(|tag| tag.description.as_deref())
    }

    fn from_raw(raw: RawDocument) -> Result<Self, CompileError> {
        let version = raw
            .openapi
            .or(raw.swagger)
            .map(Scalar::into_string)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                CompileError::MalformedSpec("missing `openapi` version field".to_owned())
            })?;

        let info = Info {
            title: raw.info.title,
            version: raw.info.version.map(Scalar::into_string),
            description: raw.info.description,
        };

        let mut operations = Vec::new();
        for (path, item) in raw.paths {
            if let Some(fields) = item {
                parse_path_item(&path, fields, &mut operations)?;
            }
        }

        Ok(Self {
            version,
            info,
            tags: raw.tags,
            operations,
        })
    }
}

/// Parse one path item, appending its operations in key order.
fn parse_path_item(
    path: &str,
    mut fields: IndexMap<String, Value>,
    operations: &mut Vec<OperationSpec>,
) -> Result<(), CompileError> {
    let shared_parameters: Vec<Parameter> = match fields.shift_remove("parameters") {
        Some(value) => serde_json::from_value(value).map_err(|e| {
            CompileError::MalformedSpec(format!("invalid parameters for `{path}`: {e}"))
        })?,
        None => Vec::new(),
    };

    for (key, value) in fields {
        let Some(method) = HttpMethod::from_key(&key) else {
            if UNSUPPORTED_METHODS.contains(&key.as_str()) {
                tracing::warn!(path, method = %key, "Skipping operation with unsupported method");
            }
            continue;
        };

        let raw: RawOperation = serde_json::from_value(value).map_err(|e| {
            CompileError::MalformedSpec(format!("invalid operation `{key} {path}`: {e}"))
        })?;

        operations.push(OperationSpec {
            path: path.to_owned(),
            method,
            operation_id: raw.operation_id,
            summary: raw.summary,
            description: raw.description,
            tags: raw.tags,
            deprecated: raw.deprecated,
            parameters: merge_parameters(&shared_parameters, raw.parameters),
            request_body: raw.request_body,
            responses: raw.responses,
        });
    }

    Ok(())
}

/// Merge path-level parameters into an operation's own list.
///
/// Operation-level parameters override path-level ones with the same
/// name and location. Path-level parameters come first.
fn merge_parameters(shared: &[Parameter], own: Vec<Parameter>) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = shared
        .iter()
        .filter(|p| !own.iter().any(|o| o.same_slot(p)))
        .cloned()
        .collect();
    merged.extend(own);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PETSTORE_YAML: &str = r#"
openapi: 3.0.3
info:
  title: Pahlawan Pangan Public API
  version: 1.0.0
  description: Food redistribution APIs.
tags:
  - name: Search
    description: Find surplus food.
paths:
  /food:
    parameters:
      - name: region
        in: query
        description: Region code
    get:
      summary: Cari Makanan Murah (B2C)
      tags: [Search]
      parameters:
        - name: query
          in: query
        - name: region
          in: query
          required: true
      responses:
        200:
          description: OK
    post:
      operationId: createFood
      tags: [Provider]
      requestBody:
        content:
          application/json:
            schema:
              type: object
      responses:
        "201":
          description: Created
        default:
          description: Error
  /courier-request:
    post:
      summary: Request Kurir Penyelamat
"#;

    #[test]
    fn test_parse_yaml_document() {
        let doc = OpenApiDocument::parse(PETSTORE_YAML, DocumentFormat::Yaml).unwrap();

        assert_eq!(doc.version, "3.0.3");
        assert_eq!(doc.info.title, "Pahlawan Pangan Public API");
        assert_eq!(doc.info.version.as_deref(), Some("1.0.0"));
        assert_eq!(doc.tags.len(), 1);
        assert_eq!(doc.tag_description("Search"), Some("Find surplus food."));
        assert_eq!(doc.tag_description("Provider"), None);
        assert_eq!(doc.operations.len(), 3);
    }

    #[test]
    fn test_operations_keep_declaration_order() {
        let doc = OpenApiDocument::parse(PETSTORE_YAML, DocumentFormat::Yaml).unwrap();

        let order: Vec<_> = doc
            .operations
            .iter()
            .map(|op| (op.method, op.path.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (HttpMethod::Get, "/food"),
                (HttpMethod::Post, "/food"),
                (HttpMethod::Post, "/courier-request"),
            ]
        );
    }

    #[test]
    fn test_method_order_follows_path_item_keys() {
        let yaml = r"
openapi: 3.0.0
info:
  title: T
paths:
  /items:
    delete: {}
    get: {}
    patch: {}
";
        let doc = OpenApiDocument::parse(yaml, DocumentFormat::Yaml).unwrap();
        let methods: Vec<_> = doc.operations.iter().map(|op| op.method).collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Delete, HttpMethod::Get, HttpMethod::Patch]
        );
    }

    #[test]
    fn test_path_parameters_merged() {
        let doc = OpenApiDocument::parse(PETSTORE_YAML, DocumentFormat::Yaml).unwrap();
        let get = &doc.operations[0];

        let names: Vec<_> = get.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["query", "region"]);
        // Operation-level definition wins
        assert!(get.parameters[1].required);

        let post = &doc.operations[1];
        assert_eq!(post.parameters.len(), 1);
        assert_eq!(post.parameters[0].name, "region");
    }

    #[test]
    fn test_responses_and_request_body() {
        let doc = OpenApiDocument::parse(PETSTORE_YAML, DocumentFormat::Yaml).unwrap();
        let post = &doc.operations[1];

        let statuses: Vec<_> = post.responses.keys().map(String::as_str).collect();
        assert_eq!(statuses, vec!["201", "default"]);
        let body = post.request_body.as_ref().unwrap();
        assert!(body.content.contains_key("application/json"));
    }

    #[test]
    fn test_parse_json_document() {
        let json = r#"{
  "openapi": "3.1.0",
  "info": {"title": "JSON API", "version": "2"},
  "paths": {
    "/b": {"put": {"operationId": "updateB"}},
    "/a": {"get": {"operationId": "getA", "tags": ["Alpha"]}}
  }
}"#;
        let doc = OpenApiDocument::parse(json, DocumentFormat::Json).unwrap();

        assert_eq!(doc.version, "3.1.0");
        let paths: Vec<_> = doc.operations.iter().map(|op| op.path.as_str()).collect();
        assert_eq!(paths, vec!["/b", "/a"]);
        assert_eq!(doc.operations[1].tags, vec!["Alpha".to_owned()]);
    }

    #[test]
    fn test_numeric_version_accepted() {
        let yaml = "openapi: 3.1\ninfo:\n  title: T\n  version: 2\n";
        let doc = OpenApiDocument::parse(yaml, DocumentFormat::Yaml).unwrap();
        assert_eq!(doc.version, "3.1");
        assert_eq!(doc.info.version.as_deref(), Some("2"));
    }

    #[test]
    fn test_swagger_version_accepted() {
        let yaml = "swagger: '2.0'\ninfo:\n  title: Legacy\n";
        let doc = OpenApiDocument::parse(yaml, DocumentFormat::Yaml).unwrap();
        assert_eq!(doc.version, "2.0");
        assert!(doc.operations.is_empty());
    }

    #[test]
    fn test_missing_version_is_malformed() {
        let yaml = "info:\n  title: T\n";
        let err = OpenApiDocument::parse(yaml, DocumentFormat::Yaml).unwrap_err();
        assert!(
            matches!(err, CompileError::MalformedSpec(_)),
            "Expected MalformedSpec, got {err:?}"
        );
    }

    #[test]
    fn test_invalid_yaml_is_malformed() {
        let err = OpenApiDocument::parse("openapi: [3.0", DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(err, CompileError::MalformedSpec(_)));
    }

    #[test]
    fn test_missing_info_is_malformed() {
        let err = OpenApiDocument::parse("openapi: 3.0.0\n", DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(err, CompileError::MalformedSpec(_)));
    }

    #[test]
    fn test_malformed_operation_is_reported() {
        let yaml = r"
openapi: 3.0.0
info:
  title: T
paths:
  /x:
    get:
      tags: not-a-list
";
        let err = OpenApiDocument::parse(yaml, DocumentFormat::Yaml).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("get /x"), "{message}");
    }

    #[test]
    fn test_unsupported_and_extension_keys_skipped() {
        let yaml = r"
openapi: 3.0.0
info:
  title: T
paths:
  /x:
    summary: Shared summary
    x-internal: true
    head: {}
    options: {}
    get: {}
  /empty:
";
        let doc = OpenApiDocument::parse(yaml, DocumentFormat::Yaml).unwrap();
        assert_eq!(doc.operations.len(), 1);
        assert_eq!(doc.operations[0].method, HttpMethod::Get);
    }

    #[test]
    fn test_ref_parameter_display_name() {
        let param = Parameter {
            reference: Some("#/components/parameters/PageSize".to_owned()),
            ..Default::default()
        };
        assert_eq!(param.display_name(), "PageSize");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("api/openapi.json")),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("api/openapi.yaml")),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("openapi")),
            DocumentFormat::Yaml
        );
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = OpenApiDocument::load(Path::new("/nonexistent/openapi.yaml")).unwrap_err();
        assert!(matches!(err, CompileError::Io { .. }));
    }

    #[test]
    fn test_operation_reference() {
        let doc = OpenApiDocument::parse(PETSTORE_YAML, DocumentFormat::Yaml).unwrap();
        assert_eq!(doc.operations[1].reference(), "createFood");
        assert_eq!(doc.operations[2].reference(), "POST /courier-request");
    }

    #[test]
    fn test_class_name() {
        assert_eq!(HttpMethod::Delete.class_name(), "api-method delete");
        assert_eq!(HttpMethod::from_key("GET"), None);
    }
}

//! Resource data model.
//!
//! A Resource is a reusable HTTP request template: a url, method, headers
//! and body that may all contain `{{variable}}` placeholders, plus the
//! import settings that decide what happens to the response payload.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// HTTP method of a resource.
///
/// The configuration surface only offers fetch-or-submit, so unlike a
/// general HTTP client only GET and POST are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// Retrieve a payload.
    Get,
    /// Submit the resource's body template.
    Post,
}

impl HttpMethod {
    /// Returns the lowercase string form used in the settings document.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
        }
    }

    /// Parses a method string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// File type a response payload is imported as.
///
/// `Pdf` and `Nanome` are representable in configuration but rejected by
/// the import collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportType {
    Pdb,
    Cif,
    Sdf,
    Pdf,
    Nanome,
    Json,
}

impl ImportType {
    /// Returns the dotted extension form used in the settings document.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportType::Pdb => ".pdb",
            ImportType::Cif => ".cif",
            ImportType::Sdf => ".sdf",
            ImportType::Pdf => ".pdf",
            ImportType::Nanome => ".nanome",
            ImportType::Json => ".json",
        }
    }

    /// Parses a dotted extension; empty input means "do not import".
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ".pdb" => Some(ImportType::Pdb),
            ".cif" => Some(ImportType::Cif),
            ".sdf" => Some(ImportType::Sdf),
            ".pdf" => Some(ImportType::Pdf),
            ".nanome" => Some(ImportType::Nanome),
            ".json" => Some(ImportType::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One segment of a stored JSON path.
///
/// Paths are recorded when the user picks a value out of a response
/// hierarchy, and replayed by the executor to extract an output variable.
/// The untagged representation keeps the document form a plain array of
/// strings and integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array element access.
    Index(usize),
    /// Object field access.
    Key(String),
}

impl PathSegment {
    pub fn key(s: impl Into<String>) -> Self {
        PathSegment::Key(s.into())
    }
}

/// A reusable HTTP request template.
///
/// The `id` is generated once at creation and never changes; steps and
/// reference counts are keyed by it, so renaming a resource never
/// invalidates anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Stable identifier, generated at creation.
    pub id: Uuid,

    /// Display name, unique among resources. Mutable via rename.
    pub name: String,

    /// URL template, may contain `{{name}}` placeholders.
    pub url: String,

    /// HTTP method used when the resource is executed.
    pub method: HttpMethod,

    /// Header insertion order, for field-rendering consumers.
    pub header_names: Vec<String>,

    /// Header value templates keyed by header name.
    pub headers: HashMap<String, String>,

    /// Name template under which an imported structure appears.
    pub import_name: String,

    /// What to import the response payload as; `None` means the payload
    /// is only recorded as a step result.
    pub import_type: Option<ImportType>,

    /// Variable names referenced by this resource's templates, cached at
    /// creation/change time.
    pub input_variables: Vec<String>,

    /// Cached body of the last response this resource produced.
    pub output: String,

    /// Output variable bindings: variable name to the JSON path that
    /// extracts its value from a response body. At most one entry is
    /// maintained by the registry.
    pub output_variables: HashMap<String, Vec<PathSegment>>,

    /// Body template, sent on POST.
    pub data: String,

    /// Reference counts: request id to the number of that request's steps
    /// using this resource. A resource cannot be deleted while any count
    /// is positive.
    pub references: HashMap<Uuid, usize>,
}

impl Resource {
    /// Creates a resource with a freshly generated id and empty caches.
    pub fn new(name: impl Into<String>, url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            url: url.into(),
            method,
            header_names: Vec::new(),
            headers: HashMap::new(),
            import_name: String::new(),
            import_type: None,
            input_variables: Vec::new(),
            output: String::new(),
            output_variables: HashMap::new(),
            data: String::new(),
            references: HashMap::new(),
        }
    }

    /// Total number of steps referencing this resource across all requests.
    pub fn reference_count(&self) -> usize {
        self.references.values().sum()
    }

    /// Whether any request still references this resource.
    pub fn is_referenced(&self) -> bool {
        self.references.values().any(|count| *count > 0)
    }

    /// Header values in insertion order.
    pub fn ordered_headers(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.header_names.iter().filter_map(move |name| {
            self.headers
                .get(name)
                .map(|value| (name.as_str(), value.as_str()))
        })
    }

    /// The concatenation of every template on this resource, scanned when
    /// the cached input-variable list is rebuilt.
    pub(crate) fn template_text(&self) -> String {
        let mut text = self.url.clone();
        for name in &self.header_names {
            if let Some(value) = self.headers.get(name) {
                text.push(' ');
                text.push_str(value);
            }
        }
        text.push(' ');
        text.push_str(&self.import_name);
        text.push(' ');
        text.push_str(&self.data);
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("POST"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("delete"), None);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Post.to_string(), "post");
    }

    #[test]
    fn test_import_type_round_trip() {
        for ty in [
            ImportType::Pdb,
            ImportType::Cif,
            ImportType::Sdf,
            ImportType::Pdf,
            ImportType::Nanome,
            ImportType::Json,
        ] {
            assert_eq!(ImportType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(ImportType::parse(""), None);
        assert_eq!(ImportType::parse("pdb"), None);
    }

    #[test]
    fn test_path_segment_serde() {
        let path = vec![
            PathSegment::key("items"),
            PathSegment::Index(0),
            PathSegment::key("id"),
        ];
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["items",0,"id"]"#);

        let back: Vec<PathSegment> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_resource_ids_are_unique() {
        let a = Resource::new("a", "", HttpMethod::Get);
        let b = Resource::new("a", "", HttpMethod::Get);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_reference_count() {
        let mut resource = Resource::new("r", "", HttpMethod::Get);
        assert!(!resource.is_referenced());

        let request_id = Uuid::new_v4();
        resource.references.insert(request_id, 2);
        resource.references.insert(Uuid::new_v4(), 1);

        assert!(resource.is_referenced());
        assert_eq!(resource.reference_count(), 3);
    }

    #[test]
    fn test_ordered_headers() {
        let mut resource = Resource::new("r", "", HttpMethod::Post);
        for name in ["Accept", "Authorization", "X-Custom"] {
            resource.header_names.push(name.to_string());
            resource
                .headers
                .insert(name.to_string(), format!("value-{name}"));
        }

        let names: Vec<&str> = resource.ordered_headers().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Accept", "Authorization", "X-Custom"]);
    }

    #[test]
    fn test_template_text_covers_all_templates() {
        let mut resource = Resource::new("r", "https://x/{{a}}", HttpMethod::Post);
        resource.header_names.push("Auth".to_string());
        resource
            .headers
            .insert("Auth".to_string(), "Bearer {{b}}".to_string());
        resource.import_name = "{{c}}".to_string();
        resource.data = "{{d}}".to_string();

        let text = resource.template_text();
        for placeholder in ["{{a}}", "{{b}}", "{{c}}", "{{d}}"] {
            assert!(text.contains(placeholder));
        }
    }
}

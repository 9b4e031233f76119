//! Persistent settings document.
//!
//! The whole registry (variables, resources, requests) serializes to one
//! flat JSON document, loaded at startup and saved on explicit save or at
//! shutdown. Field spellings here are the wire format and must not drift.

use super::Registry;
use crate::models::{HttpMethod, ImportType, PathSegment, Request, Resource, Step};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Wire form of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDoc {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    #[serde(rename = "input variables", default)]
    pub input_variables: Vec<String>,
    pub method: HttpMethod,
    #[serde(rename = "import name", default)]
    pub import_name: String,
    #[serde(rename = "import type", default)]
    pub import_type: String,
    #[serde(rename = "header names", default)]
    pub header_names: Vec<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub output: String,
    #[serde(rename = "output variables", default)]
    pub output_variables: HashMap<String, Vec<PathSegment>>,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub references: HashMap<Uuid, usize>,
}

impl From<&Resource> for ResourceDoc {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id,
            name: resource.name.clone(),
            url: resource.url.clone(),
            input_variables: resource.input_variables.clone(),
            method: resource.method,
            import_name: resource.import_name.clone(),
            import_type: resource
                .import_type
                .map(|ty| ty.as_str().to_string())
                .unwrap_or_default(),
            header_names: resource.header_names.clone(),
            headers: resource.headers.clone(),
            output: resource.output.clone(),
            output_variables: resource.output_variables.clone(),
            data: resource.data.clone(),
            references: resource.references.clone(),
        }
    }
}

impl From<ResourceDoc> for Resource {
    fn from(doc: ResourceDoc) -> Self {
        Resource {
            id: doc.id,
            name: doc.name,
            url: doc.url,
            method: doc.method,
            header_names: doc.header_names,
            headers: doc.headers,
            import_name: doc.import_name,
            // An empty or unrecognised extension means "do not import".
            import_type: ImportType::parse(&doc.import_type),
            input_variables: doc.input_variables,
            output: doc.output,
            output_variables: doc.output_variables,
            data: doc.data,
            references: doc.references,
        }
    }
}

/// Wire form of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDoc {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(rename = "step names", default)]
    pub step_names: HashMap<String, bool>,
}

impl From<&Request> for RequestDoc {
    fn from(request: &Request) -> Self {
        Self {
            id: request.id,
            name: request.name.clone(),
            steps: request.steps.clone(),
            step_names: request
                .step_names
                .iter()
                .map(|name| (name.clone(), true))
                .collect(),
        }
    }
}

impl From<RequestDoc> for Request {
    fn from(doc: RequestDoc) -> Self {
        // Reservations are rebuilt from both the stored map and the steps
        // themselves, so a document missing one stays consistent.
        let mut step_names: HashSet<String> = doc
            .step_names
            .into_iter()
            .filter(|(_, reserved)| *reserved)
            .map(|(name, _)| name)
            .collect();
        for step in &doc.steps {
            step_names.insert(step.name.clone());
        }

        Request {
            id: doc.id,
            name: doc.name,
            steps: doc.steps,
            step_names,
        }
    }
}

/// The flat persistent document: variables, resources and requests with
/// their creation orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    #[serde(default)]
    pub variables: HashMap<String, String>,
    #[serde(default)]
    pub resource_ids: Vec<Uuid>,
    #[serde(default)]
    pub resources: HashMap<Uuid, ResourceDoc>,
    #[serde(default)]
    pub request_ids: Vec<Uuid>,
    #[serde(default)]
    pub requests: HashMap<Uuid, RequestDoc>,
}

impl Registry {
    /// Serializes the registry into the persistent document form.
    pub fn to_document(&self) -> SettingsDocument {
        SettingsDocument {
            variables: self.variables.as_map().clone(),
            resource_ids: self.resource_order.clone(),
            resources: self
                .resources
                .iter()
                .map(|(id, resource)| (*id, ResourceDoc::from(resource)))
                .collect(),
            request_ids: self.request_order.clone(),
            requests: self
                .requests
                .iter()
                .map(|(id, request)| (*id, RequestDoc::from(request)))
                .collect(),
        }
    }

    /// Rebuilds a registry from a persistent document.
    ///
    /// Entities missing from the order lists are appended after the
    /// ordered ones so nothing recorded in the document is dropped.
    pub fn from_document(document: SettingsDocument) -> Self {
        let mut resources: HashMap<Uuid, Resource> = document
            .resources
            .into_iter()
            .map(|(id, doc)| (id, Resource::from(doc)))
            .collect();
        let mut resource_order: Vec<Uuid> = document
            .resource_ids
            .into_iter()
            .filter(|id| resources.contains_key(id))
            .collect();
        let mut leftover: Vec<Uuid> = resources
            .keys()
            .filter(|id| !resource_order.contains(id))
            .copied()
            .collect();
        leftover.sort();
        resource_order.append(&mut leftover);

        let requests: HashMap<Uuid, Request> = document
            .requests
            .into_iter()
            .map(|(id, doc)| (id, Request::from(doc)))
            .collect();
        let mut request_order: Vec<Uuid> = document
            .request_ids
            .into_iter()
            .filter(|id| requests.contains_key(id))
            .collect();
        let mut leftover: Vec<Uuid> = requests
            .keys()
            .filter(|id| !request_order.contains(id))
            .copied()
            .collect();
        leftover.sort();
        request_order.append(&mut leftover);

        // Drop reference entries for requests the document no longer has.
        for resource in resources.values_mut() {
            resource
                .references
                .retain(|request_id, _| requests.contains_key(request_id));
        }

        Registry {
            variables: document.variables.into(),
            resources,
            resource_order,
            requests,
            request_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryError;

    fn populated_registry() -> Registry {
        let mut registry = Registry::new();
        let auth = registry
            .add_resource(
                "auth",
                "https://api/login",
                HttpMethod::Post,
                None,
                vec![("Content-Type".to_string(), "application/json".to_string())],
                r#"{"user": "{{user}}"}"#,
            )
            .unwrap();
        let fetch = registry
            .add_resource(
                "fetch",
                "https://files/{{code}}.cif",
                HttpMethod::Get,
                Some(ImportType::Cif),
                Vec::new(),
                "",
            )
            .unwrap();
        registry
            .set_output_var(auth, "token", vec![PathSegment::key("token")])
            .unwrap();
        registry
            .change_resource(auth, None, None, None, Some("structure {{code}}"))
            .unwrap();

        let request = registry.add_request("load structure").unwrap();
        registry.add_step(request, "login", auth, "", false).unwrap();
        registry.add_step(request, "fetch", fetch, "meta", true).unwrap();
        registry.set_variable("code", "1ABC");
        registry
    }

    #[test]
    fn test_round_trip_preserves_registry() {
        let registry = populated_registry();
        let document = registry.to_document();

        let json = serde_json::to_string_pretty(&document).unwrap();
        let parsed: SettingsDocument = serde_json::from_str(&json).unwrap();
        let reloaded = Registry::from_document(parsed);

        assert_eq!(reloaded, registry);
    }

    #[test]
    fn test_document_uses_wire_key_spellings() {
        let registry = populated_registry();
        let json = serde_json::to_string(&registry.to_document()).unwrap();

        for key in [
            "\"input variables\"",
            "\"import name\"",
            "\"import type\"",
            "\"header names\"",
            "\"output variables\"",
            "\"step names\"",
            "\"resource_ids\"",
            "\"request_ids\"",
        ] {
            assert!(json.contains(key), "missing {key} in document");
        }
    }

    #[test]
    fn test_import_type_empty_string_means_none() {
        let registry = populated_registry();
        let document = registry.to_document();

        let auth_doc = document
            .resources
            .values()
            .find(|doc| doc.name == "auth")
            .unwrap();
        assert_eq!(auth_doc.import_type, "");

        let fetch_doc = document
            .resources
            .values()
            .find(|doc| doc.name == "fetch")
            .unwrap();
        assert_eq!(fetch_doc.import_type, ".cif");
    }

    #[test]
    fn test_from_document_rebuilds_step_names() {
        let registry = populated_registry();
        let mut document = registry.to_document();
        for request in document.requests.values_mut() {
            request.step_names.clear();
        }

        let reloaded = Registry::from_document(document);
        let request = reloaded.request_by_name("load structure").unwrap();
        assert!(request.step_names.contains("login"));
        assert!(request.step_names.contains("fetch"));
    }

    #[test]
    fn test_from_document_empty() {
        let registry = Registry::from_document(SettingsDocument::default());
        assert_eq!(registry, Registry::new());
    }

    #[test]
    fn test_reloaded_registry_enforces_invariants() {
        let registry = populated_registry();
        let mut reloaded = Registry::from_document(registry.to_document());

        let auth_id = reloaded.resource_by_name("auth").unwrap().id;
        assert!(matches!(
            reloaded.delete_resource(auth_id),
            Err(RegistryError::ResourceInUse { .. })
        ));
    }
}

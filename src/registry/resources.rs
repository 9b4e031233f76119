//! Resource registry operations.

use super::{Registry, RegistryError};
use crate::models::{HttpMethod, ImportType, PathSegment, Resource};
use crate::variables::extract_variables;
use std::collections::HashMap;
use uuid::Uuid;

impl Registry {
    /// Registers a new resource template.
    ///
    /// Fails if `name` is already taken. The url template's variables are
    /// extracted and touched into the variable store; header and body
    /// templates are scanned later, when [`Registry::change_resource`]
    /// rebuilds the cached list.
    pub fn add_resource(
        &mut self,
        name: &str,
        url: &str,
        method: HttpMethod,
        import_type: Option<ImportType>,
        headers: Vec<(String, String)>,
        body: &str,
    ) -> Result<Uuid, RegistryError> {
        if self.resource_by_name(name).is_some() {
            return Err(RegistryError::DuplicateResourceName(name.to_string()));
        }

        let mut resource = Resource::new(name, url, method);
        resource.import_type = import_type;
        resource.data = body.to_string();
        for (header_name, header_value) in headers {
            if !resource.headers.contains_key(&header_name) {
                resource.header_names.push(header_name.clone());
            }
            resource.headers.insert(header_name, header_value);
        }
        resource.input_variables = extract_variables(&resource.url, &mut self.variables);

        let id = resource.id;
        self.resources.insert(id, resource);
        self.resource_order.push(id);
        Ok(id)
    }

    /// Changes a resource's display name.
    ///
    /// The id is stable, so step references and reference counts stay
    /// valid. Renaming a resource to its current name is a no-op.
    pub fn rename_resource(&mut self, id: Uuid, new_name: &str) -> Result<(), RegistryError> {
        let current = self
            .resources
            .get(&id)
            .ok_or(RegistryError::UnknownResource(id))?;
        if current.name == new_name {
            return Ok(());
        }
        if self.resource_by_name(new_name).is_some() {
            return Err(RegistryError::DuplicateResourceName(new_name.to_string()));
        }
        if let Some(resource) = self.resources.get_mut(&id) {
            resource.name = new_name.to_string();
        }
        Ok(())
    }

    /// Applies any provided template fields to a resource.
    ///
    /// `None` or an empty string leaves a field unchanged. Header updates
    /// merge into the existing header map rather than replacing it. After
    /// the updates, the resource's referenced-variable list is rebuilt
    /// from the concatenation of url, header values, import name and body,
    /// replacing the cached list entirely; a no-longer-referenced variable
    /// silently stops being required but stays in the variable store.
    pub fn change_resource(
        &mut self,
        id: Uuid,
        new_url: Option<&str>,
        new_headers: Option<&HashMap<String, String>>,
        new_body: Option<&str>,
        new_import_name: Option<&str>,
    ) -> Result<(), RegistryError> {
        let resource = self
            .resources
            .get_mut(&id)
            .ok_or(RegistryError::UnknownResource(id))?;

        if let Some(url) = new_url.filter(|u| !u.is_empty()) {
            resource.url = url.to_string();
        }
        if let Some(headers) = new_headers {
            for (name, value) in headers {
                if !resource.headers.contains_key(name) {
                    resource.header_names.push(name.clone());
                }
                resource.headers.insert(name.clone(), value.clone());
            }
        }
        if let Some(body) = new_body.filter(|b| !b.is_empty()) {
            resource.data = body.to_string();
        }
        if let Some(import_name) = new_import_name.filter(|n| !n.is_empty()) {
            resource.import_name = import_name.to_string();
        }

        let template = resource.template_text();
        resource.input_variables = extract_variables(&template, &mut self.variables);
        Ok(())
    }

    /// Merges a single header template into a resource.
    pub fn set_header(
        &mut self,
        id: Uuid,
        name: &str,
        value: &str,
    ) -> Result<(), RegistryError> {
        let headers: HashMap<String, String> =
            [(name.to_string(), value.to_string())].into_iter().collect();
        self.change_resource(id, None, Some(&headers), None, None)
    }

    /// Binds an output variable to a JSON path on a resource.
    ///
    /// A resource holds at most one active binding: any previous binding
    /// is replaced. The bound name is touched into the variable store.
    pub fn set_output_var(
        &mut self,
        id: Uuid,
        var_name: &str,
        path: Vec<PathSegment>,
    ) -> Result<(), RegistryError> {
        let resource = self
            .resources
            .get_mut(&id)
            .ok_or(RegistryError::UnknownResource(id))?;

        resource.output_variables.clear();
        resource
            .output_variables
            .insert(var_name.to_string(), path);
        self.variables.touch(var_name);
        Ok(())
    }

    /// Caches the body of the last response a resource produced, for the
    /// response-configuration surface to navigate.
    pub fn cache_response(&mut self, id: Uuid, body: &str) -> Result<(), RegistryError> {
        let resource = self
            .resources
            .get_mut(&id)
            .ok_or(RegistryError::UnknownResource(id))?;
        resource.output = body.to_string();
        Ok(())
    }

    /// Removes a resource; fails while any request step references it.
    pub fn delete_resource(&mut self, id: Uuid) -> Result<(), RegistryError> {
        let resource = self
            .resources
            .get(&id)
            .ok_or(RegistryError::UnknownResource(id))?;

        if resource.is_referenced() {
            return Err(RegistryError::ResourceInUse {
                name: resource.name.clone(),
                references: resource.reference_count(),
            });
        }

        self.resources.remove(&id);
        self.resource_order.retain(|existing| *existing != id);
        Ok(())
    }

    /// Looks up a resource by id.
    pub fn resource(&self, id: Uuid) -> Option<&Resource> {
        self.resources.get(&id)
    }

    /// Looks up a resource by display name.
    pub fn resource_by_name(&self, name: &str) -> Option<&Resource> {
        self.resources.values().find(|r| r.name == name)
    }

    /// Resources in creation order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> + '_ {
        self.resource_order
            .iter()
            .filter_map(move |id| self.resources.get(id))
    }

    /// Every variable a resource's templates reference, resolved through
    /// the variable store (touching each), in the cached extraction order.
    pub fn variables_for_resource(
        &mut self,
        id: Uuid,
    ) -> Result<Vec<(String, String)>, RegistryError> {
        let names = self
            .resources
            .get(&id)
            .ok_or(RegistryError::UnknownResource(id))?
            .input_variables
            .clone();

        Ok(names
            .into_iter()
            .map(|name| {
                let value = self.variables.get(&name);
                (name, value)
            })
            .collect())
    }
}

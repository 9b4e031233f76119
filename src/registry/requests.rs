//! Request and step registry operations.
//!
//! Steps hold the reference counts that protect resources from deletion:
//! adding a step increments the referenced resource's count for its
//! request, removing one decrements it, and deleting a request unwinds
//! its steps one by one so the counts stay accurate.

use super::{Registry, RegistryError};
use crate::models::{Request, Step};
use uuid::Uuid;

impl Registry {
    /// Registers a new, empty request. Fails on a duplicate display name.
    pub fn add_request(&mut self, name: &str) -> Result<Uuid, RegistryError> {
        if self.request_by_name(name).is_some() {
            return Err(RegistryError::DuplicateRequestName(name.to_string()));
        }

        let request = Request::new(name);
        let id = request.id;
        self.requests.insert(id, request);
        self.request_order.push(id);
        Ok(id)
    }

    /// Changes a request's display name. Ids are stable, so steps and
    /// reference counts are unaffected; renaming to the current name is a
    /// no-op.
    pub fn rename_request(&mut self, id: Uuid, new_name: &str) -> Result<(), RegistryError> {
        let current = self
            .requests
            .get(&id)
            .ok_or(RegistryError::UnknownRequest(id))?;
        if current.name == new_name {
            return Ok(());
        }
        if self.request_by_name(new_name).is_some() {
            return Err(RegistryError::DuplicateRequestName(new_name.to_string()));
        }
        if let Some(request) = self.requests.get_mut(&id) {
            request.name = new_name.to_string();
        }
        Ok(())
    }

    /// Appends a step to a request and increments the referenced
    /// resource's count for that request.
    ///
    /// Fails if the resource id is unknown or the step name is already
    /// taken within the request.
    pub fn add_step(
        &mut self,
        request_id: Uuid,
        step_name: &str,
        resource_id: Uuid,
        metadata_source: &str,
        override_data: bool,
    ) -> Result<(), RegistryError> {
        if !self.resources.contains_key(&resource_id) {
            return Err(RegistryError::UnknownResource(resource_id));
        }
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(RegistryError::UnknownRequest(request_id))?;
        if request.step_names.contains(step_name) {
            return Err(RegistryError::DuplicateStepName {
                request: request.name.clone(),
                step: step_name.to_string(),
            });
        }

        request.step_names.insert(step_name.to_string());
        request
            .steps
            .push(Step::new(step_name, resource_id, metadata_source, override_data));

        if let Some(resource) = self.resources.get_mut(&resource_id) {
            *resource.references.entry(request_id).or_insert(0) += 1;
        }
        Ok(())
    }

    /// Renames the step at `index`, keeping step names unique within the
    /// request.
    pub fn rename_step(
        &mut self,
        request_id: Uuid,
        index: usize,
        new_name: &str,
    ) -> Result<(), RegistryError> {
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(RegistryError::UnknownRequest(request_id))?;
        let len = request.steps.len();
        if index >= len {
            return Err(RegistryError::StepIndexOutOfRange { index, len });
        }
        if request.steps[index].name == new_name {
            return Ok(());
        }
        if request.step_names.contains(new_name) {
            return Err(RegistryError::DuplicateStepName {
                request: request.name.clone(),
                step: new_name.to_string(),
            });
        }

        let old_name = std::mem::replace(&mut request.steps[index].name, new_name.to_string());
        request.step_names.remove(&old_name);
        request.step_names.insert(new_name.to_string());
        Ok(())
    }

    /// Removes the step at `index`, releasing its name reservation and
    /// decrementing the referenced resource's count for this request.
    /// The reference entry is dropped once the count reaches zero; the
    /// resource itself persists.
    pub fn delete_step(&mut self, request_id: Uuid, index: usize) -> Result<(), RegistryError> {
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(RegistryError::UnknownRequest(request_id))?;
        let len = request.steps.len();
        if index >= len {
            return Err(RegistryError::StepIndexOutOfRange { index, len });
        }

        let step = request.steps.remove(index);
        request.step_names.remove(&step.name);

        if let Some(resource) = self.resources.get_mut(&step.resource) {
            if let Some(count) = resource.references.get_mut(&request_id) {
                if *count <= 1 {
                    resource.references.remove(&request_id);
                } else {
                    *count -= 1;
                }
            }
        }
        Ok(())
    }

    /// Moves the step at `old_index` to `new_index`. Execution order is
    /// strictly this sequence.
    pub fn move_step(
        &mut self,
        request_id: Uuid,
        old_index: usize,
        new_index: usize,
    ) -> Result<(), RegistryError> {
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(RegistryError::UnknownRequest(request_id))?;
        let len = request.steps.len();
        if old_index >= len {
            return Err(RegistryError::StepIndexOutOfRange { index: old_index, len });
        }
        if new_index >= len {
            return Err(RegistryError::StepIndexOutOfRange { index: new_index, len });
        }

        let step = request.steps.remove(old_index);
        request.steps.insert(new_index, step);
        Ok(())
    }

    /// Deletes a request, unwinding every step first so reference counts
    /// are decremented correctly.
    pub fn delete_request(&mut self, id: Uuid) -> Result<(), RegistryError> {
        if !self.requests.contains_key(&id) {
            return Err(RegistryError::UnknownRequest(id));
        }

        while self.requests.get(&id).is_some_and(|r| !r.steps.is_empty()) {
            self.delete_step(id, 0)?;
        }

        self.requests.remove(&id);
        self.request_order.retain(|existing| *existing != id);
        Ok(())
    }

    /// Looks up a request by id.
    pub fn request(&self, id: Uuid) -> Option<&Request> {
        self.requests.get(&id)
    }

    /// Looks up a request by display name.
    pub fn request_by_name(&self, name: &str) -> Option<&Request> {
        self.requests.values().find(|r| r.name == name)
    }

    /// Requests in creation order.
    pub fn requests(&self) -> impl Iterator<Item = &Request> + '_ {
        self.request_order
            .iter()
            .filter_map(move |id| self.requests.get(id))
    }

    /// Every variable a request's steps require, resolved through the
    /// variable store (touching each).
    ///
    /// Walks the steps in execution order; for each step this yields the
    /// step resource's referenced variables plus, for steps with
    /// `override_data`, the per-step override field name. Duplicates keep
    /// their first position.
    pub fn variables_for_request(
        &mut self,
        id: Uuid,
    ) -> Result<Vec<(String, String)>, RegistryError> {
        let request = self
            .requests
            .get(&id)
            .ok_or(RegistryError::UnknownRequest(id))?;

        let mut names = Vec::new();
        for step in &request.steps {
            let resource = self
                .resources
                .get(&step.resource)
                .ok_or(RegistryError::UnknownResource(step.resource))?;
            for name in &resource.input_variables {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            if step.override_data {
                let field = step.override_field_name(&request.name);
                if !names.contains(&field) {
                    names.push(field);
                }
            }
        }

        Ok(names
            .into_iter()
            .map(|name| {
                let value = self.variables.get(&name);
                (name, value)
            })
            .collect())
    }
}

//! Request and step data models.
//!
//! A Request is a named, ordered pipeline of Steps; each Step invokes one
//! Resource, optionally overriding its body and linking side-channel
//! metadata for the imported structure.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// One resource invocation within a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Step name, unique within the parent request.
    pub name: String,

    /// Id of the resource this step executes.
    pub resource: Uuid,

    /// When set, the step's effective body comes from the per-request
    /// field named `"{request.name} {step.name} data"` instead of the
    /// resource's stored body template.
    pub override_data: bool,

    /// Name of a variable supplying side-channel metadata for the
    /// imported structure; empty means none.
    pub metadata_source: String,
}

impl Step {
    pub fn new(
        name: impl Into<String>,
        resource: Uuid,
        metadata_source: impl Into<String>,
        override_data: bool,
    ) -> Self {
        Self {
            name: name.into(),
            resource,
            override_data,
            metadata_source: metadata_source.into(),
        }
    }

    /// Name of the per-request field that supplies this step's body when
    /// `override_data` is set.
    pub fn override_field_name(&self, request_name: &str) -> String {
        format!("{} {} data", request_name, self.name)
    }
}

/// A named, ordered pipeline of steps executed together.
///
/// Like resources, requests carry a stable generated id; the display name
/// is mutable and unique among requests.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Stable identifier, generated at creation.
    pub id: Uuid,

    /// Display name, unique among requests.
    pub name: String,

    /// Steps in execution order.
    pub steps: Vec<Step>,

    /// Step name reservations, unique within this request.
    pub step_names: HashSet<String>,
}

impl Request {
    /// Creates an empty request with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            steps: Vec::new(),
            step_names: HashSet::new(),
        }
    }

    /// Number of steps in this request.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether this request has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

//! Registries for resources, requests and variables.
//!
//! All configuration state lives in one [`Registry`] aggregate and every
//! mutation is routed through its methods, so the invariants (unique
//! display names, stable ids, accurate reference counts) are enforced in
//! one place. Entities are keyed by generated uuid, never by their
//! mutable display name.

pub mod document;
pub mod requests;
pub mod resources;
pub mod storage;

pub use document::SettingsDocument;
pub use storage::{FileStore, SettingsStore, StorageError};

use crate::models::{Request, Resource};
use crate::variables::{VarError, VariableStore};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Validation errors raised by registry operations.
///
/// All of these are rejected synchronously with caller state unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A resource with this display name already exists.
    DuplicateResourceName(String),

    /// A request with this display name already exists.
    DuplicateRequestName(String),

    /// A step with this name already exists in the request.
    DuplicateStepName { request: String, step: String },

    /// No resource with this id is registered.
    UnknownResource(Uuid),

    /// No request with this id is registered.
    UnknownRequest(Uuid),

    /// The resource is still referenced by request steps.
    ResourceInUse { name: String, references: usize },

    /// A step index was outside the request's step sequence.
    StepIndexOutOfRange { index: usize, len: usize },

    /// A variable operation failed.
    Variable(VarError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateResourceName(name) => {
                write!(f, "a resource named '{}' already exists", name)
            }
            RegistryError::DuplicateRequestName(name) => {
                write!(f, "a request named '{}' already exists", name)
            }
            RegistryError::DuplicateStepName { request, step } => {
                write!(f, "request '{}' already has a step named '{}'", request, step)
            }
            RegistryError::UnknownResource(id) => write!(f, "unknown resource id {}", id),
            RegistryError::UnknownRequest(id) => write!(f, "unknown request id {}", id),
            RegistryError::ResourceInUse { name, references } => write!(
                f,
                "resource '{}' is used by {} step(s) and cannot be deleted",
                name, references
            ),
            RegistryError::StepIndexOutOfRange { index, len } => {
                write!(f, "step index {} out of range (request has {} steps)", index, len)
            }
            RegistryError::Variable(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<VarError> for RegistryError {
    fn from(err: VarError) -> Self {
        RegistryError::Variable(err)
    }
}

/// The configuration aggregate: variables, resources and requests.
///
/// Creation order of resources and requests is tracked so the persistent
/// document and listing surfaces render them stably.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    pub(crate) variables: VariableStore,
    pub(crate) resources: HashMap<Uuid, Resource>,
    pub(crate) resource_order: Vec<Uuid>,
    pub(crate) requests: HashMap<Uuid, Request>,
    pub(crate) request_order: Vec<Uuid>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the variable store, for context layering.
    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Returns the value of `name`, touching it into existence if absent.
    pub fn get_variable(&mut self, name: &str) -> String {
        self.variables.get(name)
    }

    /// Sets `name` to `value`.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.set(name, value);
    }

    /// Removes `name`; fails if it was never referenced or set.
    pub fn delete_variable(&mut self, name: &str) -> Result<(), RegistryError> {
        self.variables.delete(name).map_err(RegistryError::from)
    }
}

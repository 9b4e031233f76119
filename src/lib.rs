//! URL Loader pipeline engine.
//!
//! This crate is the request-templating and chained-execution engine
//! behind a VR-hosted plugin that loads molecular structures over HTTP.
//! Users configure named **resources** (url/method/header/body templates
//! with `{{variable}}` placeholders) and compose them into **requests**:
//! ordered pipelines of **steps** whose variables are filled in at
//! execution time from global variables, user-entered field values, and
//! the outputs of earlier steps.
//!
//! # Architecture
//!
//! - **models**: value types for resources, requests, steps and responses
//! - **variables**: the variable store, `{{name}}` substitution, and
//!   JSON-path output extraction
//! - **registry**: the configuration aggregate enforcing unique names,
//!   stable ids and reference counts, plus the persistent document
//! - **executor**: walks a request's steps, performs the blocking HTTP
//!   calls, captures output variables and hands payloads to the importer
//! - **import** / **notify**: collaborator seams to the hosting viewer
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use url_loader::executor::{ExecutionConfig, PipelineExecutor, ReqwestClient};
//! use url_loader::import::NullImporter;
//! use url_loader::models::{HttpMethod, ImportType, PathSegment};
//! use url_loader::notify::LogNotifier;
//! use url_loader::registry::Registry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = Registry::new();
//!
//! // A login resource whose response token feeds the fetch step.
//! let auth = registry.add_resource(
//!     "auth",
//!     "https://api.example.com/login",
//!     HttpMethod::Post,
//!     None,
//!     vec![("Content-Type".into(), "application/json".into())],
//!     r#"{"user": "{{user}}"}"#,
//! )?;
//! registry.set_output_var(auth, "token", vec![PathSegment::key("token")])?;
//!
//! let fetch = registry.add_resource(
//!     "fetch structure",
//!     "https://files.example.com/{{code}}.cif?auth={{token}}",
//!     HttpMethod::Get,
//!     Some(ImportType::Cif),
//!     Vec::new(),
//!     "",
//! )?;
//!
//! let request = registry.add_request("load structure")?;
//! registry.add_step(request, "login", auth, "", false)?;
//! registry.add_step(request, "fetch", fetch, "", false)?;
//!
//! let config = ExecutionConfig::default();
//! let client = ReqwestClient::from_config(&config)?;
//! let mut executor = PipelineExecutor::new(client, NullImporter, LogNotifier, config);
//!
//! let mut fields = HashMap::new();
//! fields.insert("code".to_string(), "1ABC".to_string());
//! fields.insert("user".to_string(), "demo".to_string());
//! let run = executor.run(&mut registry, request, &fields)?;
//! println!("{:?}", run.status);
//! # Ok(())
//! # }
//! ```

pub mod executor;
pub mod import;
pub mod models;
pub mod notify;
pub mod registry;
pub mod variables;

pub use executor::{
    ExecutionConfig, HttpClient, PipelineError, PipelineExecutor, PipelineRun, ReqwestClient,
    RequestError, RunStatus, StepKeyStyle, StepOutcome,
};
pub use import::{ImportError, NullImporter, StructureImporter};
pub use models::{HttpMethod, HttpResponse, ImportType, PathSegment, Request, Resource, Step};
pub use notify::{LogNotifier, Notifier, Severity};
pub use registry::{
    FileStore, Registry, RegistryError, SettingsDocument, SettingsStore, StorageError,
};
pub use variables::{VarError, VariableStore};

//! Pipeline executor.
//!
//! Walks a request's steps in order, substituting each resource's
//! templates against the layered context of prior step results, user
//! field values and global variables, performing the HTTP call, capturing
//! bound output variables, and handing importable payloads to the host.
//!
//! Execution is single-threaded and synchronous: a run goes to
//! completion (or its first transport failure) before anything else
//! happens, and a re-entrant run request is a no-op while one is active.

pub mod config;
pub mod error;
pub mod http;

pub use config::{ExecutionConfig, StepKeyStyle, DEFAULT_TIMEOUT_SECS};
pub use error::{PipelineError, RequestError};
pub use http::{HttpClient, ReqwestClient};

use crate::import::StructureImporter;
use crate::models::{HttpMethod, HttpResponse, Resource, Step};
use crate::notify::{Notifier, Severity};
use crate::registry::Registry;
use crate::variables::{extract_output_value, substitute, SubstitutionContext};
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;
use uuid::Uuid;

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Every step executed.
    Completed,

    /// Another run was already in progress; nothing was executed.
    Skipped,

    /// A step failed at the transport level; it and the remaining steps
    /// did not produce results.
    Aborted {
        /// Name of the failing step.
        step: String,
        /// Zero-based position of the failing step.
        index: usize,
    },
}

/// Record of one executed step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Key under which the step's result was recorded.
    pub key: String,

    /// The step's configured name.
    pub step_name: String,

    /// The URL actually requested, after substitution.
    pub url: String,

    /// HTTP status code of the response.
    pub status_code: u16,

    /// Output variable captured from the response, if the resource binds
    /// one and extraction succeeded.
    pub output_variable: Option<(String, String)>,

    /// Whether the payload was handed to the import collaborator.
    pub imported: bool,
}

/// Report of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    /// How the run ended.
    pub status: RunStatus,

    /// Outcomes of the steps that executed, in order.
    pub steps: Vec<StepOutcome>,

    /// Step results by key: the response body, or the captured output
    /// value when a binding applied.
    pub results: HashMap<String, String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineRun {
    fn skipped(now: DateTime<Utc>) -> Self {
        Self {
            status: RunStatus::Skipped,
            steps: Vec::new(),
            results: HashMap::new(),
            started_at: now,
            finished_at: now,
        }
    }
}

/// Executes request pipelines against a registry.
///
/// Owns its collaborators: the HTTP client, the structure importer and
/// the notification sink. All registry mutation during a run (cached
/// responses, captured output variables) goes through registry methods.
pub struct PipelineExecutor<C, I, N> {
    client: C,
    importer: I,
    notifier: N,
    config: ExecutionConfig,
    loading: bool,
}

impl<C, I, N> PipelineExecutor<C, I, N>
where
    C: HttpClient,
    I: StructureImporter,
    N: Notifier,
{
    pub fn new(client: C, importer: I, notifier: N, config: ExecutionConfig) -> Self {
        Self {
            client,
            importer,
            notifier,
            config,
            loading: false,
        }
    }

    /// Whether a run is currently in progress.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Runs a request's steps in order.
    ///
    /// `field_values` holds the user-entered values for the request's
    /// fields; they shadow global variables of the same name during
    /// substitution. A transport failure aborts the remaining steps and
    /// is reported through the notifier rather than returned; the report
    /// records where the run stopped. A call while another run is active
    /// is a no-op with [`RunStatus::Skipped`].
    pub fn run(
        &mut self,
        registry: &mut Registry,
        request_id: Uuid,
        field_values: &HashMap<String, String>,
    ) -> Result<PipelineRun, PipelineError> {
        if self.loading {
            debug!("pipeline run requested while one is active; skipping");
            return Ok(PipelineRun::skipped(Utc::now()));
        }

        self.loading = true;
        let result = self.run_steps(registry, request_id, field_values);
        // The loading lock is released no matter where execution stopped.
        self.loading = false;
        result
    }

    fn run_steps(
        &mut self,
        registry: &mut Registry,
        request_id: Uuid,
        field_values: &HashMap<String, String>,
    ) -> Result<PipelineRun, PipelineError> {
        let request = registry
            .request(request_id)
            .ok_or(PipelineError::UnknownRequest(request_id))?
            .clone();

        let started_at = Utc::now();
        let mut results: HashMap<String, String> = HashMap::new();
        let mut steps: Vec<StepOutcome> = Vec::new();

        for (index, step) in request.steps.iter().enumerate() {
            let resource = registry
                .resource(step.resource)
                .ok_or(PipelineError::UnknownResource(step.resource))?
                .clone();

            let effective_body = if step.override_data {
                let field = step.override_field_name(&request.name);
                field_values.get(&field).cloned().unwrap_or_default()
            } else {
                resource.data.clone()
            };

            let (url, headers, body, import_name) = {
                // Resolution order: this run's step results, then the
                // user's field values, then global variables. Globals come
                // last because extraction touches every referenced name
                // into the store; checking the store first would shadow
                // the other layers with empty entries.
                let context = SubstitutionContext::new()
                    .with_layer(&results)
                    .with_layer(field_values)
                    .with_layer(registry.variables().as_map());
                substitute_resource(&resource, &effective_body, &context)
            };

            debug!("step '{}' {} {}", step.name, resource.method, url);
            let response = match self.dispatch(&resource.method, &url, headers, &body) {
                Ok(response) => response,
                Err(err) => {
                    self.notifier.notify(
                        Severity::Error,
                        &format!("Step '{}' failed: {}", step.name, err),
                    );
                    return Ok(PipelineRun {
                        status: RunStatus::Aborted {
                            step: step.name.clone(),
                            index,
                        },
                        steps,
                        results,
                        started_at,
                        finished_at: Utc::now(),
                    });
                }
            };

            registry
                .cache_response(step.resource, &response.body)
                .map_err(|_| PipelineError::UnknownResource(step.resource))?;

            let (result_text, output_variable) =
                self.capture_output(registry, &resource, &response.body);

            let imported = self.import_payload(registry, &resource, step, &import_name, &response);

            let key = match self.config.step_key_style {
                StepKeyStyle::Position => format!("step{}", index + 1),
                StepKeyStyle::Name => step.name.clone(),
            };
            results.insert(key.clone(), result_text);

            steps.push(StepOutcome {
                key,
                step_name: step.name.clone(),
                url,
                status_code: response.status_code,
                output_variable,
                imported,
            });
        }

        self.notifier.notify(
            Severity::Success,
            &format!("Loaded request '{}'", request.name),
        );

        Ok(PipelineRun {
            status: RunStatus::Completed,
            steps,
            results,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Executes a single resource against the global variables only and
    /// caches its response body on the resource.
    ///
    /// This is the configuration surface's response preview: it performs
    /// no output capture and no import, and transport failures are
    /// returned to the caller instead of notified.
    pub fn probe_resource(
        &mut self,
        registry: &mut Registry,
        resource_id: Uuid,
    ) -> Result<HttpResponse, PipelineError> {
        let resource = registry
            .resource(resource_id)
            .ok_or(PipelineError::UnknownResource(resource_id))?
            .clone();

        let (url, headers, body, _) = {
            let context =
                SubstitutionContext::new().with_layer(registry.variables().as_map());
            substitute_resource(&resource, &resource.data, &context)
        };

        let response = self.dispatch(&resource.method, &url, headers, &body)?;
        registry
            .cache_response(resource_id, &response.body)
            .map_err(|_| PipelineError::UnknownResource(resource_id))?;
        Ok(response)
    }

    fn dispatch(
        &self,
        method: &HttpMethod,
        url: &str,
        mut headers: Vec<(String, String)>,
        body: &str,
    ) -> Result<HttpResponse, RequestError> {
        match method {
            HttpMethod::Get => self.client.get(url, &headers),
            HttpMethod::Post => {
                let has_content_type = headers
                    .iter()
                    .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));
                if !has_content_type {
                    headers.push(("Content-Type".to_string(), "text/plain".to_string()));
                }
                self.client.post(url, &headers, body)
            }
        }
    }

    /// Applies the resource's output binding to a response body.
    ///
    /// On success the bound variable is stored and its value becomes the
    /// step result; on parse or path failure a notification is emitted
    /// and the raw body is the result.
    fn capture_output(
        &self,
        registry: &mut Registry,
        resource: &Resource,
        body: &str,
    ) -> (String, Option<(String, String)>) {
        let Some((name, path)) = resource.output_variables.iter().next() else {
            return (body.to_string(), None);
        };

        match extract_output_value(body, path) {
            Ok(value) => {
                registry.set_variable(name.clone(), value.clone());
                (value.clone(), Some((name.clone(), value)))
            }
            Err(err) => {
                self.notifier.notify(
                    Severity::Error,
                    &format!("Cannot link resource output to '{}': {}", name, err),
                );
                (body.to_string(), None)
            }
        }
    }

    /// Hands an importable payload to the host. Import failures notify
    /// and never block the pipeline.
    fn import_payload(
        &self,
        registry: &mut Registry,
        resource: &Resource,
        step: &Step,
        import_name: &str,
        response: &HttpResponse,
    ) -> bool {
        let Some(import_type) = resource.import_type else {
            return false;
        };

        let metadata = if step.metadata_source.is_empty() {
            String::new()
        } else {
            registry.get_variable(&step.metadata_source)
        };

        match self
            .importer
            .import(import_name, import_type, &response.body, &metadata)
        {
            Ok(()) => true,
            Err(err) => {
                self.notifier
                    .notify(Severity::Error, &format!("{}", err));
                false
            }
        }
    }
}

fn substitute_resource(
    resource: &Resource,
    effective_body: &str,
    context: &SubstitutionContext<'_>,
) -> (String, Vec<(String, String)>, String, String) {
    let url = substitute(&resource.url, context);
    let headers = resource
        .ordered_headers()
        .map(|(name, value)| (name.to_string(), substitute(value, context)))
        .collect();
    let body = substitute(effective_body, context);
    let import_name = substitute(&resource.import_name, context);
    (url, headers, body, import_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ImportError, NullImporter, StructureImporter};
    use crate::models::{ImportType, PathSegment};
    use std::cell::RefCell;

    /// Client that replays canned responses and records every call.
    #[derive(Default)]
    struct ScriptedClient {
        responses: RefCell<Vec<Result<HttpResponse, RequestError>>>,
        calls: RefCell<Vec<(String, String, Vec<(String, String)>, String)>>,
    }

    impl ScriptedClient {
        fn push_json(&self, body: &str) {
            let mut response = HttpResponse::new(200, "OK");
            response.add_header("Content-Type", "application/json");
            response.body = body.to_string();
            self.responses.borrow_mut().push(Ok(response));
        }

        fn push_text(&self, body: &str) {
            let mut response = HttpResponse::new(200, "OK");
            response.body = body.to_string();
            self.responses.borrow_mut().push(Ok(response));
        }

        fn push_error(&self, err: RequestError) {
            self.responses.borrow_mut().push(Err(err));
        }

        fn next(&self) -> Result<HttpResponse, RequestError> {
            let mut responses = self.responses.borrow_mut();
            if responses.is_empty() {
                Err(RequestError::NetworkError("script exhausted".to_string()))
            } else {
                responses.remove(0)
            }
        }
    }

    impl HttpClient for &ScriptedClient {
        fn get(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> Result<HttpResponse, RequestError> {
            self.calls.borrow_mut().push((
                "get".to_string(),
                url.to_string(),
                headers.to_vec(),
                String::new(),
            ));
            self.next()
        }

        fn post(
            &self,
            url: &str,
            headers: &[(String, String)],
            body: &str,
        ) -> Result<HttpResponse, RequestError> {
            self.calls.borrow_mut().push((
                "post".to_string(),
                url.to_string(),
                headers.to_vec(),
                body.to_string(),
            ));
            self.next()
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: RefCell<Vec<(Severity, String)>>,
    }

    impl Notifier for &RecordingNotifier {
        fn notify(&self, severity: Severity, message: &str) {
            self.messages
                .borrow_mut()
                .push((severity, message.to_string()));
        }
    }

    #[derive(Default)]
    struct RecordingImporter {
        imports: RefCell<Vec<(String, ImportType, String, String)>>,
    }

    impl StructureImporter for &RecordingImporter {
        fn import(
            &self,
            name: &str,
            filetype: ImportType,
            contents: &str,
            metadata: &str,
        ) -> Result<(), ImportError> {
            if matches!(filetype, ImportType::Pdf | ImportType::Nanome) {
                return Err(ImportError::Unsupported(filetype));
            }
            self.imports.borrow_mut().push((
                name.to_string(),
                filetype,
                contents.to_string(),
                metadata.to_string(),
            ));
            Ok(())
        }
    }

    fn executor<'a>(
        client: &'a ScriptedClient,
        importer: &'a RecordingImporter,
        notifier: &'a RecordingNotifier,
    ) -> PipelineExecutor<&'a ScriptedClient, &'a RecordingImporter, &'a RecordingNotifier> {
        PipelineExecutor::new(client, importer, notifier, ExecutionConfig::default())
    }

    /// Two-step chain: step one returns a token bound to `tok`, step two
    /// interpolates `{{tok}}` into its URL.
    fn chained_registry() -> (Registry, Uuid) {
        let mut registry = Registry::new();
        let auth = registry
            .add_resource("auth", "https://x/login", HttpMethod::Post, None, Vec::new(), "{}")
            .unwrap();
        registry
            .set_output_var(auth, "tok", vec![PathSegment::key("token")])
            .unwrap();
        let fetch = registry
            .add_resource("fetch", "https://x/{{tok}}", HttpMethod::Get, None, Vec::new(), "")
            .unwrap();
        let request_id = registry.add_request("chain").unwrap();
        registry.add_step(request_id, "login", auth, "", false).unwrap();
        registry.add_step(request_id, "get", fetch, "", false).unwrap();
        (registry, request_id)
    }

    #[test]
    fn test_chained_output_variable_feeds_next_step() {
        let (mut registry, request_id) = chained_registry();
        let client = ScriptedClient::default();
        client.push_json(r#"{"token": "XYZ"}"#);
        client.push_text("payload");
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let run = executor(&client, &importer, &notifier)
            .run(&mut registry, request_id, &HashMap::new())
            .unwrap();

        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.steps[1].url, "https://x/XYZ");
        assert_eq!(registry.get_variable("tok"), "XYZ");
        assert_eq!(run.results["step1"], "XYZ");
        assert_eq!(run.results["step2"], "payload");

        let calls = client.calls.borrow();
        assert_eq!(calls[1].1, "https://x/XYZ");
    }

    #[test]
    fn test_field_values_shadow_globals_and_results_resolve() {
        let mut registry = Registry::new();
        let resource = registry
            .add_resource("r", "https://x/{{code}}", HttpMethod::Get, None, Vec::new(), "")
            .unwrap();
        let request_id = registry.add_request("load").unwrap();
        registry.add_step(request_id, "only", resource, "", false).unwrap();
        registry.set_variable("code", "global");

        let client = ScriptedClient::default();
        client.push_text("ok");
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let mut fields = HashMap::new();
        fields.insert("code".to_string(), "field".to_string());

        let run = executor(&client, &importer, &notifier)
            .run(&mut registry, request_id, &fields)
            .unwrap();

        assert_eq!(run.steps[0].url, "https://x/field");
    }

    #[test]
    fn test_override_data_reads_per_request_field() {
        let mut registry = Registry::new();
        let resource = registry
            .add_resource("r", "https://x/post", HttpMethod::Post, None, Vec::new(), "stored body")
            .unwrap();
        let request_id = registry.add_request("load").unwrap();
        registry.add_step(request_id, "submit", resource, "", true).unwrap();

        let client = ScriptedClient::default();
        client.push_text("ok");
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let mut fields = HashMap::new();
        fields.insert("load submit data".to_string(), "override body".to_string());

        executor(&client, &importer, &notifier)
            .run(&mut registry, request_id, &fields)
            .unwrap();

        let calls = client.calls.borrow();
        assert_eq!(calls[0].3, "override body");
    }

    #[test]
    fn test_post_defaults_content_type() {
        let mut registry = Registry::new();
        let resource = registry
            .add_resource("r", "https://x/post", HttpMethod::Post, None, Vec::new(), "body")
            .unwrap();
        let request_id = registry.add_request("load").unwrap();
        registry.add_step(request_id, "s", resource, "", false).unwrap();

        let client = ScriptedClient::default();
        client.push_text("ok");
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        executor(&client, &importer, &notifier)
            .run(&mut registry, request_id, &HashMap::new())
            .unwrap();

        let calls = client.calls.borrow();
        assert!(calls[0]
            .2
            .iter()
            .any(|(name, value)| name == "Content-Type" && value == "text/plain"));
    }

    #[test]
    fn test_post_keeps_configured_content_type() {
        let mut registry = Registry::new();
        let resource = registry
            .add_resource(
                "r",
                "https://x/post",
                HttpMethod::Post,
                None,
                vec![("Content-Type".to_string(), "application/json".to_string())],
                "{}",
            )
            .unwrap();
        let request_id = registry.add_request("load").unwrap();
        registry.add_step(request_id, "s", resource, "", false).unwrap();

        let client = ScriptedClient::default();
        client.push_text("ok");
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        executor(&client, &importer, &notifier)
            .run(&mut registry, request_id, &HashMap::new())
            .unwrap();

        let calls = client.calls.borrow();
        let content_types: Vec<&str> = calls[0]
            .2
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(content_types, vec!["application/json"]);
    }

    #[test]
    fn test_transport_failure_aborts_remaining_steps() {
        let (mut registry, request_id) = chained_registry();
        let client = ScriptedClient::default();
        client.push_error(RequestError::NetworkError("connection refused".to_string()));
        client.push_text("never reached");
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let mut exec = executor(&client, &importer, &notifier);
        let run = exec.run(&mut registry, request_id, &HashMap::new()).unwrap();

        assert_eq!(
            run.status,
            RunStatus::Aborted {
                step: "login".to_string(),
                index: 0
            }
        );
        assert!(run.results.is_empty());
        assert_eq!(client.calls.borrow().len(), 1);
        assert!(!exec.is_loading());

        let messages = notifier.messages.borrow();
        assert!(messages
            .iter()
            .any(|(severity, msg)| *severity == Severity::Error && msg.contains("login")));
    }

    #[test]
    fn test_parse_failure_falls_back_to_raw_text() {
        let mut registry = Registry::new();
        let resource = registry
            .add_resource("r", "https://x/a", HttpMethod::Get, None, Vec::new(), "")
            .unwrap();
        registry
            .set_output_var(resource, "tok", vec![PathSegment::key("token")])
            .unwrap();
        let request_id = registry.add_request("load").unwrap();
        registry.add_step(request_id, "s", resource, "", false).unwrap();

        let client = ScriptedClient::default();
        client.push_text("plain, not json");
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let run = executor(&client, &importer, &notifier)
            .run(&mut registry, request_id, &HashMap::new())
            .unwrap();

        // The pipeline continued and recorded the raw body.
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.results["step1"], "plain, not json");
        assert_eq!(run.steps[0].output_variable, None);
        assert!(notifier
            .messages
            .borrow()
            .iter()
            .any(|(severity, msg)| *severity == Severity::Error
                && msg.contains("Cannot link resource output to 'tok'")));
    }

    #[test]
    fn test_import_dispatch_and_metadata_resolution() {
        let mut registry = Registry::new();
        let resource = registry
            .add_resource(
                "r",
                "https://x/{{code}}.cif",
                HttpMethod::Get,
                Some(ImportType::Cif),
                Vec::new(),
                "",
            )
            .unwrap();
        registry
            .change_resource(resource, None, None, None, Some("structure {{code}}"))
            .unwrap();
        let request_id = registry.add_request("load").unwrap();
        registry
            .add_step(request_id, "s", resource, "meta", false)
            .unwrap();
        registry.set_variable("code", "1ABC");
        registry.set_variable("meta", r#"{"source": "test"}"#);

        let client = ScriptedClient::default();
        client.push_text("ATOM ...");
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let run = executor(&client, &importer, &notifier)
            .run(&mut registry, request_id, &HashMap::new())
            .unwrap();

        assert!(run.steps[0].imported);
        let imports = importer.imports.borrow();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].0, "structure 1ABC");
        assert_eq!(imports[0].1, ImportType::Cif);
        assert_eq!(imports[0].2, "ATOM ...");
        assert_eq!(imports[0].3, r#"{"source": "test"}"#);
    }

    #[test]
    fn test_unsupported_import_notifies_and_continues() {
        let mut registry = Registry::new();
        let resource = registry
            .add_resource(
                "r",
                "https://x/doc",
                HttpMethod::Get,
                Some(ImportType::Pdf),
                Vec::new(),
                "",
            )
            .unwrap();
        let request_id = registry.add_request("load").unwrap();
        registry.add_step(request_id, "s", resource, "", false).unwrap();

        let client = ScriptedClient::default();
        client.push_text("%PDF");
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let run = executor(&client, &importer, &notifier)
            .run(&mut registry, request_id, &HashMap::new())
            .unwrap();

        assert_eq!(run.status, RunStatus::Completed);
        assert!(!run.steps[0].imported);
        assert!(notifier
            .messages
            .borrow()
            .iter()
            .any(|(severity, msg)| *severity == Severity::Error
                && msg.contains("not supported")));
    }

    #[test]
    fn test_step_key_style_name() {
        let mut registry = Registry::new();
        let resource = registry
            .add_resource("r", "https://x/a", HttpMethod::Get, None, Vec::new(), "")
            .unwrap();
        let request_id = registry.add_request("load").unwrap();
        registry.add_step(request_id, "first", resource, "", false).unwrap();

        let client = ScriptedClient::default();
        client.push_text("ok");
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let config = ExecutionConfig {
            step_key_style: StepKeyStyle::Name,
            ..ExecutionConfig::default()
        };
        let mut exec = PipelineExecutor::new(&client, &importer, &notifier, config);
        let run = exec.run(&mut registry, request_id, &HashMap::new()).unwrap();

        assert!(run.results.contains_key("first"));
        assert!(!run.results.contains_key("step1"));
    }

    #[test]
    fn test_run_while_loading_is_noop() {
        let (mut registry, request_id) = chained_registry();
        let client = ScriptedClient::default();
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let mut exec = executor(&client, &importer, &notifier);
        exec.loading = true;

        let run = exec.run(&mut registry, request_id, &HashMap::new()).unwrap();
        assert_eq!(run.status, RunStatus::Skipped);
        assert!(client.calls.borrow().is_empty());
    }

    #[test]
    fn test_run_unknown_request_fails() {
        let mut registry = Registry::new();
        let client = ScriptedClient::default();
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let mut exec = executor(&client, &importer, &notifier);
        let err = exec
            .run(&mut registry, Uuid::new_v4(), &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownRequest(_)));
        assert!(!exec.is_loading());
    }

    #[test]
    fn test_probe_resource_caches_response() {
        let mut registry = Registry::new();
        let resource = registry
            .add_resource("r", "https://x/{{code}}", HttpMethod::Get, None, Vec::new(), "")
            .unwrap();
        registry.set_variable("code", "1ABC");

        let client = ScriptedClient::default();
        client.push_json(r#"{"ok": true}"#);
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let mut exec = executor(&client, &importer, &notifier);
        let response = exec.probe_resource(&mut registry, resource).unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(registry.resource(resource).unwrap().output, r#"{"ok": true}"#);
        assert_eq!(client.calls.borrow()[0].1, "https://x/1ABC");
    }

    #[test]
    fn test_probe_transport_error_propagates() {
        let mut registry = Registry::new();
        let resource = registry
            .add_resource("r", "https://x/a", HttpMethod::Get, None, Vec::new(), "")
            .unwrap();

        let client = ScriptedClient::default();
        client.push_error(RequestError::Timeout);
        let importer = RecordingImporter::default();
        let notifier = RecordingNotifier::default();

        let mut exec = executor(&client, &importer, &notifier);
        assert!(matches!(
            exec.probe_resource(&mut registry, resource),
            Err(PipelineError::Transport(RequestError::Timeout))
        ));
    }

    #[test]
    fn test_null_importer_composes() {
        // NullImporter satisfies the same bound as the recording one.
        let client = ScriptedClient::default();
        let notifier = RecordingNotifier::default();
        let _exec: PipelineExecutor<_, NullImporter, _> =
            PipelineExecutor::new(&client, NullImporter, &notifier, ExecutionConfig::default());
    }
}

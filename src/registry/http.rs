//! registry::http
//!
//! HTTP implementation of the `Registry` trait against the registry's v1 API.
//!
//! # Endpoints
//!
//! - `GET  {base}/project/fromName/{name}`
//! - `GET  {base}/module/{projectId}/fromName/{name}`
//! - `POST {base}/project/{projectId}/createModule` (form fields)
//! - `POST {base}/module/{moduleId}/update` (multipart, includes the artifact)
//!
//! # Behavior
//!
//! Response bodies are parsed regardless of HTTP status: the registry reports
//! outcomes through the body (`project`/`module` objects, or an `error`
//! field), and some deployments return error statuses alongside parseable
//! bodies. There are no retries and no timeout configuration beyond transport
//! defaults.
//!
//! The two POST operations carry the access token verbatim in the
//! `Authorization` header. The upload logs the raw response body regardless
//! of outcome so build logs capture whatever the registry said.

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::traits::{Registry, RegistryError};
use crate::metadata::ModuleMetadata;
use crate::ui::output::{self, Verbosity};

/// User-Agent header value for registry requests.
const USER_AGENT_VALUE: &str = "modpub-cli";

/// HTTP client for the module registry.
pub struct HttpRegistry {
    /// HTTP client for making requests
    client: Client,
    /// Parsed API base URL (e.g., `http://modules.mvdw-software.com/api/v1`)
    api_base: Url,
    /// Output verbosity for request/response logging
    verbosity: Verbosity,
}

// Custom Debug so the client internals stay out of logs.
impl std::fmt::Debug for HttpRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRegistry")
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

impl HttpRegistry {
    /// Create a registry client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Config` when the base URL does not parse.
    pub fn new(api_base: &str, verbosity: Verbosity) -> Result<Self, RegistryError> {
        let api_base = Url::parse(api_base.trim_end_matches('/'))
            .map_err(|err| RegistryError::Config(format!("bad API base URL '{api_base}': {err}")))?;
        if api_base.cannot_be_a_base() {
            return Err(RegistryError::Config(format!(
                "API base URL '{api_base}' has no path to extend"
            )));
        }
        Ok(Self {
            client: Client::new(),
            api_base,
            verbosity,
        })
    }

    /// Build an endpoint URL under the API base; segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        // cannot_be_a_base was rejected in the constructor
        let mut path = url
            .path_segments_mut()
            .expect("API base URL accepts path segments");
        for segment in segments {
            path.push(segment);
        }
        drop(path);
        url
    }

    /// Authorization header carrying the raw access token.
    fn authorization(token: &str) -> Result<HeaderValue, RegistryError> {
        HeaderValue::from_str(token)
            .map_err(|_| RegistryError::Config("access token is not a valid header value".into()))
    }

    /// GET an endpoint and pull `{key: {"id": ...}}` out of the JSON body.
    async fn fetch_id(&self, url: Url, key: &str) -> Result<Option<String>, RegistryError> {
        output::print(format!("Sending GET request to: {url}"), self.verbosity);
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;

        output::debug(format!("response body: {body}"), self.verbosity);

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|err| RegistryError::InvalidResponse(err.to_string()))?;
        Ok(id_field(value.get(key)))
    }
}

#[async_trait]
impl Registry for HttpRegistry {
    async fn project_id_by_name(&self, name: &str) -> Result<Option<String>, RegistryError> {
        let url = self.endpoint(&["project", "fromName", name]);
        self.fetch_id(url, "project").await
    }

    async fn module_id_by_name(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<Option<String>, RegistryError> {
        let url = self.endpoint(&["module", project_id, "fromName", name]);
        self.fetch_id(url, "module").await
    }

    async fn create_module(
        &self,
        project_id: &str,
        metadata: &ModuleMetadata,
        token: &str,
    ) -> Result<Option<String>, RegistryError> {
        let url = self.endpoint(&["project", project_id, "createModule"]);
        output::print(format!("Sending POST request to: {url}"), self.verbosity);

        let mut fields: Vec<(&str, String)> = vec![
            ("name", metadata.name.clone().unwrap_or_default()),
            ("author", metadata.author.clone().unwrap_or_default()),
            (
                "description",
                metadata.description.clone().unwrap_or_default(),
            ),
        ];
        if let Some(permalink) = &metadata.permalink {
            fields.push(("permalink", permalink.clone()));
        }
        for screenshot in &metadata.screenshots {
            fields.push(("screenshots[]", screenshot.clone()));
        }
        for video in &metadata.videos {
            fields.push(("videos[]", video.clone()));
        }

        let response = self
            .client
            .post(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(AUTHORIZATION, Self::authorization(token)?)
            .form(&fields)
            .send()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;

        output::debug(format!("response body: {body}"), self.verbosity);

        let parsed: CreateModuleResponse = serde_json::from_str(&body)
            .map_err(|err| RegistryError::InvalidResponse(err.to_string()))?;
        if let Some(module) = parsed.module {
            return Ok(Some(module.id.into_string()));
        }
        if let Some(error) = parsed.error {
            output::error(format!("registry error: {}", error_text(&error)));
        }
        Ok(None)
    }

    async fn upload_artifact(
        &self,
        module_id: &str,
        artifact: &Path,
        metadata: &ModuleMetadata,
        token: &str,
    ) -> Result<bool, RegistryError> {
        let url = self.endpoint(&["module", module_id, "update"]);
        output::print(format!("Sending POST request to: {url}"), self.verbosity);

        let bytes = tokio::fs::read(artifact)
            .await
            .map_err(|source| RegistryError::Artifact {
                path: artifact.to_path_buf(),
                source,
            })?;
        let file_name = artifact
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("artifact")
            .to_string();

        let mut form = Form::new()
            .text("name", metadata.name.clone().unwrap_or_default())
            .text("author", metadata.author.clone().unwrap_or_default())
            .text(
                "description",
                metadata.description.clone().unwrap_or_default(),
            )
            .text("version", metadata.version.clone().unwrap_or_default())
            .part("file", Part::bytes(bytes).file_name(file_name));
        if let Some(changes) = &metadata.changes {
            form = form.text("changes", changes.clone());
        }
        if let Some(permalink) = &metadata.permalink {
            form = form.text("permalink", permalink.clone());
        }
        for screenshot in &metadata.screenshots {
            form = form.text("screenshots[]", screenshot.clone());
        }
        for video in &metadata.videos {
            form = form.text("videos[]", video.clone());
        }
        for (kind, value) in &metadata.constraints {
            form = form.text("constraints[]", encode_constraint(kind, value));
        }

        let response = self
            .client
            .post(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(AUTHORIZATION, Self::authorization(token)?)
            .multipart(form)
            .send()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;

        // The raw body goes to the build log whether or not the upload worked.
        output::print(&body, self.verbosity);

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|err| RegistryError::InvalidResponse(err.to_string()))?;
        if let Some(error) = value.get("error") {
            output::error(format!("registry error: {}", error_text(error)));
            return Ok(false);
        }
        Ok(true)
    }
}

/// Encode one constraint as a form-urlencoded `key=value` entry.
///
/// The whole entry is encoded, including the separator, so the registry
/// receives e.g. `ServerVersion%3D%3E%3D1.8` as the field value.
fn encode_constraint(kind: &str, value: &str) -> String {
    url::form_urlencoded::byte_serialize(format!("{kind}={value}").as_bytes()).collect()
}

/// Pull the `id` out of a `project`/`module` object, if present.
///
/// Registry deployments disagree on whether ids are JSON strings or numbers.
fn id_field(object: Option<&serde_json::Value>) -> Option<String> {
    match object?.get("id")? {
        serde_json::Value::String(id) => Some(id.clone()),
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Render a registry `error` field for logging without JSON quoting.
fn error_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Response body of `createModule`.
#[derive(Deserialize)]
struct CreateModuleResponse {
    #[serde(default)]
    module: Option<ModuleRef>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Reference to a module object in a registry response.
#[derive(Deserialize)]
struct ModuleRef {
    id: Id,
}

/// Registry id, tolerant of string or numeric JSON encodings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Id {
    Text(String),
    Number(i64),
}

impl Id {
    fn into_string(self) -> String {
        match self {
            Id::Text(id) => id,
            Id::Number(id) => id.to_string(),
        }
    }
}

//! Insightly REST API client.
//!
//! [`InsightlyClient`] holds the API credential for its lifetime, builds
//! request URLs from object types, parent resources, and query options, and
//! issues blocking HTTP calls. Every operation completes before the next
//! begins; there is no retry, caching, or pagination auto-iteration — the
//! caller requests each page by offset.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::payload::Payload;
use crate::query::QueryOptions;
use crate::record::{wrap_list, Record};

/// Object type names for the common Insightly v2.1 collections.
pub mod objects {
    /// Organisation records.
    pub const ORGANISATIONS: &str = "Organisations";
    /// Contact records.
    pub const CONTACTS: &str = "Contacts";
    /// Opportunity records.
    pub const OPPORTUNITIES: &str = "Opportunities";
    /// Project records.
    pub const PROJECTS: &str = "Projects";
    /// Task records.
    pub const TASKS: &str = "Tasks";
    /// Note records.
    pub const NOTES: &str = "Notes";
    /// Email records.
    pub const EMAILS: &str = "Emails";
}

/// Insightly REST API client.
///
/// # Example
///
/// ```rust,ignore
/// use insightly_api::{objects, Filter, InsightlyClient, QueryOptions};
///
/// let client = InsightlyClient::new("api-key-here")?;
///
/// // List with filters
/// let orgs = client.list(
///     objects::ORGANISATIONS,
///     &QueryOptions::new()
///         .filter(Filter::new().parse("ORGANISATION_NAME", "Acme")?)
///         .order_by("-DATE_CREATED_UTC")
///         .top(5),
/// )?;
///
/// // Fetch by id
/// let org = client.get(objects::ORGANISATIONS, 123)?;
/// ```
#[derive(Debug, Clone)]
pub struct InsightlyClient {
    http: HttpClient,
    base_url: Url,
    auth_header: HeaderValue,
    config: ClientConfig,
}

impl InsightlyClient {
    /// Create a new client with the given API key and default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    /// Create a new client with custom HTTP configuration.
    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::new(ErrorKind::Config("empty API key".to_string())));
        }

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self {
            http,
            base_url: Url::parse(crate::DEFAULT_BASE_URL)?,
            auth_header: basic_auth_header(&api_key)?,
            config,
        })
    }

    /// Override the base endpoint, e.g. for tests or a regional API host.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        let mut url = Url::parse(base_url.as_ref())?;
        // Drop a trailing slash so path assembly never doubles separators.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
        }
        self.base_url = url;
        Ok(self)
    }

    /// The configured base endpoint.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // CRUD Operations
    // =========================================================================

    /// Create a record. Date values in the payload are rewritten to the wire
    /// string format before the body is sent.
    #[instrument(skip(self, payload))]
    pub fn create(&self, obj_type: &str, payload: &Payload) -> Result<Record> {
        let url = self.url_for(&[], obj_type, None, &QueryOptions::default())?;
        let body = payload.normalized().to_json();
        let response = self.execute(Method::POST, url, Some(&body))?;
        Ok(Record::new(response))
    }

    /// Fetch a record by id.
    #[instrument(skip(self))]
    pub fn get(&self, obj_type: &str, obj_id: u64) -> Result<Record> {
        let url = self.url_for(&[], obj_type, Some(obj_id), &QueryOptions::default())?;
        let response = self.execute(Method::GET, url, None)?;
        Ok(Record::new(response))
    }

    /// List records of an object type with optional filtering, ordering, and
    /// pagination.
    #[instrument(skip(self, options))]
    pub fn list(&self, obj_type: &str, options: &QueryOptions) -> Result<Vec<Record>> {
        self.list_nested(&[], obj_type, options)
    }

    /// List records nested under parent resources. Each `(parent type,
    /// parent id)` pair contributes a path segment pair ahead of the object
    /// type.
    #[instrument(skip(self, options))]
    pub fn list_nested(
        &self,
        parents: &[(&str, u64)],
        obj_type: &str,
        options: &QueryOptions,
    ) -> Result<Vec<Record>> {
        let url = self.url_for(parents, obj_type, None, options)?;
        let response = self.execute(Method::GET, url, None)?;
        Ok(wrap_list(response))
    }

    /// Update a record. The id is an explicit parameter; it is not read out
    /// of the payload.
    #[instrument(skip(self, payload))]
    pub fn update(&self, obj_type: &str, obj_id: u64, payload: &Payload) -> Result<Record> {
        let url = self.url_for(&[], obj_type, Some(obj_id), &QueryOptions::default())?;
        let body = payload.normalized().to_json();
        let response = self.execute(Method::PUT, url, Some(&body))?;
        Ok(Record::new(response))
    }

    /// Delete a record by id.
    #[instrument(skip(self))]
    pub fn delete(&self, obj_type: &str, obj_id: u64) -> Result<()> {
        let url = self.url_for(&[], obj_type, Some(obj_id), &QueryOptions::default())?;
        self.execute(Method::DELETE, url, None)?;
        Ok(())
    }

    // =========================================================================
    // URL building and transport
    // =========================================================================

    /// Compose the request URL: base endpoint, one path segment pair per
    /// parent, the object type, the optional object id, and the query string
    /// when any parameter is present.
    pub(crate) fn url_for(
        &self,
        parents: &[(&str, u64)],
        obj_type: &str,
        obj_id: Option<u64>,
        options: &QueryOptions,
    ) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::new(ErrorKind::InvalidUrl(
                    "base URL cannot carry path segments".to_string(),
                ))
            })?;
            for (parent_type, parent_id) in parents {
                segments.push(parent_type);
                segments.push(&parent_id.to_string());
            }
            segments.push(obj_type);
            if let Some(id) = obj_id {
                segments.push(&id.to_string());
            }
        }
        url.set_query(options.to_query_string().as_deref());
        Ok(url)
    }

    fn execute(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Value> {
        if self.config.enable_tracing {
            debug!(method = %method, url = %url, "Sending request");
        }

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut request = self.http.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status().as_u16();

        if self.config.enable_tracing {
            if (200..300).contains(&status) {
                debug!(status, "Response received");
            } else {
                info!(status, "Non-success response");
            }
        }

        let text = response.text()?;

        match status {
            200..=299 => {
                if text.is_empty() {
                    Ok(Value::Null)
                } else {
                    serde_json::from_str(&text).map_err(Into::into)
                }
            }
            401 => Err(Error::new(ErrorKind::Unauthorized(text))),
            403 => Err(Error::new(ErrorKind::Forbidden(text))),
            _ => Err(Error::new(ErrorKind::RequestFailed { status, body: text })),
        }
    }
}

/// Build the `Basic` authorization header from the API key. The key is
/// encoded with an empty password segment, the standard Basic convention.
fn basic_auth_header(api_key: &str) -> Result<HeaderValue> {
    let encoded = BASE64.encode(format!("{api_key}:"));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|e| Error::with_source(ErrorKind::Config("invalid API key".to_string()), e))?;
    value.set_sensitive(true);
    Ok(value)
}

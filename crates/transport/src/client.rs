use std::time::Duration;

use async_trait::async_trait;
use rolodex_core::{
    env_parse_with_default, env_string_or, ContactFields, Person, PersonId, API_URL_VAR,
    COLLECTION_PATH_VAR, DEFAULT_API_URL, DEFAULT_COLLECTION_PATH, DEFAULT_HTTP_TIMEOUT_SECS,
    HTTP_TIMEOUT_VAR,
};
use serde::de::DeserializeOwned;

use crate::error::TransportError;
use crate::transport::PersonTransport;

/// Maximum body length kept in error contexts.
const MAX_BODY_IN_ERROR: usize = 200;

/// Where the person collection lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub base_url: String,
    pub collection_path: String,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            collection_path: DEFAULT_COLLECTION_PATH.to_owned(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl TransportConfig {
    /// Reads `ROLODEX_API_URL`, `ROLODEX_COLLECTION_PATH` and `ROLODEX_HTTP_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env_string_or(API_URL_VAR, DEFAULT_API_URL),
            collection_path: env_string_or(COLLECTION_PATH_VAR, DEFAULT_COLLECTION_PATH),
            timeout: Duration::from_secs(env_parse_with_default(
                HTTP_TIMEOUT_VAR,
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// HTTP implementation of [`PersonTransport`] for a REST collection.
///
/// `GET`/`POST` go to the collection URL, `PUT`/`DELETE` to `{collection}{id}/`.
pub struct HttpTransport {
    client: reqwest::Client,
    collection_url: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").field("collection_url", &self.collection_url).finish()
    }
}

impl HttpTransport {
    /// Creates a transport for the given configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::ClientInit(e.to_string()))?;
        Ok(Self { client, collection_url: collection_url(config) })
    }

    /// Returns the collection URL requests are issued against.
    #[must_use]
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn item_url(&self, id: PersonId) -> String {
        format!("{}{id}/", self.collection_url)
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, TransportError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.text().await?);
        }
        let body =
            response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
        Err(TransportError::HttpStatus { code: status.as_u16(), body })
    }
}

#[async_trait]
impl PersonTransport for HttpTransport {
    async fn list(&self) -> Result<Vec<Person>, TransportError> {
        tracing::debug!(url = %self.collection_url, "listing persons");
        let body = self.send(self.client.get(&self.collection_url)).await?;
        parse_body(&body, "person list")
    }

    async fn create(&self, draft: &ContactFields) -> Result<Person, TransportError> {
        tracing::debug!(url = %self.collection_url, name = %draft.name, "creating person");
        let body = self.send(self.client.post(&self.collection_url).json(draft)).await?;
        parse_body(&body, "created person")
    }

    async fn replace(&self, person: &Person) -> Result<Option<Person>, TransportError> {
        let url = self.item_url(person.id);
        tracing::debug!(%url, "replacing person");
        let body = self.send(self.client.put(&url).json(person)).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        parse_body(&body, "replaced person").map(Some)
    }

    async fn delete(&self, id: PersonId) -> Result<(), TransportError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "deleting person");
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }
}

/// Joins base URL and collection path with exactly one `/` between them and a trailing `/`.
fn collection_url(config: &TransportConfig) -> String {
    let base = config.base_url.trim_end_matches('/');
    let path = config.collection_path.trim_matches('/');
    if path.is_empty() {
        format!("{base}/")
    } else {
        format!("{base}/{path}/")
    }
}

fn parse_body<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, TransportError> {
    serde_json::from_str(body).map_err(|e| TransportError::JsonParse {
        context: format!("{what} (body: {})", truncate(body, MAX_BODY_IN_ERROR)),
        source: e,
    })
}

/// Truncates a string to the given maximum length at a char boundary.
fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url_normalizes_slashes() {
        let config = TransportConfig::default().with_base_url("http://host:8000/");
        assert_eq!(collection_url(&config), "http://host:8000/api/persons/");

        let config = TransportConfig {
            collection_path: "contacts".to_owned(),
            ..TransportConfig::default().with_base_url("http://host")
        };
        assert_eq!(collection_url(&config), "http://host/contacts/");
    }

    #[test]
    fn test_item_url_appends_id() {
        let transport =
            HttpTransport::new(&TransportConfig::default().with_base_url("http://host")).unwrap();
        assert_eq!(transport.item_url(PersonId(5)), "http://host/api/persons/5/");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        assert_eq!(truncate("héllo", 2), "h");
        assert_eq!(truncate("short", 200), "short");
    }
}

//! Keap (Infusionsoft) REST client.
//!
//! Talks to the contact endpoints of the Keap REST API with a bearer token:
//!
//! - `GET    {root}/contacts?email=…`: search
//! - `POST   {root}/contacts`: create
//! - `PATCH  {root}/contacts/{id}`: partial update
//! - `POST   {root}/contacts/{id}/tags`: apply tags
//!
//! `{root}` is the API base plus the version prefix (`/crm/rest/v1` or
//! `/crm/rest/v2`). Calls are made once; a non-2xx answer becomes
//! [`CrmError::Api`] carrying the status and the raw body.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::model::{ContactDraft, ContactId, TagRequest};
use crate::{CrmBackend, CrmError};

/// Public Keap API host.
pub const DEFAULT_KEAP_API_BASE: &str = "https://api.infusionsoft.com";

/// Keap REST API generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// `/crm/rest/v1`.
    V1,
    /// `/crm/rest/v2`.
    #[default]
    V2,
}

impl ApiVersion {
    fn path_prefix(self) -> &'static str {
        match self {
            Self::V1 => "/crm/rest/v1",
            Self::V2 => "/crm/rest/v2",
        }
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            other => Err(format!("unknown Keap API version '{other}' (expected v1 or v2)")),
        }
    }
}

/// Connection settings for [`KeapClient`].
#[derive(Clone)]
pub struct KeapConfig {
    /// OAuth access token or service account key.
    pub access_token: String,
    /// API host, without the version prefix.
    pub base_url: String,
    /// Which REST generation to call.
    pub api_version: ApiVersion,
    /// Per-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl KeapConfig {
    /// Settings for the public Keap API with the given token.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_KEAP_API_BASE.to_owned(),
            api_version: ApiVersion::default(),
            timeout: None,
        }
    }
}

impl fmt::Debug for KeapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeapConfig")
            .field("access_token", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Keap contact API client.
pub struct KeapClient {
    token: String,
    api_root: String,
    client: reqwest::Client,
}

impl fmt::Debug for KeapClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeapClient")
            .field("api_root", &self.api_root)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    contacts: Vec<ContactSummary>,
}

#[derive(Debug, Deserialize)]
struct ContactSummary {
    id: ContactId,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(default)]
    id: Option<ContactId>,
}

impl KeapClient {
    /// Build a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::Config`] if the access token is empty, or
    /// [`CrmError::Network`] if the HTTP client cannot be constructed.
    pub fn new(cfg: KeapConfig) -> Result<Self, CrmError> {
        if cfg.access_token.trim().is_empty() {
            return Err(CrmError::Config("missing Keap access token".to_owned()));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("leadsync/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let api_root = format!(
            "{}{}",
            cfg.base_url.trim_end_matches('/'),
            cfg.api_version.path_prefix()
        );

        Ok(Self {
            token: cfg.access_token,
            api_root,
            client,
        })
    }

    /// The versioned API root every call is made against.
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, CrmError> {
        let url = format!("{}{path}", self.api_root);
        debug!(method = %method, route = %log_route(path), "calling Keap");

        let mut req = self.client.request(method, &url).bearer_auth(&self.token);
        if let Some(ref b) = body {
            req = req.json(b);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(CrmError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        // Tag and update calls may answer with an empty body.
        if text.trim().is_empty() {
            return Ok(serde_json::from_str("{}")?);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// The request path without its query string. Search queries carry the
/// e-mail address, which stays out of the logs.
fn log_route(path: &str) -> &str {
    path.split_once('?').map_or(path, |(route, _)| route)
}

#[async_trait::async_trait]
impl CrmBackend for KeapClient {
    async fn find_by_email(&self, email: &str) -> Result<Option<ContactId>, CrmError> {
        let path = format!("/contacts?email={}", urlencoding::encode(email));
        let found: SearchResponse = self.call(Method::GET, &path, None).await?;
        Ok(found.contacts.into_iter().next().map(|c| c.id))
    }

    async fn create_contact(&self, draft: &ContactDraft) -> Result<ContactId, CrmError> {
        let body = serde_json::to_value(draft)?;
        let created: CreateResponse = self.call(Method::POST, "/contacts", Some(body)).await?;
        created.id.ok_or(CrmError::MissingContactId)
    }

    async fn update_contact(&self, id: &ContactId, draft: &ContactDraft) -> Result<(), CrmError> {
        let path = format!("/contacts/{}", urlencoding::encode(id.as_str()));
        let body = serde_json::to_value(draft)?;
        let _: serde_json::Value = self.call(Method::PATCH, &path, Some(body)).await?;
        Ok(())
    }

    async fn apply_tags(&self, id: &ContactId, tag_ids: &[u64]) -> Result<(), CrmError> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        let path = format!("/contacts/{}/tags", urlencoding::encode(id.as_str()));
        let body = serde_json::to_value(TagRequest {
            tag_ids: tag_ids.to_vec(),
        })?;
        let _: serde_json::Value = self.call(Method::POST, &path, Some(body)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_rejected() {
        let result = KeapClient::new(KeapConfig::new("  "));
        assert!(matches!(result, Err(CrmError::Config(_))));
    }

    #[test]
    fn api_root_includes_version_prefix() {
        let mut cfg = KeapConfig::new("token");
        cfg.base_url = "http://localhost:9000/".to_owned();
        cfg.api_version = ApiVersion::V1;
        let client = KeapClient::new(cfg).unwrap();
        assert_eq!(client.api_root(), "http://localhost:9000/crm/rest/v1");
    }

    #[test]
    fn default_root_is_public_v2() {
        let client = KeapClient::new(KeapConfig::new("token")).unwrap();
        assert_eq!(
            client.api_root(),
            "https://api.infusionsoft.com/crm/rest/v2"
        );
    }

    #[test]
    fn api_version_parses_both_spellings() {
        assert_eq!("v1".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
        assert_eq!("2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
        assert!("v3".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn debug_output_hides_token() {
        let cfg = KeapConfig::new("super-secret");
        assert!(!format!("{cfg:?}").contains("super-secret"));
        let client = KeapClient::new(cfg).unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }

    #[test]
    fn logged_route_drops_the_search_query() {
        let path = format!("/contacts?email={}", urlencoding::encode("jane@x.com"));
        assert_eq!(log_route(&path), "/contacts");
        assert_eq!(log_route("/contacts/17/tags"), "/contacts/17/tags");
    }
}

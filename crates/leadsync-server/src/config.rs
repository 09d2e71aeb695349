//! Server configuration for `leadsync`.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Keap settings use the `KEAP_*` names; everything else can be overridden
//! via `LEADSYNC_*` environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use leadsync_core::{CustomFieldIds, FieldMapping, TagIds};
use leadsync_crm::{ApiVersion, DEFAULT_KEAP_API_BASE, KeapConfig};
use tracing::warn;

/// Default path of the submission endpoint.
pub const DEFAULT_SUBMIT_PATH: &str = "/.netlify/functions/keap-submit";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Route the submission endpoint is served at.
    pub submit_path: String,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// CRM backend type.
    pub crm_backend: CrmBackendType,
    /// Custom field and tag ids.
    pub mapping: FieldMapping,
    /// Maximum in-flight requests on the submission route.
    pub max_concurrent: usize,
}

/// Supported CRM backends.
#[derive(Debug, Clone)]
pub enum CrmBackendType {
    /// In-process contact table (development only, data lost on restart).
    Memory,
    /// Keap REST API. `None` when no access token is set; every submission
    /// then fails with a configuration error.
    Keap(Option<KeapConfig>),
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on (binds to `0.0.0.0`)
    /// - `LEADSYNC_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:8888`)
    /// - `LEADSYNC_SUBMIT_PATH`: endpoint route (default: `/.netlify/functions/keap-submit`)
    /// - `LEADSYNC_LOG_LEVEL`: log filter (default: `info`)
    /// - `LEADSYNC_CRM`: `keap` or `memory` (default: `keap`)
    /// - `LEADSYNC_CRM_TIMEOUT_SECS`: per-request CRM timeout (default: none)
    /// - `LEADSYNC_MAX_CONCURRENT`: in-flight submissions (default: `64`)
    /// - `KEAP_ACCESS_TOKEN`: bearer token for the Keap API
    /// - `KEAP_API_BASE`: API host (default: `https://api.infusionsoft.com`)
    /// - `KEAP_API_VERSION`: `v1` or `v2` (default: `v2`)
    /// - `KEAP_*_FIELD_ID`, `KEAP_*_TAG_ID`: numeric custom field and tag ids
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Priority: LEADSYNC_BIND_ADDR > PORT > default 127.0.0.1:8888
        let bind_addr = if let Some(addr) = lookup("LEADSYNC_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8888)))
        } else if let Some(port_str) = lookup("PORT") {
            let port: u16 = port_str.parse().unwrap_or(8888);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 8888))
        };

        let submit_path = lookup("LEADSYNC_SUBMIT_PATH")
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| DEFAULT_SUBMIT_PATH.to_owned());

        let log_level = lookup("LEADSYNC_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let max_concurrent = lookup("LEADSYNC_MAX_CONCURRENT")
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(64);

        let crm_backend = match lookup("LEADSYNC_CRM")
            .unwrap_or_else(|| "keap".to_owned())
            .to_lowercase()
            .as_str()
        {
            "memory" => CrmBackendType::Memory,
            _ => CrmBackendType::Keap(keap_config(&lookup)),
        };

        let mapping = FieldMapping {
            custom_fields: CustomFieldIds {
                role: numeric_id(&lookup, "KEAP_ROLE_FIELD_ID"),
                questions: numeric_id(&lookup, "KEAP_QUESTIONS_FIELD_ID"),
                interest: numeric_id(&lookup, "KEAP_INTEREST_FIELD_ID"),
                challenges: numeric_id(&lookup, "KEAP_CHALLENGES_FIELD_ID"),
                preferred_contact: numeric_id(&lookup, "KEAP_PREFERRED_CONTACT_FIELD_ID"),
            },
            tags: TagIds {
                workshop: numeric_id(&lookup, "KEAP_WORKSHOP_TAG_ID"),
                corporate: numeric_id(&lookup, "KEAP_CORPORATE_TAG_ID"),
            },
        };

        Self {
            bind_addr,
            submit_path,
            log_level,
            crm_backend,
            mapping,
            max_concurrent,
        }
    }
}

fn keap_config<F>(lookup: &F) -> Option<KeapConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let access_token = lookup("KEAP_ACCESS_TOKEN").filter(|t| !t.trim().is_empty())?;

    let api_version = match lookup("KEAP_API_VERSION") {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(value = %raw, "unknown KEAP_API_VERSION, using v2");
            ApiVersion::V2
        }),
        None => ApiVersion::V2,
    };

    let timeout = lookup("LEADSYNC_CRM_TIMEOUT_SECS")
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    Some(KeapConfig {
        access_token,
        base_url: lookup("KEAP_API_BASE").unwrap_or_else(|| DEFAULT_KEAP_API_BASE.to_owned()),
        api_version,
        timeout,
    })
}

/// Parse an optional numeric id. Blank means unset; anything non-numeric is
/// logged and treated as unset.
fn numeric_id<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            warn!(variable = key, value = %raw, "ignoring non-numeric id");
            None
        }
    }
}

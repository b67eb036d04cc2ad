//! Backend connection settings, read from the environment (after `.env`).

use anyhow::Result;

use crate::fetch::auth::{ApiKey, UrlParam};
use crate::fetch::{BasicClient, HttpClient};

pub const API_URL_VAR: &str = "PLANT_METRICS_API_URL";
pub const API_TOKEN_VAR: &str = "PLANT_METRICS_API_TOKEN";
pub const API_KEY_HEADER_VAR: &str = "PLANT_METRICS_API_KEY_HEADER";
pub const API_KEY_PARAM_VAR: &str = "PLANT_METRICS_API_KEY_PARAM";

/// Whether a `--source` value names the REST backend rather than a snapshot
/// file.
pub fn is_backend_url(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// How the token, if any, is presented to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendAuth {
    None,
    Bearer { token: String },
    Header { header_name: String, token: String },
    UrlParam { param_name: String, token: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub auth: BackendAuth,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable lookup. Empty values count as unset.
    ///
    /// A token alone means bearer auth; `*_KEY_HEADER` or `*_KEY_PARAM`
    /// switch it to a custom header or a query parameter.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let auth = match get(API_TOKEN_VAR) {
            None => BackendAuth::None,
            Some(token) => match (get(API_KEY_HEADER_VAR), get(API_KEY_PARAM_VAR)) {
                (Some(header_name), _) => BackendAuth::Header { header_name, token },
                (None, Some(param_name)) => BackendAuth::UrlParam { param_name, token },
                (None, None) => BackendAuth::Bearer { token },
            },
        };

        Self {
            base_url: get(API_URL_VAR),
            auth,
        }
    }

    /// Wraps a [`BasicClient`] with whatever credentials are configured.
    pub fn http_client(&self) -> Result<Box<dyn HttpClient>> {
        let basic = BasicClient::new()?;
        let client: Box<dyn HttpClient> = match &self.auth {
            BackendAuth::None => Box::new(basic),
            BackendAuth::Bearer { token } => Box::new(ApiKey::bearer(basic, token)?),
            BackendAuth::Header { header_name, token } => {
                Box::new(ApiKey::new(basic, header_name, token)?)
            }
            BackendAuth::UrlParam { param_name, token } => Box::new(UrlParam {
                inner: basic,
                param_name: param_name.clone(),
                key: token.clone(),
            }),
        };
        Ok(client)
    }
}

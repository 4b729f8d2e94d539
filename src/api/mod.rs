use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://test.xpresspayments.com:9007/api/TerminalNumber";
pub const SUCCESS_CODE: &str = "00";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TerminalRecord {
    pub terminal_number_id: i64,
    pub number: String,
    pub date_created: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub response_code: String,
    pub response_message: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request rejected with code {code}: {message}")]
    Application { code: String, message: String },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {endpoint} carried no data")]
    MissingData { endpoint: &'static str },

    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub fn is_application(&self) -> bool {
        matches!(self, ApiError::Application { .. })
    }

    // application failures surface the backend's own message, everything
    // else collapses to a generic connectivity notice for the user
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Application { message, .. } if !message.trim().is_empty() => message.clone(),
            ApiError::Application { .. } => fallback.to_string(),
            _ => "Network error. Please check your connection.".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
    pub insecure: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 10,
            proxy: None,
            insecure: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(options: &ClientOptions) -> Result<Self, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let timeout = Duration::from_secs(options.timeout_seconds.try_into().unwrap_or(10));
        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(timeout);

        if options.insecure {
            builder = builder
                .danger_accept_invalid_hostnames(true)
                .danger_accept_invalid_certs(true);
        }

        if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| ApiError::ProxySetup {
                proxy: proxy.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| ApiError::ClientBuild { source: e })?;

        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn generate(&self) -> Result<String, ApiError> {
        const ENDPOINT: &str = "GenerateTerminalNumber";
        let url = format!("{}/{}", self.base_url, ENDPOINT);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| transport(ENDPOINT, e))?;
        let body = response.text().await.map_err(|e| transport(ENDPOINT, e))?;

        let envelope: Envelope<String> = decode(ENDPOINT, &body)?;
        expect_success(envelope)?.ok_or(ApiError::MissingData { endpoint: ENDPOINT })
    }

    pub async fn find_by_number(&self, number: &str) -> Result<TerminalRecord, ApiError> {
        const ENDPOINT: &str = "GetTerminalNumberByNumber";
        let url = format!("{}/{}", self.base_url, ENDPOINT);
        debug!("GET {}?number={}", url, number);

        let response = self
            .http
            .get(&url)
            .query(&[("number", number)])
            .send()
            .await
            .map_err(|e| transport(ENDPOINT, e))?;
        let body = response.text().await.map_err(|e| transport(ENDPOINT, e))?;

        let envelope: Envelope<TerminalRecord> = decode(ENDPOINT, &body)?;
        expect_success(envelope)?.ok_or(ApiError::MissingData { endpoint: ENDPOINT })
    }

    pub async fn list_all(&self) -> Result<Vec<TerminalRecord>, ApiError> {
        const ENDPOINT: &str = "GetAllTerminalNumbers";
        let url = format!("{}/{}", self.base_url, ENDPOINT);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport(ENDPOINT, e))?;
        let body = response.text().await.map_err(|e| transport(ENDPOINT, e))?;

        let envelope: Envelope<Vec<TerminalRecord>> = decode(ENDPOINT, &body)?;
        Ok(expect_success(envelope)?.unwrap_or_default())
    }
}

fn transport(endpoint: &'static str, source: reqwest::Error) -> ApiError {
    debug!("transport failure on {}: {}", endpoint, source);
    ApiError::Transport { endpoint, source }
}

fn decode<T: serde::de::DeserializeOwned>(
    endpoint: &'static str,
    body: &str,
) -> Result<Envelope<T>, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        debug!("undecodable body from {}: {}", endpoint, e);
        ApiError::Decode {
            endpoint,
            source: e,
        }
    })
}

// the backend signals failure through the envelope, not the HTTP status
fn expect_success<T>(envelope: Envelope<T>) -> Result<Option<T>, ApiError> {
    if envelope.response_code != SUCCESS_CODE {
        return Err(ApiError::Application {
            code: envelope.response_code,
            message: envelope.response_message.unwrap_or_default(),
        });
    }
    Ok(envelope.data)
}

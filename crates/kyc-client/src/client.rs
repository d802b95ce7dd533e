//! Client for the KYC API

use crate::config::Config;
use kyc_common::{Error, PartValue, PayloadPart, Result};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

/// Client for the registration and listing endpoints
#[derive(Debug, Clone)]
pub struct KycClient {
    register_url: String,
    drivers_url: String,
    client: reqwest::Client,
}

impl KycClient {
    /// Create a new client for explicit endpoint URLs
    pub fn new(register_url: String, drivers_url: String) -> Self {
        Self {
            register_url,
            drivers_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.register_url(), config.drivers_url())
    }

    pub fn register_url(&self) -> &str {
        &self.register_url
    }

    /// POST a multipart registration and return the JSON reply
    ///
    /// A non-success status becomes [`Error::Server`] carrying the body's
    /// `detail` message.
    pub async fn submit(&self, parts: Vec<PayloadPart>) -> Result<Value> {
        debug!("Submitting {} part(s) to {}", parts.len(), self.register_url);

        let form = build_form(parts)?;
        let response = self
            .client
            .post(&self.register_url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        read_json(response).await
    }

    /// GET the raw driver listing
    pub async fn fetch_drivers(&self) -> Result<Value> {
        debug!("Fetching drivers from {}", self.drivers_url);

        let response = self
            .client
            .get(&self.drivers_url)
            .send()
            .await
            .map_err(transport)?;

        read_json(response).await
    }
}

fn build_form(parts: Vec<PayloadPart>) -> Result<Form> {
    let mut form = Form::new();

    for part in parts {
        form = match part.value {
            PartValue::Text(text) => form.text(part.name, text),
            PartValue::File(file) => {
                let mime = file.mime_type();
                let body = Part::bytes(file.content)
                    .file_name(file.name)
                    .mime_str(&mime)
                    .map_err(transport)?;
                form.part(part.name, body)
            }
        };
    }

    Ok(form)
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(transport)?;

    if !status.is_success() {
        let body: Option<Value> = serde_json::from_slice(&bytes).ok();
        return Err(Error::from_response(status.as_u16(), body.as_ref()));
    }

    Ok(serde_json::from_slice(&bytes)?)
}

fn transport(err: reqwest::Error) -> Error {
    Error::Transport(err.to_string())
}

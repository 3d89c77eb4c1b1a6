use reqwest::{
    blocking::{multipart, Client},
    StatusCode,
};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::routes::{DATASTORAGE_PATH, HEALTH_PATH};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode server response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Status and decoded JSON body of one datastorage call.
#[derive(Debug, Clone)]
pub struct ServerReply {
    pub status: StatusCode,
    pub body: Value,
}

/// Blocking client for a datastorage server. Do not use inside an async
/// runtime.
#[derive(Clone)]
pub struct DataStorageClient {
    base_url: String,
    http: Client,
}

impl DataStorageClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn health(&self) -> Result<StatusCode, ClientError> {
        let resp = self.http.get(self.url(HEALTH_PATH)).send()?;
        Ok(resp.status())
    }

    pub fn retrieve(&self, name: &str) -> Result<ServerReply, ClientError> {
        let resp = self
            .http
            .get(self.url(DATASTORAGE_PATH))
            .query(&[("name", name)])
            .send()?;
        Self::decode(resp)
    }

    /// Uploads `data` as the `data` file part, with `name` as both the form
    /// field and the file name.
    pub fn upload(&self, name: &str, data: Vec<u8>) -> Result<ServerReply, ClientError> {
        let form = multipart::Form::new()
            .text("name", name.to_string())
            .part("data", multipart::Part::bytes(data).file_name(name.to_string()));
        let resp = self
            .http
            .post(self.url(DATASTORAGE_PATH))
            .multipart(form)
            .send()?;
        Self::decode(resp)
    }

    pub fn delete(&self, name: &str) -> Result<ServerReply, ClientError> {
        let resp = self
            .http
            .delete(self.url(DATASTORAGE_PATH))
            .query(&[("name", name)])
            .send()?;
        Self::decode(resp)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn decode(resp: reqwest::blocking::Response) -> Result<ServerReply, ClientError> {
        let status = resp.status();
        let raw = resp.bytes()?;
        let body = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&raw)?
        };
        Ok(ServerReply { status, body })
    }
}

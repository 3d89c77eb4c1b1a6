use actix_multipart::{Field, Multipart};
use actix_web::{http::StatusCode, web, HttpResponse};
use bytes::BytesMut;
use futures_util::StreamExt;
use log::{debug, info, warn};

use super::recover;
use crate::errors::{ApiError, StorageError};
use crate::kv_store::KVStore;
use crate::types::envelope::{write_json, DataDeleted, DataFound, DataStored, Response};

/// Optional cap on the bytes read from one upload. Unlimited by default.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: usize::MAX,
        }
    }
}

impl From<Option<usize>> for UploadLimits {
    fn from(max_bytes: Option<usize>) -> Self {
        max_bytes.map_or_else(Self::default, |max_bytes| Self { max_bytes })
    }
}

/// `?name=` query of GET and DELETE.
///
/// The first `name` pair wins when the parameter repeats; a missing parameter
/// reads as "".
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NameQuery {
    pub name: String,
}

impl From<Vec<(String, String)>> for NameQuery {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let name = pairs
            .into_iter()
            .find(|(key, _)| key == "name")
            .map(|(_, value)| value)
            .unwrap_or_default();
        Self { name }
    }
}

pub async fn retrieve_data(
    store: web::Data<KVStore>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, ApiError> {
    recover("retrieve_data", async move {
        let name = NameQuery::from(query.into_inner()).name;
        info!("DataStorageHandler - retrieving data with name: '{}'", name);

        let data = store.get(&name).await.map_err(|e| log_storage_miss(&name, e))?;

        info!("DataStorageHandler - found data with name: '{}'", name);
        let body = DataFound {
            name: &name,
            data: &data,
        }
        .get_response();
        Ok(write_json(StatusCode::OK, &body))
    })
    .await
}

pub async fn store_data(
    store: web::Data<KVStore>,
    limits: web::Data<UploadLimits>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    recover("store_data", async move {
        let upload = read_upload(payload, limits.max_bytes).await?;
        let (name, data) = upload.into_entry()?;
        let size = data.len();

        info!(
            "DataStorageHandler - writing {} bytes with name: '{}'",
            size, name
        );
        store.put(&name, data.freeze()).await;

        let body = DataStored { name: &name, size }.get_response();
        Ok(write_json(StatusCode::CREATED, &body))
    })
    .await
}

pub async fn delete_data(
    store: web::Data<KVStore>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, ApiError> {
    recover("delete_data", async move {
        let name = NameQuery::from(query.into_inner()).name;
        info!("DataStorageHandler - deleting data with name: '{}'", name);

        store
            .delete(&name)
            .await
            .map_err(|e| log_storage_miss(&name, e))?;

        info!("DataStorageHandler - deleted data with name: '{}'", name);
        let body = DataDeleted { name: &name }.get_response();
        Ok(write_json(StatusCode::OK, &body))
    })
    .await
}

fn log_storage_miss(name: &str, err: StorageError) -> ApiError {
    warn!("DataStorageHandler - no data with name: '{}': {}", name, err);
    ApiError::from(err)
}

/// Fields collected from one multipart upload.
#[derive(Debug, Default)]
struct Upload {
    name: String,
    file_name: Option<String>,
    data: Option<BytesMut>,
}

impl Upload {
    /// Resolves the entry name: the trimmed `name` field, else the filename
    /// of the `data` part as sent, which may itself be empty.
    fn into_entry(self) -> Result<(String, BytesMut), ApiError> {
        let data = self.data.ok_or_else(|| {
            ApiError::MalformedRequest("missing form file field 'data'".to_string())
        })?;

        if !self.name.is_empty() {
            return Ok((self.name, data));
        }
        debug!("DataStorageHandler - no name given by client, using the file name");
        Ok((self.file_name.unwrap_or_default(), data))
    }
}

async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();
    let mut received = 0usize;

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| {
            warn!("DataStorageHandler - failed to parse storage request: {}", e);
            ApiError::MalformedRequest(e.to_string())
        })?;

        let (field_name, file_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().map(str::to_string),
            ),
            None => (String::new(), None),
        };

        match field_name.as_str() {
            "name" => {
                let raw = read_field(&mut field, limit, &mut received).await?;
                upload.name = String::from_utf8_lossy(&raw).trim().to_string();
            }
            "data" => {
                upload.file_name = file_name;
                upload.data = Some(read_field(&mut field, limit, &mut received).await?);
            }
            other => debug!("DataStorageHandler - ignoring form field '{}'", other),
        }
    }

    Ok(upload)
}

/// Reads one part to the end, keeping the running total under `limit`.
async fn read_field(
    field: &mut Field,
    limit: usize,
    received: &mut usize,
) -> Result<BytesMut, ApiError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| {
            warn!("DataStorageHandler - failed to read request field: {}", e);
            ApiError::MalformedRequest(e.to_string())
        })?;
        *received = received.saturating_add(chunk.len());
        if *received > limit {
            warn!(
                "DataStorageHandler - upload rejected, over {} bytes",
                limit
            );
            return Err(ApiError::UploadTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

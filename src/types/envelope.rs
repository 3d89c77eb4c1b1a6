use actix_web::{http::StatusCode, HttpResponse};
use log::error;
use serde::{Deserialize, Serialize};

/// Streamlined non-error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Found { content: String, size: usize },
    Stored { size: usize },
}

/// Body of every 4xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientErrorMessage {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Implemented by every success outcome the datastorage handler can report.
pub trait Response {
    fn get_response(&self) -> ResponsePayload;
}

pub struct DataFound<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
}

impl Response for DataFound<'_> {
    fn get_response(&self) -> ResponsePayload {
        ResponsePayload {
            status: "success".to_string(),
            message: format!("data with name: '{}' found", self.name),
            data: Some(ResponseData::Found {
                content: String::from_utf8_lossy(self.data).into_owned(),
                size: self.data.len(),
            }),
        }
    }
}

/// Only the size is echoed back for stored data, never the content.
pub struct DataStored<'a> {
    pub name: &'a str,
    pub size: usize,
}

impl Response for DataStored<'_> {
    fn get_response(&self) -> ResponsePayload {
        ResponsePayload {
            status: "success".to_string(),
            message: format!("data written to storage with name: '{}'", self.name),
            data: Some(ResponseData::Stored { size: self.size }),
        }
    }
}

pub struct DataDeleted<'a> {
    pub name: &'a str,
}

impl Response for DataDeleted<'_> {
    fn get_response(&self) -> ResponsePayload {
        ResponsePayload {
            status: "success".to_string(),
            message: format!("data with name: '{}' deleted", self.name),
            data: None,
        }
    }
}

/// Builds a JSON response with `status`.
///
/// The status is decided before encoding. If `body` fails to serialize the
/// failure is logged and the status goes out with an empty body.
pub fn write_json<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(encoded) => HttpResponse::build(status)
            .content_type("application/json")
            .body(encoded),
        Err(e) => {
            error!("writing {} response failed: {}", status.as_u16(), e);
            HttpResponse::build(status).finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn found_envelope_carries_content_and_size() {
        let payload = DataFound {
            name: "greeting",
            data: b"hello",
        }
        .get_response();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "status": "success",
                "message": "data with name: 'greeting' found",
                "data": {"content": "hello", "size": 5}
            })
        );
    }

    #[test]
    fn deleted_envelope_has_no_data_field() {
        let payload = DataDeleted { name: "greeting" }.get_response();
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("data").is_none());
        assert_eq!(value["message"], "data with name: 'greeting' deleted");
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot encode"))
        }
    }

    #[actix_web::test]
    async fn encoding_failure_keeps_status_and_drops_body() {
        let resp = write_json(StatusCode::CREATED, &Unencodable);
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn stored_envelope_decodes_back_to_stored_variant() {
        let raw = r#"{"status":"success","message":"m","data":{"size":5}}"#;
        let payload: ResponsePayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.data, Some(ResponseData::Stored { size: 5 }));
    }
}

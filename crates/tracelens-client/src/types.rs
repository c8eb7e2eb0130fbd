//! Wire types for the release-tracking API

use crate::error::Result;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// A buffered API response: final status plus raw body.
///
/// Release and artifact calls hand this back uninterpreted so callers can
/// apply their own policy to non-success statuses.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    status: StatusCode,
    body: Bytes,
}

impl ApiResponse {
    /// Buffer a finished HTTP response
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let body = response.bytes().await?;
        Ok(Self { status, body })
    }

    /// HTTP status of the response
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Raw response body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The `message` field of a JSON body, when there is one
    pub fn message(&self) -> Option<String> {
        serde_json::from_slice::<MessageBody>(&self.body)
            .ok()
            .and_then(|body| body.message)
    }
}

/// Body shape shared by status and error responses
#[derive(Debug, Deserialize)]
pub(crate) struct MessageBody {
    pub message: Option<String>,
}

/// Answer to an artifact upload request
#[derive(Debug, Deserialize)]
pub struct ArtifactUploadResponse {
    /// Pre-signed URL the artifact bytes go to, when the API granted one
    pub signed_url: Option<String>,
    /// Object name the API assigned, echoed back in the storage notification
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateReleaseBody<'a> {
    pub version: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ArtifactRequestBody<'a> {
    pub filepath: &'a str,
}

/// Body of the post-upload object-storage notification
#[derive(Debug, Serialize)]
pub(crate) struct StorageNotification<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub bucket: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: Bytes::copy_from_slice(body.as_bytes()),
        }
    }

    #[test]
    fn test_message_from_json_body() {
        let resp = response(400, r#"{"message": "release already exists"}"#);
        assert_eq!(resp.message().as_deref(), Some("release already exists"));
        assert!(!resp.is_success());
    }

    #[test]
    fn test_message_absent_or_unreadable() {
        assert_eq!(response(200, r#"{"status": "ok"}"#).message(), None);
        assert_eq!(response(502, "<html>Bad Gateway</html>").message(), None);
        assert_eq!(response(200, "").message(), None);
    }

    #[test]
    fn test_artifact_response_tolerates_missing_fields() {
        let target: ArtifactUploadResponse = serde_json::from_str("{}").unwrap();
        assert!(target.signed_url.is_none());
        assert!(target.name.is_none());

        let target: ArtifactUploadResponse =
            serde_json::from_str(r#"{"signed_url": "https://storage/x", "name": "obj-1"}"#)
                .unwrap();
        assert_eq!(target.signed_url.as_deref(), Some("https://storage/x"));
        assert_eq!(target.name.as_deref(), Some("obj-1"));
    }

    #[test]
    fn test_storage_notification_drops_absent_name() {
        let body = StorageNotification {
            name: None,
            bucket: "artifacts",
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"bucket":"artifacts"}"#
        );

        let body = StorageNotification {
            name: Some("obj-1"),
            bucket: "artifacts",
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"name":"obj-1","bucket":"artifacts"}"#
        );
    }
}

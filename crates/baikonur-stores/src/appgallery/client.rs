//! AppGallery Connect API client
//!
//! One method per Connect endpoint. Every response is decoded into an
//! explicit schema and missing fields fail closed as
//! [`StoreError::MalformedResponse`] instead of being chased through
//! untyped JSON.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::types::{Credentials, FileExtension};

const CONNECT_API_BASE: &str = "https://connect-api.cloud.huawei.com/api";

/// Status message the Connect API uses to report a successful call
pub(crate) const SUCCESS_MESSAGE: &str = "success";

/// AppGallery Connect client
///
/// Holds only the HTTP client and base endpoint; credentials and tokens are
/// passed per call and never cached beyond the run.
pub struct AppGallery {
    http: Client,
    base_url: String,
}

/// Short-lived bearer token from the token endpoint
#[derive(Debug, Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Single-use upload destination, tied to one app and one file extension
#[derive(Debug, Clone)]
pub struct UploadTarget {
    /// Vendor-supplied absolute URL to POST the binary to
    pub upload_url: String,
    /// Single-use code carried in the upload body instead of a header
    pub auth_code: String,
}

/// Vendor-reported result of a successful binary upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Remote destination URL, registered with the app record afterwards
    pub dest_url: String,
    /// Remote size in bytes as the vendor measured it
    pub size_bytes: u64,
}

impl Default for AppGallery {
    fn default() -> Self {
        Self::new()
    }
}

impl AppGallery {
    /// Create a client against the production Connect API
    pub fn new() -> Self {
        Self::with_base_url(CONNECT_API_BASE)
    }

    /// Create a client against a custom base endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Exchange client credentials for a bearer token
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken> {
        #[derive(Serialize)]
        struct TokenRequest<'a> {
            grant_type: &'static str,
            client_id: &'a str,
            client_secret: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: Option<String>,
        }

        let url = format!("{}/oauth2/v1/token", self.base_url);
        debug!(%url, "requesting access token");

        let response = self
            .http
            .post(&url)
            .json(&TokenRequest {
                grant_type: "client_credentials",
                client_id: &credentials.client_id,
                client_secret: &credentials.client_secret,
            })
            .send()
            .await
            .map_err(|e| StoreError::AuthenticationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::AuthenticationFailed(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| malformed("oauth2/v1/token", e))?;

        match token.access_token {
            Some(t) if !t.is_empty() => Ok(AccessToken(t)),
            _ => Err(StoreError::MalformedResponse {
                endpoint: "oauth2/v1/token",
                detail: "missing access_token".to_string(),
            }),
        }
    }

    /// Obtain a single-use upload URL for the given app and file extension
    pub async fn upload_target(
        &self,
        app_id: &str,
        extension: FileExtension,
        client_id: &str,
        token: &AccessToken,
    ) -> Result<UploadTarget> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct UploadUrlResponse {
            upload_url: Option<String>,
            auth_code: Option<String>,
        }

        let url = format!("{}/publish/v2/upload-url", self.base_url);
        debug!(%url, app_id, %extension, "requesting upload url");

        let response = self
            .http
            .get(&url)
            .query(&[("appId", app_id), ("suffix", extension.as_str())])
            .header("client_id", client_id)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| StoreError::UploadTargetFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::UploadTargetFailed(format!(
                "upload-url endpoint returned {}: {}",
                status, body
            )));
        }

        let target: UploadUrlResponse = response
            .json()
            .await
            .map_err(|e| malformed("publish/v2/upload-url", e))?;

        match (target.upload_url, target.auth_code) {
            (Some(upload_url), Some(auth_code)) => Ok(UploadTarget {
                upload_url,
                auth_code,
            }),
            _ => Err(StoreError::MalformedResponse {
                endpoint: "publish/v2/upload-url",
                detail: "missing uploadUrl or authCode".to_string(),
            }),
        }
    }

    /// Upload the artifact to the vendor-supplied URL
    ///
    /// The file is opened once and streamed as the multipart `file` part.
    /// An HTTP 2xx whose payload reports `ifSuccess == 0` is an
    /// [`StoreError::UploadRejected`], not a transport failure.
    pub async fn upload_file(&self, target: &UploadTarget, path: &Path) -> Result<UploadedFile> {
        #[derive(Deserialize)]
        struct UploadResponse {
            result: Option<UploadResult>,
        }

        #[derive(Deserialize)]
        struct UploadResult {
            #[serde(rename = "UploadFileRsp")]
            upload_file_rsp: Option<UploadFileRsp>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct UploadFileRsp {
            if_success: Option<i64>,
            file_info_list: Option<Vec<UploadedFileInfo>>,
        }

        #[derive(Deserialize)]
        struct UploadedFileInfo {
            // Vendor response uses this misspelled key; the request side
            // of app-file-info spells it fileDestUrl.
            #[serde(rename = "fileDestUlr")]
            file_dest_url: Option<String>,
            size: Option<u64>,
        }

        debug!(url = %target.upload_url, path = %path.display(), "uploading artifact");

        let file = tokio::fs::File::open(path).await?;
        let length = file.metadata().await?.len();
        let stream = tokio_util::io::ReaderStream::new(file);

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app")
            .to_string();

        let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), length)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| StoreError::UploadFailed(format!("failed to build multipart: {}", e)))?;

        let form = Form::new()
            .text("authCode", target.auth_code.clone())
            .text("fileCount", "1")
            .part("file", part);

        let response = self
            .http
            .post(&target.upload_url)
            .header("accept", "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::UploadFailed(format!(
                "upload endpoint returned {}: {}",
                status, body
            )));
        }

        let payload: UploadResponse = response
            .json()
            .await
            .map_err(|e| malformed("file upload", e))?;

        let rsp = payload
            .result
            .and_then(|r| r.upload_file_rsp)
            .ok_or(StoreError::MalformedResponse {
                endpoint: "file upload",
                detail: "missing result.UploadFileRsp".to_string(),
            })?;

        match rsp.if_success {
            Some(flag) if flag != 0 => {}
            Some(flag) => return Err(StoreError::UploadRejected(flag)),
            None => {
                return Err(StoreError::MalformedResponse {
                    endpoint: "file upload",
                    detail: "missing ifSuccess".to_string(),
                })
            }
        }

        let info = rsp
            .file_info_list
            .and_then(|mut l| if l.is_empty() { None } else { Some(l.remove(0)) })
            .ok_or(StoreError::MalformedResponse {
                endpoint: "file upload",
                detail: "empty fileInfoList".to_string(),
            })?;

        match (info.file_dest_url, info.size) {
            (Some(dest_url), Some(size_bytes)) => Ok(UploadedFile {
                dest_url,
                size_bytes,
            }),
            _ => Err(StoreError::MalformedResponse {
                endpoint: "file upload",
                detail: "fileInfoList entry missing fileDestUlr or size".to_string(),
            }),
        }
    }

    /// Register the uploaded file against the app record
    ///
    /// A `ret.msg` other than the success sentinel is a
    /// [`StoreError::RegistrationRejected`].
    pub async fn update_file_info(
        &self,
        app_id: &str,
        client_id: &str,
        token: &AccessToken,
        file_name: &str,
        uploaded: &UploadedFile,
    ) -> Result<()> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct FileInfoRequest<'a> {
            file_type: &'static str,
            files: [FileInfoEntry<'a>; 1],
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct FileInfoEntry<'a> {
            file_name: &'a str,
            file_dest_url: &'a str,
            size: u64,
        }

        let url = format!("{}/publish/v2/app-file-info", self.base_url);
        debug!(%url, app_id, file_name, "registering file info");

        let response = self
            .http
            .put(&url)
            .query(&[("appId", app_id)])
            .header("client_id", client_id)
            .bearer_auth(token.as_str())
            .json(&FileInfoRequest {
                file_type: "5",
                files: [FileInfoEntry {
                    file_name,
                    file_dest_url: &uploaded.dest_url,
                    size: uploaded.size_bytes,
                }],
            })
            .send()
            .await
            .map_err(|e| StoreError::RegistrationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::RegistrationFailed(format!(
                "app-file-info endpoint returned {}: {}",
                status, body
            )));
        }

        let msg = ret_message(response, "publish/v2/app-file-info").await?;
        if msg != SUCCESS_MESSAGE {
            return Err(StoreError::RegistrationRejected(msg));
        }

        Ok(())
    }

    /// Submit the app for review
    ///
    /// Returns the vendor's status message; the publish workflow decides
    /// whether a non-success message is transient or fatal.
    pub async fn submit_app(
        &self,
        app_id: &str,
        client_id: &str,
        token: &AccessToken,
    ) -> Result<String> {
        let url = format!("{}/publish/v2/app-submit", self.base_url);
        debug!(%url, app_id, "submitting app for review");

        let response = self
            .http
            .post(&url)
            .query(&[("appId", app_id)])
            .header("client_id", client_id)
            .header("Content-Type", "application/json")
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| StoreError::Other(format!("submission request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Other(format!(
                "app-submit endpoint returned {}: {}",
                status, body
            )));
        }

        ret_message(response, "publish/v2/app-submit").await
    }
}

/// Decodes the `{ret: {code, msg}}` envelope shared by the publish endpoints
async fn ret_message(response: reqwest::Response, endpoint: &'static str) -> Result<String> {
    #[derive(Deserialize)]
    struct RetEnvelope {
        ret: Option<Ret>,
    }

    #[derive(Deserialize)]
    struct Ret {
        #[allow(dead_code)]
        code: Option<i64>,
        msg: Option<String>,
    }

    let envelope: RetEnvelope = response.json().await.map_err(|e| malformed(endpoint, e))?;

    envelope
        .ret
        .and_then(|r| r.msg)
        .ok_or(StoreError::MalformedResponse {
            endpoint,
            detail: "missing ret.msg".to_string(),
        })
}

fn malformed(endpoint: &'static str, err: reqwest::Error) -> StoreError {
    StoreError::MalformedResponse {
        endpoint,
        detail: err.to_string(),
    }
}

//! End-to-end publish workflow tests against a mocked Connect API
//!
//! Covers the happy path plus every short-circuit: auth failure,
//! payload-level upload rejection, registration rejection, and the
//! transient-compile submission case.

use std::io::Write;

use tempfile::NamedTempFile;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use baikonur_stores::appgallery::{publish, AppGallery};
use baikonur_stores::{
    Credentials, FileExtension, PublishConfig, StoreError, SubmissionOutcome,
    APPGALLERY_CONSOLE_URL, TRANSIENT_COMPILE_MESSAGE,
};

fn test_config(artifact: &NamedTempFile, submit: bool) -> PublishConfig {
    PublishConfig {
        credentials: Credentials {
            client_id: "client-001".to_string(),
            client_secret: "secret-001".to_string(),
        },
        app_id: "100".to_string(),
        file_extension: FileExtension::Apk,
        file_path: artifact.path().to_path_buf(),
        file_name: "release".to_string(),
        submit,
    }
}

fn test_artifact() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp artifact");
    file.write_all(b"binary-bytes").expect("write artifact");
    file
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "token-001",
            "expires_in": 172800
        })))
        .mount(server)
        .await;
}

async fn mount_upload_url(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/publish/v2/upload-url"))
        .and(query_param("appId", "100"))
        .and(query_param("suffix", "apk"))
        .and(header("client_id", "client-001"))
        .and(header("Authorization", "Bearer token-001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uploadUrl": format!("{}/upload/binary", server.uri()),
            "authCode": "auth-code-001"
        })))
        .mount(server)
        .await;
}

async fn mount_upload(server: &MockServer, if_success: i64) {
    Mock::given(method("POST"))
        .and(path("/upload/binary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": {
                "UploadFileRsp": {
                    "ifSuccess": if_success,
                    "fileInfoList": [{
                        "fileDestUlr": "https://cdn.example.com/release.apk",
                        "size": 12
                    }]
                }
            }
        })))
        .mount(server)
        .await;
}

async fn mount_file_info(server: &MockServer, msg: &str) {
    Mock::given(method("PUT"))
        .and(path("/publish/v2/app-file-info"))
        .and(query_param("appId", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ret": { "code": 0, "msg": msg }
        })))
        .mount(server)
        .await;
}

async fn mount_submit(server: &MockServer, msg: &str) {
    Mock::given(method("POST"))
        .and(path("/publish/v2/app-submit"))
        .and(query_param("appId", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ret": { "code": 0, "msg": msg }
        })))
        .mount(server)
        .await;
}

/// Mounts a mock asserting the given endpoint is never reached.
async fn mount_never(server: &MockServer, http_method: &str, endpoint: &str) {
    Mock::given(method(http_method))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn publish_without_submit_succeeds() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_upload_url(&server).await;
    mount_upload(&server, 1).await;
    mount_file_info(&server, "success").await;
    mount_never(&server, "POST", "/publish/v2/app-submit").await;

    let artifact = test_artifact();
    let client = AppGallery::with_base_url(server.uri());

    let publication = publish(&client, &test_config(&artifact, false))
        .await
        .expect("publish failed");

    assert_eq!(publication.console_url, APPGALLERY_CONSOLE_URL);
    assert_eq!(publication.submission, SubmissionOutcome::NotRequested);
    assert_eq!(publication.file.file_name, "release.apk");
    assert_eq!(publication.file.size_bytes, 12);
    assert_eq!(
        publication.file.dest_url,
        "https://cdn.example.com/release.apk"
    );
}

#[tokio::test]
async fn publish_with_submit_succeeds() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_upload_url(&server).await;
    mount_upload(&server, 1).await;
    mount_file_info(&server, "success").await;
    mount_submit(&server, "success").await;

    let artifact = test_artifact();
    let client = AppGallery::with_base_url(server.uri());

    let publication = publish(&client, &test_config(&artifact, true))
        .await
        .expect("publish failed");

    assert_eq!(publication.submission, SubmissionOutcome::Submitted);
    assert_eq!(publication.console_url, APPGALLERY_CONSOLE_URL);
}

#[tokio::test]
async fn auth_failure_short_circuits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v1/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client"
        })))
        .mount(&server)
        .await;
    mount_never(&server, "GET", "/publish/v2/upload-url").await;
    mount_never(&server, "POST", "/upload/binary").await;
    mount_never(&server, "PUT", "/publish/v2/app-file-info").await;

    let artifact = test_artifact();
    let client = AppGallery::with_base_url(server.uri());

    let err = publish(&client, &test_config(&artifact, true))
        .await
        .expect_err("expected auth failure");

    assert!(matches!(err, StoreError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn missing_access_token_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "expires_in": 172800
        })))
        .mount(&server)
        .await;
    mount_never(&server, "GET", "/publish/v2/upload-url").await;

    let artifact = test_artifact();
    let client = AppGallery::with_base_url(server.uri());

    let err = publish(&client, &test_config(&artifact, false))
        .await
        .expect_err("expected parse failure");

    assert!(matches!(err, StoreError::MalformedResponse { .. }));
}

#[tokio::test]
async fn upload_rejected_despite_http_200() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_upload_url(&server).await;
    mount_upload(&server, 0).await;
    mount_never(&server, "PUT", "/publish/v2/app-file-info").await;
    mount_never(&server, "POST", "/publish/v2/app-submit").await;

    let artifact = test_artifact();
    let client = AppGallery::with_base_url(server.uri());

    let err = publish(&client, &test_config(&artifact, true))
        .await
        .expect_err("expected upload rejection");

    assert!(matches!(err, StoreError::UploadRejected(0)));
}

#[tokio::test]
async fn registration_rejection_blocks_submission() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_upload_url(&server).await;
    mount_upload(&server, 1).await;
    mount_file_info(&server, "app not in updatable state").await;
    mount_never(&server, "POST", "/publish/v2/app-submit").await;

    let artifact = test_artifact();
    let client = AppGallery::with_base_url(server.uri());

    let err = publish(&client, &test_config(&artifact, true))
        .await
        .expect_err("expected registration rejection");

    match err {
        StoreError::RegistrationRejected(msg) => {
            assert_eq!(msg, "app not in updatable state");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn transient_compile_message_stays_success() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_upload_url(&server).await;
    mount_upload(&server, 1).await;
    mount_file_info(&server, "success").await;
    mount_submit(&server, TRANSIENT_COMPILE_MESSAGE).await;

    let artifact = test_artifact();
    let client = AppGallery::with_base_url(server.uri());

    let publication = publish(&client, &test_config(&artifact, true))
        .await
        .expect("transient compile message should not fail the run");

    assert_eq!(publication.submission, SubmissionOutcome::Pending);
    assert_eq!(publication.console_url, APPGALLERY_CONSOLE_URL);
}

#[tokio::test]
async fn other_submission_message_is_fatal() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_upload_url(&server).await;
    mount_upload(&server, 1).await;
    mount_file_info(&server, "success").await;
    mount_submit(&server, "app has unresolved review comments").await;

    let artifact = test_artifact();
    let client = AppGallery::with_base_url(server.uri());

    let err = publish(&client, &test_config(&artifact, true))
        .await
        .expect_err("expected submission rejection");

    match err {
        StoreError::SubmissionRejected(msg) => {
            assert_eq!(msg, "app has unresolved review comments");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_artifact_fails_before_any_call() {
    let server = MockServer::start().await;
    mount_never(&server, "POST", "/oauth2/v1/token").await;

    let artifact = test_artifact();
    let mut config = test_config(&artifact, false);
    config.file_path = std::path::PathBuf::from("/nonexistent/release.apk");

    let client = AppGallery::with_base_url(server.uri());
    let err = publish(&client, &config)
        .await
        .expect_err("expected missing artifact error");

    assert!(matches!(err, StoreError::InvalidArtifact(_)));
}

//! One-shot publish workflow
//!
//! Chains the Connect API calls strictly forward; the first failure ends
//! the run. No retries, and an artifact that uploaded but failed to
//! register is left on the vendor side.

use tracing::{info, warn};

use crate::appgallery::client::{AppGallery, SUCCESS_MESSAGE};
use crate::error::{Result, StoreError};
use crate::types::{
    FileDescriptor, PublishConfig, Publication, SubmissionOutcome, APPGALLERY_CONSOLE_URL,
    TRANSIENT_COMPILE_MESSAGE,
};

/// Publish one artifact to AppGallery Connect
///
/// Authenticates, obtains an upload target, streams the binary, registers
/// the uploaded file, and (when `config.submit` is set) triggers review
/// submission. A submission message carrying the vendor's transient-compile
/// notice leaves the outcome successful with [`SubmissionOutcome::Pending`].
pub async fn publish(client: &AppGallery, config: &PublishConfig) -> Result<Publication> {
    if !config.file_path.exists() {
        return Err(StoreError::InvalidArtifact(format!(
            "file not found: {}",
            config.file_path.display()
        )));
    }

    let client_id = &config.credentials.client_id;

    info!(app_id = %config.app_id, "authenticating with AppGallery Connect");
    let token = client.authenticate(&config.credentials).await?;

    info!(extension = %config.file_extension, "requesting upload target");
    let target = client
        .upload_target(&config.app_id, config.file_extension, client_id, &token)
        .await?;

    info!(path = %config.file_path.display(), "uploading artifact");
    let uploaded = client.upload_file(&target, &config.file_path).await?;

    let file = FileDescriptor {
        file_name: config.qualified_file_name(),
        file_extension: config.file_extension,
        file_path: config.file_path.clone(),
        size_bytes: uploaded.size_bytes,
        dest_url: uploaded.dest_url.clone(),
    };

    info!(file_name = %file.file_name, size = file.size_bytes, "registering file info");
    client
        .update_file_info(&config.app_id, client_id, &token, &file.file_name, &uploaded)
        .await?;

    let submission = if config.submit {
        info!(app_id = %config.app_id, "submitting for review");
        let msg = client
            .submit_app(&config.app_id, client_id, &token)
            .await?;

        if msg == SUCCESS_MESSAGE {
            SubmissionOutcome::Submitted
        } else if msg.contains(TRANSIENT_COMPILE_MESSAGE) {
            warn!(%msg, "package still compiling, submission left pending");
            SubmissionOutcome::Pending
        } else {
            return Err(StoreError::SubmissionRejected(msg));
        }
    } else {
        SubmissionOutcome::NotRequested
    };

    Ok(Publication {
        file,
        console_url: APPGALLERY_CONSOLE_URL,
        submission,
    })
}

//! Common types for the AppGallery adapter

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// AppGallery developer console, shown to the user after a successful publish
pub const APPGALLERY_CONSOLE_URL: &str =
    "https://developer.huawei.com/consumer/en/appgallery";

/// Vendor status message meaning the submission is still being processed,
/// not failed. Matched as a substring of `ret.msg`.
pub const TRANSIENT_COMPILE_MESSAGE: &str =
    "The package is being compiled, please try again in 3-5 minutes";

/// File extensions AppGallery Connect accepts for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileExtension {
    Apk,
    Rpk,
    Pdf,
    Jpg,
    Jpeg,
    Png,
    Bmp,
    Mp4,
    Mov,
    Aab,
}

impl FileExtension {
    /// Extension string as it appears in file names and the `suffix` query
    pub fn as_str(&self) -> &'static str {
        match self {
            FileExtension::Apk => "apk",
            FileExtension::Rpk => "rpk",
            FileExtension::Pdf => "pdf",
            FileExtension::Jpg => "jpg",
            FileExtension::Jpeg => "jpeg",
            FileExtension::Png => "png",
            FileExtension::Bmp => "bmp",
            FileExtension::Mp4 => "mp4",
            FileExtension::Mov => "mov",
            FileExtension::Aab => "aab",
        }
    }
}

impl FromStr for FileExtension {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apk" => Ok(FileExtension::Apk),
            "rpk" => Ok(FileExtension::Rpk),
            "pdf" => Ok(FileExtension::Pdf),
            "jpg" => Ok(FileExtension::Jpg),
            "jpeg" => Ok(FileExtension::Jpeg),
            "png" => Ok(FileExtension::Png),
            "bmp" => Ok(FileExtension::Bmp),
            "mp4" => Ok(FileExtension::Mp4),
            "mov" => Ok(FileExtension::Mov),
            "aab" => Ok(FileExtension::Aab),
            other => Err(StoreError::ConfigurationError(format!(
                "Unsupported file extension '{}'. Expected one of apk, rpk, pdf, jpg, jpeg, png, bmp, mp4, mov, aab.",
                other
            ))),
        }
    }
}

impl std::fmt::Display for FileExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API credentials for AppGallery Connect
///
/// Supplied at the process boundary, used for one run, never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret (the "client key" in the developer console)
    pub client_secret: String,
}

/// Everything one publish run needs, assembled once at the boundary
///
/// The orchestration never reads environment state; whatever the host
/// passed in (flags, env, action inputs) is resolved into this struct first.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub credentials: Credentials,
    /// AppGallery app ID
    pub app_id: String,
    /// Artifact extension, drives the `suffix` query on the upload-url call
    pub file_extension: FileExtension,
    /// Local path of the artifact to upload
    pub file_path: PathBuf,
    /// Base file name registered with the app record (without extension)
    pub file_name: String,
    /// Trigger review submission after a successful registration
    pub submit: bool,
}

impl PublishConfig {
    /// Registered file name, `{file_name}.{extension}`
    pub fn qualified_file_name(&self) -> String {
        format!("{}.{}", self.file_name, self.file_extension)
    }
}

/// Parses the host's submit flag into a real boolean.
///
/// The GitHub Actions contract passes inputs as strings; "true", "1" and
/// "yes" (any case) opt in, everything else opts out. A host that already
/// has a native bool should pass it straight into [`PublishConfig`].
pub fn parse_submit_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Artifact metadata accumulated across the publish sequence
///
/// `size_bytes` and `dest_url` come from the vendor's upload response and
/// are only present after a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct FileDescriptor {
    pub file_name: String,
    pub file_extension: FileExtension,
    pub file_path: PathBuf,
    pub size_bytes: u64,
    pub dest_url: String,
}

/// What happened to the review submission step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// Caller did not opt in to submission
    NotRequested,
    /// Vendor accepted the submission
    Submitted,
    /// Vendor is still compiling the package; submission should be retried
    /// later from the console. Treated as overall success.
    Pending,
}

/// Result of a successful publish run
#[derive(Debug, Clone, Serialize)]
pub struct Publication {
    /// Uploaded artifact with vendor-reported size and destination URL
    pub file: FileDescriptor,
    /// Fixed developer console URL
    pub console_url: &'static str,
    pub submission: SubmissionOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_parsing() {
        assert_eq!("apk".parse::<FileExtension>().unwrap(), FileExtension::Apk);
        assert_eq!("AAB".parse::<FileExtension>().unwrap(), FileExtension::Aab);
        assert_eq!("jpeg".parse::<FileExtension>().unwrap(), FileExtension::Jpeg);
        assert!("exe".parse::<FileExtension>().is_err());
        assert!("".parse::<FileExtension>().is_err());
    }

    #[test]
    fn test_submit_flag_parsing() {
        assert!(parse_submit_flag("true"));
        assert!(parse_submit_flag("True"));
        assert!(parse_submit_flag(" 1 "));
        assert!(parse_submit_flag("yes"));
        assert!(!parse_submit_flag("false"));
        assert!(!parse_submit_flag(""));
        assert!(!parse_submit_flag("no"));
        assert!(!parse_submit_flag("submit"));
    }

    #[test]
    fn test_qualified_file_name() {
        let config = PublishConfig {
            credentials: Credentials {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            },
            app_id: "100".to_string(),
            file_extension: FileExtension::Apk,
            file_path: PathBuf::from("/tmp/app.apk"),
            file_name: "release-1.2.3".to_string(),
            submit: false,
        };

        assert_eq!(config.qualified_file_name(), "release-1.2.3.apk");
    }
}

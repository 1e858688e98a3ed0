//! AppGallery Connect upload adapter for Baikonur
//!
//! Publishes a build artifact to Huawei AppGallery Connect from CI:
//! authenticate, obtain an upload URL, stream the binary, register the
//! file metadata, and optionally submit the release for review.
//!
//! ## Usage
//!
//! ```ignore
//! use baikonur_stores::appgallery::{publish, AppGallery};
//!
//! let client = AppGallery::new();
//! let publication = publish(&client, &config).await?;
//! println!("{}", publication.console_url);
//! ```

pub mod appgallery;
pub mod error;
pub mod types;

pub use error::StoreError;
pub use types::*;

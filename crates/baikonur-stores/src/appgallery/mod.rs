//! Huawei AppGallery Connect integration
//!
//! Split in two layers: [`client`] wraps the individual Connect API calls
//! with typed request/response schemas, and [`publish`] chains them into
//! the one-shot publish workflow CI invokes.

pub mod client;
pub mod publish;

pub use client::{AccessToken, AppGallery, UploadTarget, UploadedFile};
pub use publish::publish;

//! Client for the external image hosting / transformation service.
//!
//! Handlers only see the [`ImageHost`] trait; [`CloudinaryHost`] is the
//! production implementation.

pub mod cloudinary;
pub mod error;
pub mod provider;

pub use cloudinary::{CloudinaryConfig, CloudinaryHost};
pub use error::CloudError;
pub use provider::{ImageHost, UploadOptions, UploadedAsset};

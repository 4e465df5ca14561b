//! The upload pipeline.

pub mod uploader;

pub use uploader::Uploader;

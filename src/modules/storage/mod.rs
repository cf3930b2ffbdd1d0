//! Storage module for artifact file content
//!
//! Provides a MinIO/S3-compatible client used by the file upload and
//! versioned download paths.

mod object_store;

pub use object_store::ObjectStore;

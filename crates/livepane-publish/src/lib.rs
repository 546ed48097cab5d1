//! Publish pipeline for livepane previews.
//!
//! Renders every snippet in a directory into a standalone document, stores the
//! documents through an [`ObjectStorage`] backend, and writes a manifest and an
//! index page linking them.

pub mod assets;
pub mod publisher;
pub mod storage;
pub mod templates;

pub use publisher::{PublishConfig, PublishError, PublishResult, PublishedPreview, Publisher};
pub use storage::{FsStorage, ObjectStorage, StorageError};

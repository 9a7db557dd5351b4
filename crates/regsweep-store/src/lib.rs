//! Registry metadata store for regsweep.
//!
//! The collector never touches the filesystem directly. It reads tag
//! records and image ancestry through [`TagSource`] and removes images
//! through [`ImageSink`]. This crate defines those seams and the backends
//! that implement them.
//!
//! # Backends
//!
//! - [`FsStore`] — the docker-registry v1 on-disk layout
//!   (`repositories/` + `images/`)
//! - [`InMemoryStore`] — `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Backends yield raw records; parsing and merging belong to the loader.
//! 2. Deleting an absent image is success, never an error.
//! 3. Image ids are validated before they are used as path components.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod record;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsStore;
pub use memory::InMemoryStore;
pub use record::{RawTagField, RawTagRecord};
pub use traits::{ImageSink, TagSource};

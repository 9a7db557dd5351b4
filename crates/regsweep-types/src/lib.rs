//! Foundation types for regsweep.
//!
//! This crate provides the identifier and timestamp types shared by the
//! store backends and the collector. Every other regsweep crate depends on
//! `regsweep-types`.
//!
//! # Key Types
//!
//! - [`ImageId`] — Opaque content-addressed image identifier
//! - [`TagKey`] — A tag name qualified by its repository
//! - [`UpdateTime`] — Whole-second UNIX timestamp of a tag's last update

pub mod error;
pub mod image;
pub mod tag;
pub mod temporal;

pub use error::TypeError;
pub use image::ImageId;
pub use tag::TagKey;
pub use temporal::UpdateTime;

//! Arena document tree and page runtime for oriel.
//!
//! This crate provides the substrate the preview pipeline runs on: an
//! element tree with single-parent move semantics, an HTML fragment parser
//! and serializer, viewport geometry, and a single-threaded page runtime
//! with visibility observation and deferred one-shot tasks.

pub mod document;
pub mod geometry;
pub mod parse;
pub mod runtime;
pub mod serialize;

pub use document::{Document, DomError, NodeId};
pub use geometry::Rect;
pub use parse::{parse_fragment, ParseError};
pub use runtime::{ObserverId, Page, VisibilityEntry};
pub use serialize::{serialize, serialize_children};

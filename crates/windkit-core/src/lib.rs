#![forbid(unsafe_code)]

//! Core primitives for windkit.
//!
//! This crate provides:
//! - [`geometry`]: viewport-space rectangles and sizes in CSS pixels
//! - [`event`]: keyboard events as delivered to component listeners
//! - [`dom`]: an in-memory element tree with focus and listener state
//!
//! The document model stands in for the browser DOM so that overlay
//! utilities can be driven (and tested) without a rendering environment.

pub mod dom;
pub mod event;
pub mod geometry;

pub use dom::{Document, DocumentId, DomError, KeyboardEvent, ListenerId, NodeId};
pub use event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use geometry::{Rect, Size};

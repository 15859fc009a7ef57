//! The searchable newsletter archive.
//!
//! An [`ArchiveView`] fetches the archive index once, sorts it newest first
//! and renders it into a [`Document`] using one of two [`DisplayMode`]s.

mod count;
mod debounce;
mod document;
mod fetch;
mod grouping;
mod record;
mod search;
mod strategy;
mod view;

pub use count::*;
pub use debounce::*;
pub use document::*;
pub use fetch::*;
pub use grouping::*;
pub use record::*;
pub use search::*;
pub use strategy::*;
pub use view::*;

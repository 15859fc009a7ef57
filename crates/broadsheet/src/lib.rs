//! Build-time page templating and a searchable archive for static
//! newsletter sites.
//!
//! [`renderer::render_page`] fills an HTML template with JSON data at build
//! time. [`archive::ArchiveView`] loads the published archive index and
//! renders it as a searchable list or a year and month outline.

pub mod archive;
pub mod cli;
pub mod date;
pub mod html;
pub mod renderer;
pub mod telemetry;
pub mod template;

//! Command-line arguments for the `render-template` and `archive` binaries.

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::archive::DisplayMode;
use crate::renderer::{
    RenderPaths, DEFAULT_DATA_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_TEMPLATE_PATH,
};

/// Fill an HTML template with JSON data.
#[derive(Parser, Debug)]
#[command(name = "render-template")]
#[command(version, about, long_about = None)]
pub struct RenderTemplateArgs {
    /// The template to render
    #[arg(long, env = "TEMPLATE_PATH", default_value = DEFAULT_TEMPLATE_PATH)]
    pub template: PathBuf,

    /// The JSON data to render the template with
    #[arg(long, env = "DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Where to write the rendered HTML
    #[arg(long, env = "OUTPUT_PATH", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,
}

impl RenderTemplateArgs {
    pub fn paths(&self) -> RenderPaths {
        RenderPaths {
            template: self.template.clone(),
            data: self.data.clone(),
            output: self.output.clone(),
        }
    }
}

/// Load the newsletter archive and print the rendered regions.
#[derive(Parser, Debug)]
#[command(name = "archive")]
#[command(version, about, long_about = None)]
pub struct ArchiveArgs {
    /// An `http://` base URL or the path to a built site
    #[arg(long, env = "ARCHIVE_SOURCE", default_value = ".", value_parser = parse_archive_source)]
    pub source: ArchiveSource,

    #[arg(long, value_enum, default_value_t = DisplayMode::Flat)]
    pub mode: DisplayMode,

    /// Filter the archive after it loads
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSource {
    Http(Url),
    Directory(PathBuf),
}

/// Interprets `--source`: an `http` URL is fetched over the network, any
/// other URL is rejected, and everything else is a directory.
fn parse_archive_source(source: &str) -> Result<ArchiveSource, String> {
    match Url::parse(source) {
        Ok(url) if url.scheme() == "http" => Ok(ArchiveSource::Http(url)),
        // Single-letter schemes are Windows drive letters.
        Ok(url) if url.scheme().len() > 1 => Err(format!(
            "unsupported URL scheme `{}`, expected an http:// URL or a directory",
            url.scheme()
        )),
        _ => Ok(ArchiveSource::Directory(PathBuf::from(source))),
    }
}

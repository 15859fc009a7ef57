//! Fills a page template with JSON data and writes the resulting HTML.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::template::{Template, TemplateSyntaxError};

pub const DEFAULT_TEMPLATE_PATH: &str = "template.html";
pub const DEFAULT_DATA_PATH: &str = "data.json";
pub const DEFAULT_OUTPUT_PATH: &str = "output.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPaths {
    pub template: PathBuf,
    pub data: PathBuf,
    pub output: PathBuf,
}

impl Default for RenderPaths {
    fn default() -> Self {
        Self {
            template: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            data: PathBuf::from(DEFAULT_DATA_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl RenderPaths {
    /// Resolves every path against `root`, leaving absolute paths untouched.
    pub fn relative_to(self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();

        Self {
            template: root.join(self.template),
            data: root.join(self.data),
            output: root.join(self.output),
        }
    }
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to read template {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid template {path:?}: {source}")]
    TemplateSyntax {
        path: PathBuf,
        #[source]
        source: TemplateSyntaxError,
    },

    #[error("failed to load data {path:?}: {source}")]
    DataParse {
        path: PathBuf,
        #[source]
        source: DataError,
    },

    #[error("failed to write output {path:?}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Loads the template and data named by `paths`, renders them, and writes
/// the HTML to the output path, replacing any existing file.
pub fn render_page(paths: &RenderPaths) -> Result<(), RenderError> {
    let source = fs::read_to_string(&paths.template).map_err(|source| RenderError::FileRead {
        path: paths.template.clone(),
        source,
    })?;
    info!(path = ?paths.template, "template loaded");

    let template = Template::compile(&source).map_err(|source| RenderError::TemplateSyntax {
        path: paths.template.clone(),
        source,
    })?;

    let data = load_data(&paths.data).map_err(|source| RenderError::DataParse {
        path: paths.data.clone(),
        source,
    })?;
    info!(path = ?paths.data, "data loaded");

    let html = template.render(&data);

    fs::write(&paths.output, html).map_err(|source| RenderError::FileWrite {
        path: paths.output.clone(),
        source,
    })?;
    info!(path = ?paths.output, "output written");

    Ok(())
}

fn load_data(path: &Path) -> Result<Value, DataError> {
    let contents = fs::read_to_string(path)?;

    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_paths() {
        assert_eq!(
            RenderPaths::default(),
            RenderPaths {
                template: PathBuf::from("template.html"),
                data: PathBuf::from("data.json"),
                output: PathBuf::from("output.html"),
            }
        );
    }

    #[test]
    fn test_relative_to() {
        let paths = RenderPaths {
            template: PathBuf::from("/abs/template.html"),
            ..Default::default()
        }
        .relative_to("site");

        assert_eq!(paths.template, PathBuf::from("/abs/template.html"));
        assert_eq!(paths.data, PathBuf::from("site/data.json"));
        assert_eq!(paths.output, PathBuf::from("site/output.html"));
    }
}

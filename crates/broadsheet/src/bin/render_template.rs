use std::process::ExitCode;

use anyhow::Context;
use broadsheet::cli::RenderTemplateArgs;
use broadsheet::renderer::render_page;
use broadsheet::telemetry::{get_subscriber, init_subscriber, DEFAULT_ENV_FILTER};
use clap::Parser;
use tracing::error;

fn main() -> anyhow::Result<ExitCode> {
    init_subscriber(get_subscriber(DEFAULT_ENV_FILTER, std::io::stderr))
        .context("failed to install tracing subscriber")?;

    let args = RenderTemplateArgs::parse();

    if let Err(err) = render_page(&args.paths()) {
        error!("{err}");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

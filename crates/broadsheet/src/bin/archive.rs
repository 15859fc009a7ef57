use anyhow::Context;
use broadsheet::archive::{
    ArchiveState, ArchiveView, DirectoryFetcher, DisplayMode, Fetch, HttpFetcher, MemoryDocument,
    COUNT_ID, SEARCH_INPUT_ID,
};
use broadsheet::cli::{ArchiveArgs, ArchiveSource};
use broadsheet::telemetry::{get_subscriber, init_subscriber, DEFAULT_ENV_FILTER};
use clap::Parser;
use tracing::warn;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_subscriber(get_subscriber(DEFAULT_ENV_FILTER, std::io::stderr))
        .context("failed to install tracing subscriber")?;

    let args = ArchiveArgs::parse();

    match &args.source {
        ArchiveSource::Http(base_url) => run(&args, &HttpFetcher::new(base_url.clone())).await,
        ArchiveSource::Directory(root) => run(&args, &DirectoryFetcher::new(root)).await,
    }

    Ok(())
}

async fn run(args: &ArchiveArgs, fetcher: &impl Fetch) {
    let mut document = page_for(args.mode);
    let mut view = ArchiveView::for_document(&document);

    view.load(fetcher, &mut document).await;
    if view.state() == ArchiveState::Failed {
        warn!("archive failed to load; printing the error state");
    }

    if let Some(query) = &args.query {
        view.search(query, &mut document);
    }

    for (id, element) in document.elements() {
        if id == SEARCH_INPUT_ID {
            continue;
        }

        println!("<!-- #{id} -->");
        println!("{}", element.content);
    }
}

/// A page with the containers `mode` renders into.
fn page_for(mode: DisplayMode) -> MemoryDocument {
    let mut ids = mode.element_ids().to_vec();
    ids.push(COUNT_ID);
    if mode == DisplayMode::Flat {
        ids.push(SEARCH_INPUT_ID);
    }

    MemoryDocument::with_elements(ids)
}

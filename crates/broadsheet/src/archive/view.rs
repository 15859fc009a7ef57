use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

use crate::archive::debounce::{Debounce, SEARCH_DEBOUNCE};
use crate::archive::document::{Document, COUNT_ID, SEARCH_INPUT_ID};
use crate::archive::fetch::{fetch_newsletters, Fetch};
use crate::archive::record::sort_by_date_desc;
use crate::archive::search::filter_records;
use crate::archive::strategy::{DisplayMode, RenderStrategy};
use crate::archive::{count_label, NewsletterRecord};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArchiveState {
    Loading,
    Ready,
    /// The index could not be loaded. Only a page reload recovers.
    Failed,
}

/// The archive for one page view.
///
/// Holds the full, date-sorted record set and the subset currently
/// displayed. Neither is mutated in place; searches replace the displayed
/// set wholesale.
pub struct ArchiveView {
    state: ArchiveState,
    all: Vec<NewsletterRecord>,
    displayed: Vec<NewsletterRecord>,
    strategy: Box<dyn RenderStrategy>,
}

impl ArchiveView {
    pub fn new(strategy: Box<dyn RenderStrategy>) -> Self {
        Self {
            state: ArchiveState::Loading,
            all: Vec::new(),
            displayed: Vec::new(),
            strategy,
        }
    }

    /// Returns a view that renders with whichever mode `document` has
    /// containers for.
    pub fn for_document(document: &dyn Document) -> Self {
        let mode = DisplayMode::detect(document);
        debug!(?mode, "selected display mode");

        Self::new(mode.strategy())
    }

    pub fn state(&self) -> ArchiveState {
        self.state
    }

    pub fn all(&self) -> &[NewsletterRecord] {
        &self.all
    }

    pub fn displayed(&self) -> &[NewsletterRecord] {
        &self.displayed
    }

    /// Fetches the archive index and renders it.
    ///
    /// Any failure is rendered as the error state rather than returned.
    pub async fn load(&mut self, fetcher: &impl Fetch, document: &mut dyn Document) {
        if self.state != ArchiveState::Loading {
            warn!(state = ?self.state, "archive already loaded");
            return;
        }

        match fetch_newsletters(fetcher).await {
            Ok(mut records) => {
                sort_by_date_desc(&mut records);
                info!(count = records.len(), "loaded newsletter archive");

                self.displayed = records.clone();
                self.all = records;
                self.state = ArchiveState::Ready;

                self.render(document);
                self.update_count(document);
            }
            Err(err) => {
                error!("error loading newsletters: {err}");

                self.state = ArchiveState::Failed;
                self.show_error(document);
            }
        }
    }

    /// Filters the archive by `query` and re-renders.
    pub fn search(&mut self, query: &str, document: &mut dyn Document) {
        if self.state != ArchiveState::Ready || !self.strategy.supports_search() {
            debug!(state = ?self.state, "ignoring search");
            return;
        }

        self.displayed = filter_records(&self.all, query);
        debug!(
            query,
            showing = self.displayed.len(),
            total = self.all.len(),
            "searched archive"
        );

        self.render(document);
        self.update_count(document);
    }

    pub fn render(&self, document: &mut dyn Document) {
        self.strategy.render(&self.displayed, document);
    }

    pub fn update_count(&self, document: &mut dyn Document) {
        document.set_text_content(
            COUNT_ID,
            count_label(self.displayed.len(), self.all.len()),
        );
    }

    /// Follows the click target of a displayed issue.
    pub fn activate(&self, issue: u32, document: &mut dyn Document) {
        let Some(record) = self.displayed.iter().find(|record| record.issue == issue) else {
            debug!(issue, "no displayed issue to activate");
            return;
        };

        document.navigate(&record.path);
    }

    /// Runs a search for the last value of every burst of search input,
    /// once the input has been quiet for [`SEARCH_DEBOUNCE`].
    ///
    /// Returns when `inputs` closes. A value still waiting out its quiet
    /// period at that point is dropped.
    pub async fn watch_search(
        &mut self,
        mut inputs: UnboundedReceiver<String>,
        document: &mut dyn Document,
    ) {
        if !document.has_element(SEARCH_INPUT_ID) {
            return;
        }

        let mut debounce = Debounce::new(SEARCH_DEBOUNCE);

        loop {
            let deadline = debounce.deadline();

            tokio::select! {
                input = inputs.recv() => match input {
                    Some(query) => debounce.push(query, Instant::now()),
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(query) = debounce.take_due(Instant::now()) {
                        self.search(&query, document);
                    }
                }
            }
        }
    }

    fn show_error(&self, document: &mut dyn Document) {
        self.strategy.render_error(document);
        document.set_text_content(COUNT_ID, "ERROR".to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hyper::StatusCode;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::sleep;

    use super::*;
    use crate::archive::document::{MemoryDocument, LIST_ID, OUTLINE_ID, RECENT_ID};
    use crate::archive::fetch::StubFetcher;

    const INDEX: &str = r#"[
        { "issue": 5, "date": "2024-03-01", "title": "Spring Cleaning: Tools", "path": "/n/5.html" },
        { "issue": 1, "date": "2023-06-01", "title": "Hello World", "path": "/n/1.html" },
        { "issue": 7, "date": "2024-03-01", "title": "March Madness", "path": "/n/7.html" },
        { "issue": 3, "date": "2024-01-01", "title": "New Year: Plans", "path": "/n/3.html" }
    ]"#;

    fn flat_document() -> MemoryDocument {
        MemoryDocument::with_elements([SEARCH_INPUT_ID, LIST_ID, COUNT_ID])
    }

    fn issues(records: &[NewsletterRecord]) -> Vec<u32> {
        records.iter().map(|record| record.issue).collect()
    }

    async fn loaded(document: &mut MemoryDocument) -> ArchiveView {
        let mut view = ArchiveView::for_document(document);
        view.load(&StubFetcher::ok(INDEX), document).await;
        view
    }

    #[tokio::test]
    async fn test_load_sorts_and_renders() {
        let mut document = flat_document();
        let view = loaded(&mut document).await;

        assert_eq!(view.state(), ArchiveState::Ready);
        assert_eq!(issues(view.all()), vec![5, 7, 3, 1]);
        assert_eq!(view.displayed(), view.all());
        assert_eq!(document.content(COUNT_ID), Some("4 ISSUES"));
        assert!(document.content(LIST_ID).unwrap().contains("Spring Cleaning"));
    }

    #[tokio::test]
    async fn test_load_empty_index() {
        let mut document = flat_document();
        let mut view = ArchiveView::for_document(&document);

        view.load(&StubFetcher::ok("[]"), &mut document).await;

        assert_eq!(view.state(), ArchiveState::Ready);
        assert_eq!(document.content(COUNT_ID), Some("0 ISSUES"));
        assert!(document
            .content(LIST_ID)
            .unwrap()
            .contains("NO MATCHES FOUND"));
    }

    #[tokio::test]
    async fn test_load_failure() {
        let mut document = flat_document();
        let mut view = ArchiveView::for_document(&document);

        view.load(
            &StubFetcher::status(StatusCode::INTERNAL_SERVER_ERROR),
            &mut document,
        )
        .await;

        assert_eq!(view.state(), ArchiveState::Failed);
        assert!(view.all().is_empty());
        assert!(view.displayed().is_empty());
        assert_eq!(document.content(COUNT_ID), Some("ERROR"));
        assert!(document
            .content(LIST_ID)
            .unwrap()
            .contains("UNABLE TO LOAD ARCHIVE"));
    }

    #[tokio::test]
    async fn test_malformed_index_fails() {
        let mut document = flat_document();
        let mut view = ArchiveView::for_document(&document);

        view.load(&StubFetcher::ok(r#"[{ "issue": 1 }]"#), &mut document)
            .await;

        assert_eq!(view.state(), ArchiveState::Failed);
        assert_eq!(document.content(COUNT_ID), Some("ERROR"));
    }

    #[tokio::test]
    async fn test_failed_is_terminal() {
        let mut document = flat_document();
        let mut view = ArchiveView::for_document(&document);

        view.load(&StubFetcher::offline(), &mut document).await;
        view.load(&StubFetcher::ok(INDEX), &mut document).await;
        view.search("hello", &mut document);

        assert_eq!(view.state(), ArchiveState::Failed);
        assert!(view.all().is_empty());
        assert_eq!(document.content(COUNT_ID), Some("ERROR"));
    }

    #[tokio::test]
    async fn test_search() {
        let mut document = flat_document();
        let mut view = loaded(&mut document).await;

        view.search("  MARCH ", &mut document);
        assert_eq!(issues(view.displayed()), vec![7]);
        assert_eq!(document.content(COUNT_ID), Some("1 OF 4"));

        view.search("2024-03", &mut document);
        assert_eq!(issues(view.displayed()), vec![5, 7]);
        assert_eq!(document.content(COUNT_ID), Some("2 OF 4"));

        view.search("nothing like this", &mut document);
        assert!(view.displayed().is_empty());
        assert_eq!(document.content(COUNT_ID), Some("0 OF 4"));
        assert!(document
            .content(LIST_ID)
            .unwrap()
            .contains("NO MATCHES FOUND"));

        view.search("", &mut document);
        assert_eq!(view.displayed(), view.all());
        assert_eq!(issues(view.displayed()), vec![5, 7, 3, 1]);
        assert_eq!(document.content(COUNT_ID), Some("4 ISSUES"));
    }

    #[tokio::test]
    async fn test_outline_mode_ignores_search() {
        let mut document = MemoryDocument::with_elements([RECENT_ID, OUTLINE_ID, COUNT_ID]);
        let mut view = loaded(&mut document).await;

        view.search("march", &mut document);

        assert_eq!(view.displayed().len(), 4);
        assert_eq!(document.content(COUNT_ID), Some("4 ISSUES"));
        assert!(document
            .content(OUTLINE_ID)
            .unwrap()
            .contains("archive-month"));
    }

    #[tokio::test]
    async fn test_activate_navigates_to_path() {
        let mut document = flat_document();
        let mut view = loaded(&mut document).await;

        view.activate(3, &mut document);
        assert_eq!(document.location(), Some("/n/3.html"));

        view.search("hello", &mut document);
        view.activate(5, &mut document);
        assert_eq!(document.location(), Some("/n/3.html"));
    }

    #[tokio::test]
    async fn test_missing_elements_are_tolerated() {
        let mut document = MemoryDocument::new();
        let mut view = loaded(&mut document).await;

        view.search("march", &mut document);

        assert_eq!(view.state(), ArchiveState::Ready);
        assert_eq!(issues(view.displayed()), vec![7]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_search_debounces_bursts() {
        let mut document = flat_document();
        let mut view = loaded(&mut document).await;
        assert_eq!(document.element(LIST_ID).unwrap().writes, 1);

        let (tx, rx) = unbounded_channel();
        let typing = async move {
            tx.send("h".to_string()).unwrap();
            sleep(Duration::from_millis(100)).await;
            tx.send("he".to_string()).unwrap();
            sleep(Duration::from_millis(100)).await;
            tx.send("hello".to_string()).unwrap();
            sleep(Duration::from_millis(400)).await;
        };

        tokio::join!(view.watch_search(rx, &mut document), typing);

        assert_eq!(document.element(LIST_ID).unwrap().writes, 2);
        assert_eq!(issues(view.displayed()), vec![1]);
        assert_eq!(document.content(COUNT_ID), Some("1 OF 4"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_search_drops_pending_input_on_close() {
        let mut document = flat_document();
        let mut view = loaded(&mut document).await;

        let (tx, rx) = unbounded_channel();
        tx.send("march".to_string()).unwrap();
        drop(tx);

        view.watch_search(rx, &mut document).await;

        assert_eq!(document.element(LIST_ID).unwrap().writes, 1);
        assert_eq!(view.displayed().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_search_requires_search_input() {
        let mut document = MemoryDocument::with_elements([LIST_ID, COUNT_ID]);
        let mut view = loaded(&mut document).await;

        let (tx, rx) = unbounded_channel();
        tx.send("march".to_string()).unwrap();

        view.watch_search(rx, &mut document).await;
        drop(tx);

        assert_eq!(view.displayed().len(), 4);
    }
}

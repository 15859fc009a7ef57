use crate::archive::document::{Document, LIST_ID, OUTLINE_ID, RECENT_ID};
use crate::archive::grouping::{group_by_month, group_by_year};
use crate::archive::{count_label, NewsletterRecord};
use crate::html::{details, div, h3, p, render_fragment, span, summary, HtmlElement};

/// How many issues the outline view lists as recent.
pub const RECENT_LIMIT: usize = 10;

/// Renders the displayed records into the page.
pub trait RenderStrategy {
    fn render(&self, displayed: &[NewsletterRecord], document: &mut dyn Document);

    /// Replaces the list regions with the fixed load-failure message.
    fn render_error(&self, document: &mut dyn Document);

    fn supports_search(&self) -> bool {
        false
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, clap::ValueEnum)]
pub enum DisplayMode {
    /// A searchable list grouped by year.
    Flat,
    /// Recent issues plus collapsible year and month groups.
    Outline,
}

impl DisplayMode {
    /// Picks the mode whose containers are present in `document`.
    ///
    /// The flat list wins when both sets of containers exist.
    pub fn detect(document: &dyn Document) -> Self {
        if document.has_element(LIST_ID) {
            DisplayMode::Flat
        } else if document.has_element(OUTLINE_ID) || document.has_element(RECENT_ID) {
            DisplayMode::Outline
        } else {
            DisplayMode::Flat
        }
    }

    pub fn strategy(self) -> Box<dyn RenderStrategy> {
        match self {
            DisplayMode::Flat => Box::new(FlatList),
            DisplayMode::Outline => Box::new(Outline::default()),
        }
    }

    /// The element ids this mode renders into.
    pub fn element_ids(self) -> &'static [&'static str] {
        match self {
            DisplayMode::Flat => &[LIST_ID],
            DisplayMode::Outline => &[RECENT_ID, OUTLINE_ID],
        }
    }
}

/// Year sections of newsletter items, filtered by search.
pub struct FlatList;

impl RenderStrategy for FlatList {
    fn render(&self, displayed: &[NewsletterRecord], document: &mut dyn Document) {
        if !document.has_element(LIST_ID) {
            return;
        }

        if displayed.is_empty() {
            let placeholder = empty_archive(
                "NO MATCHES FOUND",
                "Try adjusting your search or browse all newsletters",
            );
            document.set_inner_html(LIST_ID, placeholder.render_to_string());
            return;
        }

        let sections = group_by_year(displayed)
            .into_iter()
            .map(|group| {
                div()
                    .class("year-section")
                    .child(div().class("year-label").child(group.year))
                    .child(
                        div()
                            .class("newsletter-list")
                            .children(group.records.into_iter().map(newsletter_item)),
                    )
            })
            .collect::<Vec<_>>();

        document.set_inner_html(LIST_ID, render_fragment(&sections));
    }

    fn render_error(&self, document: &mut dyn Document) {
        document.set_inner_html(LIST_ID, load_error().render_to_string());
    }

    fn supports_search(&self) -> bool {
        true
    }
}

/// The most recent issues, followed by nested year and month disclosures.
pub struct Outline {
    pub recent_limit: usize,
}

impl Default for Outline {
    fn default() -> Self {
        Self {
            recent_limit: RECENT_LIMIT,
        }
    }
}

impl RenderStrategy for Outline {
    fn render(&self, displayed: &[NewsletterRecord], document: &mut dyn Document) {
        if displayed.is_empty() {
            let placeholder = empty_archive(
                "NO ISSUES YET",
                "Check back soon for the first newsletter",
            )
            .render_to_string();

            document.set_inner_html(RECENT_ID, placeholder.clone());
            document.set_inner_html(OUTLINE_ID, placeholder);
            return;
        }

        let recent = displayed
            .iter()
            .take(self.recent_limit)
            .map(newsletter_item)
            .collect::<Vec<_>>();
        document.set_inner_html(RECENT_ID, render_fragment(&recent));

        let years = group_by_year(displayed)
            .into_iter()
            .map(|year| {
                let total = year.records.len();
                let months = group_by_month(&year.records).into_iter().map(|month| {
                    details()
                        .class("archive-month")
                        .child(
                            summary()
                                .child(span().class("month-name").child(month.name()))
                                .child(
                                    span()
                                        .class("month-count")
                                        .child(month.records.len().to_string()),
                                ),
                        )
                        .child(
                            div()
                                .class("newsletter-list")
                                .children(month.records.into_iter().map(newsletter_item)),
                        )
                });

                details()
                    .class("archive-year")
                    .child(
                        summary()
                            .child(span().class("year-label").child(year.year))
                            .child(span().class("year-count").child(count_label(total, total))),
                    )
                    .children(months)
            })
            .collect::<Vec<_>>();

        document.set_inner_html(OUTLINE_ID, render_fragment(&years));
    }

    fn render_error(&self, document: &mut dyn Document) {
        let error = load_error().render_to_string();

        document.set_inner_html(RECENT_ID, error.clone());
        document.set_inner_html(OUTLINE_ID, error);
    }
}

/// A single clickable issue; `data-path` is the navigation target.
pub fn newsletter_item(record: &NewsletterRecord) -> HtmlElement {
    let (title, subtitle) = record.title_parts();

    let meta = match subtitle {
        Some(subtitle) => format!("{} • {subtitle}", record.date.display()),
        None => record.date.display(),
    };

    div()
        .class("newsletter-item")
        .data("path", record.path.as_str())
        .child(div().class("newsletter-number").child(record.label()))
        .child(
            div()
                .class("newsletter-content")
                .child(div().class("newsletter-title").child(title))
                .child(div().class("newsletter-meta").child(meta)),
        )
        .child(div().class("newsletter-arrow").child("→"))
}

fn empty_archive(heading: &str, message: &str) -> HtmlElement {
    div()
        .class("empty-archive")
        .child(h3().child(heading))
        .child(p().child(message))
}

fn load_error() -> HtmlElement {
    empty_archive(
        "UNABLE TO LOAD ARCHIVE",
        "Please refresh the page or try again later",
    )
}

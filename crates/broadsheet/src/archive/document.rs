use indexmap::IndexMap;

/// The search input the archive listens to.
pub const SEARCH_INPUT_ID: &str = "search-newsletters";

/// The container for the flat, searchable list.
pub const LIST_ID: &str = "newsletter-list";

/// The result-count indicator.
pub const COUNT_ID: &str = "result-count";

/// The container for the most recent issues in the outline view.
pub const RECENT_ID: &str = "recent-newsletters";

/// The container for the year/month disclosures in the outline view.
pub const OUTLINE_ID: &str = "archive-outline";

/// The page the archive renders into.
///
/// Every element is looked up by id and may be absent; writing to a
/// missing element does nothing.
pub trait Document {
    fn has_element(&self, id: &str) -> bool;

    fn set_inner_html(&mut self, id: &str, html: String);

    fn set_text_content(&mut self, id: &str, text: String);

    /// Navigates the page to `path`.
    fn navigate(&mut self, path: &str);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryElement {
    pub content: String,
    pub writes: usize,
}

/// An in-memory [`Document`] holding a fixed set of elements.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    elements: IndexMap<String, MemoryElement>,
    location: Option<String>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            elements: ids
                .into_iter()
                .map(|id| (id.to_string(), MemoryElement::default()))
                .collect(),
            location: None,
        }
    }

    pub fn element(&self, id: &str) -> Option<&MemoryElement> {
        self.elements.get(id)
    }

    /// The current content of the element with the given id.
    pub fn content(&self, id: &str) -> Option<&str> {
        self.element(id).map(|element| element.content.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = (&str, &MemoryElement)> {
        self.elements
            .iter()
            .map(|(id, element)| (id.as_str(), element))
    }

    /// The path the page was last navigated to.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn write(&mut self, id: &str, content: String) {
        if let Some(element) = self.elements.get_mut(id) {
            element.content = content;
            element.writes += 1;
        }
    }
}

impl Document for MemoryDocument {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn set_inner_html(&mut self, id: &str, html: String) {
        self.write(id, html);
    }

    fn set_text_content(&mut self, id: &str, text: String) {
        self.write(id, text);
    }

    fn navigate(&mut self, path: &str) {
        self.location = Some(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_writes_to_missing_elements_are_ignored() {
        let mut document = MemoryDocument::with_elements([COUNT_ID]);

        document.set_inner_html(LIST_ID, "<div></div>".to_string());
        document.set_text_content(COUNT_ID, "3 ISSUES".to_string());

        assert!(!document.has_element(LIST_ID));
        assert_eq!(document.content(LIST_ID), None);
        assert_eq!(document.content(COUNT_ID), Some("3 ISSUES"));
        assert_eq!(document.element(COUNT_ID).unwrap().writes, 1);
    }

    #[test]
    fn test_navigate() {
        let mut document = MemoryDocument::new();
        assert_eq!(document.location(), None);

        document.navigate("/newsletters/1.html");
        assert_eq!(document.location(), Some("/newsletters/1.html"));
    }
}

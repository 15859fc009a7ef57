use std::fmt::Write;

use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub enum Node {
    Element(HtmlElement),
    Text(String),
}

impl From<HtmlElement> for Node {
    fn from(value: HtmlElement) -> Self {
        Node::Element(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

#[derive(Debug, Clone)]
pub struct HtmlElement {
    pub tag_name: String,
    pub children: Vec<Node>,
    pub attrs: IndexMap<String, String>,
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag_name: tag.into(),
            children: Vec::new(),
            attrs: IndexMap::new(),
        }
    }

    pub fn attr<V>(mut self, name: impl Into<String>, value: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        let name = name.into();
        match value.into() {
            Some(value) => {
                *self.attrs.entry(name).or_default() = value.into();
            }
            None => {
                self.attrs.shift_remove(&name);
            }
        }

        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<N>(mut self, children: impl IntoIterator<Item = N>) -> Self
    where
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn render_to_string(&self) -> String {
        let mut html = String::new();
        self.write_to(&mut html);
        html
    }

    fn write_to(&self, html: &mut String) {
        html.push('<');
        html.push_str(&self.tag_name);

        for (name, value) in &self.attrs {
            let _ = write!(html, r#" {name}="{}""#, escape_html(value));
        }

        html.push('>');

        for child in &self.children {
            match child {
                Node::Element(element) => element.write_to(html),
                Node::Text(text) => html.push_str(&escape_html(text)),
            }
        }

        html.push_str("</");
        html.push_str(&self.tag_name);
        html.push('>');
    }
}

impl HtmlElement {
    pub fn id<V>(self, id: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr("id", id)
    }

    pub fn class<V>(self, class: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr("class", class)
    }

    pub fn data<V>(self, name: &str, value: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr(format!("data-{name}"), value)
    }
}

/// Renders a sequence of sibling elements with no wrapper.
pub fn render_fragment<'a>(elements: impl IntoIterator<Item = &'a HtmlElement>) -> String {
    let mut html = String::new();
    for element in elements {
        element.write_to(&mut html);
    }
    html
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for char in text.chars() {
        match char {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            char => escaped.push(char),
        }
    }
    escaped
}

pub fn div() -> HtmlElement {
    HtmlElement::new("div")
}

pub fn h3() -> HtmlElement {
    HtmlElement::new("h3")
}

pub fn p() -> HtmlElement {
    HtmlElement::new("p")
}

pub fn span() -> HtmlElement {
    HtmlElement::new("span")
}

pub fn details() -> HtmlElement {
    HtmlElement::new("details")
}

pub fn summary() -> HtmlElement {
    HtmlElement::new("summary")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render() {
        let element = div()
            .class("outer")
            .child(div().class("inner").child(h3().child("Heading")));

        assert_eq!(
            element.render_to_string(),
            r#"<div class="outer"><div class="inner"><h3>Heading</h3></div></div>"#
        );
    }

    #[test]
    fn test_attrs_keep_insertion_order() {
        let element = div().class("item").data("path", "/issues/1").id("first");

        assert_eq!(
            element.render_to_string(),
            r#"<div class="item" data-path="/issues/1" id="first"></div>"#
        );
    }

    #[test]
    fn test_removing_attr() {
        let element = div().class("item").class::<String>(None);

        assert_eq!(element.render_to_string(), "<div></div>");
    }

    #[test]
    fn test_removing_attr_keeps_remaining_order() {
        let element = div()
            .id("first")
            .class("item")
            .data("path", "/issues/1")
            .attr::<String>("id", None);

        assert_eq!(
            element.render_to_string(),
            r#"<div class="item" data-path="/issues/1"></div>"#
        );
    }

    #[test]
    fn test_escapes_text_and_attrs() {
        let element = p()
            .data("path", r#"/a?b=1&c="2""#)
            .child("<script>alert('hi')</script>");

        assert_eq!(
            element.render_to_string(),
            r#"<p data-path="/a?b=1&amp;c=&quot;2&quot;">&lt;script&gt;alert(&#x27;hi&#x27;)&lt;/script&gt;</p>"#
        );
    }

    #[test]
    fn test_render_fragment() {
        let elements = [span().child("a"), span().child("b")];

        assert_eq!(render_fragment(&elements), "<span>a</span><span>b</span>");
    }
}

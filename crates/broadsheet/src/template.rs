//! A small template engine for mustache-style templates.
//!
//! The grammar covers the subset of Mustache and Handlebars that static
//! page templates actually use:
//!
//! - `{{name}}` interpolates a value, HTML-escaped
//! - `{{{name}}}` and `{{& name}}` interpolate without escaping
//! - `{{#name}}...{{/name}}` and `{{^name}}...{{/name}}` are Mustache sections
//! - `{{#if}}`, `{{#unless}}`, `{{#each}}` and `{{#with}}` are block helpers,
//!   each accepting an optional `{{else}}`
//! - `{{! comment }}` and `{{!-- comment --}}` are dropped
//!
//! Compiling a [`Template`] validates the whole document up front, so
//! rendering itself cannot fail.

mod parser;

use std::borrow::Cow;

use serde_json::Value;
use thiserror::Error;

pub use parser::Rule;

#[derive(Error, Debug)]
pub enum TemplateSyntaxError {
    #[error("malformed template tag\n{0}")]
    Grammar(Box<pest::error::Error<Rule>>),

    #[error("closing tag for `{name}` on line {line} has no matching open block")]
    UnexpectedClose { name: String, line: usize },

    #[error("closing tag for `{found}` on line {line} does not match open block `{expected}`")]
    MismatchedClose {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("block `{name}` opened on line {line} is never closed")]
    Unclosed { name: String, line: usize },

    #[error("`else` on line {line} is outside of any block")]
    StrayElse { line: usize },

    #[error("block `{name}` has a second `else` on line {line}")]
    DuplicateElse { name: String, line: usize },
}

impl TemplateSyntaxError {
    /// The 1-based line the error was detected on.
    pub fn line(&self) -> usize {
        match self {
            Self::Grammar(err) => match err.line_col {
                pest::error::LineColLocation::Pos((line, _)) => line,
                pest::error::LineColLocation::Span((line, _), _) => line,
            },
            Self::UnexpectedClose { line, .. }
            | Self::MismatchedClose { line, .. }
            | Self::Unclosed { line, .. }
            | Self::StrayElse { line }
            | Self::DuplicateElse { line, .. } => *line,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) enum Path {
    /// `.` or `this`.
    This,
    /// An iteration variable such as `@index`.
    Data(String),
    /// `this.a.b`, looked up in the current context only.
    Local(Vec<String>),
    Keys(Vec<String>),
}

impl Path {
    fn parse(text: &str) -> Self {
        if text == "." || text == "this" {
            return Path::This;
        }

        if let Some(name) = text.strip_prefix('@') {
            return Path::Data(name.to_string());
        }

        let keys = text.split('.').map(str::to_string).collect::<Vec<_>>();
        match keys.split_first() {
            Some((this, rest)) if this == "this" => Path::Local(rest.to_vec()),
            _ => Path::Keys(keys),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum BlockKind {
    Section,
    Inverted,
    If,
    Unless,
    Each,
    With,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) enum Node {
    Text(String),
    Variable {
        path: Path,
        escape: bool,
    },
    Block {
        kind: BlockKind,
        path: Path,
        body: Vec<Node>,
        inverse: Vec<Node>,
    },
}

/// A compiled template.
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, TemplateSyntaxError> {
        Ok(Self {
            nodes: parser::parse_template(source)?,
        })
    }

    /// Renders the template against `data`.
    ///
    /// Rendering is a pure function of the template and the data.
    pub fn render(&self, data: &Value) -> String {
        let mut output = String::new();
        let mut stack = vec![Frame::root(data)];
        render_nodes(&self.nodes, &mut stack, &mut output);
        output
    }
}

#[derive(Debug, Clone, Copy)]
struct Iteration<'a> {
    index: usize,
    key: Option<&'a str>,
    first: bool,
    last: bool,
}

#[derive(Debug, Clone, Copy)]
struct Frame<'a> {
    value: &'a Value,
    iteration: Option<Iteration<'a>>,
}

impl<'a> Frame<'a> {
    fn root(value: &'a Value) -> Self {
        Self {
            value,
            iteration: None,
        }
    }
}

fn render_nodes<'a>(nodes: &[Node], stack: &mut Vec<Frame<'a>>, output: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => output.push_str(text),
            Node::Variable { path, escape } => {
                let Some(value) = resolve(path, stack) else {
                    continue;
                };

                let text = display(&value);
                if *escape {
                    output.push_str(&escape_expression(&text));
                } else {
                    output.push_str(&text);
                }
            }
            Node::Block {
                kind,
                path,
                body,
                inverse,
            } => {
                let value = resolve(path, stack).unwrap_or(Cow::Owned(Value::Null));
                render_block(*kind, value, body, inverse, stack, output);
            }
        }
    }
}

fn render_block<'a>(
    kind: BlockKind,
    value: Cow<'a, Value>,
    body: &[Node],
    inverse: &[Node],
    stack: &mut Vec<Frame<'a>>,
    output: &mut String,
) {
    let truthy = is_truthy(&value);

    match kind {
        BlockKind::If => {
            render_nodes(if truthy { body } else { inverse }, stack, output);
        }
        BlockKind::Unless | BlockKind::Inverted => {
            render_nodes(if truthy { inverse } else { body }, stack, output);
        }
        BlockKind::Each => match value {
            Cow::Borrowed(Value::Array(items)) if !items.is_empty() => {
                render_each(items.iter().map(|item| (None, item)), body, stack, output);
            }
            Cow::Borrowed(Value::Object(entries)) if !entries.is_empty() => {
                render_each(
                    entries.iter().map(|(key, item)| (Some(key.as_str()), item)),
                    body,
                    stack,
                    output,
                );
            }
            _ => render_nodes(inverse, stack, output),
        },
        BlockKind::Section => match value {
            Cow::Borrowed(Value::Array(items)) if !items.is_empty() => {
                render_each(items.iter().map(|item| (None, item)), body, stack, output);
            }
            _ if !truthy => render_nodes(inverse, stack, output),
            value => render_with(value, body, stack, output),
        },
        BlockKind::With => {
            if truthy {
                render_with(value, body, stack, output);
            } else {
                render_nodes(inverse, stack, output);
            }
        }
    }
}

fn render_with<'a>(
    value: Cow<'a, Value>,
    body: &[Node],
    stack: &mut Vec<Frame<'a>>,
    output: &mut String,
) {
    match value {
        Cow::Borrowed(value) => {
            stack.push(Frame {
                value,
                iteration: None,
            });
            render_nodes(body, stack, output);
            stack.pop();
        }
        // Iteration variables are not addressable as a context.
        Cow::Owned(_) => render_nodes(body, stack, output),
    }
}

fn render_each<'a>(
    items: impl ExactSizeIterator<Item = (Option<&'a str>, &'a Value)>,
    body: &[Node],
    stack: &mut Vec<Frame<'a>>,
    output: &mut String,
) {
    let len = items.len();

    for (index, (key, value)) in items.enumerate() {
        stack.push(Frame {
            value,
            iteration: Some(Iteration {
                index,
                key,
                first: index == 0,
                last: index + 1 == len,
            }),
        });
        render_nodes(body, stack, output);
        stack.pop();
    }
}

fn resolve<'a>(path: &Path, stack: &[Frame<'a>]) -> Option<Cow<'a, Value>> {
    match path {
        Path::This => stack.last().map(|frame| Cow::Borrowed(frame.value)),
        Path::Data(name) => {
            let iteration = stack.iter().rev().find_map(|frame| frame.iteration)?;

            let value = match name.as_str() {
                "index" => Value::from(iteration.index),
                "key" => iteration.key.map(Value::from).unwrap_or(Value::Null),
                "first" => Value::Bool(iteration.first),
                "last" => Value::Bool(iteration.last),
                _ => return None,
            };

            Some(Cow::Owned(value))
        }
        Path::Local(keys) => {
            let mut current = stack.last()?.value;
            for key in keys {
                current = child(current, key)?;
            }

            Some(Cow::Borrowed(current))
        }
        Path::Keys(keys) => {
            let (first, rest) = keys.split_first()?;

            let mut current = stack
                .iter()
                .rev()
                .find_map(|frame| child(frame.value, first))?;

            for key in rest {
                current = child(current, key)?;
            }

            Some(Cow::Borrowed(current))
        }
    }
}

fn child<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(entries) => entries.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(value) => *value,
        Value::Number(number) => number.as_f64().map_or(true, |number| number != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::Null | Value::Object(_) => String::new(),
        Value::Bool(value) => value.to_string(),
        Value::Number(number) => match number.as_f64() {
            // Integral floats print without a fraction, e.g. `10.0` as `10`.
            Some(float) if number.is_f64() => float.to_string(),
            _ => number.to_string(),
        },
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(","),
    }
}

fn escape_expression(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for char in text.chars() {
        match char {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '`' => escaped.push_str("&#x60;"),
            '=' => escaped.push_str("&#x3D;"),
            char => escaped.push(char),
        }
    }
    escaped
}

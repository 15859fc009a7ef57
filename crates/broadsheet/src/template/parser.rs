use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::template::{BlockKind, Node, Path, TemplateSyntaxError};

#[derive(Parser)]
#[grammar = "template/grammar.pest"]
pub struct TemplateParser;

/// A block whose closing tag has not been seen yet.
struct OpenBlock {
    kind: BlockKind,
    path: Path,
    name: String,
    line: usize,
    body: Vec<Node>,
    inverse: Option<Vec<Node>>,
}

impl OpenBlock {
    fn nodes_mut(&mut self) -> &mut Vec<Node> {
        match self.inverse.as_mut() {
            Some(inverse) => inverse,
            None => &mut self.body,
        }
    }
}

pub(crate) fn parse_template(source: &str) -> Result<Vec<Node>, TemplateSyntaxError> {
    let mut pairs = TemplateParser::parse(Rule::template, source)
        .map_err(|err| TemplateSyntaxError::Grammar(Box::new(err)))?;

    let Some(template) = pairs.next() else {
        return Ok(Vec::new());
    };

    let mut tokens = template
        .into_inner()
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .map(|pair| match pair.as_rule() {
            Rule::text => Token::Text(pair.as_str()),
            _ => Token::Tag(pair),
        })
        .collect::<Vec<_>>();
    strip_standalone_lines(&mut tokens);

    let mut root = Vec::new();
    let mut stack: Vec<OpenBlock> = Vec::new();

    for token in tokens {
        let pair = match token {
            Token::Text("") => continue,
            Token::Text(text) => {
                push_node(&mut root, &mut stack, Node::Text(text.to_string()));
                continue;
            }
            Token::Tag(pair) => pair,
        };

        let line = pair.as_span().start_pos().line_col().0;

        let node = match pair.as_rule() {
            Rule::comment | Rule::long_comment => continue,
            Rule::variable => Node::Variable {
                path: parse_path(pair),
                escape: true,
            },
            Rule::triple | Rule::ampersand => Node::Variable {
                path: parse_path(pair),
                escape: false,
            },
            Rule::block_open | Rule::inverted_open => {
                let inverted = pair.as_rule() == Rule::inverted_open;
                let (kind, name, path) = parse_block_open(pair, inverted);

                stack.push(OpenBlock {
                    kind,
                    path,
                    name,
                    line,
                    body: Vec::new(),
                    inverse: None,
                });
                continue;
            }
            Rule::else_tag => {
                let Some(block) = stack.last_mut() else {
                    return Err(TemplateSyntaxError::StrayElse { line });
                };

                if block.inverse.is_some() {
                    return Err(TemplateSyntaxError::DuplicateElse {
                        name: block.name.clone(),
                        line,
                    });
                }

                block.inverse = Some(Vec::new());
                continue;
            }
            Rule::block_close => {
                let name = close_name(pair);

                let Some(block) = stack.pop() else {
                    return Err(TemplateSyntaxError::UnexpectedClose { name, line });
                };

                if block.name != name {
                    return Err(TemplateSyntaxError::MismatchedClose {
                        expected: block.name,
                        found: name,
                        line,
                    });
                }

                Node::Block {
                    kind: block.kind,
                    path: block.path,
                    body: block.body,
                    inverse: block.inverse.unwrap_or_default(),
                }
            }
            rule => unreachable!("Unexpected template rule: {rule:?}"),
        };

        push_node(&mut root, &mut stack, node);
    }

    if let Some(block) = stack.pop() {
        return Err(TemplateSyntaxError::Unclosed {
            name: block.name,
            line: block.line,
        });
    }

    Ok(root)
}

fn push_node(root: &mut Vec<Node>, stack: &mut [OpenBlock], node: Node) {
    match stack.last_mut() {
        Some(block) => block.nodes_mut().push(node),
        None => root.push(node),
    }
}

enum Token<'i> {
    Text(&'i str),
    Tag(Pair<'i, Rule>),
}

/// Removes lines that hold nothing but a block, `else` or comment tag,
/// including their indentation and line break.
fn strip_standalone_lines(tokens: &mut [Token]) {
    let standalone = (0..tokens.len())
        .filter(|&index| is_standalone(tokens, index))
        .collect::<Vec<_>>();

    for index in standalone {

        if let Some(Token::Text(before)) = index.checked_sub(1).map(|prev| &mut tokens[prev]) {
            let text = *before;
            *before = match text.rfind('\n') {
                Some(newline) => &text[..=newline],
                None => "",
            };
        }

        if let Some(Token::Text(after)) = tokens.get_mut(index + 1) {
            let text = *after;
            *after = match text.find('\n') {
                Some(newline) => &text[newline + 1..],
                None => "",
            };
        }
    }
}

fn is_standalone(tokens: &[Token], index: usize) -> bool {
    let Token::Tag(pair) = &tokens[index] else {
        return false;
    };

    if !matches!(
        pair.as_rule(),
        Rule::block_open
            | Rule::inverted_open
            | Rule::block_close
            | Rule::else_tag
            | Rule::comment
            | Rule::long_comment
    ) {
        return false;
    }

    let starts_line = match index.checked_sub(1).map(|prev| &tokens[prev]) {
        None => true,
        Some(Token::Text(before)) => match before.rfind('\n') {
            Some(newline) => is_blank(&before[newline + 1..]),
            None => index == 1 && is_blank(before),
        },
        Some(Token::Tag(_)) => false,
    };

    let ends_line = match tokens.get(index + 1) {
        None => true,
        Some(Token::Text(after)) => match after.find('\n') {
            Some(newline) => is_blank(after[..newline].trim_end_matches('\r')),
            None => index + 2 == tokens.len() && is_blank(after),
        },
        Some(Token::Tag(_)) => false,
    };

    starts_line && ends_line
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|char| char == ' ' || char == '\t')
}

fn parse_block_open(pair: Pair<Rule>, inverted: bool) -> (BlockKind, String, Path) {
    let mut helper = None;
    let mut path = None;

    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::helper => helper = Some(pair.as_str().to_string()),
            Rule::path => path = Some(pair.as_str().to_string()),
            _ => unreachable!("Failed to parse block tag: {pair:?}"),
        }
    }

    let path = path.unwrap_or_default();

    match helper.as_deref() {
        Some("if") => (BlockKind::If, "if".to_string(), Path::parse(&path)),
        Some("unless") => (BlockKind::Unless, "unless".to_string(), Path::parse(&path)),
        Some("each") => (BlockKind::Each, "each".to_string(), Path::parse(&path)),
        Some("with") => (BlockKind::With, "with".to_string(), Path::parse(&path)),
        Some(helper) => unreachable!("Unknown block helper: {helper:?}"),
        None if inverted => (BlockKind::Inverted, path.clone(), Path::parse(&path)),
        None => (BlockKind::Section, path.clone(), Path::parse(&path)),
    }
}

fn parse_path(pair: Pair<Rule>) -> Path {
    pair.into_inner()
        .find(|pair| pair.as_rule() == Rule::path)
        .map(|pair| Path::parse(pair.as_str()))
        .unwrap_or(Path::This)
}

fn close_name(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .find(|pair| pair.as_rule() == Rule::path)
        .map(|pair| pair.as_str().to_string())
        .unwrap_or_default()
}

//! `[[ ]]`-delimited templates rendered against a JSON value.
//!
//! ```text
//! [[ entity.class_name ]]          interpolation
//! [[#each fields]]…[[/each]]       iteration; `this`, `@index`, `@first`, `@last`
//! [[#if flag]]…[[else]]…[[/if]]    truthiness test
//! [[#unless flag]]…[[/unless]]
//! [[! comment ]]
//! ```
//!
//! A block tag alone on its line consumes the whole line.

pub mod manifest;

pub use manifest::{ManifestEntry, TemplateSource, MANIFEST};

use crate::error::{CodemodError, Result};
use serde_json::Value;

pub const OPEN: &str = "[[";
pub const CLOSE: &str = "]]";

/// Count of opening and closing delimiters in `source`.
pub fn delimiter_balance(source: &str) -> (usize, usize) {
    (source.matches(OPEN).count(), source.matches(CLOSE).count())
}

#[derive(Debug)]
enum Token {
    Text(String),
    Tag { inner: String, line: usize },
}

impl Token {
    fn is_block_tag(&self) -> bool {
        match self {
            Self::Tag { inner, .. } => {
                inner.starts_with(['#', '/', '!']) || inner == "else"
            }
            Self::Text(_) => false,
        }
    }
}

#[derive(Debug)]
enum Node {
    Text(String),
    Var { path: String, line: usize },
    Each { path: String, line: usize, body: Vec<Node> },
    If { path: String, line: usize, negate: bool, then: Vec<Node>, otherwise: Vec<Node> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlockKind {
    Each,
    If,
    Unless,
}

impl BlockKind {
    const fn name(self) -> &'static str {
        match self {
            Self::Each => "each",
            Self::If => "if",
            Self::Unless => "unless",
        }
    }
}

struct OpenBlock {
    kind: BlockKind,
    path: String,
    line: usize,
    then: Vec<Node>,
    otherwise: Option<Vec<Node>>,
}

impl OpenBlock {
    fn nodes(&mut self) -> &mut Vec<Node> {
        match self.otherwise {
            Some(ref mut nodes) => nodes,
            None => &mut self.then,
        }
    }
}

///
/// Template
///

#[derive(Debug)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let mut tokens = tokenize(name, source)?;
        strip_standalone(&mut tokens);
        let nodes = build(name, tokens)?;

        Ok(Self {
            name: name.to_string(),
            nodes,
        })
    }

    pub fn render(&self, data: &Value) -> Result<String> {
        let mut out = String::new();
        let mut scopes = vec![Scope { value: data, index: None }];

        render_nodes(&self.name, &self.nodes, &mut scopes, &mut out)?;

        Ok(out)
    }
}

fn template_error(name: &str, line: usize, message: impl std::fmt::Display) -> CodemodError {
    CodemodError::template(format!("{name}:{line}: {message}"))
}

fn tokenize(name: &str, source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut line = 1;

    while let Some(start) = rest.find(OPEN) {
        let (text, after) = rest.split_at(start);
        if !text.is_empty() {
            tokens.push(Token::Text(text.to_string()));
        }
        line += text.matches('\n').count();

        let after = &after[OPEN.len()..];
        let end = after
            .find(CLOSE)
            .ok_or_else(|| template_error(name, line, "unterminated tag"))?;
        let raw = &after[..end];

        let inner = raw.trim();
        if inner.is_empty() {
            return Err(template_error(name, line, "empty tag"));
        }
        tokens.push(Token::Tag {
            inner: inner.to_string(),
            line,
        });

        line += raw.matches('\n').count();
        rest = &after[end + CLOSE.len()..];
    }

    if !rest.is_empty() {
        tokens.push(Token::Text(rest.to_string()));
    }

    Ok(tokens)
}

fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t' || c == '\r')
}

// Remove the indentation and line break around block tags that sit alone on a line.
fn strip_standalone(tokens: &mut [Token]) {
    let last = tokens.len().saturating_sub(1);

    // decide on the untouched text first; neighbouring tags share text tokens
    let standalone: Vec<usize> = (0..tokens.len())
        .filter(|&i| tokens[i].is_block_tag())
        .filter(|&i| {
            let before = match i.checked_sub(1).map(|p| &tokens[p]) {
                None => true,
                Some(Token::Text(text)) => match text.rfind('\n') {
                    Some(pos) => is_blank(&text[pos + 1..]),
                    None => i == 1 && is_blank(text),
                },
                Some(Token::Tag { .. }) => false,
            };
            let after = match tokens.get(i + 1) {
                None => true,
                Some(Token::Text(text)) => match text.find('\n') {
                    Some(pos) => is_blank(&text[..pos]),
                    None => i + 1 == last && is_blank(text),
                },
                Some(Token::Tag { .. }) => false,
            };
            before && after
        })
        .collect();

    for i in standalone {
        if let Some(Token::Text(text)) = i.checked_sub(1).and_then(|p| tokens.get_mut(p)) {
            let keep = text.trim_end_matches([' ', '\t']).len();
            text.truncate(keep);
        }
        if let Some(Token::Text(text)) = tokens.get_mut(i + 1) {
            let trimmed = text.trim_start_matches([' ', '\t', '\r']);
            let trimmed = trimmed.strip_prefix('\n').unwrap_or(trimmed);
            *text = trimmed.to_string();
        }
    }
}

fn build(name: &str, tokens: Vec<Token>) -> Result<Vec<Node>> {
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<OpenBlock> = Vec::new();

    for token in tokens {
        let (inner, line) = match token {
            Token::Text(text) => {
                if !text.is_empty() {
                    current(&mut root, &mut stack).push(Node::Text(text));
                }
                continue;
            }
            Token::Tag { inner, line } => (inner, line),
        };

        if inner.starts_with('!') {
            continue;
        }

        if let Some(open) = inner.strip_prefix('#') {
            let (keyword, path) = split_keyword(open);
            let kind = match keyword {
                "each" => BlockKind::Each,
                "if" => BlockKind::If,
                "unless" => BlockKind::Unless,
                other => return Err(template_error(name, line, format!("unknown block '{other}'"))),
            };
            if path.is_empty() {
                return Err(template_error(name, line, format!("'{keyword}' needs a path")));
            }
            stack.push(OpenBlock {
                kind,
                path: path.to_string(),
                line,
                then: Vec::new(),
                otherwise: None,
            });
            continue;
        }

        if inner == "else" {
            match stack.last_mut() {
                Some(block) if block.kind != BlockKind::Each && block.otherwise.is_none() => {
                    block.otherwise = Some(Vec::new());
                }
                _ => return Err(template_error(name, line, "'else' outside of an if block")),
            }
            continue;
        }

        if let Some(close) = inner.strip_prefix('/') {
            let close = close.trim();
            let block = stack
                .pop()
                .ok_or_else(|| template_error(name, line, format!("unexpected close '{close}'")))?;
            if block.kind.name() != close {
                return Err(template_error(
                    name,
                    line,
                    format!(
                        "mismatched close '{close}', expected '{}' opened on line {}",
                        block.kind.name(),
                        block.line
                    ),
                ));
            }

            let node = match block.kind {
                BlockKind::Each => Node::Each {
                    path: block.path,
                    line: block.line,
                    body: block.then,
                },
                BlockKind::If | BlockKind::Unless => Node::If {
                    path: block.path,
                    line: block.line,
                    negate: block.kind == BlockKind::Unless,
                    then: block.then,
                    otherwise: block.otherwise.unwrap_or_default(),
                },
            };
            current(&mut root, &mut stack).push(node);
            continue;
        }

        current(&mut root, &mut stack).push(Node::Var { path: inner, line });
    }

    if let Some(block) = stack.pop() {
        return Err(template_error(
            name,
            block.line,
            format!("unclosed block '{}'", block.kind.name()),
        ));
    }

    Ok(root)
}

fn current<'a>(root: &'a mut Vec<Node>, stack: &'a mut [OpenBlock]) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(block) => block.nodes(),
        None => root,
    }
}

fn split_keyword(tag: &str) -> (&str, &str) {
    match tag.split_once(char::is_whitespace) {
        Some((keyword, path)) => (keyword, path.trim()),
        None => (tag, ""),
    }
}

///
/// Rendering
///

struct Scope<'a> {
    value: &'a Value,
    index: Option<(usize, usize)>, // (position, length) inside an each
}

fn render_nodes<'a>(
    name: &str,
    nodes: &[Node],
    scopes: &mut Vec<Scope<'a>>,
    out: &mut String,
) -> Result<()> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var { path, line } => {
                let value = resolve(scopes, path)
                    .ok_or_else(|| template_error(name, *line, format!("unknown variable '{path}'")))?;
                write_value(out, &value);
            }
            Node::If {
                path,
                line,
                negate,
                then,
                otherwise,
            } => {
                let value = resolve(scopes, path)
                    .ok_or_else(|| template_error(name, *line, format!("unknown variable '{path}'")))?;
                let branch = if truthy(&value) != *negate { then } else { otherwise };
                render_nodes(name, branch, scopes, out)?;
            }
            Node::Each { path, line, body } => {
                let items = lookup(scopes, path)
                    .ok_or_else(|| template_error(name, *line, format!("unknown variable '{path}'")))?;
                let items = items
                    .as_array()
                    .ok_or_else(|| template_error(name, *line, format!("'{path}' is not a list")))?;

                for (idx, item) in items.iter().enumerate() {
                    scopes.push(Scope {
                        value: item,
                        index: Some((idx, items.len())),
                    });
                    let rendered = render_nodes(name, body, scopes, out);
                    scopes.pop();
                    rendered?;
                }
            }
        }
    }

    Ok(())
}

fn resolve(scopes: &[Scope<'_>], path: &str) -> Option<Value> {
    if let Some(var) = path.strip_prefix('@') {
        let (idx, len) = scopes.iter().rev().find_map(|scope| scope.index)?;
        return match var {
            "index" => Some(Value::from(idx)),
            "number" => Some(Value::from(idx + 1)),
            "first" => Some(Value::Bool(idx == 0)),
            "last" => Some(Value::Bool(idx + 1 == len)),
            _ => None,
        };
    }

    lookup(scopes, path).cloned()
}

fn lookup<'a>(scopes: &[Scope<'a>], path: &str) -> Option<&'a Value> {
    let top = scopes.last()?.value;

    if path == "this" || path == "." {
        return Some(top);
    }
    if let Some(rest) = path.strip_prefix("this.") {
        return descend(top, rest);
    }

    let (first, rest) = match path.split_once('.') {
        Some((first, rest)) => (first, Some(rest)),
        None => (path, None),
    };

    // the innermost scope defining the first segment wins
    let value = scopes.iter().rev().find_map(|scope| scope.value.get(first))?;

    match rest {
        Some(rest) => descend(value, rest),
        None => Some(value),
    }
}

fn descend<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        other => out.push_str(&other.to_string()),
    }
}

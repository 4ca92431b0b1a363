//! Grammar rules built on top of the recognizers in [`crate::scan`].
//!
//! ```text
//! command = name { arg } { kwarg }
//! arg     = flag | value
//! flag    = '-' char
//! kwarg   = '--' symbol { value }
//! name    = letter { symbol }
//! value   = symbol { symbol } | quoted
//! quoted  = "'" any "'" | '"' any '"'
//! symbol  = letter | digit | '_'
//! ```
//!
//! Every rule maps text to `(Option<Node>, rest)`; `None` means "no match"
//! and leaves the text untouched. Rules are tried at the front of the text
//! only.

use crate::{
    error::ParseError,
    scan,
    tree::{Node, Tree},
};

pub type Step = Result<(Option<Node>, String), ParseError>;
pub type Rule = fn(&str) -> Step;

fn no_match(text: &str) -> Step {
    Ok((None, text.to_string()))
}

/// Applies `rule` to trimmed `text`. Empty text never matches.
pub fn parse(rule: Rule, text: &str) -> Step {
    let text = text.trim();
    if text.is_empty() {
        return Ok((None, String::new()));
    }
    rule(text)
}

/// Applies `rule` until it stops matching, collecting nodes in order.
pub fn exhaust(rule: Rule, text: &str) -> Result<(Vec<Node>, String), ParseError> {
    let mut res = Vec::new();
    let mut text = text.to_string();
    loop {
        match parse(rule, &text)? {
            (Some(node), rest) => {
                res.push(node);
                text = rest;
            }
            (None, _) => return Ok((res, text)),
        }
    }
}

pub fn value(text: &str) -> Step {
    if text.starts_with(scan::is_quote) {
        return match scan::quoted(text)? {
            Some((content, rest)) => Ok((Some(Node::Value(content.to_string())), rest.to_string())),
            None => no_match(text),
        };
    }
    match scan::bare(text) {
        Some((word, rest)) => Ok((Some(Node::Value(word.to_string())), rest.to_string())),
        None => no_match(text),
    }
}

pub fn flag(text: &str) -> Step {
    match scan::short_flag(text) {
        Some((flag, rest)) => Ok((Some(Node::Flag(flag)), rest)),
        None => no_match(text),
    }
}

pub fn kwarg(text: &str) -> Step {
    let Some((key, rest)) = scan::long_key(text) else {
        return no_match(text);
    };
    let (node, rest) = match parse(value, rest)? {
        (Some(Node::Value(value)), tail) => (Node::kwarg(key, Some(value)), tail),
        _ => (Node::kwarg(key, None), rest.to_string()),
    };
    Ok((Some(node), rest))
}

pub fn name(text: &str) -> Step {
    let (word, rest) = scan::word(text);
    if scan::is_name(word) {
        Ok((Some(Node::Tree(Tree::leaf(word))), rest.to_string()))
    } else {
        no_match(text)
    }
}

/// Flags take priority over values.
pub fn arg(text: &str) -> Step {
    if let (Some(node), rest) = parse(flag, text)? {
        return Ok((Some(node), rest));
    }
    parse(value, text)
}

/// The argument list of a command.
///
/// Flags and values come first, then kwargs, whatever their order in the
/// text was. After the kwargs the scan starts over, so `--to me hello`
/// still picks up `hello`.
pub fn args(text: &str) -> Result<(Vec<Node>, String), ParseError> {
    let mut positional = Vec::new();
    let mut kwargs = Vec::new();
    let mut text = text.to_string();
    loop {
        let (mut args, rest) = exhaust(arg, &text)?;
        let (mut keys, rest) = exhaust(kwarg, &rest)?;
        let progress = !args.is_empty() || !keys.is_empty();
        positional.append(&mut args);
        kwargs.append(&mut keys);
        text = rest;
        if !progress {
            break;
        }
    }
    positional.append(&mut kwargs);
    Ok((positional, text))
}

pub fn command(text: &str) -> Step {
    let (name, tail) = match parse(name, text)? {
        (Some(Node::Tree(tree)), tail) => (tree, tail),
        _ => return no_match(text),
    };
    let (children, rest) = args(&tail)?;
    let name = name.root().unwrap_or_default().to_string();
    Ok((Some(Node::Tree(Tree::new(name, children))), rest))
}

/// Parses one full command line, rejecting anything left unconsumed.
pub fn parse_command(line: &str) -> Result<Tree, ParseError> {
    match parse(command, line)? {
        (Some(Node::Tree(tree)), rest) => {
            let rest = rest.trim();
            if rest.is_empty() {
                Ok(tree)
            } else {
                Err(ParseError::UnexpectedInput { rest: rest.to_string() })
            }
        }
        _ => {
            let (found, _) = scan::word(line.trim());
            if found.is_empty() {
                Err(ParseError::EmptyInput)
            } else {
                Err(ParseError::MissingName { found: found.to_string() })
            }
        }
    }
}

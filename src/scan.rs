//! Token recognizers.
//!
//! Each recognizer looks at the front of a string and either returns the
//! token it found together with the unconsumed rest, or `None`. Only the
//! quoted-literal recognizer can fail.

use crate::error::ParseError;

pub const KEY_PREFIX: &str = "--";
pub const FLAG_PREFIX: char = '-';

const QUOTES: [char; 2] = ['\'', '"'];

pub fn is_quote(c: char) -> bool {
    QUOTES.contains(&c)
}

pub fn is_key(text: &str) -> bool {
    text.starts_with(KEY_PREFIX)
}

pub fn is_flag(text: &str) -> bool {
    text.starts_with(FLAG_PREFIX)
}

/// Letters, digits and `_`, at least one of them.
pub fn is_symbol(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

pub fn is_name(text: &str) -> bool {
    is_symbol(text) && text.starts_with(char::is_alphabetic)
}

/// Splits off the first whitespace-delimited word, dropping the separator.
pub fn word(text: &str) -> (&str, &str) {
    match text.char_indices().find(|(_, c)| c.is_whitespace()) {
        Some((idx, sep)) => (&text[..idx], &text[idx + sep.len_utf8()..]),
        None => (text, ""),
    }
}

/// Finds the earliest quote character and its closing partner.
///
/// Returns the content strictly between the two quotes and everything after
/// the closing one. Whatever precedes the opening quote is dropped, so
/// callers only get the full effect at the very front of the text.
pub fn quoted(text: &str) -> Result<Option<(&str, &str)>, ParseError> {
    let Some((open, quote)) = text.char_indices().find(|&(_, c)| is_quote(c)) else {
        return Ok(None);
    };
    let start = open + quote.len_utf8();
    let Some(len) = text[start..].find(quote) else {
        return Err(ParseError::UnterminatedQuote { quote, text: text.to_string() });
    };
    let close = start + len;
    Ok(Some((&text[start..close], &text[close + quote.len_utf8()..])))
}

/// A bare word of letters, digits and `_`.
pub fn bare(text: &str) -> Option<(&str, &str)> {
    if text.starts_with(is_quote) || is_flag(text) {
        return None;
    }
    let (word, rest) = word(text);
    if is_symbol(word) {
        Some((word, rest))
    } else {
        None
    }
}

/// Peels one letter off a short flag cluster.
///
/// `-rf x` gives `r` and leaves `-f x`, `-f x` gives `f` and leaves `x`.
pub fn short_flag(text: &str) -> Option<(char, String)> {
    let tail = text.strip_prefix(FLAG_PREFIX)?;
    let mut chars = tail.chars();
    let flag = chars.next().filter(|c| c.is_alphanumeric())?;
    let tail = chars.as_str();
    let rest = match tail.chars().next() {
        None => String::new(),
        Some(c) if c.is_whitespace() => tail.trim_start().to_string(),
        Some(_) => format!("{FLAG_PREFIX}{tail}"),
    };
    Some((flag, rest))
}

/// The key of a `--key` token.
pub fn long_key(text: &str) -> Option<(&str, &str)> {
    let tail = text.strip_prefix(KEY_PREFIX)?;
    let (key, rest) = word(tail);
    if is_symbol(key) {
        Some((key, rest))
    } else {
        None
    }
}

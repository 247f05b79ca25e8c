//! Delimited record splitting and its qualifier-aware inverse.
//!
//! Tokens are separated by the delimiter outside qualified sections. A token
//! that starts with the qualifier is qualified: inside it the delimiter and
//! line breaks are literal and a doubled qualifier stands for one qualifier.
//! Text between a closing qualifier and the next delimiter is kept as-is,
//! as are qualifiers inside an unqualified token.

use thiserror::Error;

/// Splitter failure on an assembled record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// A qualified token was never closed within the supplied text.
    #[error("qualified field {token} is not closed")]
    UnclosedQualifier { token: usize },
}

/// Split one logical record into raw tokens.
///
/// An empty delimiter yields the whole text as a single token; an empty
/// qualifier disables qualified tokens.
pub fn split_record(
    text: &str,
    delimiter: &str,
    qualifier: &str,
) -> Result<Vec<String>, SplitError> {
    if delimiter.is_empty() {
        return Ok(vec![text.to_string()]);
    }
    let mut tokens = Vec::new();
    let mut rest = text;
    loop {
        let (token, remainder) = next_token(rest, delimiter, qualifier, tokens.len())?;
        tokens.push(token);
        match remainder {
            Some(remainder) => rest = remainder,
            None => return Ok(tokens),
        }
    }
}

/// Read one token; the remainder is `None` when no delimiter follows it.
fn next_token<'a>(
    input: &'a str,
    delimiter: &str,
    qualifier: &str,
    index: usize,
) -> Result<(String, Option<&'a str>), SplitError> {
    let mut token = String::new();
    let mut pos = 0;

    if !qualifier.is_empty() && input.starts_with(qualifier) {
        pos = qualifier.len();
        loop {
            let found = input[pos..]
                .find(qualifier)
                .ok_or(SplitError::UnclosedQualifier { token: index })?;
            token.push_str(&input[pos..pos + found]);
            pos += found + qualifier.len();
            if input[pos..].starts_with(qualifier) {
                token.push_str(qualifier);
                pos += qualifier.len();
            } else {
                break;
            }
        }
    }

    let tail = &input[pos..];
    match tail.find(delimiter) {
        Some(end) => {
            token.push_str(&tail[..end]);
            Ok((token, Some(&tail[end + delimiter.len()..])))
        }
        None => {
            token.push_str(tail);
            Ok((token, None))
        }
    }
}

/// Join tokens into one record that [`split_record`] reads back unchanged.
///
/// A token is qualified when it contains the delimiter, a line break or the
/// qualifier; embedded qualifiers are doubled. A lone empty token is written
/// as two qualifiers so the record is never a blank line. With a multi-character
/// delimiter any token containing one of its characters is qualified, so a
/// delimiter can never be matched across a token boundary.
pub fn join_record<S: AsRef<str>>(tokens: &[S], delimiter: &str, qualifier: &str) -> String {
    let mut out = String::new();
    for (idx, token) in tokens.iter().enumerate() {
        if idx > 0 {
            out.push_str(delimiter);
        }
        let token = token.as_ref();
        let lone_empty = tokens.len() == 1 && token.is_empty() && !qualifier.is_empty();
        if lone_empty || needs_qualifier(token, delimiter, qualifier) {
            out.push_str(qualifier);
            out.push_str(&token.replace(qualifier, &qualifier.repeat(2)));
            out.push_str(qualifier);
        } else {
            out.push_str(token);
        }
    }
    out
}

fn needs_qualifier(token: &str, delimiter: &str, qualifier: &str) -> bool {
    if qualifier.is_empty() {
        return false;
    }
    let has_delimiter = if delimiter.chars().count() > 1 {
        token.chars().any(|ch| delimiter.contains(ch))
    } else {
        !delimiter.is_empty() && token.contains(delimiter)
    };
    has_delimiter
        || token.contains(qualifier)
        || token.contains(['\n', '\r'])
}

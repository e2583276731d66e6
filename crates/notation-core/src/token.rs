//! Tokenizer for portable game notation text.
//!
//! Produces the flat ordered token stream the parser consumes. Suffix
//! glyphs attached to a move (`e4!?`) are split into the move token plus
//! the equivalent numeric glyph token, so downstream code only ever deals
//! with numeric codes.

use crate::annotation::MoveQuality;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    San(String),
    Comment(String),
    ParenOpen,
    ParenClose,
    Nag(u16),
    Header(String, String),
    Outcome(String),
}

const WORD_DELIMITERS: &[char] = &['(', ')', '{', '}', '[', ']', '$', ';'];

/// Tokenize notation text. Never fails: malformed stretches are skipped,
/// an unterminated comment runs to the end of the text.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = text;
    let mut at_line_start = true;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            at_line_start = c == '\n';
            rest = &rest[c.len_utf8()..];
            continue;
        }
        let was_line_start = at_line_start;
        at_line_start = false;

        match c {
            '{' => {
                let body = &rest[1..];
                match body.find('}') {
                    Some(end) => {
                        tokens.push(Token::Comment(body[..end].trim().to_string()));
                        rest = &body[end + 1..];
                    }
                    None => {
                        tokens.push(Token::Comment(body.trim().to_string()));
                        rest = "";
                    }
                }
            }
            '(' => {
                tokens.push(Token::ParenOpen);
                rest = &rest[1..];
            }
            ')' => {
                tokens.push(Token::ParenClose);
                rest = &rest[1..];
            }
            '$' => {
                let body = &rest[1..];
                let digits = body.chars().take_while(char::is_ascii_digit).count();
                if digits > 0 {
                    if let Ok(code) = body[..digits].parse::<u16>() {
                        tokens.push(Token::Nag(code));
                    }
                }
                rest = &body[digits..];
            }
            '[' => {
                rest = match read_header(rest) {
                    Some((token, remainder)) => {
                        tokens.push(token);
                        remainder
                    }
                    None => &rest[1..],
                };
            }
            ';' => {
                // Rest-of-line comment.
                let end = rest.find('\n').unwrap_or(rest.len());
                let body = rest[1..end].trim();
                if !body.is_empty() {
                    tokens.push(Token::Comment(body.to_string()));
                }
                rest = &rest[end..];
            }
            '%' if was_line_start => {
                // Escape line, ignored wholesale.
                let end = rest.find('\n').unwrap_or(rest.len());
                rest = &rest[end..];
            }
            _ => {
                let end = rest
                    .find(|ch: char| ch.is_whitespace() || WORD_DELIMITERS.contains(&ch))
                    .unwrap_or(rest.len());
                classify_word(&rest[..end], &mut tokens);
                rest = &rest[end..];
            }
        }
    }
    tokens
}

/// Read one `[Tag "value"]` pair starting at `text` (which begins with
/// `[`). Returns the token plus the remainder after the closing bracket.
fn read_header(text: &str) -> Option<(Token, &str)> {
    let end = text.find(']')?;
    let inner = &text[1..end];
    let space = inner.find(char::is_whitespace)?;
    let tag = &inner[..space];
    let value = inner[space..].trim();
    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    let value = value.strip_prefix('"')?.strip_suffix('"')?;
    Some((
        Token::Header(tag.to_string(), value.to_string()),
        &text[end + 1..],
    ))
}

fn classify_word(word: &str, tokens: &mut Vec<Token>) {
    match word {
        "" => {}
        "1-0" | "0-1" | "1/2-1/2" | "*" => tokens.push(Token::Outcome(word.to_string())),
        _ => {
            // Strip a glued move number ("1.e4", "3...Nf6").
            let body = word
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches('.');
            if body.is_empty() {
                return; // bare move number
            }
            // Split a trailing !/? suffix run off the move text.
            let suffix_start = body
                .char_indices()
                .rev()
                .take_while(|(_, c)| *c == '!' || *c == '?')
                .last()
                .map(|(i, _)| i)
                .unwrap_or(body.len());
            let (san, suffix) = body.split_at(suffix_start);
            if !san.is_empty() {
                tokens.push(Token::San(san.to_string()));
            }
            if let Some(q) = MoveQuality::from_suffix(suffix) {
                if !san.is_empty() {
                    tokens.push(Token::Nag(q.nag()));
                }
            }
        }
    }
}

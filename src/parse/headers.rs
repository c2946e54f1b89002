//! Header section parsing
//!
//! `name: value;` pairs up to the `%%` separator line. Values may span
//! several lines until an unescaped `;` (`;;` is accepted as the same
//! terminator). Comments are recorded wherever they appear.

use crate::models::{HeaderEntry, ParsedDocument};
use crate::text::{Range, Scanner};

use super::errors::ParseIssue;
use super::read_comment;

/// Line separating headers from the body
pub const SECTION_SEPARATOR: &str = "%%";

fn is_separator_line(line: &str) -> bool {
    line.strip_suffix('\r').unwrap_or(line) == SECTION_SEPARATOR
}

/// True when `text` contains a separator line, i.e. has a header section
pub fn has_separator(text: &str) -> bool {
    text.split('\n').any(is_separator_line)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Consume the header section including the separator line.
///
/// Never fails; characters that start no header or comment are skipped one
/// at a time.
pub fn parse_headers(scanner: &mut Scanner, doc: &mut ParsedDocument) {
    while !scanner.is_eof() {
        if scanner.at_line_start() && is_separator_line(&scanner.rest_of_line()) {
            scanner.take_line();
            scanner.bump();
            return;
        }

        match scanner.peek() {
            Some(c) if c.is_whitespace() => {
                scanner.bump();
            }
            Some('%') => {
                let comment = read_comment(scanner);
                doc.comments.push(comment);
            }
            Some(c) if is_name_char(c) => header(scanner, doc),
            _ => {
                scanner.bump();
            }
        }
    }
}

fn header(scanner: &mut Scanner, doc: &mut ParsedDocument) {
    let start = scanner.position();
    let name = scanner.take_while(is_name_char);
    if scanner.peek() != Some(':') {
        log::trace!("skipping '{}' outside of a header", name);
        return;
    }
    scanner.bump();

    let mut value = String::new();
    let mut terminated = false;
    while let Some(c) = scanner.peek() {
        if scanner.at_line_start() && is_separator_line(&scanner.rest_of_line()) {
            break;
        }
        match c {
            '\\' if scanner.peek_at(1) == Some(';') => {
                value.push(';');
                scanner.bump_n(2);
            }
            ';' => {
                scanner.bump();
                if scanner.peek() == Some(';') {
                    scanner.bump();
                }
                terminated = true;
                break;
            }
            '%' => {
                let comment = read_comment(scanner);
                doc.comments.push(comment);
            }
            '\r' => {
                scanner.bump();
            }
            _ => {
                value.push(c);
                scanner.bump();
            }
        }
    }

    let range = Range::new(start, scanner.position());
    if !terminated {
        let issue = ParseIssue::UnterminatedHeader { name: name.clone() };
        doc.parse_errors.push(issue.at(range));
    }

    let name = name.to_ascii_lowercase();
    let value = value.trim().to_string();
    if doc.headers.insert(name.clone(), value.clone()).is_some() {
        log::debug!("header '{}' redefined", name);
    }
    doc.header_entries.push(HeaderEntry { name, value, range });
}

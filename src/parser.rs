use std::collections::HashMap;

use tracing::trace;

use crate::Capacity;
use crate::section::Section;

/// Markers that start a comment running to the end of the line.
const COMMENT_CHARS: [char; 2] = [';', '#'];
const COMMENT_SLASHES: &str = "//";

/// The shape of a single line after comments and surrounding whitespace are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    Blank,
    Header(&'a str),
    /// A `[` with no `]` after it.
    UnterminatedHeader,
    Pair(&'a str, &'a str),
    Other,
}

/// Represents an on-going parse.
#[derive(Debug, Clone)]
pub(crate) struct Parser<'a> {
    text: &'a str,
    capacity: Capacity,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(text: &'a str, capacity: Capacity) -> Self {
        Self { text, capacity }
    }
}

impl Parser<'_> {
    /// Runs every line through [`classify`] and collects the resulting sections.
    pub fn into_sections(self) -> HashMap<String, Section> {
        let Capacity { sections: n_sections, keys: n_keys } = self.capacity.clamped();
        let mut sections = HashMap::<String, Section>::with_capacity(n_sections);

        // Lines before the first header belong to the implicit, empty-named section.
        let mut current = String::new();

        for (number, line) in lines(self.text).enumerate() {
            match classify(line) {
                Line::Header(name) => {
                    // Reopening a section keeps accumulating into the same map.
                    sections
                        .entry(name.to_owned())
                        .or_insert_with(|| Section::new(name.to_owned(), n_keys));
                    name.clone_into(&mut current);
                }
                Line::Pair(key, value) => {
                    sections
                        .entry(current.clone())
                        .or_insert_with(|| Section::new(current.clone(), n_keys))
                        .insert(key.to_owned(), value.to_owned());
                }
                Line::UnterminatedHeader => {
                    trace!(line = number + 1, "discarding unterminated section header");
                }
                Line::Blank | Line::Other => {}
            }
        }

        sections
    }
}

/// Splits on `\n`, `\r\n` and lone `\r`.
fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().flat_map(|line| line.split('\r'))
}

/// Classifies one line of input.
///
/// A line containing `[` is only ever a header (or a malformed one); `=` is not looked at.
pub(crate) fn classify(line: &str) -> Line<'_> {
    let line = strip_comment(line).trim_matches(is_blank);

    if line.is_empty() {
        return Line::Blank;
    }

    if let Some(open) = line.find('[') {
        return match line[open..].find(']') {
            Some(len) => Line::Header(line[open + 1..open + len].trim_matches(is_blank)),
            None => Line::UnterminatedHeader,
        };
    }

    match line.split_once('=') {
        Some((key, value)) => {
            Line::Pair(key.trim_matches(is_blank), value.trim_matches(is_blank))
        }
        None => Line::Other,
    }
}

/// Truncates `line` at the earliest comment marker.
///
/// `;` and `#` are searched for together and `//` separately; whichever comes first wins.
pub(crate) fn strip_comment(line: &str) -> &str {
    let end = [line.find(COMMENT_CHARS), line.find(COMMENT_SLASHES)]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());

    &line[..end]
}

/// The C locale's blank characters: space, `\t`, `\n`, `\v`, `\f` and `\r`.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

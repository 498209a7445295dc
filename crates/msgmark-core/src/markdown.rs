//! The Markdown dialect: a single-pass delimiter scanner and the matching
//! encoder.
//!
//! The scanner walks the UTF-16 unit buffer once, keeping a stack of open
//! delimiters. Delimiter text is excised from the buffer the moment it is
//! recognized, so every recorded offset is already an offset into the final
//! plain text and never needs fixing up afterwards.

use once_cell::sync::Lazy;

use crate::dialect::Dialect;
use crate::entity::{Entity, EntityKind, strip_parsed_text};
use crate::error::ParseError;
use crate::units::{from_units, to_units};

/// The Markdown markup dialect. Stateless; see [`Dialect`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownDialect;

/// Decodes markdown markup into plain text plus entities.
///
/// The only rejected input is broken link syntax: an unmatched `]`, or a
/// `]` not immediately followed by `(url)`. An opening delimiter that never
/// finds its partner produces no entity and its text is not restored; it
/// silently disappears from the output.
pub fn parse(text: &str) -> Result<(String, Vec<Entity>), ParseError> {
    if text.is_empty() {
        return Ok((String::new(), Vec::new()));
    }
    let mut scanner = Scanner::new(text);
    scanner.run()?;

    let Scanner {
        buf: mut units,
        mut entities,
        ..
    } = scanner;
    strip_parsed_text(&mut units, &mut entities);
    Ok((from_units(&units), entities))
}

/// Renders plain text plus entities as markdown markup.
pub fn unparse(text: &str, entities: &[Entity]) -> String {
    MarkdownDialect.unparse(text, entities)
}

const BACKSLASH: u16 = b'\\' as u16;
const CARRIAGE_RETURN: u16 = b'\r' as u16;
const NEWLINE: u16 = b'\n' as u16;
const OPEN_BRACKET: u16 = b'[' as u16;
const CLOSE_BRACKET: u16 = b']' as u16;
const OPEN_PAREN: u16 = b'(' as u16;
const CLOSE_PAREN: u16 = b')' as u16;

const QUOTABLE: &[char] = &['_', '*', '[', ']', '(', ')', '~', '`', '|', '\\'];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Delim {
    Pre,
    Underline,
    Spoiler,
    Bold,
    Italic,
    Strike,
    Code,
    LinkStart,
}

impl Delim {
    fn len(self) -> usize {
        match self {
            Delim::Pre => 3,
            Delim::Underline | Delim::Spoiler => 2,
            _ => 1,
        }
    }

    /// Code and pre bodies are verbatim: no escapes, no nested delimiters.
    fn is_verbatim(self) -> bool {
        matches!(self, Delim::Pre | Delim::Code)
    }

    fn entity_kind(self) -> Option<EntityKind> {
        match self {
            Delim::Underline => Some(EntityKind::Underline),
            Delim::Spoiler => Some(EntityKind::Spoiler),
            Delim::Bold => Some(EntityKind::Bold),
            Delim::Italic => Some(EntityKind::Italic),
            Delim::Strike => Some(EntityKind::Strike),
            Delim::Code => Some(EntityKind::Code),
            Delim::Pre | Delim::LinkStart => None,
        }
    }
}

// Longest first, so a fence is never read as an inline backtick and `__`
// is never read as two italics.
static DELIMITERS: Lazy<Vec<(Vec<u16>, Delim)>> = Lazy::new(|| {
    [
        ("```", Delim::Pre),
        ("__", Delim::Underline),
        ("||", Delim::Spoiler),
        ("*", Delim::Bold),
        ("_", Delim::Italic),
        ("~", Delim::Strike),
        ("`", Delim::Code),
    ]
    .into_iter()
    .map(|(pattern, delim)| (pattern.encode_utf16().collect(), delim))
    .collect()
});

/// Single-shot scan state; one scanner per parse call.
struct Scanner {
    buf: Vec<u16>,
    pos: usize,
    stack: Vec<(Delim, usize)>,
    entities: Vec<Entity>,
}

impl Scanner {
    fn new(text: &str) -> Self {
        Self {
            buf: to_units(text),
            pos: 0,
            stack: Vec::new(),
            entities: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while self.pos < self.buf.len() {
            let top = self.stack.last().map(|&(delim, _)| delim);
            let verbatim = top.is_some_and(Delim::is_verbatim);
            let unit = self.buf[self.pos];

            if !verbatim && unit == BACKSLASH {
                // Drop the backslash; whatever follows is literal.
                self.buf.remove(self.pos);
                self.pos += 1;
                continue;
            }
            if !verbatim && unit == CARRIAGE_RETURN {
                // An invisible separator between adjacent `_` and `__`
                // delimiters; it never reaches the output text.
                self.buf.remove(self.pos);
                continue;
            }

            if let Some(delim) = self.match_delimiter() {
                if Some(delim) == top {
                    self.close(delim);
                } else if verbatim {
                    self.pos += delim.len();
                } else {
                    self.stack.push((delim, self.pos));
                    self.buf.drain(self.pos..self.pos + delim.len());
                }
                continue;
            }

            if !verbatim && unit == OPEN_BRACKET {
                self.stack.push((Delim::LinkStart, self.pos));
                self.buf.remove(self.pos);
                continue;
            }
            if !verbatim && unit == CLOSE_BRACKET {
                self.close_link()?;
                continue;
            }

            self.pos += 1;
        }
        Ok(())
    }

    fn match_delimiter(&self) -> Option<Delim> {
        let rest = &self.buf[self.pos..];
        DELIMITERS
            .iter()
            .find(|(pattern, _)| rest.starts_with(pattern))
            .map(|&(_, delim)| delim)
    }

    fn close(&mut self, delim: Delim) {
        let Some((_, start)) = self.stack.pop() else {
            return;
        };
        if delim == Delim::Pre {
            self.close_fence(start);
            return;
        }
        self.buf.drain(self.pos..self.pos + delim.len());
        if let Some(kind) = delim.entity_kind() {
            self.entities
                .push(Entity::new(start, self.pos - start, kind));
        }
    }

    /// `]` must close a `[` on top of the stack and be followed by
    /// `(url)`; anything else rejects the whole input.
    fn close_link(&mut self) -> Result<(), ParseError> {
        let error = ParseError::MalformedLinkSyntax { offset: self.pos };
        match self.stack.last().copied() {
            Some((Delim::LinkStart, start)) => {
                if self.buf.get(self.pos + 1) != Some(&OPEN_PAREN) {
                    return Err(error);
                }
                self.stack.pop();

                // The target runs to the first `)`; backslashes are literal
                // here, escapes only apply to visible text.
                let mut scan = self.pos + 2;
                loop {
                    match self.buf.get(scan).copied() {
                        None => return Err(error),
                        Some(CLOSE_PAREN) => break,
                        Some(_) => scan += 1,
                    }
                }
                let url = self.buf[self.pos + 2..scan].to_vec();

                self.entities.push(Entity::new(
                    start,
                    self.pos - start,
                    EntityKind::TextUrl {
                        url: from_units(&url),
                    },
                ));
                self.buf.drain(self.pos..=scan);
                Ok(())
            }
            _ => Err(error),
        }
    }

    /// Closes a ``` span: the first line becomes the language when it looks
    /// like an identifier, and one newline is trimmed from each end of the
    /// remaining content.
    fn close_fence(&mut self, start: usize) {
        let span = self.buf[start..self.pos].to_vec();
        let first_line = span
            .split(|&unit| unit == NEWLINE)
            .next()
            .unwrap_or_default();

        let (language, mut content_start) = if is_language_tag(first_line) {
            (from_units(first_line), first_line.len())
        } else {
            (String::new(), 0)
        };
        if span.get(content_start) == Some(&NEWLINE) {
            content_start += 1;
        }
        let mut content_end = span.len();
        if content_end > content_start && span[content_end - 1] == NEWLINE {
            content_end -= 1;
        }
        let content = &span[content_start..content_end];

        self.entities.push(Entity::new(
            start,
            content.len(),
            EntityKind::Pre { language },
        ));
        self.buf
            .splice(start..self.pos + Delim::Pre.len(), content.iter().copied());
        self.pos = start + content.len();
    }
}

fn is_language_tag(units: &[u16]) -> bool {
    !units.is_empty()
        && units.len() <= 64
        && units.iter().all(|&unit| {
            char::from_u32(u32::from(unit))
                .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
        })
}

impl Dialect for MarkdownDialect {
    fn apply_entity(&self, entity: &Entity, inner: &str) -> String {
        match &entity.kind {
            EntityKind::Bold => format!("*{inner}*"),
            EntityKind::Italic => {
                let open = if inner.starts_with('_') { "_\r" } else { "_" };
                let close = if needs_separator(inner) { "\r_" } else { "_" };
                format!("{open}{inner}{close}")
            }
            EntityKind::Underline => {
                let close = if needs_separator(inner) { "\r__" } else { "__" };
                format!("__{inner}{close}")
            }
            EntityKind::Strike => format!("~{inner}~"),
            EntityKind::Spoiler => format!("||{inner}||"),
            EntityKind::Code => format!("`{inner}`"),
            EntityKind::Pre { language } => {
                if language.is_empty() {
                    format!("```\n{inner}\n```")
                } else {
                    format!("```{language}\n{inner}\n```")
                }
            }
            EntityKind::TextUrl { url } => format!("[{inner}]({url})"),
            EntityKind::Email => format!("[{inner}](mailto:{inner})"),
            EntityKind::MentionName { user_id } => format!("[{inner}](tg://user?id={user_id})"),
            EntityKind::CustomEmoji { document_id } => {
                format!("[{inner}](tg://emoji?id={document_id})")
            }
            _ => self.quote(inner, None),
        }
    }

    fn quote(&self, text: &str, parent: Option<&Entity>) -> String {
        let verbatim = parent.is_some_and(|entity| {
            matches!(entity.kind, EntityKind::Code | EntityKind::Pre { .. })
        });
        if verbatim {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            if QUOTABLE.contains(&ch) {
                out.push('\\');
            }
            out.push(ch);
        }
        out
    }

    fn parse(&self, text: &str) -> Result<(String, Vec<Entity>), ParseError> {
        parse(text)
    }
}

/// True when re-parsing `inner` directly against a closing `_` or `__`
/// would merge the two into a longer delimiter run: the inner text ends
/// with a single unescaped `_`. A trailing `__` is an underline closing
/// whose pop already restores the right stack top, and an escaped `_` is
/// literal text; neither needs the `\r` separator.
fn needs_separator(inner: &str) -> bool {
    if !inner.ends_with('_') || inner.ends_with("__") {
        return false;
    }
    let backslashes = inner[..inner.len() - 1]
        .chars()
        .rev()
        .take_while(|&ch| ch == '\\')
        .count();
    backslashes % 2 == 0
}

use thiserror::Error;

/// Errors surfaced by [`Dialect::parse`](crate::Dialect::parse).
///
/// Only markdown link syntax is strict enough to reject input; everything
/// else in either dialect degrades to a best-effort result instead.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    /// An unmatched `]`, or a `]` not immediately followed by `(url)`.
    #[error("malformed link syntax at unit {offset}")]
    MalformedLinkSyntax { offset: usize },
}

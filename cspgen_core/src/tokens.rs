use std::borrow::Cow;

/// The role a token plays in the stream produced by
/// [`tokenize`](crate::tokenize).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	/// Host C++ code reproduced unchanged in the generated file.
	Verbatim,
	/// Template text produced as output data at runtime.
	Text,
	/// One comma-separated expression of a placeholder, before any backtick.
	PlaceholderArgument,
	/// One expression after the first backtick, applied to the formatted
	/// value.
	PlaceholderFilter,
	/// The closing `}` of a placeholder. Carries no text.
	PlaceholderEnd,
}

/// A single token, borrowing its text from the template where possible.
///
/// Tokens are only valid as long as the template source they were cut from.
/// The text is owned in exactly one case: a `$$` escape inside a text region
/// merges the surrounding runs into a single token, which cannot be expressed
/// as one slice of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
	/// What this token contributes to the translation.
	pub kind: TokenKind,
	/// The token's content. Empty only for [`TokenKind::PlaceholderEnd`] and
	/// for an explicit empty filter (a trailing backtick).
	pub text: Cow<'a, str>,
	/// 1-based line number of the token's first byte.
	pub line: usize,
}

impl<'a> Token<'a> {
	pub fn new(kind: TokenKind, text: impl Into<Cow<'a, str>>, line: usize) -> Self {
		Self {
			kind,
			text: text.into(),
			line,
		}
	}

	/// Whether the token carries any content.
	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}
}

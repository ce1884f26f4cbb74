use std::borrow::Cow;
use std::path::Path;

use crate::CspError;
use crate::CspResult;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// Maximum bracket nesting inside a single placeholder expression.
const MAX_SUBEXPRESSION_DEPTH: usize = 64;

/// Tokenize a template, yielding tokens lazily.
///
/// The returned [`Lexer`] borrows `source`; `path` only appears in
/// diagnostics. The stream starts in verbatim (host C++) mode, switches to
/// text at `{{`, and recognises `${...}` placeholders, `$`-introduced host
/// lines, and `$$` dollar escapes inside text.
pub fn tokenize<'a>(source: &'a str, path: impl AsRef<Path>) -> Lexer<'a> {
	Lexer::new(source, path.as_ref().display().to_string())
}

/// The macro mode the scanner is in between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
	/// Host C++ code; the whole template starts here.
	Verbatim,
	/// Template text between `{{` and `}}`.
	Text,
	/// A single host line introduced by `$`, up to and including its newline.
	LineVerbatim,
	/// Inside `${ ... }`.
	Placeholder,
	/// Input exhausted, or a fatal error was already reported.
	Done,
}

/// A lazy tokenizer over a CSP template.
///
/// Yields `CspResult<Token>`; the first error fuses the iterator. Each call
/// advances the state machine just far enough to produce one token.
#[derive(Debug)]
pub struct Lexer<'a> {
	input: &'a str,
	/// Current byte offset into `input`.
	pos: usize,
	/// 1-based line number at `pos`.
	line: usize,
	mode: Mode,
	/// The first backtick of the current placeholder has been seen; every
	/// later segment is a filter.
	in_filter: bool,
	/// A backtick was seen and no segment has been emitted since. Materialises
	/// as an empty filter token when the placeholder closes.
	backtick_pending: bool,
	/// Template path, for diagnostics only.
	path: String,
}

impl<'a> Lexer<'a> {
	fn new(input: &'a str, path: String) -> Self {
		Self {
			input,
			pos: 0,
			line: 1,
			mode: Mode::Verbatim,
			in_filter: false,
			backtick_pending: false,
			path,
		}
	}

	fn emit(&self, kind: TokenKind, start: usize, end: usize, line: usize) -> Option<Token<'a>> {
		(start != end).then(|| Token::new(kind, &self.input[start..end], line))
	}

	/// Scan host C++ until the `{{` that opens a text region.
	///
	/// Quotes and escapes suppress recognition, so a `{{` inside a string or
	/// char literal stays verbatim. In a longer run of open braces only the
	/// last two act as the delimiter; earlier braces remain host code.
	fn scan_verbatim(&mut self) -> Option<Token<'a>> {
		let bytes = self.input.as_bytes();
		let start = self.pos;
		let start_line = self.line;
		let mut quote: Option<u8> = None;
		let mut escaped = false;
		let mut braces = 0usize;

		while self.pos < bytes.len() {
			let byte = bytes[self.pos];

			if let Some(open) = quote {
				if escaped {
					escaped = false;
				} else if byte == b'\\' {
					escaped = true;
				} else if byte == open {
					quote = None;
				}
				if byte == b'\n' {
					self.line += 1;
				}
				self.pos += 1;
				continue;
			}

			if byte == b'{' {
				braces += 1;
				self.pos += 1;
				continue;
			}

			if braces >= 2 {
				let end = self.pos - 2;
				self.mode = Mode::Text;
				return self.emit(TokenKind::Verbatim, start, end, start_line);
			}
			braces = 0;

			match byte {
				b'"' | b'\'' => quote = Some(byte),
				b'\n' => self.line += 1,
				_ => {}
			}
			self.pos += 1;
		}

		self.mode = Mode::Done;
		self.emit(TokenKind::Verbatim, start, bytes.len(), start_line)
	}

	/// Scan template text until `}}`, `${`, or a line-verbatim `$`.
	///
	/// `$$` runs are folded into a single token on the way; the token then
	/// owns its (merged) content instead of borrowing it.
	fn scan_text(&mut self) -> Option<Token<'a>> {
		let bytes = self.input.as_bytes();
		let start_line = self.line;
		let mut pieces: Vec<&'a str> = Vec::new();
		let mut segment_start = self.pos;

		while self.pos < bytes.len() {
			match bytes[self.pos] {
				b'}' if bytes.get(self.pos + 1) == Some(&b'}') => {
					let tail = &self.input[segment_start..self.pos];
					self.pos += 2;
					self.mode = Mode::Verbatim;
					return self.emit_text(pieces, tail, start_line);
				}
				b'$' => match bytes.get(self.pos + 1) {
					Some(b'{') => {
						let tail = &self.input[segment_start..self.pos];
						self.pos += 2;
						self.mode = Mode::Placeholder;
						self.in_filter = false;
						self.backtick_pending = false;
						return self.emit_text(pieces, tail, start_line);
					}
					Some(b'$') => {
						// A dollar escape: keep the first `$` in the text and
						// resume scanning after the second.
						pieces.push(&self.input[segment_start..=self.pos]);
						self.pos += 2;
						segment_start = self.pos;
					}
					_ => {
						let tail =
							trim_line_verbatim_indent(&self.input[segment_start..self.pos], &pieces);
						self.pos += 1;
						self.mode = Mode::LineVerbatim;
						return self.emit_text(pieces, tail, start_line);
					}
				},
				byte => {
					if byte == b'\n' {
						self.line += 1;
					}
					self.pos += 1;
				}
			}
		}

		let tail = &self.input[segment_start..];
		self.mode = Mode::Done;
		self.emit_text(pieces, tail, start_line)
	}

	fn emit_text(&self, pieces: Vec<&'a str>, tail: &'a str, line: usize) -> Option<Token<'a>> {
		let text: Cow<'a, str> = if pieces.is_empty() {
			Cow::Borrowed(tail)
		} else {
			let length = pieces.iter().map(|piece| piece.len()).sum::<usize>() + tail.len();
			let mut merged = String::with_capacity(length);
			for piece in &pieces {
				merged.push_str(piece);
			}
			merged.push_str(tail);
			Cow::Owned(merged)
		};

		(!text.is_empty()).then(|| Token::new(TokenKind::Text, text, line))
	}

	/// Scan one host line, up to and including its newline.
	fn scan_line_verbatim(&mut self) -> Option<Token<'a>> {
		let bytes = self.input.as_bytes();
		let start = self.pos;
		let start_line = self.line;

		while self.pos < bytes.len() {
			if bytes[self.pos] == b'\n' {
				self.pos += 1;
				self.line += 1;
				self.mode = Mode::Text;
				return self.emit(TokenKind::Verbatim, start, self.pos, start_line);
			}
			self.pos += 1;
		}

		self.mode = Mode::Done;
		self.emit(TokenKind::Verbatim, start, bytes.len(), start_line)
	}

	/// Produce the next token of the current placeholder: an argument or
	/// filter segment, an explicit empty filter, or the terminating
	/// [`TokenKind::PlaceholderEnd`].
	fn scan_placeholder(&mut self) -> CspResult<Token<'a>> {
		let bytes = self.input.as_bytes();

		loop {
			let Some(&byte) = bytes.get(self.pos) else {
				return Err(CspError::EofInPlaceholder {
					path: self.path.clone(),
					line: self.line,
				});
			};

			match byte {
				b'}' => {
					if self.backtick_pending {
						// A trailing backtick encodes an explicit empty
						// filter; the `}` itself is handled on the next call.
						self.backtick_pending = false;
						return Ok(Token::new(TokenKind::PlaceholderFilter, "", self.line));
					}
					self.pos += 1;
					self.mode = Mode::Text;
					return Ok(Token::new(TokenKind::PlaceholderEnd, "", self.line));
				}
				b',' => self.pos += 1,
				b'`' => {
					self.in_filter = true;
					self.backtick_pending = true;
					self.pos += 1;
				}
				b')' | b']' => {
					return Err(CspError::UnmatchedClose {
						path: self.path.clone(),
						line: self.line,
						found: byte as char,
					});
				}
				_ => {
					let token = self.scan_expression()?;
					self.backtick_pending = false;
					return Ok(token);
				}
			}
		}
	}

	/// Scan one expression segment until a separator or closer at bracket
	/// depth zero. The terminating byte is left for [`Self::scan_placeholder`]
	/// to interpret.
	fn scan_expression(&mut self) -> CspResult<Token<'a>> {
		let bytes = self.input.as_bytes();
		let start = self.pos;
		let start_line = self.line;
		let kind = if self.in_filter {
			TokenKind::PlaceholderFilter
		} else {
			TokenKind::PlaceholderArgument
		};
		let mut stack: Vec<u8> = Vec::new();
		let mut quote: Option<u8> = None;
		let mut escaped = false;

		while let Some(&byte) = bytes.get(self.pos) {
			if let Some(open) = quote {
				if escaped {
					escaped = false;
				} else if byte == b'\\' {
					escaped = true;
				} else if byte == open {
					quote = None;
				}
				if byte == b'\n' {
					self.line += 1;
				}
				self.pos += 1;
				continue;
			}

			match byte {
				b'"' | b'\'' => quote = Some(byte),
				b'{' | b'(' | b'[' => {
					if stack.len() == MAX_SUBEXPRESSION_DEPTH {
						return Err(CspError::StackOverflow {
							path: self.path.clone(),
							line: self.line,
						});
					}
					stack.push(matching_close(byte));
				}
				b'}' | b')' | b']' => match stack.pop() {
					None => {
						return Ok(Token::new(kind, &self.input[start..self.pos], start_line));
					}
					Some(expected) if expected != byte => {
						return Err(CspError::MismatchedClose {
							path: self.path.clone(),
							line: self.line,
							expected: expected as char,
							found: byte as char,
						});
					}
					Some(_) => {}
				},
				b',' | b'`' if stack.is_empty() => {
					return Ok(Token::new(kind, &self.input[start..self.pos], start_line));
				}
				b'\n' => self.line += 1,
				_ => {}
			}
			self.pos += 1;
		}

		if quote.is_some() {
			Err(CspError::MalformedTail {
				path: self.path.clone(),
				line: self.line,
			})
		} else {
			Err(CspError::EofInExpression {
				path: self.path.clone(),
				line: self.line,
			})
		}
	}
}

impl<'a> Iterator for Lexer<'a> {
	type Item = CspResult<Token<'a>>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			match self.mode {
				Mode::Done => return None,
				Mode::Verbatim => {
					if let Some(token) = self.scan_verbatim() {
						return Some(Ok(token));
					}
				}
				Mode::Text => {
					if let Some(token) = self.scan_text() {
						return Some(Ok(token));
					}
				}
				Mode::LineVerbatim => {
					if let Some(token) = self.scan_line_verbatim() {
						return Some(Ok(token));
					}
				}
				Mode::Placeholder => {
					return match self.scan_placeholder() {
						Ok(token) => Some(Ok(token)),
						Err(error) => {
							self.mode = Mode::Done;
							Some(Err(error))
						}
					};
				}
			}
		}
	}
}

fn matching_close(open: u8) -> u8 {
	match open {
		b'{' => b'}',
		b'(' => b')',
		_ => b']',
	}
}

/// Strip the trailing run of spaces and tabs before a line-verbatim `$`, but
/// only when the accumulated text already contains a line feed: a `$` in the
/// middle of the first line keeps the whitespace in front of it.
fn trim_line_verbatim_indent<'a>(tail: &'a str, pieces: &[&str]) -> &'a str {
	let has_newline =
		tail.contains('\n') || pieces.iter().any(|piece| piece.contains('\n'));
	if has_newline {
		tail.trim_end_matches([' ', '\t'])
	} else {
		tail
	}
}

use std::collections::VecDeque;
use std::path::Path;

use crate::CspResult;
use crate::config::Sink;
use crate::config::TranslatorConfig;
use crate::encode::encode_literal;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// The spelled-out identity filter an explicit empty filter segment (a
/// trailing backtick) turns into.
const IDENTITY_FILTER: &str = "[](auto &x){return x;}";

/// Translate a token stream into C++ source chunks.
///
/// Concatenating all chunks yields the generated file. Chunks come out in
/// input order; a lexer error passes through as the final item and fuses the
/// stream. `path` is only used for the leading `#line 1` directive, where it
/// is normalised to forward slashes.
pub fn translate<'a, I>(
	tokens: I,
	path: impl AsRef<Path>,
	config: TranslatorConfig,
) -> Translator<I::IntoIter>
where
	I: IntoIterator<Item = CspResult<Token<'a>>>,
{
	Translator {
		tokens: tokens.into_iter(),
		path: path.as_ref().display().to_string(),
		config,
		arguments: Vec::new(),
		filters: Vec::new(),
		default_filters: Vec::new(),
		chunks: VecDeque::new(),
		started: false,
		done: false,
	}
}

/// A lazy translator over a token stream.
///
/// Buffers the chunks of one emission at a time and drains them one per
/// `next()` call, so memory stays proportional to a single token's output.
#[derive(Debug)]
pub struct Translator<I> {
	tokens: I,
	path: String,
	config: TranslatorConfig,
	arguments: Vec<String>,
	filters: Vec<String>,
	/// Sticky filters bound by the most recent filter-only placeholder,
	/// applied to placeholders that specify none of their own.
	default_filters: Vec<String>,
	chunks: VecDeque<String>,
	started: bool,
	done: bool,
}

impl<'a, I> Iterator for Translator<I>
where
	I: Iterator<Item = CspResult<Token<'a>>>,
{
	type Item = CspResult<String>;

	fn next(&mut self) -> Option<Self::Item> {
		if !self.started {
			self.started = true;
			if self.config.enable_line {
				let path = self.path.replace('\\', "/");
				self.chunks.push_back(format!("#line 1 \"{path}\"\n"));
			}
		}

		loop {
			if let Some(chunk) = self.chunks.pop_front() {
				return Some(Ok(chunk));
			}
			if self.done {
				return None;
			}
			match self.tokens.next() {
				Some(Ok(token)) => self.process(&token),
				Some(Err(error)) => {
					self.done = true;
					return Some(Err(error));
				}
				None => self.done = true,
			}
		}
	}
}

impl<I> Translator<I> {
	fn process(&mut self, token: &Token<'_>) {
		match token.kind {
			TokenKind::Verbatim => {
				self.line_directive(token.line);
				let mut chunk = token.text.to_string();
				if !chunk.ends_with('\n') {
					chunk.push('\n');
				}
				self.chunks.push_back(chunk);
			}
			TokenKind::Text => {
				self.line_directive(token.line);
				let literals = text_literals(&token.text);
				self.push_sink_statement(&literals);
			}
			TokenKind::PlaceholderArgument => {
				self.arguments.push(token.text.to_string());
			}
			TokenKind::PlaceholderFilter => {
				if token.is_empty() {
					self.filters.push(IDENTITY_FILTER.to_string());
				} else {
					self.filters.push(token.text.to_string());
				}
			}
			TokenKind::PlaceholderEnd => self.finish_placeholder(token.line),
		}
	}

	/// Resolve a completed placeholder.
	///
	/// No arguments and no filters is a no-op; filters alone rebind the
	/// sticky defaults; a lone double-quoted argument passes through
	/// pre-formatted; anything else becomes a `std::format` call wrapped in
	/// the applicable filters, first-listed outermost.
	fn finish_placeholder(&mut self, line: usize) {
		let mut arguments = std::mem::take(&mut self.arguments);
		let filters = std::mem::take(&mut self.filters);

		if arguments.is_empty() {
			if !filters.is_empty() {
				self.default_filters = filters;
			}
			return;
		}

		if filters.is_empty() && arguments.len() == 1 && is_quoted_literal(&arguments[0]) {
			self.line_directive(line);
			let argument = arguments.remove(0);
			self.push_sink_statement(&argument);
			return;
		}

		let filters = if filters.is_empty() {
			self.default_filters.clone()
		} else {
			filters
		};

		if arguments.len() == 1 {
			arguments.insert(0, "\"{}\"".to_string());
		}

		let mut expression = String::new();
		for filter in &filters {
			expression.push('(');
			expression.push_str(filter);
			expression.push_str(")(");
		}
		expression.push_str("std::format(");
		for (index, argument) in arguments.iter().enumerate() {
			if index > 0 {
				expression.push_str(", ");
			}
			expression.push('(');
			expression.push_str(argument);
			expression.push(')');
		}
		expression.push(')');
		for _ in &filters {
			expression.push(')');
		}

		self.line_directive(line);
		self.push_sink_statement(&expression);
	}

	fn line_directive(&mut self, line: usize) {
		if self.config.enable_line {
			self.chunks.push_back(format!("#line {line}\n"));
		}
	}

	fn push_sink_statement(&mut self, expression: &str) {
		let statement = match &self.config.sink {
			Sink::Yield => format!("co_yield {expression};\n"),
			Sink::Callback(name) => format!("{name}({expression});\n"),
			Sink::Append(name) => format!("{name} += {expression};\n"),
		};
		self.chunks.push_back(statement);
	}
}

/// Render template text as one or more juxtaposed C++ string literals.
///
/// The text is split after each line feed so long runs stay readable in the
/// generated source; continuation literals are indented under the sink call.
/// A single piece (text without a line feed, or ending in exactly one)
/// stays a single literal.
fn text_literals(text: &str) -> String {
	let mut literals = String::new();
	for (index, piece) in text.split_inclusive('\n').enumerate() {
		if index > 0 {
			literals.push_str("\n  ");
		}
		literals.push('"');
		literals.push_str(&encode_literal(piece));
		literals.push('"');
	}
	literals
}

/// A pre-formatted argument: at least two bytes with `"` first and last.
fn is_quoted_literal(argument: &str) -> bool {
	argument.len() >= 2 && argument.starts_with('"') && argument.ends_with('"')
}

/// How emitted values reach the consumer of the generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
	/// `co_yield <expr>;` in a generated coroutine.
	Yield,
	/// `<name>(<expr>);` invoking a caller-supplied callback.
	Callback(String),
	/// `<name> += <expr>;` appending to a string variable.
	Append(String),
}

impl Default for Sink {
	fn default() -> Self {
		Self::Yield
	}
}

/// Options controlling the shape of the generated C++.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
	/// Emit `#line` directives mapping generated code back to the template,
	/// including the leading `#line 1 "<path>"`.
	pub enable_line: bool,
	/// The output strategy for text and placeholder values.
	pub sink: Sink,
}

impl Default for TranslatorConfig {
	fn default() -> Self {
		Self {
			enable_line: true,
			sink: Sink::default(),
		}
	}
}

impl TranslatorConfig {
	/// A configuration without `#line` directives.
	pub fn without_line_directives(sink: Sink) -> Self {
		Self {
			enable_line: false,
			sink,
		}
	}
}

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while tokenizing a template or writing its translation.
///
/// Every lexical error is fatal to the current parse and carries the template
/// path and the 1-based line number where scanning stopped, rendered as
/// `<path>:<line>: <message>`.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum CspError {
	#[error(transparent)]
	#[diagnostic(code(cspgen::io_error))]
	Io(#[from] std::io::Error),

	#[error("{path}:{line}: unmatched `{found}` in placeholder expression")]
	#[diagnostic(
		code(cspgen::unbalanced_close),
		help("every `)` and `]` inside a placeholder needs a matching opener")
	)]
	UnmatchedClose {
		path: String,
		line: usize,
		found: char,
	},

	#[error("{path}:{line}: mismatched `{found}` in placeholder expression, expected `{expected}`")]
	#[diagnostic(code(cspgen::unbalanced_close))]
	MismatchedClose {
		path: String,
		line: usize,
		expected: char,
		found: char,
	},

	#[error("{path}:{line}: placeholder expression nesting is too deep")]
	#[diagnostic(
		code(cspgen::stack_overflow),
		help("placeholder expressions support at most 64 nested bracket pairs")
	)]
	StackOverflow { path: String, line: usize },

	#[error("{path}:{line}: unexpected end of file inside placeholder")]
	#[diagnostic(
		code(cspgen::eof_in_placeholder),
		help("close the placeholder with `}}`")
	)]
	EofInPlaceholder { path: String, line: usize },

	#[error("{path}:{line}: unexpected end of file while scanning a placeholder expression")]
	#[diagnostic(code(cspgen::eof_in_expression))]
	EofInExpression { path: String, line: usize },

	#[error("{path}:{line}: template ends inside an unterminated literal")]
	#[diagnostic(code(cspgen::malformed_tail))]
	MalformedTail { path: String, line: usize },

	#[error("cannot derive an output path from `{path}`: no extension to strip")]
	#[diagnostic(
		code(cspgen::missing_extension),
		help("pass `--output` or give the template an extension such as `.csp`")
	)]
	MissingExtension { path: String },
}

pub type CspResult<T> = Result<T, CspError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;

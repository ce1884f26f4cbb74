//! `cspgen_core` is the core library for the `cspgen` template translator. It
//! turns CSP templates (C++ source with embedded text regions and `${...}`
//! placeholders) into compilable C++ that produces the text at runtime.
//!
//! ## Processing pipeline
//!
//! ```text
//! Template source
//!   → Lexer (byte state machine over verbatim / text / placeholder modes)
//!   → Token stream (zero-copy slices tagged with 1-based line numbers)
//!   → Translator (#line directives, sink statements, std::format calls)
//!   → Generated C++ source chunks
//! ```
//!
//! Both stages are lazy: the lexer advances only far enough to produce the
//! next token, and the translator buffers no more than one token's emission.
//!
//! ## Key types
//!
//! - [`Token`] / [`TokenKind`]: the token stream contract between the two
//!   stages.
//! - [`Lexer`]: created by [`tokenize`], yields `CspResult<Token>`.
//! - [`Translator`]: created by [`translate`], yields `CspResult<String>`
//!   chunks whose concatenation is the generated file.
//! - [`TranslatorConfig`] / [`Sink`]: `#line` emission and the output
//!   strategy (`co_yield`, callback call, or string append).
//! - [`encode_literal`]: byte-exact C++ string-literal encoding.
//!
//! ## Quick start
//!
//! ```rust
//! use cspgen_core::CspResult;
//! use cspgen_core::TranslatorConfig;
//! use cspgen_core::tokenize;
//! use cspgen_core::translate;
//!
//! let source = "int main() {\n{{hello ${name}!\n}}return 0;\n}\n";
//! let tokens = tokenize(source, "page.cpp.csp");
//! let code: CspResult<String> =
//! 	translate(tokens, "page.cpp.csp", TranslatorConfig::default()).collect();
//! assert!(code.unwrap().contains("co_yield"));
//! ```

pub use config::*;
pub use encode::*;
pub use error::*;
pub use lexer::*;
pub use tokens::*;
pub use translator::*;

pub mod config;
mod encode;
mod error;
mod lexer;
mod tokens;
mod translator;

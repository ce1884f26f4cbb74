use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use cspgen_core::CspError;
use cspgen_core::CspResult;
use cspgen_core::Sink;
use cspgen_core::TranslatorConfig;

#[derive(Debug, Parser)]
#[command(
	author,
	version,
	about = "Translate a CSP template into C++ source.",
	long_about = "cspgen translates a CSP template into C++ source.\n\nA template is ordinary \
	              C++ with text regions between {{ and }}. Inside a text region, ${expr} \
	              interpolates a formatted value (with optional `-separated filters), $ at the \
	              start of a statement switches back to C++ for one line, and $$ is a literal \
	              dollar.\n\nIf no output path is given it is derived from the template path by \
	              removing the final extension (page.cpp.csp -> page.cpp)."
)]
pub struct CspgenCli {
	/// Path to the template file.
	#[arg(value_name = "TEMPLATE", required_unless_present = "input")]
	pub template: Option<PathBuf>,

	/// Path to the template file (alternative to the positional form).
	#[arg(long, short, conflicts_with = "template")]
	pub input: Option<PathBuf>,

	/// Path for the generated C++ file. Defaults to the template path with
	/// its final extension removed.
	#[arg(long, short)]
	pub output: Option<PathBuf>,

	/// How emitted values reach the consumer of the generated code.
	#[arg(long, value_enum, default_value_t = SinkKind::Yield)]
	pub sink: SinkKind,

	/// Name of the callback or append target. Defaults to `sink` for
	/// `--sink callback` and `out` for `--sink append`.
	#[arg(long, value_name = "NAME")]
	pub sink_name: Option<String>,

	/// Suppress `#line` directives in the generated code.
	#[arg(long, default_value_t = false)]
	pub no_line: bool,

	/// Report the derived output path on stderr.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
	/// Generate a coroutine that `co_yield`s each chunk.
	Yield,
	/// Invoke a caller-supplied callback with each chunk.
	Callback,
	/// Append each chunk to a string variable.
	Append,
}

impl CspgenCli {
	/// The template path, whichever way it was passed.
	pub fn template_path(&self) -> Option<&Path> {
		self.template.as_deref().or(self.input.as_deref())
	}

	/// Check constraints clap cannot express and return the template path.
	///
	/// Clap already refuses a command line with neither path form, but the
	/// struct is constructible directly; the missing-path case is handled
	/// here for that route.
	pub fn validate(&self) -> Result<&Path, String> {
		let Some(template) = self.template_path() else {
			return Err("a template path is required".to_string());
		};
		if self.sink_name.is_some() && self.sink == SinkKind::Yield {
			return Err("--sink-name requires --sink callback or --sink append".to_string());
		}

		Ok(template)
	}

	/// The emission configuration the flags describe.
	pub fn config(&self) -> TranslatorConfig {
		let sink = match self.sink {
			SinkKind::Yield => Sink::Yield,
			SinkKind::Callback => {
				Sink::Callback(self.sink_name.clone().unwrap_or_else(|| "sink".to_string()))
			}
			SinkKind::Append => {
				Sink::Append(self.sink_name.clone().unwrap_or_else(|| "out".to_string()))
			}
		};

		TranslatorConfig {
			enable_line: !self.no_line,
			sink,
		}
	}

	/// Derive the output path: explicit `--output`, or the template path with
	/// its final extension removed.
	pub fn output_path(&self, template: &Path) -> CspResult<PathBuf> {
		if let Some(output) = &self.output {
			return Ok(output.clone());
		}

		if template.extension().is_some() {
			Ok(template.with_extension(""))
		} else {
			Err(CspError::MissingExtension {
				path: template.display().to_string(),
			})
		}
	}
}

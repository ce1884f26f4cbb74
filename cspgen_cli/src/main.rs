use std::fs;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::process;

use clap::Parser;
use cspgen_cli::CspgenCli;
use cspgen_core::CspResult;
use cspgen_core::tokenize;
use cspgen_core::translate;

fn main() {
	let args = CspgenCli::parse();

	let template = match args.validate() {
		Ok(template) => template,
		Err(message) => {
			eprintln!("error: {message}");
			process::exit(1);
		}
	};

	if let Err(error) = run(&args, template) {
		eprintln!("error: {error}");
		process::exit(1);
	}
}

fn run(args: &CspgenCli, template: &Path) -> CspResult<()> {
	let output_path = args.output_path(template)?;
	if args.verbose {
		eprintln!(
			"translating {} -> {}",
			template.display(),
			output_path.display()
		);
	}

	let source = fs::read_to_string(template)?;
	let file = fs::File::create(&output_path)?;
	let mut writer = BufWriter::new(file);

	for chunk in translate(tokenize(&source, template), template, args.config()) {
		writer.write_all(chunk?.as_bytes())?;
	}
	writer.flush()?;

	Ok(())
}

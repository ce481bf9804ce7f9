mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};
use mosaicsel_core::error::PipelineError;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Ingest Sentinel-2 bundles against an area of interest
	Ingest(tools::ingest::Subcommand),

	/// Compose candidate mosaics from ingested tiles
	Compose(tools::compose::Subcommand),

	/// Enrich candidate mosaics and select an optimal mosaic cover
	Select(tools::select::Subcommand),
}

fn main() -> std::process::ExitCode {
	let cli = Cli::parse();

	env_logger::Builder::new().filter_level(cli.verbose.log_level_filter()).format_timestamp(None).init();

	match run(cli) {
		Ok(()) => std::process::ExitCode::SUCCESS,
		Err(err) => {
			log::error!("{err:#}");
			let code = err.downcast_ref::<PipelineError>().map_or(1, PipelineError::exit_code);
			std::process::ExitCode::from(code as u8)
		}
	}
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Ingest(arguments) => tools::ingest::run(arguments),
		Commands::Compose(arguments) => tools::compose::run(arguments),
		Commands::Select(arguments) => tools::select::run(arguments),
	}
}

#[cfg(test)]
mod tests {
	use crate::{Cli, run};
	use anyhow::Result;
	use clap::Parser;

	pub fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		let msg = format!("{cli:?}");
		run(cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["mosaicsel"]).unwrap_err().to_string();
		assert!(err.contains("\nUsage: mosaicsel [OPTIONS] <COMMAND>"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["mosaicsel", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("mosaicsel "));
	}

	#[test]
	fn ingest_subcommand_requires_args() {
		let output = run_command(vec!["mosaicsel", "ingest"]).unwrap_err().to_string();
		assert!(output.contains("Usage: mosaicsel ingest"));
	}

	#[test]
	fn compose_subcommand_requires_args() {
		let output = run_command(vec!["mosaicsel", "compose"]).unwrap_err().to_string();
		assert!(output.contains("Usage: mosaicsel compose"));
	}

	#[test]
	fn select_subcommand_requires_args() {
		let output = run_command(vec!["mosaicsel", "select"]).unwrap_err().to_string();
		assert!(output.contains("Usage: mosaicsel select"));
	}
}

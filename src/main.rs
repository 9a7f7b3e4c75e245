use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use rusty_features::config::{PipelineConfig, parse_delimiter};
use rusty_features::data::loader;
use rusty_features::pipeline;

/// Expand encoded feature columns and write the preprocessed dataset.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Input file: delimited text with a header row, or a JSON records array
    input: PathBuf,

    /// JSON config file; flags given here take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Encoded source column (repeat for several) [default: features]
    #[arg(short = 'c', long = "column", value_name = "NAME")]
    columns: Vec<String>,

    /// Field delimiter: `tab` or a single character [default: tab]
    #[arg(short, long, value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// Run the pipeline without writing the result
    #[arg(long)]
    no_save: bool,

    /// Write a leading row-index column
    #[arg(long)]
    index: bool,

    /// Output path [default: preprocessed_<input file name> next to the input]
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<(PathBuf, PipelineConfig)> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };
        if !self.columns.is_empty() {
            config.source_columns = self.columns;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if self.no_save {
            config.save = false;
        }
        if self.index {
            config.include_index = true;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        config.validate()?;
        Ok((self.input, config))
    }
}

fn run(cli: Cli) -> Result<()> {
    let (input, config) = cli.into_config()?;
    let options = config.file_options();

    let mut dataset = loader::load_file(&input, &options)?;
    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.column_names(),
        input.display()
    );

    pipeline::preprocess(&mut dataset, &config.source_columns)?;

    if config.save {
        let output = match &config.output {
            Some(path) => path.clone(),
            None => loader::output_path(&input)?,
        };
        loader::save_file(&dataset, &output, &options)?;
        log::info!(
            "Wrote {} rows and {} columns to {}",
            dataset.len(),
            dataset.column_names().len(),
            output.display()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

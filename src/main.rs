mod args;
mod survey;

use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

use crate::survey::{run_conversion, ConversionRequest};

fn main() {
    let args = args::Args::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
    debug!("args: {:?}", args);

    let req = ConversionRequest {
        folder: PathBuf::from(&args.folder),
        config_dir: PathBuf::from(&args.config_dir),
        global_config: args.global_config.as_ref().map(PathBuf::from),
        out: args.out.as_ref().map(PathBuf::from),
        reference: args.reference.as_ref().map(PathBuf::from),
    };

    match run_conversion(&req) {
        Ok(summary) => {
            info!(
                "Survey {}: {} header rows, {} description rows, {} rows in total",
                summary.survey, summary.header_rows, summary.description_rows, summary.rows
            );
            println!("{}", summary.output.display());
        }
        Err(e) => {
            eprintln!("An error occurred: {}", e);
            std::process::exit(1);
        }
    }
}

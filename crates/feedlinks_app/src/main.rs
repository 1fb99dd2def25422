use anyhow::{Context, Result};
use clap::Parser;
use feedlinks_core::JsonStyle;
use feedlinks_engine::{run_extraction, RunSettings, INPUT_FILENAME, OUTPUT_FILENAME};
use feedlinks_logging::feed_debug;
use log::LevelFilter;

mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "feedlinks",
    about = "Extract RSS and Atom feed links from input.html to output.json.",
    after_help = "Reads input.html from the current directory and writes output.json next to it."
)]
struct Args {
    /// indent the json file
    #[arg(long)]
    indent: bool,

    /// Log decoding and extraction details to the terminal
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }

    fn settings(&self) -> RunSettings {
        RunSettings::in_dir(".").with_style(JsonStyle::from_indent_flag(self.indent))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::initialize(args.log_level());

    let settings = args.settings();
    feed_debug!("Running with {:?}", settings);

    let summary = run_extraction(&settings).with_context(|| {
        format!("could not extract feeds from {INPUT_FILENAME} into {OUTPUT_FILENAME}")
    })?;

    feed_debug!(
        "Done: {} rss, {} atom, decoded as {}",
        summary.rss_count,
        summary.atom_count,
        summary.encoding
    );
    Ok(())
}

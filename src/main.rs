//! bmpstag command line

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::info;

use bmpstag::pipeline::seeded_rng;
use bmpstag::{bmp, FilterKind, Pipeline};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (Some(input), Some(output)) = (&args.input, &args.output) else {
        Args::command().print_help()?;
        return Ok(());
    };

    let pipeline = Pipeline::from_args(args.filters.as_slice()).context("invalid filter chain")?;

    let bitmap = bmp::read_file(input).with_context(|| format!("reading {}", input.display()))?;
    info!(
        "{}: {}x{}, {} filter(s)",
        input.display(),
        bitmap.width(),
        bitmap.height(),
        pipeline.len()
    );

    let result = pipeline.apply_to_bitmap(bitmap, &mut seeded_rng(args.seed));

    bmp::write_file(output, &result).with_context(|| format!("writing {}", output.display()))?;
    info!(
        "wrote {} ({}x{})",
        output.display(),
        result.width(),
        result.height()
    );
    Ok(())
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, after_help = filter_help())]
struct Args {
    /// Seed for -glass, for reproducible output. Must come before the input
    /// path; everything after the output path is read as the filter chain.
    #[arg(long)]
    seed: Option<u64>,
    /// 24-bit uncompressed BMP to read
    input: Option<PathBuf>,
    /// Where to write the filtered BMP
    output: Option<PathBuf>,
    /// Filter chain, e.g. -crop 800 600 -gs -blur 1.5
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    filters: Vec<String>,
}

fn filter_help() -> String {
    let mut text = String::from("Filters (applied left to right):\n");
    for kind in FilterKind::ALL {
        let mut usage = kind.flag().to_string();
        for param in kind.params() {
            usage.push_str(&format!(" <{param}>"));
        }
        text.push_str(&format!("  {usage:<24}{}\n", kind.summary()));
    }
    text
}

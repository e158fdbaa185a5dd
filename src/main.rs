use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use offmark::{
    batch::{DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_DIR},
    filters::{FontFilter, MarkGlyphs},
    Batch,
};
use std::{path::PathBuf, time::Instant};

/// Strike through private-use glyphs to build "off" icon fonts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the MaterialIcons fonts
    #[arg(long, default_value = DEFAULT_SOURCE_DIR)]
    source_dir: PathBuf,

    /// Directory the MaterialOffIcons fonts are written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Mark geometry and threshold, as X,Y,WIDTH[,THRESHOLD]
    #[arg(long, default_value = "70,448,27,E000", value_parser = parse_mark)]
    mark: MarkGlyphs,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mark a single font
    Single {
        /// Font to read
        source: PathBuf,
        /// Where to write the marked font
        target: PathBuf,
    },
}

fn parse_mark(s: &str) -> Result<MarkGlyphs, String> {
    MarkGlyphs::from_str(s).map_err(|e| e.to_string())
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.into())
        .init();

    let start = Instant::now();
    let result = match &args.command {
        Some(Command::Single { source, target }) => {
            offmark::mark_font(source, target, &args.mark).map(|_| 1)
        }
        None => Batch::material_icons(&args.source_dir, &args.output_dir).run(&args.mark),
    };
    match result {
        Ok(count) => log::info!("Marked {} font(s) in {:?}", count, start.elapsed()),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use runeberg_book::{Converter, Settings, STYLESHEET};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Runeberg archive zip.
    zip: Option<PathBuf>,

    /// Settings file (TOML); built-in defaults otherwise.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the normalized body of this section (0 is the front matter).
    #[arg(long)]
    chapter: Option<usize>,

    /// Print the shared stylesheet and exit.
    #[arg(long)]
    dump_css: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    if args.dump_css {
        print!("{STYLESHEET}");
        return Ok(());
    }

    let zip_path = args
        .zip
        .ok_or_else(|| anyhow!("usage: probe [--config FILE] [--chapter N] <archive.zip>"))?;

    let settings = match &args.config {
        Some(path) => {
            Settings::load(path).with_context(|| format!("load settings {}", path.display()))?
        }
        None => Settings::default(),
    };
    let converter = Converter::new(settings).context("load reference tables")?;

    let data = fs::read(&zip_path).with_context(|| format!("read {}", zip_path.display()))?;
    let book = converter
        .convert(&data)
        .with_context(|| format!("convert {}", zip_path.display()))?;

    info!(author = %book.author, title = %book.title, lang = %book.language, "Converted");
    if book.paragraph_heuristic_unconfirmed {
        warn!("No page started with a blank line; paragraph starts at page breaks may be missing");
    }

    match args.chapter {
        Some(n) => {
            let chapter = book
                .chapters
                .get(n)
                .ok_or_else(|| anyhow!("book has {} sections, no section {n}", book.chapters.len()))?;
            print!("{}", chapter.body);
        }
        None => {
            println!("{}", book.long_name());
            for (i, title) in book.chapter_titles().iter().enumerate() {
                println!("{i:>4}  {title}");
            }
        }
    }
    Ok(())
}

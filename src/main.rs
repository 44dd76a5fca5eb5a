use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

use textscrub::replacer::DEFAULT_MODULUS;
use textscrub::{detector_catalog, scrub_text, HashAlgorithm, Locale, ScrubOptions};

#[derive(Parser, Debug)]
#[command(name = "textscrub")]
#[command(about = "Replace PII in text with stable hashed placeholders")]
#[command(version)]
struct Args {
    /// Input file to scrub; reads stdin when omitted
    input: Option<PathBuf>,

    /// Locale to scrub under (e.g. nl_NL); all locales when omitted
    #[arg(long)]
    locale: Option<Locale>,

    /// Comma-separated detector names; defaults to the enabled set
    #[arg(long, value_delimiter = ',')]
    detectors: Option<Vec<String>>,

    /// Extra literal to always redact
    #[arg(long)]
    redact: Option<String>,

    /// Directory with entity lists overriding the embedded defaults
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Hash algorithm for placeholder derivation (md5 or sha256)
    #[arg(long, default_value = "md5")]
    hash_algorithm: HashAlgorithm,

    /// Modulus bounding the placeholder number range
    #[arg(long, default_value_t = DEFAULT_MODULUS)]
    hash_modulus: u64,

    /// List available detectors for the locale and exit
    #[arg(long)]
    list_detectors: bool,

    /// Print per-span audit details alongside the cleaned text
    #[arg(long)]
    verbose: bool,
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Could not read input file: {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Could not read stdin")?;
            Ok(buffer)
        }
    }
}

fn main() -> Result<()> {
    // WHY: structured JSON logging goes to stderr so stdout stays clean for
    // the scrubbed text itself
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();

    if args.list_detectors {
        let locales = match args.locale {
            Some(locale) => vec![locale],
            None => Locale::all().to_vec(),
        };
        for locale in locales {
            println!("Detectors for {locale}:");
            for (name, description) in detector_catalog(locale) {
                println!("  {name:<16} {description}");
            }
        }
        return Ok(());
    }

    let text = read_input(args.input.as_ref())?;
    info!("Scrubbing {} byte(s) of input", text.len());

    let opts = ScrubOptions {
        locale: args.locale,
        detectors: args.detectors,
        custom_text: args.redact,
        data_dir: args.data_dir,
        hash_algorithm: args.hash_algorithm,
        hash_modulus: args.hash_modulus,
    };

    let results = scrub_text(&text, &opts)?;
    for scrub in &results {
        println!("Results for {}:", scrub.locale);
        println!("{}", scrub.cleaned);
        if args.verbose {
            for filth in &scrub.filths {
                println!(
                    "  [{}..{}] {} ({}) -> {}",
                    filth.beg,
                    filth.end,
                    filth.text,
                    filth.category.label(),
                    filth.replacement_string.as_deref().unwrap_or("-"),
                );
            }
        }
    }

    info!("Scrubbing completed for {} locale(s)", results.len());
    Ok(())
}

//! autotranslate CLI - Translate strings from the command line.

use anyhow::{Context, Result};
use autotranslate_core::{BatchMode, Lang, ServiceKind, Settings, create_translator};
use clap::{Parser, ValueEnum};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ServiceOption {
    FreeWeb,
    PaidApi,
}

impl From<ServiceOption> for ServiceKind {
    fn from(opt: ServiceOption) -> Self {
        match opt {
            ServiceOption::FreeWeb => Self::FreeWeb,
            ServiceOption::PaidApi => Self::PaidApi,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "autotranslate")]
#[command(author, version, about = "Translate strings with Google translation backends", long_about = None)]
struct Args {
    /// Strings to translate (one per line from stdin when omitted)
    text: Vec<String>,

    /// Translation service (overrides the config file)
    #[arg(long, value_enum)]
    service: Option<ServiceOption>,

    /// Target language code
    #[arg(short = 't', long)]
    target: Option<String>,

    /// Source language code (service default when omitted)
    #[arg(short = 's', long)]
    source: Option<String>,

    /// Materialize the whole batch before printing
    #[arg(long)]
    eager: bool,

    /// Read the Cloud credentials JSON from this file
    #[arg(long)]
    credentials_file: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_stdin_lines() -> Result<Vec<String>> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    Ok(input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before loading settings so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;

    // Override settings with CLI arguments
    if let Some(service) = args.service {
        settings.service = service.into();
    }

    if let Some(path) = &args.credentials_file {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials: {}", path.display()))?;
        settings.set_credentials_json(json);
    }

    let target = args
        .target
        .map(Lang::new)
        .or_else(|| settings.target_lang.clone())
        .context("No target language: pass --target or set target_lang")?;
    let source = args.source.map(Lang::new).or_else(|| settings.source_lang.clone());

    let texts = if args.text.is_empty() {
        read_stdin_lines()?
    } else {
        args.text
    };

    if texts.is_empty() {
        anyhow::bail!("Nothing to translate");
    }

    let translator = create_translator(&settings)
        .with_context(|| format!("Failed to initialize {} translator", settings.service))?;

    info!("Translating {} string(s) to {} with {}", texts.len(), target, translator.name());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let [text] = texts.as_slice() {
        let translated = translator
            .translate_string(text, &target, source.as_ref())
            .await
            .context("Translation failed")?;
        writeln!(out, "{translated}")?;
        return Ok(());
    }

    // Setup progress bar
    #[allow(clippy::cast_possible_truncation)]
    let pb = ProgressBar::new(texts.len() as u64);
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mode = BatchMode::from_optimized(!args.eager);
    let mut translations = translator
        .translate_strings(texts, &target, source.as_ref(), mode)
        .await
        .context("Translation failed")?
        .into_stream();

    let mut index = 0usize;
    while let Some(translated) = translations.next().await {
        index += 1;
        let translated = translated.with_context(|| format!("Failed to translate string {index}"))?;
        pb.suspend(|| writeln!(out, "{translated}"))?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use typebetter::{
    config::{Config, ConfigStore, FileConfigStore},
    display::{ReportFormat, TerminalDisplay},
    runtime::{FixedPause, ReaderLineSource, SystemClock},
    session::TypingSession,
    source::{load_token, EsvSource, FileSource, PassageSource},
    verse::Segmenter,
};

/// memorize scripture by typing it, one verse at a time
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Fetches a chapter from the ESV API, splits it into verses and asks you to type each one from memory. Every attempt is timed and only exact matches count."
)]
pub struct Cli {
    /// passage to practice, e.g. "John 3"
    #[clap(short = 'p', long)]
    passage: Option<String>,

    /// read the raw chapter text from a file instead of the API
    #[clap(short = 's', long)]
    source: Option<PathBuf>,

    /// file holding the Authorization header value (first line)
    #[clap(long)]
    token_file: Option<PathBuf>,

    /// passage API endpoint
    #[clap(long)]
    api_url: Option<String>,

    /// characters of response tail dropped after the final verse
    #[clap(long)]
    trailing_trim: Option<usize>,

    /// skip the one-second pause between verses
    #[clap(long)]
    no_pause: bool,

    /// how the final report is printed
    #[clap(short = 'r', long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// use this config file instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    /// more logging on stderr (-v info, -vv debug)
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(passage) = &self.passage {
            cfg.passage = passage.clone();
        }
        if let Some(token_file) = &self.token_file {
            cfg.token_file = token_file.clone();
        }
        if let Some(api_url) = &self.api_url {
            cfg.api_url = api_url.clone();
        }
        if let Some(trim) = self.trailing_trim {
            cfg.trailing_trim = trim;
        }
        if self.no_pause {
            cfg.pause_between_verses = false;
        }
        cfg
    }

    fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "typebetter=warn",
            1 => "typebetter=info",
            _ => "typebetter=debug",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_directive())),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let cfg = cli.apply_to(store.load());
    if cli.save_config {
        store
            .save(&cfg)
            .with_context(|| format!("saving config to {}", store.path().display()))?;
    }

    let raw = match &cli.source {
        Some(path) => FileSource::new(path).fetch(),
        None => {
            let token = load_token(&cfg.token_file)?;
            EsvSource::new(cfg.api_url.as_str(), cfg.passage.as_str(), token).fetch()
        }
    }
    .context("could not load the chapter text")?;

    let verses = Segmenter::new()
        .with_trailing_trim(cfg.trailing_trim)
        .extract(&raw)
        .context("could not split the chapter into verses")?;
    tracing::info!(count = verses.len(), "verses extracted");

    let pause = if cfg.pause_between_verses {
        FixedPause::default()
    } else {
        FixedPause::new(Duration::ZERO)
    };
    let passage = match &cli.source {
        Some(path) => path.display().to_string(),
        None => cfg.passage.clone(),
    };

    let mut session = TypingSession::new(
        verses,
        ReaderLineSource::stdin(),
        SystemClock,
        pause,
        TerminalDisplay::stdout(cli.report),
    )
    .with_passage(passage);

    session.run().context("typing session failed")?;
    Ok(())
}

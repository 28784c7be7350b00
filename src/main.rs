//! apiref - browse a static API reference page in the terminal.
//!
//! # Usage
//!
//! ```bash
//! apiref reference.html
//! apiref reference.html --category playlist
//! apiref reference.html --search video --json
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use apiref::app::{App, DEFAULT_DEBOUNCE_MS};
use apiref::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use apiref::perf;
use apiref::report::{REPORT_WIDTH, Report, render_text};
use apiref::ui::style::{Background, set_background_mode};

/// Browse a static API reference page: categories, live search, stats
#[derive(Parser, Debug)]
#[command(name = "apiref", version, about, long_about = None)]
struct Cli {
    /// Reference page (HTML) to open
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Start with this nav category selected
    #[arg(long, value_name = "CAT")]
    category: Option<String>,

    /// Start with this query searched
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Print the resulting page as text instead of starting the TUI
    #[arg(long)]
    print: bool,

    /// Print the resulting page state as JSON instead of starting the TUI
    #[arg(long)]
    json: bool,

    /// Quiet period before a typed query is searched
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Force the color theme (light or dark)
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log timing of parsing, search passes and frames
    #[arg(long)]
    perf: bool,

    /// Hide the category sidebar
    #[arg(long)]
    no_nav: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(flags: &ConfigFlags) -> Result<()> {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if flags.perf
        && let Ok(directive) = "apiref::perf=info".parse()
    {
        filter = filter.add_directive(directive);
    }

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if let Some(path) = &flags.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(&effective)?;
    perf::set_enabled(effective.perf);
    tracing::debug!(?effective, "effective flags");

    match effective.theme.unwrap_or(ThemeMode::Auto) {
        ThemeMode::Auto => set_background_mode(None),
        ThemeMode::Light => set_background_mode(Some(Background::Light)),
        ThemeMode::Dark => set_background_mode(Some(Background::Dark)),
    }

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    let mut app = App::new(cli.file)
        .with_debounce_ms(effective.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
        .with_nav_visible(!effective.no_nav)
        .with_category(cli.category)
        .with_search(cli.search);

    if cli.print || cli.json {
        let model = app
            .with_nav_visible(false)
            .load_model((REPORT_WIDTH, u16::MAX))?;
        if cli.json {
            println!("{}", Report::from_model(&model).to_json()?);
        } else {
            print!("{}", render_text(&model));
        }
        return Ok(());
    }

    app.run().context("Application error")
}

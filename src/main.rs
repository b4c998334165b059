//! Indirector CLI - host bootstrap and Companion automation
//!
//! Usage: indirector [--json] [--color WHEN] [-v] [--config FILE] <COMMAND>
//!
//! Commands:
//!   bootstrap  Install Docker, provision datastores and deploy the Compose stack
//!   companion  Serve automations against the Companion WebSocket bridge

mod commands;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use indirector::presentation::{Cli, Commands};
use indirector::IndirectorError;

use crate::ui::context::UiContext;
use crate::ui::primitives::text::ColoredText;
use crate::ui::terminal::detect_capabilities;
use crate::ui::views::bootstrap::format_elapsed;

/// Exit code after Ctrl-C
const INTERRUPTED_EXIT_CODE: i32 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let elapsed = Elapsed::start(cli.json);

    let interrupt = elapsed.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        interrupt.report();
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }) {
        eprintln!("[WARN] Failed to install Ctrl-C handler: {}", e);
    }

    let json = cli.json;
    let code = {
        let _guard = ElapsedGuard(elapsed);
        match run(cli) {
            Ok(()) => 0,
            Err(err) => {
                ui::error::print_error(&err, json);
                exit_code(&err)
            }
        }
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn run(cli: Cli) -> Result<()> {
    let project_dir = match &cli.command {
        Commands::Bootstrap { project_dir, .. } => project_dir.clone(),
        Commands::Companion { .. } => PathBuf::from("."),
    };
    let loaded = indirector::config::resolve(cli.config.as_deref(), &project_dir)?;
    let ui = UiContext::new(cli.json, cli.verbose, cli.color, &loaded.config);
    init_tracing(&ui);

    match cli.command {
        Commands::Bootstrap {
            profile,
            project_dir,
        } => commands::bootstrap::cmd_bootstrap(&ui, &loaded, profile, &project_dir),
        Commands::Companion {
            url,
            snippets,
            no_snippets,
            watch,
        } => commands::companion::cmd_companion(&ui, &loaded, url, snippets, no_snippets, watch),
    }
}

/// The failing command's exit code, else 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<IndirectorError>()
        .map(IndirectorError::exit_code)
        .unwrap_or(1)
}

fn init_tracing(ui: &UiContext) {
    let level = match ui.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("indirector={}", level)));

    let fmt_layer = tracing_subscriber::fmt::Layer::default()
        .compact()
        .with_ansi(ui.color)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Wall-clock time since start, printed however the run ends
#[derive(Clone)]
struct Elapsed {
    started: Instant,
    json: bool,
}

impl Elapsed {
    fn start(json: bool) -> Self {
        Self {
            started: Instant::now(),
            json,
        }
    }

    fn report(&self) {
        let elapsed = self.started.elapsed();
        if self.json {
            let _ = ui::json::emit(&serde_json::json!({
                "event": "elapsed",
                "seconds": elapsed.as_secs_f64(),
            }));
        } else {
            let color = detect_capabilities().supports_color;
            eprintln!(
                "{}",
                ColoredText::dim(format!("Elapsed: {}", format_elapsed(elapsed))).render(color)
            );
        }
    }
}

struct ElapsedGuard(Elapsed);

impl Drop for ElapsedGuard {
    fn drop(&mut self) {
        self.0.report();
    }
}

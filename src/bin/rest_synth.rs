//! rest-synth: synthesize HTTP clients from interface contracts
//!
//! ## Commands
//!
//! - **emit**: print (or write) the Rust source synthesized for a contract
//! - **inspect**: show each routed method's classification and frame chain
//! - **call**: synthesize, bind to an HTTP transport, and invoke one method
//!
//! ## Example Usage
//!
//! ```bash
//! # Show the generated implementation
//! rest-synth emit --contract widgets.yaml
//!
//! # Inspect frame chains as JSON
//! rest-synth inspect --contract widgets.json --json
//!
//! # Call a method against a running server
//! rest-synth call --contract widgets.yaml --method get_widget --args '[7]' \
//!     --base-url http://localhost:8080
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`; `--verbose` (or
//! `REST_SYNTH_VERBOSE=1`) raises the default level to debug.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rest_synth::types::env_utils::env_bool;

mod synth_cli;

use synth_cli::{call::CallCmd, emit::EmitCmd, inspect::InspectCmd};

#[derive(Parser)]
#[command(
    name = "rest-synth",
    author,
    version,
    about = "Synthesize HTTP clients from declarative interface contracts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logging, frame details)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the synthesized Rust source for a contract
    Emit(EmitCmd),

    /// Show the frame chain of every routed method
    Inspect(InspectCmd),

    /// Invoke one synthesized method over HTTP
    Call(CallCmd),
}

const VERBOSE_ENV: &str = "REST_SYNTH_VERBOSE";

fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let formatter = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_level(true);

    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::registry()
        .with(formatter)
        .with(filter)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        command,
        json,
        verbose,
    } = Cli::parse();
    let verbose = verbose || env_bool(VERBOSE_ENV);

    init_logging(verbose);

    let result = match command {
        Commands::Emit(cmd) => cmd.execute(json),
        Commands::Inspect(cmd) => cmd.execute(json, verbose),
        Commands::Call(cmd) => cmd.execute(json).await,
    };

    if let Err(err) = result {
        eprint!("{}", synth_cli::output::format_error(&err, json));
        std::process::exit(1);
    }
    Ok(())
}

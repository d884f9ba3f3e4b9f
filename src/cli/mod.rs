//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod helpers;
pub mod output;
pub mod workspace;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};
pub use workspace::Workspace;

use miette::Result;

/// Install the tracing subscriber; logs go to stderr
pub fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // RUST_LOG sets the baseline; an explicit -v overrides its global level
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .from_env_lossy();
    let filter = if verbosity > 0 {
        filter.add_directive(level.into())
    } else {
        filter
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Run a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => commands::init::run(args, &global),
        Commands::Lifetime(args) => commands::lifetime::run(args, &global),
        Commands::Sf(cmd) => commands::sf::run(cmd, &global),
        Commands::Cmp(cmd) => commands::cmp::run(cmd, &global),
        Commands::Fm(cmd) => commands::fm::run(cmd, &global),
        Commands::Link(args) => commands::link::run_link(args, &global),
        Commands::Unlink(args) => commands::link::run_unlink(args, &global),
        Commands::Eval(args) => commands::eval::run(args, &global),
        Commands::Summary(args) => commands::summary::run(args, &global),
        Commands::Catalog(args) => commands::catalog::run(args, &global),
        Commands::Export(args) => commands::export::run(args, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

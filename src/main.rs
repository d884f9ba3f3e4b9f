use clap::Parser;
use fmeda::cli::Cli;
use miette::Result;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    fmeda::cli::setup_logging(cli.global.verbose);

    fmeda::cli::run(cli)
}

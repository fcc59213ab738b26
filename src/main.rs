use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;
use txt2epub::{app::App, args::Options};

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Options::parse();

    let default_filter = if args.verbose {
        "txt2epub=debug"
    } else {
        "txt2epub=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    App::new(args).run()?;
    Ok(())
}

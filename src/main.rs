//! nbview binary entry point.

use std::process::ExitCode;

use nbview::cli::{self, Args, ArgsError, OutputMode};
use nbview::config::Config;
use nbview::render::{render_summary, Renderer};
use nbview::{load_notebook, logging};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Run 'nbview --help' for usage.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> nbview::Result<()> {
    let config = Config::load(args)?;
    // A second subscriber (e.g. under test harnesses) is not fatal.
    let _ = logging::init_with_filter(config.log_filter());

    let path = args.path.as_ref().ok_or(ArgsError::MissingPath)?;
    debug!(path = %path.display(), "nbview v{}", env!("CARGO_PKG_VERSION"));

    let notebook = load_notebook(path, &config.to_load_options()).await?;

    let output = match args.mode {
        OutputMode::Html => Renderer::new(config.to_render_options()).render_notebook(&notebook),
        OutputMode::Summary => render_summary(&notebook),
        OutputMode::Json => {
            let mut json = notebook
                .to_json_pretty()
                .map_err(nbview::FormatError::from)?;
            json.push('\n');
            json
        }
    };
    print!("{output}");

    Ok(())
}

use std::path::PathBuf;

use clap::Parser;
use cli::{Args, Commands};
use debferry_config::config::{self, get_config};
use debferry_core::DebferryResult;
use logging::setup_logging;
use utils::COLOR;

mod clean;
mod cli;
mod install;
mod logging;
mod repositories;
mod search;
mod sync;
mod utils;

async fn handle_cli() -> DebferryResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        let mut color = COLOR.write().unwrap();
        *color = false;
    }

    config::init()?;
    let config = get_config();

    let architecture = config.architecture()?;
    let index_root = config.repositories_path().join(architecture.as_str());
    let scratch_root = args
        .temp
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.temp_path());
    let converter_options = args
        .options
        .clone()
        .unwrap_or_else(|| config.converter_options().to_string());

    match args.command {
        Commands::Sync { providers } => {
            sync::sync_repositories(
                config.manifest_url(),
                architecture,
                &index_root,
                &providers,
            )
            .await?;
        }
        Commands::Repositories => {
            repositories::list_providers(config.manifest_url(), architecture, args.json).await?;
        }
        Commands::Search {
            name,
            exact,
            provider,
            distribution,
        } => {
            search::search_packages(
                &name,
                &index_root,
                provider.as_deref(),
                distribution.as_deref(),
                exact,
                args.json,
            )?;
        }
        Commands::Install {
            name,
            provider,
            distribution,
        } => {
            install::install_from_repository(
                &name,
                &index_root,
                &scratch_root,
                &converter_options,
                provider.as_deref(),
                distribution.as_deref(),
            )?;
        }
        Commands::Url { url } => {
            install::install_from_url(&url, &scratch_root, &converter_options)?;
        }
        Commands::File { path } => {
            install::install_from_file(&path, &scratch_root, &converter_options)?;
        }
        Commands::Clean { index } => {
            clean::clean(&scratch_root, &config.repositories_path(), index)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli().await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}

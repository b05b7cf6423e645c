//! SupportDesk CLI
//!
//! Command-line viewer for a SupportDesk deployment's configuration,
//! contacts and documents.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use supportdeskctl::cache::ConfigCache;
use supportdeskctl::cli::{
    generate_completion, handle_cache, handle_config, handle_contacts, handle_docs, handle_flag,
    handle_settings, handle_themes, Cli, Commands, OutputFormat,
};
use supportdeskctl::client::SupportDeskClient;
use supportdeskctl::flags::FlagLookup;
use supportdeskctl::loader::ConfigLoader;
use supportdeskctl::settings::ClientSettings;
use supportdeskctl::storage::FileStore;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build settings using priority chain: defaults → file → env → CLI args
    let mut builder = ClientSettings::builder();

    if !cli.no_config {
        builder = match builder.with_settings_file(cli.config.as_deref()) {
            Ok(builder) => builder,
            Err(e) => {
                eprintln!("Settings error: {:#}", e);
                std::process::exit(1);
            }
        };
    }

    builder = builder.with_env_overrides();

    if let Some(ref url) = cli.url {
        builder = builder.with_base_url(url)?;
    }
    if let Some(ref format) = cli.format {
        let format_str = match format {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        };
        builder = builder.with_output_format(format_str)?;
    }
    if let Some(verbose) = cli.verbose {
        builder = builder.with_verbose(verbose);
    }
    if let Some(timeout) = cli.timeout {
        builder = builder.with_timeout(timeout)?;
    }

    let settings = match builder.build() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Settings error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(settings.verbose);
    debug!(
        base_url = %settings.base_url,
        cache_dir = %settings.cache_dir.display(),
        timeout = settings.timeout,
        "effective settings"
    );

    let output_format = match settings.output_format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let client = match SupportDeskClient::new(&settings.base_url, settings.timeout) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let cache = Arc::new(ConfigCache::new(FileStore::new(&settings.cache_dir)));
    let loader = ConfigLoader::new(Arc::clone(&cache), client.clone());

    let result = match cli.command {
        Commands::Config { command } => handle_config(&loader, command, &output_format).await,
        Commands::Cache { command } => handle_cache(&cache, command, &output_format),
        Commands::Contacts => handle_contacts(&loader, &output_format).await,
        Commands::Docs { command } => {
            handle_docs(&loader, client.as_ref(), command, &output_format).await
        }
        Commands::Themes => handle_themes(&loader, &output_format).await,
        Commands::Flag { name } => {
            let flags = FlagLookup::new(client.clone());
            handle_flag(&flags, &name, &output_format).await
        }
        Commands::Settings { command } => handle_settings(&settings, command, &output_format),
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        if settings.verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr so JSON on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

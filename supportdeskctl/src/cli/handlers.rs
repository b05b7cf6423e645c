//! Command execution handlers

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use supportdesk_core::{lint, Configuration, DocumentQuery};

use crate::cache::ConfigCache;
use crate::flags::FlagLookup;
use crate::format::{
    format_cache_status, format_config, format_contacts, format_document, format_documents,
    format_library_report, format_lint, format_settings, format_success, format_themes,
};
use crate::library::load_library;
use crate::loader::{ConfigLoader, Provenance};
use crate::settings::ClientSettings;
use crate::source::DocumentSource;

use super::commands::*;

/// Run the load protocol and insist on a configuration.
async fn resolve_config(loader: &ConfigLoader) -> Result<(Arc<Configuration>, Provenance)> {
    let state = loader.load().await;

    match (state.config, state.error) {
        (Some(config), _) => Ok((config, state.source)),
        (None, Some(error)) => Err(anyhow::anyhow!("{}", error))
            .context("No configuration available: nothing cached and the fetch failed"),
        (None, None) => Err(anyhow::anyhow!("No configuration available")),
    }
}

/// Handle config commands
pub async fn handle_config(
    loader: &ConfigLoader,
    command: ConfigCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let (config, source) = resolve_config(loader).await?;
            println!("{}", format_config(&config, source, &format.into())?);
        }
        ConfigCommands::Validate { file } => validate_file(&file, format)?,
    }

    Ok(())
}

fn validate_file(path: &Path, format: &OutputFormat) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = match Configuration::from_json_str(&content) {
        Ok(config) => config,
        Err(error) => {
            if let OutputFormat::Json = format {
                let report = json!({
                    "valid": false,
                    "field": error.field,
                    "message": error.message,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            return Err(anyhow::anyhow!("{} is invalid: {}", path.display(), error));
        }
    };

    let warnings = lint(&config);
    match format {
        OutputFormat::Json => {
            let report = json!({ "valid": true, "warnings": warnings });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            println!(
                "{}",
                format_success(&format!(
                    "{} is valid ({} v{})",
                    path.display(),
                    config.app_name,
                    config.version
                ))
            );
            if !warnings.is_empty() {
                println!("{}", format_lint(&warnings));
            }
        }
    }

    Ok(())
}

/// Handle cache commands
pub fn handle_cache(
    cache: &ConfigCache,
    command: CacheCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        CacheCommands::Status => {
            let info = cache
                .inspect()
                .context("Failed to read the configuration cache")?;
            println!(
                "{}",
                format_cache_status(info.as_ref(), cache.ttl_ms(), &format.into())?
            );
        }
        CacheCommands::Clear => {
            cache
                .clear()
                .context("Failed to clear the configuration cache")?;
            println!("{}", format_success("Configuration cache cleared"));
        }
    }

    Ok(())
}

/// Handle contacts command
pub async fn handle_contacts(loader: &ConfigLoader, format: &OutputFormat) -> Result<()> {
    let (config, _) = resolve_config(loader).await?;
    println!("{}", format_contacts(&config.contacts, &format.into())?);
    Ok(())
}

/// Handle docs commands
pub async fn handle_docs(
    loader: &ConfigLoader,
    source: &dyn DocumentSource,
    command: DocsCommands,
    format: &OutputFormat,
) -> Result<()> {
    let (config, _) = resolve_config(loader).await?;
    let library = load_library(source, &config).await;

    if let Some(warning) = format_library_report(library.report()) {
        eprintln!("{}", warning);
    }

    match command {
        DocsCommands::List { search, tags } => {
            let mut query = DocumentQuery::new();
            if let Some(search) = search {
                query = query.with_search(search);
            }
            for tag in tags {
                query = query.with_tag(tag);
            }
            let query = query.for_features(&config.features);

            let documents = library.search(&query);
            println!("{}", format_documents(&documents, &format.into())?);
        }
        DocsCommands::Show { id } => {
            let document = library
                .find(&id)
                .ok_or_else(|| anyhow::anyhow!("Document '{}' not found", id))?;
            println!("{}", format_document(document, &format.into())?);
        }
    }

    Ok(())
}

/// Handle themes command
pub async fn handle_themes(loader: &ConfigLoader, format: &OutputFormat) -> Result<()> {
    let (config, _) = resolve_config(loader).await?;
    println!("{}", format_themes(&config.theme, &format.into())?);
    Ok(())
}

/// Handle flag command
pub async fn handle_flag(flags: &FlagLookup, name: &str, format: &OutputFormat) -> Result<()> {
    let enabled = flags.is_enabled(name).await;

    match format {
        OutputFormat::Json => {
            let response = json!({ "name": name, "enabled": enabled });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Table => {
            println!("{}: {}", name, if enabled { "enabled" } else { "disabled" });
        }
    }

    Ok(())
}

/// Handle settings commands
pub fn handle_settings(
    settings: &ClientSettings,
    command: SettingsCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        SettingsCommands::Show => println!("{}", format_settings(settings, &format.into())?),
    }

    Ok(())
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

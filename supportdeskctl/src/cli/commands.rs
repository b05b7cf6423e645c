//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SupportDesk CLI
#[derive(Parser, Debug)]
#[command(name = "supportdeskctl")]
#[command(version, about = "SupportDesk support documentation viewer", long_about = None)]
pub struct Cli {
    /// Asset server base URL (overrides settings file)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Output format (overrides settings file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging (overrides settings file)
    #[arg(short, long)]
    pub verbose: Option<bool>,

    /// Request timeout in seconds (overrides settings file)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Don't load the settings file
    #[arg(long)]
    pub no_config: bool,

    /// Settings file path (default: ~/.config/supportdesk/client.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl From<&OutputFormat> for crate::format::OutputFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show or validate the deployment configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Inspect or clear the configuration cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// List help desk contacts by region
    Contacts,

    /// Browse support documents
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
    },

    /// List themes
    Themes,

    /// Query a runtime feature flag
    Flag {
        /// Flag name
        name: String,
    },

    /// Show client settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Load the configuration (cache, then network) and print it
    Show,

    /// Validate a local configuration file
    Validate {
        /// Path to an app.config.json
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show the cached envelope
    Status,

    /// Remove the cached configuration
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum DocsCommands {
    /// List documents
    List {
        /// Case-insensitive search on title and category
        #[arg(short, long)]
        search: Option<String>,

        /// Only documents carrying this tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Show one document
    Show {
        /// Document ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print effective settings
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_docs_list_with_tags() {
        let cli = Cli::parse_from([
            "supportdeskctl",
            "--format",
            "json",
            "docs",
            "list",
            "--search",
            "vpn",
            "--tag",
            "network",
            "--tag",
            "remote",
        ]);

        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        match cli.command {
            Commands::Docs {
                command: DocsCommands::List { search, tags },
            } => {
                assert_eq!(search.as_deref(), Some("vpn"));
                assert_eq!(tags, vec!["network", "remote"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_overrides() {
        let cli = Cli::parse_from([
            "supportdeskctl",
            "--url",
            "https://help.acme.com",
            "--timeout",
            "5",
            "--no-config",
            "flag",
            "newSearch",
        ]);

        assert_eq!(cli.url.as_deref(), Some("https://help.acme.com"));
        assert_eq!(cli.timeout, Some(5));
        assert!(cli.no_config);
        assert!(matches!(cli.command, Commands::Flag { ref name } if name == "newSearch"));
    }
}

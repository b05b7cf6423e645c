//! Output formatting utilities for the CLI
//!
//! Provides table and JSON formatting with colors.

use anyhow::Result;
use colored::*;
use serde_json::json;
use supportdesk_core::{ConfigWarning, Configuration, ContactInfo, SupportDocument, ThemeConfig};

use tabled::{settings::Style, Table, Tabled};

use crate::cache::CacheEntryInfo;
use crate::library::LibraryReport;
use crate::loader::Provenance;
use crate::settings::ClientSettings;

/// Output format options
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
}

fn provenance_label(source: Provenance) -> ColoredString {
    match source {
        Provenance::Network => "network".green(),
        Provenance::Cache => "cache".yellow(),
        Provenance::None => "none".red(),
    }
}

fn yes_no(value: bool) -> ColoredString {
    if value {
        "Yes".green()
    } else {
        "No".dimmed()
    }
}

/// Format the resolved configuration
pub fn format_config(
    config: &Configuration,
    source: Provenance,
    format: &OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "source": source,
            "config": config,
        }))?),
        OutputFormat::Table => {
            let mut output = String::new();
            output.push_str(&config.app_name.bold().to_string());
            if let Some(subtitle) = &config.app_subtitle {
                output.push_str(&format!(" - {}", subtitle));
            }
            output.push('\n');
            output.push_str(&format!("Company: {}\n", config.company_name.cyan()));
            output.push_str(&format!("App ID: {}\n", config.app_id));
            output.push_str(&format!("Domain: {}\n", config.domain));
            if let Some(portal) = &config.vpn_portal {
                output.push_str(&format!("VPN Portal: {}\n", portal));
            }
            output.push_str(&format!("Version: {}\n", config.version.cyan()));
            output.push_str(&format!("Source: {}\n", provenance_label(source)));
            output.push_str(&format!("Help Desk: {}\n", config.contacts.email));
            output.push_str(&format!(
                "Emergency: {}\n",
                config.contacts.urgent_email()
            ));

            output.push_str(&"\nFeatures:".bold().to_string());
            for (name, enabled) in config.features.iter() {
                output.push_str(&format!("\n  {:<20} {}", name, yes_no(enabled)));
            }

            output.push_str(&"\n\nDocument Collections:".bold().to_string());
            for collection in config.ordered_collections() {
                output.push_str(&format!("\n  {} ({})", collection.name, collection.path));
            }

            Ok(output)
        }
    }
}

/// Format regional contacts, grouped by region
pub fn format_contacts(contacts: &ContactInfo, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "email": contacts.email,
            "emergencyEmail": contacts.urgent_email(),
            "regions": contacts.grouped_by_region(),
        }))?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct OfficeRow {
                #[tabled(rename = "Region")]
                region: String,
                #[tabled(rename = "City")]
                city: String,
                #[tabled(rename = "Phone")]
                phone: String,
                #[tabled(rename = "Hours")]
                hours: String,
            }

            let mut rows = Vec::new();
            for group in contacts.grouped_by_region() {
                for (index, office) in group.offices.iter().enumerate() {
                    rows.push(OfficeRow {
                        region: if index == 0 {
                            group.region.bold().to_string()
                        } else {
                            String::new()
                        },
                        city: if office.is_headquarters() {
                            office.city.cyan().to_string()
                        } else {
                            office.city.clone()
                        },
                        phone: office.phone.clone(),
                        hours: office.hours.clone(),
                    });
                }
            }

            let mut output = format!(
                "Help Desk: {}\nEmergency: {}",
                contacts.email.cyan(),
                contacts.urgent_email().yellow()
            );
            if !rows.is_empty() {
                let table = Table::new(rows).with(Style::rounded()).to_string();
                output.push_str(&format!("\n\n{}\n{}", "Regional Offices:".bold(), table));
            }
            Ok(output)
        }
    }
}

/// Format a list of documents
pub fn format_documents(documents: &[&SupportDocument], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(documents)?),
        OutputFormat::Table => {
            if documents.is_empty() {
                return Ok("No documents match".dimmed().to_string());
            }

            #[derive(Tabled)]
            struct DocumentRow {
                #[tabled(rename = "ID")]
                id: String,
                #[tabled(rename = "Title")]
                title: String,
                #[tabled(rename = "Category")]
                category: String,
                #[tabled(rename = "Type")]
                doc_type: String,
                #[tabled(rename = "Tags")]
                tags: String,
            }

            let rows: Vec<DocumentRow> = documents
                .iter()
                .map(|doc| DocumentRow {
                    id: doc.id.clone(),
                    title: doc.title.clone(),
                    category: doc.category.clone(),
                    doc_type: doc.doc_type.to_string().cyan().to_string(),
                    tags: doc.tags.join(", "),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Documents:".bold(), table))
        }
    }
}

/// Format a single document's body, or its URL for binary types
pub fn format_document(document: &SupportDocument, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(document)?),
        OutputFormat::Table => {
            let mut output = format!(
                "{}\n{} | {}\n\n",
                document.title.bold(),
                document.category.cyan(),
                document.doc_type
            );
            match &document.file_url {
                Some(url) => {
                    output.push_str(&document.content);
                    output.push_str(&format!("\n{}", url.underline()));
                }
                None => output.push_str(&document.content),
            }
            Ok(output)
        }
    }
}

/// Format the theme list, marking the default theme
pub fn format_themes(themes: &ThemeConfig, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(themes)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct ThemeRow {
                #[tabled(rename = "ID")]
                id: String,
                #[tabled(rename = "Name")]
                name: String,
                #[tabled(rename = "Enabled")]
                enabled: String,
                #[tabled(rename = "Description")]
                description: String,
            }

            let rows: Vec<ThemeRow> = themes
                .themes
                .iter()
                .map(|theme| ThemeRow {
                    id: if theme.id == themes.default_theme {
                        format!("{} (default)", theme.id).bold().to_string()
                    } else {
                        theme.id.clone()
                    },
                    name: theme.name.clone(),
                    enabled: yes_no(theme.enabled).to_string(),
                    description: theme.description.clone().unwrap_or_default(),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!(
                "{}\n{}\nTheme switcher: {}",
                "Themes:".bold(),
                table,
                yes_no(themes.enable_theme_switcher)
            ))
        }
    }
}

/// Format cache diagnostics
pub fn format_cache_status(
    info: Option<&CacheEntryInfo>,
    ttl_ms: i64,
    format: &OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "entry": info,
            "ttlMs": ttl_ms,
        }))?),
        OutputFormat::Table => {
            let Some(info) = info else {
                return Ok("No cached configuration".dimmed().to_string());
            };

            let mut output = String::new();
            output.push_str(&"Cached Configuration".bold().to_string());
            output.push_str(&format!("\nVersion: {}", info.version.cyan()));
            if let Some(captured_at) = info.captured_at {
                output.push_str(&format!("\nCaptured: {}", captured_at.to_rfc3339()));
            }
            output.push_str(&format!(
                "\nAge: {}s of {}s",
                info.age_ms / 1000,
                ttl_ms / 1000
            ));
            output.push_str(&format!(
                "\nStatus: {}",
                match (&info.invalid, info.expired) {
                    (Some(_), _) => "invalid".red(),
                    (None, true) => "expired".yellow(),
                    (None, false) => "valid".green(),
                }
            ));
            if let Some(reason) = &info.invalid {
                output.push_str(&format!("\nReason: {}", reason));
            }
            Ok(output)
        }
    }
}

/// Format effective client settings
pub fn format_settings(settings: &ClientSettings, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(settings)?),
        OutputFormat::Table => {
            let mut output = String::new();
            output.push_str(&"Client Settings:".bold().to_string());
            output.push_str(&format!("\n{:<16} {}", "Base URL", settings.base_url));
            output.push_str(&format!("\n{:<16} {}", "Output Format", settings.output_format));
            output.push_str(&format!("\n{:<16} {}", "Verbose", settings.verbose));
            output.push_str(&format!("\n{:<16} {}s", "Timeout", settings.timeout));
            output.push_str(&format!(
                "\n{:<16} {}",
                "Cache Dir",
                settings.cache_dir.display()
            ));
            Ok(output)
        }
    }
}

/// Summary line for a library load with dropped items, if any
pub fn format_library_report(report: &LibraryReport) -> Option<String> {
    if report.used_fallback {
        return Some(format_warning(
            "No document collection could be loaded, showing bundled documents",
        ));
    }
    if !report.has_failures() {
        return None;
    }

    let failed = report.failed_collections().count();
    Some(format_warning(&format!(
        "{} document(s) dropped, {} collection(s) unavailable",
        report.total_dropped(),
        failed
    )))
}

/// Format lint warnings
pub fn format_lint(warnings: &[ConfigWarning]) -> String {
    warnings
        .iter()
        .map(|w| format_warning(&w.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

/// Format a warning message
pub fn format_warning(message: &str) -> String {
    format!("{} {}", "!".yellow().bold(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::CollectionReport;
    use crate::test_utils::sample_config;

    fn config() -> Configuration {
        Configuration::from_value(sample_config()).unwrap()
    }

    #[test]
    fn test_format_config_json_carries_source() {
        let result = format_config(&config(), Provenance::Cache, &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();

        assert_eq!(value["source"], "cache");
        assert_eq!(value["config"]["$version"], "1.2");
    }

    #[test]
    fn test_format_config_table() {
        let result = format_config(&config(), Provenance::Network, &OutputFormat::Table).unwrap();
        assert!(result.contains("Acme Support"));
        assert!(result.contains("IT Guides"));
        assert!(result.contains("tagFiltering"));
    }

    #[test]
    fn test_format_contacts_groups_regions() {
        let config = config();
        let result = format_contacts(&config.contacts, &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();

        let regions = value["regions"].as_array().unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0]["region"], "Americas");
        assert_eq!(regions[0]["offices"].as_array().unwrap().len(), 2);
        assert_eq!(value["emergencyEmail"], "security@acmecorp.com");
    }

    #[test]
    fn test_format_themes_table() {
        let config = config();
        let result = format_themes(&config.theme, &OutputFormat::Table).unwrap();
        assert!(result.contains("light (default)"));
        assert!(result.contains("High Contrast"));
    }

    #[test]
    fn test_format_cache_status_empty() {
        let result = format_cache_status(None, 1000, &OutputFormat::Table).unwrap();
        assert!(result.contains("No cached configuration"));

        let result = format_cache_status(None, 1000, &OutputFormat::Json).unwrap();
        assert!(result.contains("\"entry\": null"));
    }

    #[test]
    fn test_format_library_report() {
        let mut report = LibraryReport::default();
        assert!(format_library_report(&report).is_none());

        report.collections.push(CollectionReport {
            name: "Docs".to_string(),
            dropped: 2,
            ..Default::default()
        });
        assert!(format_library_report(&report)
            .unwrap()
            .contains("2 document(s) dropped"));

        report.used_fallback = true;
        assert!(format_library_report(&report)
            .unwrap()
            .contains("bundled documents"));
    }

    #[test]
    fn test_format_settings_json() {
        let result = format_settings(&ClientSettings::default(), &OutputFormat::Json).unwrap();
        assert!(result.contains("http://localhost:8080"));
        assert!(result.contains("\"timeout\": 10"));
    }
}

//! Branding placeholder substitution for document text

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

use crate::config::Configuration;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\{(companyName\.toUpperCase\(\)|companyName|appName|domain|emergencyEmail|email|vpnPortal)\}",
    )
    .expect("placeholder pattern")
});

/// Substitutes `{companyName}`-style tokens with deployment values.
///
/// Supported tokens: `{companyName}`, `{companyName.toUpperCase()}`,
/// `{appName}`, `{domain}`, `{email}`, `{emergencyEmail}` and `{vpnPortal}`.
/// `{emergencyEmail}` falls back to the primary help desk email;
/// `{vpnPortal}` is left in place when the deployment has no portal.
/// Substitution is a single pass: values are never expanded again.
#[derive(Debug, Clone)]
pub struct Placeholders {
    pairs: Vec<(&'static str, String)>,
}

impl Placeholders {
    pub fn from_config(config: &Configuration) -> Self {
        let mut pairs = vec![
            (
                "{companyName.toUpperCase()}",
                config.company_name.to_uppercase(),
            ),
            ("{companyName}", config.company_name.clone()),
            ("{appName}", config.app_name.clone()),
            ("{domain}", config.domain.clone()),
            ("{emergencyEmail}", config.contacts.urgent_email().to_string()),
            ("{email}", config.contacts.email.clone()),
        ];
        if let Some(portal) = &config.vpn_portal {
            pairs.push(("{vpnPortal}", portal.clone()));
        }

        Self { pairs }
    }

    pub fn apply(&self, text: &str) -> String {
        TOKEN
            .replace_all(text, |caps: &Captures<'_>| {
                let token = &caps[0];
                self.pairs
                    .iter()
                    .find(|(name, _)| *name == token)
                    .map_or_else(|| token.to_string(), |(_, value)| value.clone())
            })
            .into_owned()
    }
}

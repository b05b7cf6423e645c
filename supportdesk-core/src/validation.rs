//! Configuration validation
//!
//! Validation runs in two passes:
//!
//! 1. [`check_shape`] walks the raw JSON and verifies that every required key
//!    is present with the right kind (string, boolean, object, array,
//!    integer). Errors name the dotted field path.
//! 2. [`check_semantics`] runs on the typed [`Configuration`]: version,
//!    app id, domain and email formats, theme cross-references, regional
//!    contact completeness, and document collection descriptors.
//!
//! [`lint`] reports advisory warnings that never block loading.

use regex_lite::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use crate::config::{Configuration, Features};
use crate::error::ValidationError;

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+$").expect("version pattern"));

static APP_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9-]*(\.[a-z][a-z0-9-]*)+$").expect("app id pattern")
});

static DOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)*$")
        .expect("domain pattern")
});

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static THEME_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("theme id pattern"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9\s().-]+$").expect("phone pattern"));

static TIMEZONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z]{2,4}|24/7|UTC[+-]\d{1,2}|GMT[+-]\d{1,2})").expect("timezone pattern")
});

/// Top-level keys every configuration must carry, in reporting order.
const REQUIRED_FIELDS: [&str; 9] = [
    "$version",
    "companyName",
    "appName",
    "appId",
    "domain",
    "contacts",
    "features",
    "theme",
    "documents",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    String,
    Bool,
    Object,
    Array,
    Integer,
}

impl Kind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Bool => value.is_boolean(),
            Kind::Object => value.is_object(),
            Kind::Array => value.is_array(),
            Kind::Integer => value.is_u64(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Kind::String => "a string",
            Kind::Bool => "a boolean",
            Kind::Object => "an object",
            Kind::Array => "an array",
            Kind::Integer => "a non-negative integer",
        }
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn expect_kind(value: &Value, field: &str, kind: Kind) -> Result<(), ValidationError> {
    if kind.matches(value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("must be {}", kind.describe()),
        ))
    }
}

/// Fetch a required key and check its kind.
fn required<'v>(
    obj: &'v Map<String, Value>,
    parent: &str,
    key: &str,
    kind: Kind,
) -> Result<&'v Value, ValidationError> {
    let field = join(parent, key);
    let value = obj
        .get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ValidationError::missing(&field))?;
    expect_kind(value, &field, kind)?;
    Ok(value)
}

/// Check an optional key's kind when it is present.
fn optional<'v>(
    obj: &'v Map<String, Value>,
    parent: &str,
    key: &str,
    kind: Kind,
) -> Result<Option<&'v Value>, ValidationError> {
    match obj.get(key).filter(|v| !v.is_null()) {
        Some(value) => {
            expect_kind(value, &join(parent, key), kind)?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

fn as_object<'v>(value: &'v Value, field: &str) -> Result<&'v Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::new(field, "must be an object"))
}

fn as_array<'v>(value: &'v Value, field: &str) -> Result<&'v Vec<Value>, ValidationError> {
    value
        .as_array()
        .ok_or_else(|| ValidationError::new(field, "must be an array"))
}

/// Structural check over raw JSON.
///
/// Verifies presence and primitive kinds only; formats and cross-field
/// rules are left to [`check_semantics`].
pub fn check_shape(value: &Value) -> Result<(), ValidationError> {
    let root = value
        .as_object()
        .ok_or_else(|| ValidationError::new("$root", "configuration must be a JSON object"))?;

    // Report the first missing top-level key before looking at kinds.
    for key in REQUIRED_FIELDS {
        let present = match key {
            "$version" => root.contains_key("$version") || root.contains_key("version"),
            _ => root.get(key).map(|v| !v.is_null()).unwrap_or(false),
        };
        if !present {
            return Err(ValidationError::missing(key));
        }
    }

    let version_key = if root.contains_key("$version") {
        "$version"
    } else {
        "version"
    };
    required(root, "", version_key, Kind::String)?;
    required(root, "", "companyName", Kind::String)?;
    required(root, "", "appName", Kind::String)?;
    required(root, "", "appId", Kind::String)?;
    required(root, "", "domain", Kind::String)?;
    optional(root, "", "appSubtitle", Kind::String)?;
    optional(root, "", "vpnPortal", Kind::String)?;

    check_contacts_shape(required(root, "", "contacts", Kind::Object)?)?;
    check_features_shape(required(root, "", "features", Kind::Object)?)?;
    check_theme_shape(required(root, "", "theme", Kind::Object)?)?;
    check_documents_shape(required(root, "", "documents", Kind::Array)?)?;

    Ok(())
}

fn check_contacts_shape(value: &Value) -> Result<(), ValidationError> {
    let contacts = as_object(value, "contacts")?;
    required(contacts, "contacts", "email", Kind::String)?;
    optional(contacts, "contacts", "emergencyEmail", Kind::String)?;

    if let Some(regions) = optional(contacts, "contacts", "regions", Kind::Array)? {
        for (index, region) in as_array(regions, "contacts.regions")?.iter().enumerate() {
            let path = format!("contacts.regions[{}]", index);
            let region = as_object(region, &path)?;
            for key in ["region", "city", "phone", "hours"] {
                required(region, &path, key, Kind::String)?;
            }
        }
    }

    Ok(())
}

fn check_features_shape(value: &Value) -> Result<(), ValidationError> {
    let features = as_object(value, "features")?;
    for key in Features::REQUIRED {
        required(features, "features", key, Kind::Bool)?;
    }
    for (key, flag) in features {
        expect_kind(flag, &join("features", key), Kind::Bool)?;
    }
    Ok(())
}

fn check_theme_shape(value: &Value) -> Result<(), ValidationError> {
    let theme = as_object(value, "theme")?;
    required(theme, "theme", "defaultTheme", Kind::String)?;
    required(theme, "theme", "enableThemeSwitcher", Kind::Bool)?;

    let themes = as_array(
        required(theme, "theme", "themes", Kind::Array)?,
        "theme.themes",
    )?;
    if themes.is_empty() {
        return Err(ValidationError::new(
            "theme.themes",
            "must contain at least one theme",
        ));
    }

    for (index, entry) in themes.iter().enumerate() {
        let path = format!("theme.themes[{}]", index);
        let entry = as_object(entry, &path)?;
        required(entry, &path, "id", Kind::String)?;
        required(entry, &path, "name", Kind::String)?;
        required(entry, &path, "enabled", Kind::Bool)?;
        optional(entry, &path, "description", Kind::String)?;
    }

    Ok(())
}

fn check_documents_shape(value: &Value) -> Result<(), ValidationError> {
    let documents = as_array(value, "documents")?;
    if documents.is_empty() {
        return Err(ValidationError::new(
            "documents",
            "at least one document collection must be provided",
        ));
    }

    for (index, entry) in documents.iter().enumerate() {
        let path = format!("documents[{}]", index);
        let entry = as_object(entry, &path)?;
        required(entry, &path, "name", Kind::String)?;
        required(entry, &path, "path", Kind::String)?;
        optional(entry, &path, "position", Kind::Integer)?;
    }

    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Format and cross-field checks over a typed configuration.
pub fn check_semantics(config: &Configuration) -> Result<(), ValidationError> {
    if !VERSION_PATTERN.is_match(&config.version) {
        return Err(ValidationError::new(
            "$version",
            format!(
                "\"{}\" must be in <major>.<minor> form (e.g. 1.0)",
                config.version
            ),
        ));
    }

    if config.company_name.trim().is_empty() {
        return Err(ValidationError::new("companyName", "cannot be empty"));
    }
    if config.app_name.trim().is_empty() {
        return Err(ValidationError::new("appName", "cannot be empty"));
    }

    if !APP_ID_PATTERN.is_match(&config.app_id) {
        return Err(ValidationError::new(
            "appId",
            format!(
                "\"{}\" must use reverse domain notation (e.g. com.company.app)",
                config.app_id
            ),
        ));
    }

    if config.domain.contains('@') || !DOMAIN_PATTERN.is_match(&config.domain.to_lowercase()) {
        return Err(ValidationError::new(
            "domain",
            format!(
                "\"{}\" must be a valid domain name without @ symbol",
                config.domain
            ),
        ));
    }

    check_contacts(config)?;
    check_themes(config)?;
    check_documents(config)?;

    Ok(())
}

fn check_contacts(config: &Configuration) -> Result<(), ValidationError> {
    let contacts = &config.contacts;

    if !is_valid_email(&contacts.email) {
        return Err(ValidationError::new(
            "contacts.email",
            format!("\"{}\" is not a valid email address", contacts.email),
        ));
    }

    if let Some(emergency) = &contacts.emergency_email {
        if !is_valid_email(emergency) {
            return Err(ValidationError::new(
                "contacts.emergencyEmail",
                format!("\"{}\" is not a valid email address", emergency),
            ));
        }
    }

    for (index, office) in contacts.regions.iter().enumerate() {
        let fields = [
            ("region", &office.region),
            ("city", &office.city),
            ("phone", &office.phone),
            ("hours", &office.hours),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::new(
                    format!("contacts.regions[{}].{}", index, name),
                    "is required and cannot be empty",
                ));
            }
        }
    }

    Ok(())
}

fn check_themes(config: &Configuration) -> Result<(), ValidationError> {
    let theme = &config.theme;
    let mut seen = HashSet::new();

    for (index, entry) in theme.themes.iter().enumerate() {
        if !THEME_ID_PATTERN.is_match(&entry.id) {
            return Err(ValidationError::new(
                format!("theme.themes[{}].id", index),
                format!(
                    "\"{}\" must be lowercase alphanumeric with hyphens",
                    entry.id
                ),
            ));
        }
        if entry.name.trim().is_empty() {
            return Err(ValidationError::new(
                format!("theme.themes[{}].name", index),
                "cannot be empty",
            ));
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(ValidationError::new(
                "theme.themes",
                format!("duplicate theme id \"{}\"", entry.id),
            ));
        }
    }

    let default = theme.default_theme();
    if default.is_none() {
        let ids: Vec<&str> = theme.themes.iter().map(|t| t.id.as_str()).collect();
        return Err(ValidationError::new(
            "theme.defaultTheme",
            format!(
                "\"{}\" must match one of: {}",
                theme.default_theme,
                ids.join(", ")
            ),
        ));
    }

    if theme.available_themes().next().is_none() {
        return Err(ValidationError::new(
            "theme.themes",
            "at least one theme must be enabled",
        ));
    }

    if let Some(default) = default {
        if !default.enabled {
            return Err(ValidationError::new(
                "theme.defaultTheme",
                format!("\"{}\" refers to a disabled theme", default.id),
            ));
        }
    }

    Ok(())
}

fn check_documents(config: &Configuration) -> Result<(), ValidationError> {
    if config.documents.is_empty() {
        return Err(ValidationError::new(
            "documents",
            "at least one document collection must be provided",
        ));
    }

    for (index, collection) in config.documents.iter().enumerate() {
        if collection.name.trim().is_empty() {
            return Err(ValidationError::new(
                format!("documents[{}].name", index),
                "cannot be empty",
            ));
        }
        if collection.path.trim().is_empty() {
            return Err(ValidationError::new(
                format!("documents[{}].path", index),
                "cannot be empty",
            ));
        }
    }

    Ok(())
}

/// Non-fatal advice about a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
}

impl ConfigWarning {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn looks_like_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    PHONE_PATTERN.is_match(trimmed) && digits >= 10
}

/// Collect display and formatting advice for a configuration.
pub fn lint(config: &Configuration) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.company_name.chars().count() > 100 {
        warnings.push(ConfigWarning::new(
            "companyName",
            "is very long (>100 chars), consider shortening for better display",
        ));
    }
    if config.app_name.chars().count() > 50 {
        warnings.push(ConfigWarning::new(
            "appName",
            "is long (>50 chars), may be truncated in some displays",
        ));
    }
    if let Some(subtitle) = &config.app_subtitle {
        if subtitle.chars().count() > 100 {
            warnings.push(ConfigWarning::new(
                "appSubtitle",
                "is very long (>100 chars)",
            ));
        }
    }

    for (index, office) in config.contacts.regions.iter().enumerate() {
        let path = format!("contacts.regions[{}]", index);

        if !looks_like_phone(&office.phone) {
            warnings.push(ConfigWarning::new(
                format!("{}.phone", path),
                format!(
                    "\"{}\" appears invalid, use +[country] ([area]) [number]",
                    office.phone
                ),
            ));
        }
        if !office.phone.trim_start().starts_with('+') {
            warnings.push(ConfigWarning::new(
                format!("{}.phone", path),
                "should include a country code (start with +)",
            ));
        }
        if !TIMEZONE_PATTERN.is_match(&office.hours) {
            warnings.push(ConfigWarning::new(
                format!("{}.hours", path),
                format!(
                    "\"{}\" should include a timezone (EST, GMT, UTC+9) or 24/7",
                    office.hours
                ),
            ));
        }
    }

    warnings
}

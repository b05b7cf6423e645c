//! Bundled documents used when no collection could be loaded

use super::{DocumentIcon, DocumentType, Placeholders, SupportDocument};
use crate::config::Configuration;

struct Template {
    id: &'static str,
    title: &'static str,
    category: &'static str,
    icon: DocumentIcon,
    tags: &'static [&'static str],
    body: &'static str,
}

const TEMPLATES: &[Template] = &[
    Template {
        id: "wifi-network",
        title: "{companyName} Wi-Fi Network Connections",
        category: "Network",
        icon: DocumentIcon::Wifi,
        tags: &["network", "wifi", "connection", "setup"],
        body: "# {companyName} Wi-Fi Network Connections

## Available Networks

### {companyName.toUpperCase()}-CORP
Primary corporate network for {companyName}-issued devices.
- **Security**: WPA2-Enterprise
- **Authentication**: Use your {companyName} credentials

### {companyName.toUpperCase()}-GUEST
For visitors and personal devices. The password is available from reception.

## Troubleshooting
- Verify your password hasn't expired
- Try forgetting the network and reconnecting

## Support
For assistance, contact the IT Help Desk at {email}.",
    },
    Template {
        id: "ms-teams-tips",
        title: "Tips on Using MS Teams",
        category: "Collaboration",
        icon: DocumentIcon::Teams,
        tags: &["collaboration", "teams", "chat", "meetings"],
        body: "# Tips on Using Microsoft Teams

Microsoft Teams is the primary {companyName} platform for chat, meetings, and file sharing.

## Essentials
- **@mentions**: Use @name to get someone's attention
- **Background blur**: Settings > Background effects
- **Mute**: Ctrl+Shift+M (Cmd+Shift+M on Mac)

## Support
For Teams support, contact the IT Help Desk at {email}.",
    },
    Template {
        id: "email-setup",
        title: "Email Setup & Best Practices",
        category: "Communication",
        icon: DocumentIcon::Email,
        tags: &["email", "outlook", "setup", "communication"],
        body: "# Email Setup & Best Practices

## Outlook Configuration
1. Open Microsoft Outlook
2. Go to File > Add Account
3. Enter your {companyName} email address (name@{domain})
4. Follow the autodiscover prompts

## Security Guidelines
- Never share passwords via email
- Report suspicious emails to {emergencyEmail}

## Support
Contact the IT Help Desk at {email} for email issues.",
    },
    Template {
        id: "security-guidelines",
        title: "Security Guidelines",
        category: "Security",
        icon: DocumentIcon::Security,
        tags: &["security", "password", "mfa", "phishing"],
        body: "# Security Guidelines

## Password Policy
- Minimum 12 characters
- Enable MFA wherever available

## Phishing Awareness
1. Don't click any links
2. Don't download attachments
3. Forward to {emergencyEmail}
4. Delete the email

## Incident Reporting
Report security incidents immediately to {emergencyEmail}.",
    },
    Template {
        id: "vpn-setup",
        title: "VPN Connection Guide",
        category: "Network",
        icon: DocumentIcon::Vpn,
        tags: &["vpn", "network", "remote", "setup"],
        body: "# VPN Connection Guide

The {companyName} VPN provides secure access to internal resources when working remotely.

## Connecting
1. Open the VPN client
2. Enter the portal address: {vpnPortal}
3. Sign in with your {companyName} credentials and approve the MFA prompt

## Support
Contact the IT Help Desk at {email} if you cannot connect.",
    },
];

/// Bundled markdown guides branded for `config`.
pub fn fallback_documents(config: &Configuration) -> Vec<SupportDocument> {
    let placeholders = Placeholders::from_config(config);

    TEMPLATES
        .iter()
        .map(|t| SupportDocument {
            id: t.id.to_string(),
            title: placeholders.apply(t.title),
            category: t.category.to_string(),
            icon: t.icon,
            content: placeholders.apply(t.body),
            tags: t.tags.iter().map(|tag| tag.to_string()).collect(),
            doc_type: DocumentType::Markdown,
            file_url: None,
        })
        .collect()
}

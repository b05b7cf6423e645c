//! Help desk contact information

use serde::{Deserialize, Serialize};

/// A regional office that takes support calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalContact {
    /// Geographic region (Americas, EMEA, Asia Pacific)
    pub region: String,
    /// City of the office, `(HQ)` suffix marks headquarters
    pub city: String,
    /// Phone number in international format
    pub phone: String,
    /// Business hours including a timezone, or `24/7`
    pub hours: String,
}

impl RegionalContact {
    /// Phone number with whitespace removed, suitable for a `tel:` link.
    pub fn dial_string(&self) -> String {
        self.phone.chars().filter(|c| !c.is_whitespace()).collect()
    }

    pub fn is_headquarters(&self) -> bool {
        self.city.contains("(HQ)")
    }
}

/// Offices sharing a region name, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionGroup<'a> {
    pub region: &'a str,
    pub offices: Vec<&'a RegionalContact>,
}

/// Help desk and emergency contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    /// Primary help desk mailbox
    pub email: String,
    /// Security or urgent-issue mailbox
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<RegionalContact>,
}

impl ContactInfo {
    /// Emergency mailbox, falling back to the primary one.
    pub fn urgent_email(&self) -> &str {
        self.emergency_email.as_deref().unwrap_or(&self.email)
    }

    /// Group offices by region, regions in order of first appearance.
    pub fn grouped_by_region(&self) -> Vec<RegionGroup<'_>> {
        let mut groups: Vec<RegionGroup<'_>> = Vec::new();

        for office in &self.regions {
            match groups.iter_mut().find(|g| g.region == office.region) {
                Some(group) => group.offices.push(office),
                None => groups.push(RegionGroup {
                    region: &office.region,
                    offices: vec![office],
                }),
            }
        }

        groups
    }
}

// Data models for a researched company

use serde::{Deserialize, Serialize};

/// Contact channels published by the company
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactInformation {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl ContactInformation {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.website.is_none()
    }
}

/// Everything known about one company after a single research call.
///
/// Every field is independently optional because the research agent may
/// omit any fact. Lists are empty rather than absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompanyProfile {
    pub legal_name: Option<String>,
    pub general_details: Option<String>,
    pub primary_address: Option<String>,
    pub town: Option<String>,
    pub country: Option<String>,
    pub legal_form: Option<String>,
    pub registration_number: Option<String>,
    pub registration_date: Option<String>,
    #[serde(default)]
    pub contact_information: ContactInformation,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub shareholders: Vec<String>,
    /// Ultimate beneficial owners
    pub ubo: Option<String>,
    pub parent_company: Option<String>,
    pub subsidiaries: Option<String>,
    pub last_reported_revenue: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

impl CompanyProfile {
    /// True when the profile carries no information at all
    pub fn is_empty(&self) -> bool {
        self.legal_name.is_none()
            && self.general_details.is_none()
            && self.primary_address.is_none()
            && self.town.is_none()
            && self.country.is_none()
            && self.legal_form.is_none()
            && self.registration_number.is_none()
            && self.registration_date.is_none()
            && self.contact_information.is_empty()
            && self.directors.is_empty()
            && self.shareholders.is_empty()
            && self.ubo.is_none()
            && self.parent_company.is_none()
            && self.subsidiaries.is_none()
            && self.last_reported_revenue.is_none()
            && self.references.is_empty()
    }
}

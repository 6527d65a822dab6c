// Company profile validator - coerces loosely-typed agent output into a CompanyProfile

use crate::models::{CompanyProfile, ContactInformation};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Top-level keys of the company profile schema
pub const PROFILE_FIELDS: &[&str] = &[
    "legal_name",
    "general_details",
    "primary_address",
    "town",
    "country",
    "legal_form",
    "registration_number",
    "registration_date",
    "contact_information",
    "directors",
    "shareholders",
    "ubo",
    "parent_company",
    "subsidiaries",
    "last_reported_revenue",
    "references",
];

/// Contact keys that may also appear flat at the top level
const FLAT_CONTACT_FIELDS: &[&str] = &["email", "phone", "website"];

/// Filler values language models use instead of leaving a field out
const FILLER_VALUES: &[&str] = &[
    "n/a",
    "na",
    "none",
    "null",
    "unknown",
    "not available",
    "information not available",
];

/// Name used for issues that concern the response as a whole
pub const ROOT_FIELD: &str = "response";

/// What went wrong with a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    Malformed(String),
}

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub kind: IssueKind,
}

impl FieldIssue {
    fn missing(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: IssueKind::Missing,
        }
    }

    fn malformed(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind: IssueKind::Malformed(message.into()),
        }
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            IssueKind::Missing => write!(f, "{}: missing", self.field),
            IssueKind::Malformed(message) => write!(f, "{}: {}", self.field, message),
        }
    }
}

/// Error returned when a response cannot be coerced into a CompanyProfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    fn root(message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::malformed(ROOT_FIELD, message)],
        }
    }

    /// Names of the fields that were missing
    pub fn missing_fields(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter(|i| i.kind == IssueKind::Missing)
            .map(|i| i.field.as_str())
            .collect()
    }

    /// Names of the fields that were present but unusable
    pub fn malformed_fields(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::Malformed(_)))
            .map(|i| i.field.as_str())
            .collect()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let missing = self.missing_fields();
        if !missing.is_empty() && missing.len() == self.issues.len() {
            return write!(f, "missing fields: {}", missing.join(", "));
        }
        let details: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", details.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Extract JSON code blocks from markdown content
/// Returns all ```json ... ``` blocks found in the content
pub fn extract_json_blocks(content: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"```json\s*\n([\s\S]*?)```").unwrap());
    re.captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().trim().to_string()))
        .collect()
}

/// Validate a raw agent response and coerce it into a CompanyProfile.
///
/// Unknown keys are ignored and list fields default to empty. A bare string
/// is only accepted when it holds a JSON object, either directly or inside a
/// fenced ```json block.
pub fn validate_profile(raw: &Value) -> Result<CompanyProfile, ValidationError> {
    match raw {
        Value::Object(object) => validate_object(object),
        Value::String(text) => match parse_embedded_object(text) {
            Some(object) => validate_object(&object),
            None => Err(ValidationError::root(
                "expected an object, found a plain string",
            )),
        },
        other => Err(ValidationError::root(format!(
            "expected an object, found {}",
            type_name(other)
        ))),
    }
}

/// JSON object held in a string, either as the whole string or inside the
/// first ```json fence
pub fn parse_embedded_object(text: &str) -> Option<Map<String, Value>> {
    let candidate = extract_json_blocks(text)
        .into_iter()
        .next()
        .unwrap_or_else(|| text.trim().to_string());

    match serde_json::from_str::<Value>(&candidate) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn validate_object(object: &Map<String, Value>) -> Result<CompanyProfile, ValidationError> {
    let recognized = object.keys().any(|key| {
        PROFILE_FIELDS.contains(&key.as_str()) || FLAT_CONTACT_FIELDS.contains(&key.as_str())
    });
    if !recognized {
        return Err(ValidationError {
            issues: PROFILE_FIELDS
                .iter()
                .map(|field| FieldIssue::missing(field))
                .collect(),
        });
    }

    let mut issues = Vec::new();

    let profile = CompanyProfile {
        legal_name: read_text(object, "legal_name", "legal_name", &mut issues),
        general_details: read_text(object, "general_details", "general_details", &mut issues),
        primary_address: read_text(object, "primary_address", "primary_address", &mut issues),
        town: read_text(object, "town", "town", &mut issues),
        country: read_text(object, "country", "country", &mut issues),
        legal_form: read_text(object, "legal_form", "legal_form", &mut issues),
        registration_number: read_text(
            object,
            "registration_number",
            "registration_number",
            &mut issues,
        )
        .and_then(|number| clean_registration_number(&number)),
        registration_date: read_text(
            object,
            "registration_date",
            "registration_date",
            &mut issues,
        ),
        contact_information: read_contact(object, &mut issues),
        directors: read_people(object, "directors", &mut issues),
        shareholders: read_people(object, "shareholders", &mut issues),
        ubo: read_text(object, "ubo", "ubo", &mut issues),
        parent_company: read_text(object, "parent_company", "parent_company", &mut issues),
        subsidiaries: read_text(object, "subsidiaries", "subsidiaries", &mut issues),
        last_reported_revenue: read_text(
            object,
            "last_reported_revenue",
            "last_reported_revenue",
            &mut issues,
        ),
        references: read_references(object, "references", &mut issues),
    };

    if issues.is_empty() {
        Ok(profile)
    } else {
        Err(ValidationError { issues })
    }
}

/// Read an optional text field. `label` is the name reported in issues.
fn read_text(
    object: &Map<String, Value>,
    key: &str,
    label: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => clean_text(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(other) => {
            issues.push(FieldIssue::malformed(
                label,
                format!("expected text, found {}", type_name(other)),
            ));
            None
        }
    }
}

fn read_contact(object: &Map<String, Value>, issues: &mut Vec<FieldIssue>) -> ContactInformation {
    let mut contact = ContactInformation::default();

    match object.get("contact_information") {
        None | Some(Value::Null) => {}
        Some(Value::Object(nested)) => {
            contact.email = read_text(nested, "email", "contact_information.email", issues);
            contact.phone = read_text(nested, "phone", "contact_information.phone", issues);
            contact.website = read_text(nested, "website", "contact_information.website", issues);
        }
        Some(other) => issues.push(FieldIssue::malformed(
            "contact_information",
            format!("expected an object, found {}", type_name(other)),
        )),
    }

    // Flat keys only fill gaps left by the nested object
    if contact.email.is_none() {
        contact.email = read_text(object, "email", "email", issues);
    }
    if contact.phone.is_none() {
        contact.phone = read_text(object, "phone", "phone", issues);
    }
    if contact.website.is_none() {
        contact.website = read_text(object, "website", "website", issues);
    }

    contact.email = contact.email.filter(|email| is_plausible_email(email));
    contact.website = contact.website.filter(|website| is_http_url(website));
    contact
}

/// Read a list of person or organisation names
fn read_people(object: &Map<String, Value>, key: &str, issues: &mut Vec<FieldIssue>) -> Vec<String> {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();

    match object.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(text)) => {
            let separator = SEPARATOR.get_or_init(|| Regex::new(r"[,;]|\band\b").unwrap());
            separator.split(text).filter_map(clean_text).collect()
        }
        Some(Value::Array(items)) => {
            let mut names = Vec::new();
            for (index, item) in items.iter().enumerate() {
                let name = match item {
                    Value::Null => None,
                    Value::String(text) => clean_text(text),
                    Value::Number(number) => Some(number.to_string()),
                    Value::Object(entry) => match entry.get("name") {
                        Some(Value::String(text)) => clean_text(text),
                        _ => {
                            issues.push(FieldIssue::malformed(
                                &format!("{}[{}]", key, index),
                                "expected a name",
                            ));
                            None
                        }
                    },
                    other => {
                        issues.push(FieldIssue::malformed(
                            &format!("{}[{}]", key, index),
                            format!("expected a name, found {}", type_name(other)),
                        ));
                        None
                    }
                };
                names.extend(name);
            }
            names
        }
        Some(other) => {
            issues.push(FieldIssue::malformed(
                key,
                format!("expected a list of names, found {}", type_name(other)),
            ));
            Vec::new()
        }
    }
}

/// Read a list of reference URLs, dropping anything that is not http(s)
fn read_references(
    object: &Map<String, Value>,
    key: &str,
    issues: &mut Vec<FieldIssue>,
) -> Vec<String> {
    let candidates: Vec<String> = match object.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(text)) => text.split_whitespace().map(str::to_string).collect(),
        Some(Value::Array(items)) => {
            let mut urls = Vec::new();
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::String(text) => urls.push(text.trim().to_string()),
                    Value::Object(entry) => match entry.get("url") {
                        Some(Value::String(text)) => urls.push(text.trim().to_string()),
                        _ => issues.push(FieldIssue::malformed(
                            &format!("{}[{}]", key, index),
                            "expected a URL",
                        )),
                    },
                    Value::Null => {}
                    other => issues.push(FieldIssue::malformed(
                        &format!("{}[{}]", key, index),
                        format!("expected a URL, found {}", type_name(other)),
                    )),
                }
            }
            urls
        }
        Some(other) => {
            issues.push(FieldIssue::malformed(
                key,
                format!("expected a list of URLs, found {}", type_name(other)),
            ));
            Vec::new()
        }
    };

    let mut references: Vec<String> = Vec::new();
    for url in candidates {
        if !is_http_url(&url) {
            log::debug!("[validator] Dropping non-http reference: {}", url);
            continue;
        }
        if !references.contains(&url) {
            references.push(url);
        }
    }
    references
}

/// Trim a text value, treating empty strings and filler as absent
fn clean_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || FILLER_VALUES.contains(&trimmed.to_lowercase().as_str()) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Remove separators from a registration number
fn clean_registration_number(number: &str) -> Option<String> {
    let cleaned: String = number.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    // "N.A." only becomes filler once the dots are gone
    clean_text(&cleaned)
}

fn is_plausible_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

/// True for absolute http(s) URLs
pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

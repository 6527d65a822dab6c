//! Presentation of a company profile
//!
//! A [`CompanyProfile`] is turned into a fixed, ordered list of sections.
//! Missing facts are shown as [`PLACEHOLDER`] instead of being left out, so
//! the page layout never depends on how complete the data is. A failed
//! lookup becomes a single [`ErrorPanel`] and nothing else.

use crate::lookup::{ErrorKind, LookupError};
use crate::models::{CompanyProfile, ContactInformation};
use serde::Serialize;
use uuid::Uuid;

/// Text shown in place of a missing fact
pub const PLACEHOLDER: &str = "Information not available";

/// Section identifiers, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Contact,
    Registration,
    Directors,
    Shareholders,
    References,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Header,
        SectionKind::Contact,
        SectionKind::Registration,
        SectionKind::Directors,
        SectionKind::Shareholders,
        SectionKind::References,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Header => "Company",
            SectionKind::Contact => "Contact",
            SectionKind::Registration => "Legal & registration",
            SectionKind::Directors => "Directors",
            SectionKind::Shareholders => "Shareholders",
            SectionKind::References => "References",
        }
    }
}

/// One labelled fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactRow {
    /// Profile field this row displays
    pub field: &'static str,
    pub label: &'static str,
    pub value: String,
    pub available: bool,
}

/// A link in the references list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkItem {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum SectionContent {
    Facts {
        rows: Vec<FactRow>,
    },
    /// Name table; `rows` is empty and `placeholder` set when there is no data
    Table {
        field: &'static str,
        column: &'static str,
        rows: Vec<String>,
        placeholder: Option<&'static str>,
    },
    Links {
        field: &'static str,
        links: Vec<LinkItem>,
        placeholder: Option<&'static str>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: &'static str,
    pub content: SectionContent,
}

/// Everything the page shows for one profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    /// Page heading: the legal name, or the name that was searched for
    pub heading: String,
    pub sections: Vec<Section>,
}

impl ProfileView {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Profile fields rendered as placeholders, in display order
    pub fn placeholder_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        for section in &self.sections {
            match &section.content {
                SectionContent::Facts { rows } => {
                    fields.extend(rows.iter().filter(|r| !r.available).map(|r| r.field));
                }
                SectionContent::Table {
                    field, placeholder, ..
                }
                | SectionContent::Links {
                    field, placeholder, ..
                } => {
                    if placeholder.is_some() {
                        fields.push(*field);
                    }
                }
            }
        }
        fields
    }

    /// Read the displayed values back into a profile
    pub fn to_profile(&self) -> CompanyProfile {
        let mut profile = CompanyProfile::default();
        for section in &self.sections {
            match &section.content {
                SectionContent::Facts { rows } => {
                    for row in rows.iter().filter(|r| r.available) {
                        if let Some(slot) = text_slot(&mut profile, row.field) {
                            *slot = Some(row.value.clone());
                        }
                    }
                }
                SectionContent::Table { field, rows, .. } => match *field {
                    "directors" => profile.directors = rows.clone(),
                    "shareholders" => profile.shareholders = rows.clone(),
                    _ => {}
                },
                SectionContent::Links { links, .. } => {
                    profile.references = links.iter().map(|l| l.href.clone()).collect();
                }
            }
        }
        profile
    }
}

fn text_slot<'a>(profile: &'a mut CompanyProfile, field: &str) -> Option<&'a mut Option<String>> {
    let slot = match field {
        "legal_name" => &mut profile.legal_name,
        "general_details" => &mut profile.general_details,
        "primary_address" => &mut profile.primary_address,
        "town" => &mut profile.town,
        "country" => &mut profile.country,
        "legal_form" => &mut profile.legal_form,
        "registration_number" => &mut profile.registration_number,
        "registration_date" => &mut profile.registration_date,
        "contact_information.email" => &mut profile.contact_information.email,
        "contact_information.phone" => &mut profile.contact_information.phone,
        "contact_information.website" => &mut profile.contact_information.website,
        "ubo" => &mut profile.ubo,
        "parent_company" => &mut profile.parent_company,
        "subsidiaries" => &mut profile.subsidiaries,
        "last_reported_revenue" => &mut profile.last_reported_revenue,
        _ => return None,
    };
    Some(slot)
}

fn fact(field: &'static str, label: &'static str, value: &Option<String>) -> FactRow {
    match value {
        Some(value) => FactRow {
            field,
            label,
            value: value.clone(),
            available: true,
        },
        None => FactRow {
            field,
            label,
            value: PLACEHOLDER.to_string(),
            available: false,
        },
    }
}

fn placeholder_if_empty<T>(items: &[T]) -> Option<&'static str> {
    if items.is_empty() {
        Some(PLACEHOLDER)
    } else {
        None
    }
}

fn contact_rows(profile: &CompanyProfile) -> Vec<FactRow> {
    let ContactInformation {
        email,
        phone,
        website,
    } = &profile.contact_information;
    vec![
        fact("primary_address", "Primary address", &profile.primary_address),
        fact("town", "Town", &profile.town),
        fact("contact_information.email", "Email", email),
        fact("contact_information.phone", "Phone", phone),
        fact("contact_information.website", "Website", website),
    ]
}

fn registration_rows(profile: &CompanyProfile) -> Vec<FactRow> {
    vec![
        fact("legal_form", "Legal form", &profile.legal_form),
        fact(
            "registration_number",
            "Registration number",
            &profile.registration_number,
        ),
        fact("registration_date", "Registration date", &profile.registration_date),
        fact("country", "Country", &profile.country),
        fact("parent_company", "Parent company", &profile.parent_company),
        fact("subsidiaries", "Subsidiaries", &profile.subsidiaries),
        fact("ubo", "Ultimate beneficial owners", &profile.ubo),
        fact(
            "last_reported_revenue",
            "Last reported revenue",
            &profile.last_reported_revenue,
        ),
    ]
}

fn section(kind: SectionKind, content: SectionContent) -> Section {
    Section {
        kind,
        title: kind.title(),
        content,
    }
}

/// Lay out a profile as the six display sections.
///
/// `searched_for` is used as the heading when the legal name is unknown.
pub fn render_profile(profile: &CompanyProfile, searched_for: &str) -> ProfileView {
    let sections = SectionKind::ALL
        .iter()
        .map(|&kind| match kind {
            SectionKind::Header => section(
                kind,
                SectionContent::Facts {
                    rows: vec![
                        fact("legal_name", "Legal name", &profile.legal_name),
                        fact("general_details", "Summary", &profile.general_details),
                    ],
                },
            ),
            SectionKind::Contact => section(
                kind,
                SectionContent::Facts {
                    rows: contact_rows(profile),
                },
            ),
            SectionKind::Registration => section(
                kind,
                SectionContent::Facts {
                    rows: registration_rows(profile),
                },
            ),
            SectionKind::Directors => section(
                kind,
                SectionContent::Table {
                    field: "directors",
                    column: "Director",
                    rows: profile.directors.clone(),
                    placeholder: placeholder_if_empty(&profile.directors),
                },
            ),
            SectionKind::Shareholders => section(
                kind,
                SectionContent::Table {
                    field: "shareholders",
                    column: "Shareholder",
                    rows: profile.shareholders.clone(),
                    placeholder: placeholder_if_empty(&profile.shareholders),
                },
            ),
            SectionKind::References => section(
                kind,
                SectionContent::Links {
                    field: "references",
                    links: profile
                        .references
                        .iter()
                        .map(|url| LinkItem {
                            href: url.clone(),
                            text: link_text(url),
                        })
                        .collect(),
                    placeholder: placeholder_if_empty(&profile.references),
                },
            ),
        })
        .collect();

    ProfileView {
        heading: profile
            .legal_name
            .clone()
            .unwrap_or_else(|| searched_for.to_string()),
        sections,
    }
}

/// Host and path without the scheme, e.g. `example.com/about`
fn link_text(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme.trim_end_matches('/').to_string()
}

/// The single panel shown when a lookup fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPanel {
    pub kind: ErrorKind,
    /// Taxonomy label, e.g. `RetrievalError`
    pub label: &'static str,
    pub title: &'static str,
    pub message: String,
    pub suggestion: &'static str,
    pub request_id: String,
}

impl ErrorPanel {
    pub fn from_error(err: &LookupError, request_id: Uuid) -> Self {
        let kind = err.kind();
        Self {
            kind,
            label: kind.label(),
            title: kind.title(),
            message: err.to_string(),
            suggestion: err.suggestion(),
            request_id: request_id.to_string(),
        }
    }
}

/// Main content of the page: the form alone, a profile, or one error panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PageBody {
    Blank,
    Profile(ProfileView),
    Error(ErrorPanel),
}

/// Values echoed back into the search form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValues {
    pub company: String,
    pub country: String,
}

/// Complete page model handed to the template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub form: FormValues,
    pub body: PageBody,
    pub generated_at: String,
}

pub const PAGE_TITLE: &str = "AI Web Research Agent";

impl PageView {
    pub fn new(form: FormValues, body: PageBody) -> Self {
        Self {
            title: PAGE_TITLE,
            form,
            body,
            generated_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }

    pub fn blank() -> Self {
        Self::new(FormValues::default(), PageBody::Blank)
    }

    /// Page for the outcome of a lookup
    pub fn for_lookup(
        form: FormValues,
        result: &Result<CompanyProfile, LookupError>,
        request_id: Uuid,
    ) -> Self {
        let body = match result {
            Ok(profile) => PageBody::Profile(render_profile(profile, form.company.trim())),
            Err(err) => PageBody::Error(ErrorPanel::from_error(err, request_id)),
        };
        Self::new(form, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::InputError;

    fn full_profile() -> CompanyProfile {
        CompanyProfile {
            legal_name: Some("Acme Corporation".to_string()),
            general_details: Some("Maker of anvils.".to_string()),
            primary_address: Some("1 Desert Road".to_string()),
            town: Some("Phoenix, Arizona".to_string()),
            country: Some("United States".to_string()),
            legal_form: Some("Corporation".to_string()),
            registration_number: Some("C123456".to_string()),
            registration_date: Some("1949-09-17".to_string()),
            contact_information: ContactInformation {
                email: Some("info@acme.example".to_string()),
                phone: Some("+1 555 0100".to_string()),
                website: Some("https://acme.example".to_string()),
            },
            directors: vec!["Jane Doe".to_string(), "John Roe".to_string()],
            shareholders: vec!["Acme Holdings".to_string()],
            ubo: Some("Jane Doe".to_string()),
            parent_company: Some("Acme Holdings".to_string()),
            subsidiaries: Some("Acme Rockets LLC".to_string()),
            last_reported_revenue: Some("USD 12.5m (2023)".to_string()),
            references: vec!["https://acme.example/about/".to_string()],
        }
    }

    #[test]
    fn test_sections_are_in_fixed_order() {
        let view = render_profile(&CompanyProfile::default(), "Acme");
        let kinds: Vec<SectionKind> = view.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
    }

    #[test]
    fn test_full_profile_has_no_placeholders() {
        let view = render_profile(&full_profile(), "Acme");
        assert!(view.placeholder_fields().is_empty());
        assert_eq!(view.heading, "Acme Corporation");
    }

    #[test]
    fn test_empty_profile_is_all_placeholders() {
        let view = render_profile(&CompanyProfile::default(), "Acme Corp");
        let placeholders = view.placeholder_fields();
        assert_eq!(placeholders.len(), 18);
        assert!(placeholders.contains(&"directors"));
        assert!(placeholders.contains(&"references"));
        assert_eq!(view.heading, "Acme Corp");
    }

    #[test]
    fn test_placeholders_match_missing_fields() {
        let mut profile = full_profile();
        profile.town = None;
        profile.contact_information.phone = None;
        profile.shareholders.clear();

        let view = render_profile(&profile, "Acme");
        assert_eq!(
            view.placeholder_fields(),
            vec!["town", "contact_information.phone", "shareholders"]
        );
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let profile = full_profile();
        assert_eq!(render_profile(&profile, "Acme").to_profile(), profile);

        let mut partial = CompanyProfile::default();
        partial.legal_name = Some("Acme Corporation".to_string());
        partial.directors = vec!["Jane Doe".to_string()];
        assert_eq!(render_profile(&partial, "Acme").to_profile(), partial);
    }

    #[test]
    fn test_link_text_drops_scheme() {
        assert_eq!(link_text("https://acme.example/about/"), "acme.example/about");
        assert_eq!(link_text("http://example.com"), "example.com");
    }

    #[test]
    fn test_error_page_has_single_panel() {
        let err = LookupError::from(InputError::Empty);
        let page = PageView::for_lookup(FormValues::default(), &Err(err), Uuid::nil());
        match page.body {
            PageBody::Error(panel) => {
                assert_eq!(panel.label, "InputError");
                assert_eq!(panel.message, "Please enter a company name");
                assert_eq!(panel.request_id, Uuid::nil().to_string());
            }
            other => panic!("expected error panel, got {:?}", other),
        }
    }

    #[test]
    fn test_page_body_serializes_with_view_tag() {
        let page = PageView::for_lookup(
            FormValues {
                company: "Acme".to_string(),
                country: String::new(),
            },
            &Ok(full_profile()),
            Uuid::nil(),
        );
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["body"]["view"], "profile");
        assert_eq!(value["body"]["sections"][3]["content"]["layout"], "table");
        assert_eq!(value["title"], PAGE_TITLE);
    }
}

// Parsers for research agent output

pub mod citations;
pub mod profile;

pub use citations::{split_report, Citation, ResearchReport};
pub use profile::{
    parse_embedded_object, validate_profile, FieldIssue, IssueKind, ValidationError, PROFILE_FIELDS,
};

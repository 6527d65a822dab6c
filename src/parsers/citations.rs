// Research report parser - separates the report body from its citations

use super::profile::is_http_url;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use regex::Regex;
use std::sync::OnceLock;

/// `## References` (or deeper) at the start of a line
fn references_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?mi)^#{2,}[ \t]*(references|sources)\b").unwrap())
}

fn conclusion_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?mi)^#{2,}[ \t]*conclusions?\b").unwrap())
}

/// A source cited by the research report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub title: String,
    pub url: String,
}

/// A research report split into prose and sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchReport {
    /// Report text without the conclusion, the references section or inline links
    pub body: String,
    /// Cited sources in order of first appearance, de-duplicated by URL
    pub citations: Vec<Citation>,
}

impl ResearchReport {
    pub fn urls(&self) -> Vec<String> {
        self.citations.iter().map(|c| c.url.clone()).collect()
    }

    /// Sources as `- {title} {url}` lines, one per citation
    pub fn source_list(&self) -> String {
        self.citations
            .iter()
            .map(|c| {
                if c.title == c.url {
                    format!("- {}", c.url)
                } else {
                    format!("- {} {}", c.title, c.url)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Split a markdown research report into its body and citations.
///
/// The body stops at a `## Conclusion` or `## References` heading (any
/// level from `##` down, matched at the start of a line). Citations are the
/// http(s) links found in the body followed by any URLs listed in the
/// references section.
pub fn split_report(report: &str) -> ResearchReport {
    let (main, references_section) = match references_heading().find(report) {
        Some(heading) => (&report[..heading.start()], Some(&report[heading.end()..])),
        None => (report, None),
    };
    let main = match conclusion_heading().find(main) {
        Some(heading) => &main[..heading.start()],
        None => main,
    }
    .trim();

    let mut citations = Vec::new();
    for citation in extract_links(main) {
        push_unique(&mut citations, citation);
    }
    if let Some(section) = references_section {
        for citation in extract_links(section) {
            push_unique(&mut citations, citation);
        }
        for citation in extract_listed_urls(section) {
            push_unique(&mut citations, citation);
        }
    }

    ResearchReport {
        body: strip_inline_links(main),
        citations,
    }
}

fn push_unique(citations: &mut Vec<Citation>, citation: Citation) {
    if !citations.iter().any(|c| c.url == citation.url) {
        citations.push(citation);
    }
}

/// Collect markdown links with an http(s) destination
fn extract_links(content: &str) -> Vec<Citation> {
    let mut links = Vec::new();
    let mut current: Option<(String, String)> = None;

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => {
                current = Some((dest_url.to_string(), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, title)) = current.as_mut() {
                    title.push_str(&text);
                }
            }
            Event::End(TagEnd::Link) => {
                if let Some((url, title)) = current.take() {
                    if is_http_url(&url) {
                        let title = title.trim();
                        links.push(Citation {
                            title: if title.is_empty() {
                                url.clone()
                            } else {
                                title.to_string()
                            },
                            url,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    links
}

/// Collect bare URLs from lines such as `- Company Registry https://...`
fn extract_listed_urls(section: &str) -> Vec<Citation> {
    static URL: OnceLock<Regex> = OnceLock::new();
    let re = URL.get_or_init(|| Regex::new(r"https?://[^\s<>()\[\]]+").unwrap());

    let mut citations = Vec::new();
    for line in section.lines() {
        for found in re.find_iter(line) {
            let url = found.as_str().trim_end_matches(['.', ',', ';']).to_string();
            let title = line
                .replace(found.as_str(), "")
                .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '*' | '.'))
                .to_string();
            citations.push(Citation {
                title: if title.is_empty() { url.clone() } else { title },
                url,
            });
        }
    }
    citations
}

/// Remove `[title](url)` citations from report prose
fn strip_inline_links(content: &str) -> String {
    static LINK: OnceLock<Regex> = OnceLock::new();
    let re = LINK.get_or_init(|| Regex::new(r"\[[^\]]*\]\(https?://[^)\s]+\)").unwrap());
    re.replace_all(content, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"# Acme Corporation

Acme Corporation is registered in Delaware ([OpenCorporates](https://opencorporates.example/acme)).
Its directors include Jane Doe [Annual Report](https://acme.example/report.pdf).

## Conclusion

Acme is a well known maker of anvils.

## References

- OpenCorporates https://opencorporates.example/acme
- Delaware Registry https://registry.example/acme.
"#;

    #[test]
    fn test_split_report_body_stops_at_conclusion() {
        let report = split_report(REPORT);
        assert!(report.body.starts_with("# Acme Corporation"));
        assert!(!report.body.contains("anvils"));
        assert!(!report.body.contains("References"));
    }

    #[test]
    fn test_split_report_strips_inline_links() {
        let report = split_report(REPORT);
        assert!(!report.body.contains("https://"));
        assert!(report.body.contains("registered in Delaware"));
    }

    #[test]
    fn test_split_report_collects_citations_in_order() {
        let report = split_report(REPORT);
        assert_eq!(
            report.urls(),
            vec![
                "https://opencorporates.example/acme",
                "https://acme.example/report.pdf",
                "https://registry.example/acme",
            ]
        );
        assert_eq!(report.citations[0].title, "OpenCorporates");
        assert_eq!(report.citations[2].title, "Delaware Registry");
    }

    #[test]
    fn test_split_report_without_sections() {
        let report = split_report("Plain text with no links.");
        assert_eq!(report.body, "Plain text with no links.");
        assert!(report.citations.is_empty());
    }

    #[test]
    fn test_deeper_references_heading_leaves_no_marker() {
        let report = split_report("Body text.\n\n### References\n- https://a.example");
        assert_eq!(report.body, "Body text.");
        assert_eq!(report.urls(), vec!["https://a.example"]);
    }

    #[test]
    fn test_heading_words_inside_prose_do_not_split() {
        let report = split_report("See the ## References note below and the Conclusion of the filing.");
        assert_eq!(
            report.body,
            "See the ## References note below and the Conclusion of the filing."
        );
        assert!(report.citations.is_empty());
    }

    #[test]
    fn test_source_list_names_each_source() {
        let report = split_report(REPORT);
        assert_eq!(
            report.source_list(),
            "- OpenCorporates https://opencorporates.example/acme\n\
             - Annual Report https://acme.example/report.pdf\n\
             - Delaware Registry https://registry.example/acme"
        );

        let bare = split_report("## References\nhttps://a.example");
        assert_eq!(bare.source_list(), "- https://a.example");
    }

    #[test]
    fn test_non_http_links_are_ignored() {
        let report = split_report("See [mail](mailto:info@acme.example) and [site](https://acme.example).");
        assert_eq!(report.urls(), vec!["https://acme.example"]);
    }
}

// Prompts for the research agent

use super::SearchHit;

/// Characters of page content passed to the model per search hit
const MAX_SOURCE_CHARS: usize = 2_000;

pub const REPORT_SYSTEM_PROMPT: &str = "You are a meticulous corporate research analyst. \
You write factual, well structured research reports about companies using only the sources \
you are given. Never invent registration numbers, people, addresses or figures. When a fact \
is not in the sources, say that it could not be found.";

pub const EXTRACTION_SYSTEM_PROMPT: &str = "You extract structured company information from \
research reports. Reply with a single JSON object and nothing else.";

/// Prompt asking the model to write a cited markdown report
pub fn report_prompt(question: &str, hits: &[SearchHit]) -> String {
    let mut prompt = String::new();

    prompt.push_str("## Research question\n\n");
    prompt.push_str(question);
    prompt.push_str("\n\n## Sources\n\n");

    for (i, hit) in hits.iter().enumerate() {
        let title = if hit.title.trim().is_empty() {
            hit.url.as_str()
        } else {
            hit.title.trim()
        };
        prompt.push_str(&format!("[{}] {}\nURL: {}\n", i + 1, title, hit.url));
        let content: String = hit.content.chars().take(MAX_SOURCE_CHARS).collect();
        prompt.push_str(content.trim());
        prompt.push_str("\n\n");
    }

    prompt.push_str(
        "## Instructions\n\n\
         Write a markdown research report that answers the research question.\n\
         - Cite sources inline as markdown links, e.g. [Source title](https://example.com).\n\
         - Do not add a conclusion section.\n\
         - End with a `## References` section listing every URL you cited, one per line.\n",
    );

    prompt
}

/// Prompt asking the model to turn the report into profile JSON.
///
/// `sources` is the report's citation list, one `- {title} {url}` per line.
pub fn extraction_prompt(company: &str, report: &str, sources: &str) -> String {
    let sources = if sources.trim().is_empty() {
        "(none)"
    } else {
        sources.trim()
    };
    format!(
        r#"Extract the company information for "{company}" from the research report below.

Return a JSON object with exactly these keys:
- "legal_name": full registered name
- "general_details": one or two sentence description of the company
- "primary_address": complete registered address
- "town": city and state/province of registration
- "country": country of registration
- "legal_form": legal structure (e.g. GmbH, Ltd, Inc.)
- "registration_number": company registration or identification number
- "registration_date": date of incorporation
- "contact_information": object with "email", "phone" and "website" (full URL)
- "directors": list of director names
- "shareholders": list of shareholder names
- "ubo": ultimate beneficial owners
- "parent_company": parent company, if any
- "subsidiaries": subsidiaries, if any
- "last_reported_revenue": latest reported revenue with currency and year
- "references": list of source URLs used, taken from the Sources list

Use null for any fact the report does not contain and [] for empty lists.
If the report contains no information about this company at all, return {{"found": false}}.

## Sources

{sources}

## Report

{report}"#
    )
}

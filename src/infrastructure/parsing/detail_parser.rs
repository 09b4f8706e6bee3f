//! Detail-page parser
//!
//! Extracts the twelve patent fields from a single detail page. Every field
//! is located by a literal text label and read from what follows it; each
//! extraction is its own fail-soft unit, so a missing or malformed section
//! nulls that field and leaves the others untouched. The parser therefore
//! never fails: in the worst case it returns the stub unchanged except for
//! the completeness flag.

use scraper::{Html, Selector};
use tracing::debug;

use super::context::DetailParseContext;
use super::error::{ParseError, ParseResult};
use super::text::{DocumentNodes, cell_text, non_empty, normalize, sibling_cells};
use super::ContextualParser;
use crate::domain::patent::{Inventor, PatentRecord};

/// Separator line the portal inserts between description sections.
const DESCRIPTION_SEPARATOR: &str = "* * * * *";

/// Issue date lives in a right-aligned half-width header cell; the last such
/// cell on the page holds the date.
const PATENT_DATE_SELECTOR: &str = r#"[align="right"][width="50%"]"#;

pub struct DetailParser {
    patent_date_selector: Selector,
}

impl DetailParser {
    pub fn new() -> ParseResult<Self> {
        let patent_date_selector = Selector::parse(PATENT_DATE_SELECTOR)
            .map_err(|_| ParseError::invalid_selector(PATENT_DATE_SELECTOR))?;
        Ok(Self {
            patent_date_selector,
        })
    }

    fn extract_after_label(&self, nodes: &DocumentNodes<'_>, label: &str) -> Option<String> {
        nodes
            .find_label(label)
            .and_then(|i| nodes.following_element_text(i))
    }

    fn extract_after_containing(&self, nodes: &DocumentNodes<'_>, label: &str) -> Option<String> {
        nodes
            .find_text(|t| t.contains(label))
            .and_then(|i| nodes.following_element_text(i))
    }

    fn extract_patent_date(&self, html: &Html) -> Option<String> {
        html.select(&self.patent_date_selector)
            .last()
            .and_then(|el| non_empty(cell_text(&el)))
    }

    fn extract_inventors(&self, nodes: &DocumentNodes<'_>) -> Option<Vec<Inventor>> {
        let block = self.extract_after_label(nodes, "Inventors:")?;
        let inventors = parse_inventor_block(&block);
        if inventors.is_empty() { None } else { Some(inventors) }
    }

    /// Applicant data sits in a table after the label: a name cell followed by
    /// up to three sibling cells for city, state and country, each optional.
    fn extract_applicant(&self, nodes: &DocumentNodes<'_>, record: &mut PatentRecord) {
        let Some(anchor) = nodes.find_text(|t| t.contains("Applicant:")) else {
            return;
        };
        let Some(name_cell) = nodes.following_cell(anchor) else {
            return;
        };
        record.applicant_name = non_empty(cell_text(&name_cell));
        let rest = sibling_cells(&name_cell);
        record.applicant_city = rest.first().and_then(|c| non_empty(cell_text(c)));
        record.applicant_state = rest.get(1).and_then(|c| non_empty(cell_text(c)));
        record.applicant_country = rest.get(2).and_then(|c| non_empty(cell_text(c)));
    }

    fn extract_assignee(&self, nodes: &DocumentNodes<'_>, record: &mut PatentRecord) {
        let Some(raw) = self.extract_after_containing(nodes, "Assignee:") else {
            return;
        };
        match raw.split_once('(') {
            Some((name, location)) => {
                record.assignee_name = non_empty(name.trim().to_string());
                record.assignee_location =
                    non_empty(location.trim().trim_end_matches(')').trim_end().to_string());
            }
            None => {
                record.assignee_name = non_empty(raw);
            }
        }
    }

    /// Claim text runs from the "Claims" heading up to (excluding) the
    /// "Description" heading; the field is null when the boundary is absent.
    fn extract_claims(&self, nodes: &DocumentNodes<'_>) -> Option<Vec<String>> {
        let start = nodes.find_text(|t| t.contains("Claims"))?;
        let texts: Vec<String> = nodes.texts_after(start).collect();
        let end = texts.iter().position(|t| t == "Description")?;
        Some(texts[..end].to_vec())
    }

    /// Description text runs from the "Description" heading to the end of the
    /// document, dropping separator lines.
    fn extract_description(&self, nodes: &DocumentNodes<'_>) -> Option<Vec<String>> {
        let start = nodes.find_text(|t| t.contains("Description"))?;
        Some(
            nodes
                .texts_after(start)
                .filter(|t| t != DESCRIPTION_SEPARATOR)
                .collect(),
        )
    }
}

impl ContextualParser for DetailParser {
    type Output = PatentRecord;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParseResult<Self::Output> {
        let nodes = DocumentNodes::new(html);
        let mut record = PatentRecord::stub(context.title.clone(), context.url.clone());
        record.fetched_details = true;

        record.patent_number = self.extract_after_label(&nodes, "United States Patent");
        record.patent_date = self.extract_patent_date(html);
        record.abstract_text = self.extract_after_label(&nodes, "Abstract");
        record.inventors = self.extract_inventors(&nodes);
        self.extract_applicant(&nodes, &mut record);
        record.applicant_number = self.extract_after_containing(&nodes, "Appl. No.:");
        record.file_date = self.extract_after_containing(&nodes, "Filed:");
        self.extract_assignee(&nodes, &mut record);
        record.family_id = self.extract_after_containing(&nodes, "Family ID:");
        record.claims = self.extract_claims(&nodes);
        record.description = self.extract_description(&nodes);

        debug!(
            url = %context.url,
            patent_number = record.patent_number.as_deref().unwrap_or("<missing>"),
            "parsed detail page"
        );
        Ok(record)
    }
}

/// Split the inventor block into person entries: `"),"` separates people,
/// `;` separates last name from the rest, `(` separates first name from the
/// location. An entry missing one of these yields a partial inventor.
fn parse_inventor_block(block: &str) -> Vec<Inventor> {
    block
        .split("),")
        .map(parse_inventor_entry)
        .filter(|p| p.first_name.is_some() || p.last_name.is_some())
        .collect()
}

fn parse_inventor_entry(entry: &str) -> Inventor {
    let (last, rest) = match entry.split_once(';') {
        Some((last, rest)) => (last, Some(rest)),
        None => (entry, None),
    };
    let last_name = non_empty(normalize(last));
    let (first_name, location) = match rest.map(|r| match r.split_once('(') {
        Some((first, location)) => (
            non_empty(normalize(first)),
            non_empty(normalize(location).trim_end_matches(')').trim_end().to_string()),
        ),
        None => (non_empty(normalize(r)), None),
    }) {
        Some(parts) => parts,
        None => (None, None),
    };
    Inventor {
        first_name,
        last_name,
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_detail_page() -> String {
        concat!(
            "<html><body>",
            "<font size=\"+1\">United States Patent </font><b>10,123,456</b><br>",
            "<table width=\"100%\"><tr>",
            "<td align=\"left\" width=\"50%\"><b>Smith, et al.</b></td>",
            "<td align=\"right\" width=\"50%\"><b>June 1, 2021</b></td>",
            "</tr></table>",
            "<font size=\"+1\"><b>Widget frobnicator with improved grip</b></font>",
            "<center><b><i>Abstract</i></b></center>",
            "<p>A widget\n  frobnicator   having an improved grip surface.</p>",
            "<table>",
            "<tr><th>Inventors:</th>",
            "<td><b>Smith; John</b> (Springfield, IL), <b>Doe; Jane</b> (Portland, OR)</td></tr>",
            "<tr><th>Assignee:</th><td><b>Acme Corp</b> (Springfield, IL)</td></tr>",
            "<tr><th>Family ID:</th><td>12345678</td></tr>",
            "<tr><th>Appl. No.:</th><td>15/987,654</td></tr>",
            "<tr><th>Filed:</th><td>March 3, 2020</td></tr>",
            "</table>",
            "<p>Applicant:</p>",
            "<table><tr><th>Name</th><th>City</th><th>State</th><th>Country</th></tr>",
            "<tr><td>Acme Corp</td><td>Springfield</td><td>IL</td><td>US</td></tr></table>",
            "<center><b><i>Claims</i></b></center>",
            "<p>1. A widget comprising a grip.</p>",
            "<p>2. The widget of claim 1 wherein the grip is textured.</p>",
            "<center><b><i>Description</i></b></center>",
            "<p>BACKGROUND OF THE INVENTION</p>",
            "<p>Widgets are known in the art.</p>",
            "<p>* * * * *</p>",
            "</body></html>",
        )
        .to_string()
    }

    fn parse(html: &str) -> PatentRecord {
        let parser = DetailParser::new().unwrap();
        let document = Html::parse_document(html);
        let context = DetailParseContext::new(
            "http://patft.uspto.gov/netacgi/nph-Parser?r=1",
            "Widget frobnicator with improved grip",
        );
        parser.parse_with_context(&document, &context).unwrap()
    }

    #[test]
    fn extracts_all_fields_from_well_formed_page() {
        let record = parse(&sample_detail_page());
        assert!(record.fetched_details);
        assert_eq!(record.patent_number.as_deref(), Some("10,123,456"));
        assert_eq!(record.patent_date.as_deref(), Some("June 1, 2021"));
        assert_eq!(
            record.abstract_text.as_deref(),
            Some("A widget frobnicator having an improved grip surface.")
        );
        assert_eq!(record.applicant_name.as_deref(), Some("Acme Corp"));
        assert_eq!(record.applicant_city.as_deref(), Some("Springfield"));
        assert_eq!(record.applicant_state.as_deref(), Some("IL"));
        assert_eq!(record.applicant_country.as_deref(), Some("US"));
        assert_eq!(record.applicant_number.as_deref(), Some("15/987,654"));
        assert_eq!(record.file_date.as_deref(), Some("March 3, 2020"));
        assert_eq!(record.assignee_name.as_deref(), Some("Acme Corp"));
        assert_eq!(record.assignee_location.as_deref(), Some("Springfield, IL"));
        assert_eq!(record.family_id.as_deref(), Some("12345678"));
    }

    #[test]
    fn parses_inventor_block_into_people() {
        let record = parse(&sample_detail_page());
        let inventors = record.inventors.expect("inventors present");
        assert_eq!(
            inventors,
            vec![
                Inventor {
                    first_name: Some("John".to_string()),
                    last_name: Some("Smith".to_string()),
                    location: Some("Springfield, IL".to_string()),
                },
                Inventor {
                    first_name: Some("Jane".to_string()),
                    last_name: Some("Doe".to_string()),
                    location: Some("Portland, OR".to_string()),
                },
            ]
        );
    }

    #[test]
    fn inventor_entry_without_location_is_partial() {
        let inventors = parse_inventor_block("Smith; John (Springfield, IL), Solo");
        assert_eq!(inventors.len(), 2);
        assert_eq!(inventors[1].last_name.as_deref(), Some("Solo"));
        assert_eq!(inventors[1].first_name, None);
        assert_eq!(inventors[1].location, None);
    }

    #[test]
    fn claims_stop_at_description_boundary() {
        let record = parse(&sample_detail_page());
        assert_eq!(
            record.claims,
            Some(vec![
                "1. A widget comprising a grip.".to_string(),
                "2. The widget of claim 1 wherein the grip is textured.".to_string(),
            ])
        );
    }

    #[test]
    fn description_runs_to_end_and_drops_separator() {
        let record = parse(&sample_detail_page());
        assert_eq!(
            record.description,
            Some(vec![
                "BACKGROUND OF THE INVENTION".to_string(),
                "Widgets are known in the art.".to_string(),
            ])
        );
    }

    #[test]
    fn missing_assignee_nulls_only_assignee_fields() {
        let html = sample_detail_page().replace("Assignee:", "Somebody:");
        let record = parse(&html);
        assert_eq!(record.assignee_name, None);
        assert_eq!(record.assignee_location, None);
        // Neighbouring fields are unaffected.
        assert_eq!(record.family_id.as_deref(), Some("12345678"));
        assert!(record.inventors.is_some());
        assert_eq!(record.patent_number.as_deref(), Some("10,123,456"));
    }

    #[test]
    fn claims_without_description_boundary_are_null() {
        let html = sample_detail_page().replace("Description", "Addendum");
        let record = parse(&html);
        assert_eq!(record.claims, None);
        assert_eq!(record.description, None);
    }

    #[test]
    fn empty_page_yields_bare_record() {
        let record = parse("<html><body><p>Service unavailable.</p></body></html>");
        assert!(record.fetched_details);
        assert_eq!(record.title, "Widget frobnicator with improved grip");
        assert_eq!(record.patent_number, None);
        assert_eq!(record.inventors, None);
        assert_eq!(record.claims, None);
    }

    #[test]
    fn parsing_is_deterministic() {
        let html = sample_detail_page();
        assert_eq!(parse(&html), parse(&html));
    }
}

//! Patent record types produced by the search pipeline
//!
//! A record starts as a stub (title + url from a results listing) and is
//! upgraded in place once its detail page has been fetched and parsed. Every
//! detail field is optional because extraction is best-effort per field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// One inventor entry from the detail page inventor block.
///
/// All fields are optional: a malformed entry (e.g. missing the parenthetical
/// location) yields a partial inventor rather than failing the whole block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventor {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
}

/// A single patent, as extracted from the portal.
///
/// `title` and `url` are always present. Everything else is populated by the
/// detail-page parser; `fetched_details` distinguishes a stub from a detailed
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentRecord {
    pub title: String,
    pub url: String,
    pub patent_number: Option<String>,
    pub patent_date: Option<String>,
    pub file_date: Option<String>,
    pub abstract_text: Option<String>,
    /// Ordered description paragraphs, separator lines removed.
    pub description: Option<Vec<String>>,
    pub inventors: Option<Vec<Inventor>>,
    pub applicant_number: Option<String>,
    pub applicant_name: Option<String>,
    pub applicant_city: Option<String>,
    pub applicant_state: Option<String>,
    pub applicant_country: Option<String>,
    pub assignee_name: Option<String>,
    pub assignee_location: Option<String>,
    pub family_id: Option<String>,
    /// Ordered claim text fragments.
    pub claims: Option<Vec<String>>,
    /// Whether the detail page was fetched and parsed for this record.
    pub fetched_details: bool,
}

impl PatentRecord {
    /// Create a stub record carrying only what the results listing provides.
    pub fn stub(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            patent_number: None,
            patent_date: None,
            file_date: None,
            abstract_text: None,
            description: None,
            inventors: None,
            applicant_number: None,
            applicant_name: None,
            applicant_city: None,
            applicant_state: None,
            applicant_country: None,
            assignee_name: None,
            assignee_location: None,
            family_id: None,
            claims: None,
            fetched_details: false,
        }
    }

    /// Export this record as a flat row. Stubs expose only title and url;
    /// detailed records expose the full field set.
    pub fn to_row(&self) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("title".to_string(), json!(self.title));
        row.insert("url".to_string(), json!(self.url));
        if !self.fetched_details {
            return row;
        }
        row.insert("patent_number".to_string(), json!(self.patent_number));
        row.insert("patent_date".to_string(), json!(self.patent_date));
        row.insert("file_date".to_string(), json!(self.file_date));
        row.insert("abstract".to_string(), json!(self.abstract_text));
        row.insert("inventors".to_string(), json!(self.inventors));
        row.insert("applicant_number".to_string(), json!(self.applicant_number));
        row.insert("applicant_name".to_string(), json!(self.applicant_name));
        row.insert("applicant_city".to_string(), json!(self.applicant_city));
        row.insert("applicant_state".to_string(), json!(self.applicant_state));
        row.insert("applicant_country".to_string(), json!(self.applicant_country));
        row.insert("assignee_name".to_string(), json!(self.assignee_name));
        row.insert("assignee_location".to_string(), json!(self.assignee_location));
        row.insert("family_id".to_string(), json!(self.family_id));
        row.insert("claims".to_string(), json!(self.claims));
        row.insert("description".to_string(), json!(self.description));
        row
    }
}

/// Ordered collection of records from one search, in source result order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultSet {
    pub records: Vec<PatentRecord>,
}

impl SearchResultSet {
    pub fn new(records: Vec<PatentRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatentRecord> {
        self.records.iter()
    }

    /// Export all records as flat rows, in source order.
    pub fn to_rows(&self) -> Vec<Map<String, Value>> {
        self.records.iter().map(PatentRecord::to_row).collect()
    }

    /// Export as a table keyed by patent number for detailed records, falling
    /// back to the row position for stubs or records missing a number.
    pub fn to_table(&self) -> Map<String, Value> {
        let mut table = Map::new();
        for (position, record) in self.records.iter().enumerate() {
            let key = record
                .patent_number
                .clone()
                .filter(|_| record.fetched_details)
                .unwrap_or_else(|| position.to_string());
            table.insert(key, Value::Object(record.to_row()));
        }
        table
    }
}

impl IntoIterator for SearchResultSet {
    type Item = PatentRecord;
    type IntoIter = std::vec::IntoIter<PatentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

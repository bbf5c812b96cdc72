//! Course records as produced by the catalog scraper, and their ingestion.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub type CourseId = String;
pub type CatalogId = u32;

const CATALOG_PREVIEW_URL: &str = "https://catalog.charlotte.edu/ajax/preview_course.php";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Invalid course dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Course record {index} has an empty courseId")]
    EmptyCourseId { index: usize },
    #[error("Duplicate course id: {0}")]
    DuplicateCourse(CourseId),
    #[error("Course stored under key {key} has courseId {course_id}")]
    KeyMismatch { key: String, course_id: CourseId },
}

/// An attribute value from a course detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub course_id: CourseId,
    #[serde(default)]
    pub catalog_id: Option<CatalogId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Prerequisite course ids, in the order they appear on the detail page.
    #[serde(default)]
    pub links: Vec<CourseId>,
}

impl CourseRecord {
    pub fn new(course_id: &str, name: &str, links: &[&str]) -> Self {
        Self {
            course_id: course_id.to_string(),
            catalog_id: None,
            name: name.to_string(),
            description: String::new(),
            attributes: BTreeMap::new(),
            links: links.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Catalog page for this course, when the record knows its catalog.
    pub fn catalog_url(&self) -> Option<String> {
        self.catalog_id
            .map(|catalog| catalog_entry_url(catalog, &self.course_id))
    }
}

/// Build the catalog preview URL for a course.
pub fn catalog_entry_url(catalog_id: CatalogId, course_id: &str) -> String {
    format!("{CATALOG_PREVIEW_URL}?catoid={catalog_id}&coid={course_id}&show")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDataset {
    List(Vec<CourseRecord>),
    Keyed(serde_json::Map<String, serde_json::Value>),
}

/// A validated, insertion-ordered collection of course records.
#[derive(Debug, Clone, Default)]
pub struct CourseDataset {
    records: Vec<CourseRecord>,
}

impl CourseDataset {
    /// Validate records: course ids must be non-empty and unique.
    pub fn new(records: Vec<CourseRecord>) -> Result<Self, DatasetError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, record) in records.iter().enumerate() {
            if record.course_id.trim().is_empty() {
                return Err(DatasetError::EmptyCourseId { index });
            }
            if !seen.insert(record.course_id.as_str()) {
                return Err(DatasetError::DuplicateCourse(record.course_id.clone()));
            }
        }
        Ok(Self { records })
    }

    /// Parse a dataset given either as a JSON array of records or as an
    /// object keyed by course id.
    pub fn from_json(input: &str) -> Result<Self, DatasetError> {
        let records = match serde_json::from_str::<RawDataset>(input)? {
            RawDataset::List(records) => records,
            RawDataset::Keyed(map) => {
                let mut records = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let record: CourseRecord = serde_json::from_value(value)?;
                    if record.course_id != key {
                        return Err(DatasetError::KeyMismatch {
                            key,
                            course_id: record.course_id,
                        });
                    }
                    records.push(record);
                }
                records
            }
        };
        Self::new(records)
    }

    pub fn records(&self) -> &[CourseRecord] {
        &self.records
    }

    pub fn get(&self, course_id: &str) -> Option<&CourseRecord> {
        self.records.iter().find(|r| r.course_id == course_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let input = r#"[
            {"courseId": "1", "name": "ITSC 1212 - Intro", "links": []},
            {"courseId": "2", "name": "ITSC 1213 - Intro II", "links": ["1"], "catalogId": 38}
        ]"#;
        let dataset = CourseDataset::from_json(input).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].links, vec!["1".to_string()]);
        assert_eq!(dataset.records()[1].catalog_id, Some(38));
    }

    #[test]
    fn test_parse_keyed_keeps_order() {
        let input = r#"{
            "20": {"courseId": "20", "name": "ITCS 3153 - AI"},
            "10": {"courseId": "10", "name": "ITCS 2214 - Data Structures"}
        }"#;
        let dataset = CourseDataset::from_json(input).unwrap();

        let ids: Vec<&str> = dataset.records().iter().map(|r| r.course_id.as_str()).collect();
        assert_eq!(ids, vec!["20", "10"]);
    }

    #[test]
    fn test_parse_attributes() {
        let input = r#"[{
            "courseId": "5",
            "name": "ITSC 2175 - Logic",
            "attributes": {"Prerequisite(s)": "ITSC 1212", "Notes": ["a", "b"]}
        }]"#;
        let dataset = CourseDataset::from_json(input).unwrap();
        let attrs = &dataset.records()[0].attributes;

        assert_eq!(
            attrs.get("Prerequisite(s)"),
            Some(&AttributeValue::Text("ITSC 1212".to_string()))
        );
        assert!(matches!(attrs.get("Notes"), Some(AttributeValue::List(v)) if v.len() == 2));
    }

    #[test]
    fn test_key_mismatch() {
        let input = r#"{"1": {"courseId": "2", "name": "X"}}"#;
        let err = CourseDataset::from_json(input).unwrap_err();
        assert!(matches!(err, DatasetError::KeyMismatch { .. }));
    }

    #[test]
    fn test_duplicate_course() {
        let records = vec![
            CourseRecord::new("1", "A", &[]),
            CourseRecord::new("1", "B", &[]),
        ];
        let err = CourseDataset::new(records).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateCourse(id) if id == "1"));
    }

    #[test]
    fn test_empty_course_id() {
        let err = CourseDataset::new(vec![CourseRecord::new(" ", "A", &[])]).unwrap_err();
        assert!(matches!(err, DatasetError::EmptyCourseId { index: 0 }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            CourseDataset::from_json("{not json"),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn test_catalog_url() {
        let mut record = CourseRecord::new("123", "ITSC 1212", &[]);
        assert_eq!(record.catalog_url(), None);

        record.catalog_id = Some(38);
        assert_eq!(
            record.catalog_url().unwrap(),
            "https://catalog.charlotte.edu/ajax/preview_course.php?catoid=38&coid=123&show"
        );
    }
}

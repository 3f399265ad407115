//! Selection predicate for classification queries.

use crate::models::ObjectRecord;

/// Predicate selecting records by image presence and classification.
///
/// A record matches when it carries at least one image signal, has a
/// non-empty `classification`, and the classification contains the
/// search string (case-sensitive, exact substring). Without a search
/// string the substring test is skipped entirely: any record with an
/// image and a classification matches.
#[derive(Debug, Clone, Default)]
pub struct ClassificationFilter {
    search: Option<String>,
}

impl ClassificationFilter {
    /// Filter requiring the classification to contain `search`.
    pub fn substring(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
        }
    }

    /// Filter with no substring requirement.
    pub fn any() -> Self {
        Self::default()
    }

    /// Whether a record satisfies the predicate.
    pub fn matches(&self, record: &ObjectRecord) -> bool {
        if !record.has_image() {
            return false;
        }
        let Some(classification) = record.classification() else {
            return false;
        };
        match &self.search {
            Some(search) => classification.contains(search.as_str()),
            None => true,
        }
    }
}

impl From<Option<String>> for ClassificationFilter {
    fn from(search: Option<String>) -> Self {
        Self { search }
    }
}

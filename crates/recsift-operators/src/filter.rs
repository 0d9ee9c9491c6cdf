//! Name search: case-insensitive substring match on the name column.
//!
//! The filter is a read-only view. It returns positions into the record set
//! and never clones or mutates records.

use recsift_core::types::RecordSet;

#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    /// Lower-cased, trimmed fragment; `None` means "everything".
    needle: Option<String>,
}

impl NameFilter {
    /// A blank or absent fragment matches every record.
    pub fn new(fragment: Option<&str>) -> Self {
        let needle = fragment
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    pub fn is_pass_through(&self) -> bool {
        self.needle.is_none()
    }

    /// Missing names never match a non-blank fragment.
    pub fn matches(&self, name: Option<&str>) -> bool {
        match (&self.needle, name) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(needle), Some(name)) => name.to_lowercase().contains(needle.as_str()),
        }
    }

    /// Positions of matching records, in record-set order.
    pub fn apply(&self, records: &RecordSet) -> Vec<usize> {
        (0..records.len())
            .filter(|&pos| self.matches(records.name(pos)))
            .collect()
    }
}

/// Positions of the records whose name contains `fragment`, ignoring case.
pub fn filter(records: &RecordSet, fragment: Option<&str>) -> Vec<usize> {
    NameFilter::new(fragment).apply(records)
}

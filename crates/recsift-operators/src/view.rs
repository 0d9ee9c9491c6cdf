//! Grid model over a `RecordSet`.
//!
//! `TableModel` owns the record set and a working view (positions into it).
//! Row numbers in this API are working-view rows; edits are routed through
//! the validator and written into the owning record set, so a filtered grid
//! and the full set can never drift apart.

use recsift_core::types::RecordSet;

use crate::error::OpError;
use crate::filter::NameFilter;
use crate::validate::validate;

/// Background colour that marks the name column.
pub const NAME_BACKGROUND: &str = "#ccffcc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Display,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Change notifications for the grid front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    DataChanged { row: usize, column: usize },
    LayoutChanged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFlags {
    pub selectable: bool,
    pub enabled: bool,
    pub editable: bool,
}

#[derive(Debug)]
pub struct TableModel {
    records: RecordSet,
    view: Vec<usize>,
    events: Vec<ViewEvent>,
}

impl TableModel {
    pub fn new(records: RecordSet) -> Self {
        let view = (0..records.len()).collect();
        Self {
            records,
            view,
            events: Vec::new(),
        }
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    /// Independent copy of the full record set, not just the visible rows.
    pub fn snapshot(&self) -> RecordSet {
        self.records.snapshot()
    }

    pub fn row_count(&self) -> usize {
        self.view.len()
    }

    pub fn column_count(&self) -> usize {
        self.records.schema().len()
    }

    /// Record-set position behind working-view `row`.
    pub fn position(&self, row: usize) -> Option<usize> {
        self.view.get(row).copied()
    }

    pub fn data(&self, row: usize, column: usize, role: CellRole) -> Option<String> {
        let pos = self.position(row)?;
        let value = self.records.value(pos, column)?;
        match role {
            CellRole::Display => Some(value.to_string()),
            CellRole::Background if column == self.records.name_column() => {
                Some(NAME_BACKGROUND.to_string())
            }
            CellRole::Background => None,
        }
    }

    /// Apply an edit typed into the grid.
    ///
    /// On success the owning record set holds the coerced value and exactly one
    /// `DataChanged` event is queued. On rejection nothing changes.
    pub fn set_data(&mut self, row: usize, column: usize, text: &str) -> Result<(), OpError> {
        let pos = self
            .position(row)
            .ok_or(OpError::OutOfRange { row, column })?;
        let field = self
            .records
            .schema()
            .field(column)
            .ok_or(OpError::OutOfRange { row, column })?;

        let value = validate(&field.name, field.data_type, text)?;
        let id = self.records.records()[pos].id;
        let column_name = field.name.clone();

        self.records.set_value(pos, column, value);
        tracing::debug!(record = %id, column = %column_name, value = %text, "modified record");
        self.events.push(ViewEvent::DataChanged { row, column });
        Ok(())
    }

    pub fn header(&self, section: usize, orientation: Orientation) -> Option<String> {
        match orientation {
            Orientation::Horizontal => self
                .records
                .schema()
                .field(section)
                .map(|f| f.name.clone()),
            Orientation::Vertical => {
                let pos = self.position(section)?;
                self.records.record(pos).map(|r| r.id.to_string())
            }
        }
    }

    pub fn flags(&self, row: usize, column: usize) -> ItemFlags {
        if row < self.row_count() && column < self.column_count() {
            ItemFlags {
                selectable: true,
                enabled: true,
                editable: true,
            }
        } else {
            ItemFlags::default()
        }
    }

    /// Rebuild the working view from `fragment`. Returns the visible row count.
    pub fn apply_filter(&mut self, fragment: Option<&str>) -> usize {
        self.view = NameFilter::new(fragment).apply(&self.records);
        self.events.push(ViewEvent::LayoutChanged);
        self.view.len()
    }

    /// Drain queued change notifications.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }
}

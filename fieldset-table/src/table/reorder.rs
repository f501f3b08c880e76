//! Drag-and-drop reordering

use log::debug;
use log::warn;

use super::SortDirection;
use super::TableRow;
use super::TableViewModel;
use super::build::build_cell;
use super::sort::clear_sort;
use super::threshold::classify_rows;
use crate::error::TableError;
use crate::model::FieldType;
use crate::model::Value;

/// Where a drag gesture currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A row has been picked up.
    Dragging {
        /// Position of the dragged row.
        source: usize,
        /// Position the row is hovering over.
        over: Option<usize>,
    },
}

impl DragState {
    /// Returns true while a row is being dragged.
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}

impl TableViewModel {
    /// Returns the drag state.
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    fn check_position(&self, position: usize) -> Result<(), TableError> {
        if position < self.rows.len() {
            Ok(())
        } else {
            Err(TableError::out_of_range(position, self.rows.len()))
        }
    }

    /// Picks up the row at `position`.
    pub fn start_drag(&mut self, position: usize) -> Result<(), TableError> {
        if !self.config.enable_drag_drop {
            return Err(TableError::DragDisabled);
        }
        self.check_position(position)?;
        self.drag = DragState::Dragging {
            source: position,
            over: None,
        };
        Ok(())
    }

    /// Records the row the dragged row is hovering over.
    pub fn drag_over(&mut self, position: usize) -> Result<(), TableError> {
        self.check_position(position)?;
        match &mut self.drag {
            DragState::Dragging { over, .. } => {
                *over = Some(position);
                Ok(())
            }
            DragState::Idle => Err(TableError::NoDragInProgress),
        }
    }

    /// Cancels the drag without moving anything.
    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Drops the dragged row at `target` and returns the reordered rows.
    ///
    /// The row is spliced into its new position, ranks are reassigned from
    /// the configured base number, thresholds are reclassified and the drop
    /// event is published. The table is then sorted by rank and returns to
    /// page 1.
    pub fn drop_on(&mut self, target: usize) -> Result<&[TableRow], TableError> {
        if !self.config.enable_drag_drop {
            return Err(TableError::DragDisabled);
        }
        let DragState::Dragging { source, .. } = self.drag else {
            return Err(TableError::NoDragInProgress);
        };
        self.check_position(source)?;
        self.check_position(target)?;
        self.drag = DragState::Idle;

        let row = self.rows.remove(source);
        self.rows.insert(target, row);
        debug!("moved row from position {source} to {target}");

        self.assign_ranks();
        classify_rows(
            &mut self.rows,
            self.config.threshold,
            self.config.number_accuracy,
            self.config.enable_drag_drop,
        );
        self.publish_drop();

        match self.config.rank_field.clone() {
            Some(rank_field) => {
                self.sort_column(&rank_field, Some(FieldType::Double), Some(SortDirection::Ascending))
            }
            None => {
                clear_sort(&mut self.columns);
                self.setup_pagination();
            }
        }
        Ok(self.rows.as_slice())
    }

    fn assign_ranks(&mut self) {
        let base = self.config.row_number as f64;
        let rank_field = self.config.rank_field.as_deref();
        let rank_column = self
            .columns
            .iter()
            .position(|c| self.config.is_rank_field(&c.field_path));

        for (position, row) in self.rows.iter_mut().enumerate() {
            let rank = base + position as f64;
            row.index = Some(rank);
            row.is_changed = row.is_changed || row.initial_index != Some(rank);

            let Some(field) = rank_field else {
                continue;
            };
            row.record.insert(field, Value::Number(rank));
            if let Some(idx) = rank_column {
                row.cells[idx] = build_cell(&row.record, &self.columns[idx], self.config.number_accuracy);
            }
        }
    }

    fn publish_drop(&self) {
        let Some(event) = self.config.drop_event_name.as_deref() else {
            return;
        };
        match &self.events {
            Some(bus) => {
                let notified = bus.fire_event(event, &self.rows);
                debug!("published {event} to {notified} listeners");
            }
            None => warn!("drop event {event} configured but no event bus attached"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldDescriptor;
    use crate::model::Record;
    use crate::table::TableConfig;

    fn table(config: TableConfig) -> TableViewModel {
        let fields = vec![
            FieldDescriptor::new("Name", FieldType::String),
            FieldDescriptor::new("Rank__c", FieldType::Double),
        ];
        let records: Vec<Record> = (1..=5)
            .map(|i| {
                Record::new("Task")
                    .set("Id", format!("00T{i}"))
                    .set("Name", format!("Task {i}"))
                    .set("Rank__c", i as f64)
            })
            .collect();
        TableViewModel::build(config, &records, &fields)
    }

    fn names(table: &TableViewModel) -> Vec<String> {
        table
            .rows()
            .iter()
            .map(|r| r.record().get("Name").map(Value::to_display_string).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_drag_requires_drag_and_drop() {
        let mut table = table(TableConfig::default().with_rank_field("Rank__c"));
        assert_eq!(table.start_drag(0), Err(TableError::DragDisabled));
        assert_eq!(table.drop_on(1).err(), Some(TableError::DragDisabled));
    }

    #[test]
    fn test_drop_without_drag_is_rejected() {
        let mut table = table(TableConfig::default().with_rank_field("Rank__c").with_drag_drop(1));
        assert_eq!(table.drop_on(1).err(), Some(TableError::NoDragInProgress));
        assert_eq!(table.drag_over(1), Err(TableError::NoDragInProgress));
    }

    #[test]
    fn test_out_of_range_positions() {
        let mut table = table(TableConfig::default().with_rank_field("Rank__c").with_drag_drop(1));
        assert_eq!(table.start_drag(5), Err(TableError::out_of_range(5, 5)));
        table.start_drag(0).unwrap();
        assert_eq!(table.drop_on(9).err(), Some(TableError::out_of_range(9, 5)));
        // A failed drop leaves the drag in progress.
        assert!(table.drag_state().is_dragging());
    }

    #[test]
    fn test_drop_moves_row_and_renumbers() {
        let mut table = table(TableConfig::default().with_rank_field("Rank__c").with_drag_drop(1));
        table.start_drag(3).unwrap();
        table.drag_over(1).unwrap();
        table.drop_on(1).unwrap();

        assert_eq!(names(&table), ["Task 1", "Task 4", "Task 2", "Task 3", "Task 5"]);
        let ranks: Vec<_> = table.rows().iter().map(|r| r.index()).collect();
        assert_eq!(ranks, [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
        let changed: Vec<_> = table.changed_rows().filter_map(|r| r.id()).collect();
        assert_eq!(changed, ["00T4", "00T2", "00T3"]);
        assert_eq!(table.rows()[1].record().get("Rank__c"), Some(&Value::Number(2.0)));
        assert_eq!(table.rows()[1].cell("Rank__c").map(|c| &c.value), Some(&Value::from("2.00")));
        assert_eq!(table.drag_state(), DragState::Idle);
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_end_drag_cancels() {
        let mut table = table(TableConfig::default().with_drag_drop(1));
        table.start_drag(2).unwrap();
        table.end_drag();
        assert_eq!(table.drag_state(), DragState::Idle);
        assert_eq!(table.changed_rows().count(), 0);
    }
}

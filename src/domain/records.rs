//! Post-submission view over the captured values.

use std::time::Instant;

use tracing::{debug, info};

use super::messages::TransientMessageBus;
use super::store::FieldValueStore;

/// One row of the record table, with the live message for its key if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub name: String,
    pub value: String,
    pub message: Option<String>,
}

/// Submission flag, confirmation surface and the row being edited.
///
/// The flag only ever goes from `false` to `true`. Edits and deletes act on
/// whatever is in the store and announce themselves on the message bus.
#[derive(Debug, Clone, Default)]
pub struct SubmissionRecordTable {
    submitted: bool,
    confirmation_open: bool,
    editing: Option<String>,
}

impl SubmissionRecordTable {
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_confirmation_open(&self) -> bool {
        self.confirmation_open
    }

    /// Rows render once the form was submitted and the confirmation closed.
    pub fn is_visible(&self) -> bool {
        self.submitted && !self.confirmation_open
    }

    /// Name of the row last opened through [`edit_field`](Self::edit_field).
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn submit(&mut self) {
        if !self.submitted {
            info!("form submitted");
        }
        self.submitted = true;
        self.confirmation_open = true;
    }

    /// Re-runs the terminal submit from the table view.
    pub fn resubmit(&mut self) {
        self.submit();
    }

    pub fn close_confirmation(&mut self) {
        self.confirmation_open = false;
    }

    pub fn finish_editing(&mut self) {
        self.editing = None;
    }

    /// Marks `key` as the row being edited and announces it. The value is
    /// untouched; it stays editable through the store either way.
    pub fn edit_field(
        &mut self,
        key: &str,
        store: &FieldValueStore,
        bus: &mut TransientMessageBus,
        now: Instant,
    ) -> bool {
        if !store.contains(key) {
            debug!(key, "edit ignored for absent field");
            return false;
        }
        self.editing = Some(key.to_string());
        bus.post(key, format!("Field \"{key}\" is now editable."), now);
        true
    }

    /// Removes `key` from the store and announces the deletion. The message
    /// outlives the row until it expires.
    pub fn delete_field(
        &mut self,
        key: &str,
        store: &mut FieldValueStore,
        bus: &mut TransientMessageBus,
        now: Instant,
    ) -> bool {
        if !store.delete(key) {
            debug!(key, "delete ignored for absent field");
            return false;
        }
        if self.editing.as_deref() == Some(key) {
            self.editing = None;
        }
        bus.post(key, format!("Field \"{key}\" has been deleted."), now);
        true
    }

    pub fn rows(&self, store: &FieldValueStore, bus: &TransientMessageBus) -> Vec<RecordRow> {
        store
            .iter()
            .map(|(name, value)| RecordRow {
                name: name.to_string(),
                value: value.to_string(),
                message: bus.get(name).map(str::to_string),
            })
            .collect()
    }

    /// Live messages whose row is gone, in key order. `skip` lists keys that
    /// are not field names, such as the save key.
    pub fn orphan_notices(
        &self,
        store: &FieldValueStore,
        bus: &TransientMessageBus,
        skip: &[&str],
    ) -> Vec<(String, String)> {
        bus.snapshot()
            .into_iter()
            .filter(|(key, _)| !store.contains(key) && !skip.contains(&key.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messages::SAVE_KEY;
    use std::time::Duration;

    fn filled_store() -> FieldValueStore {
        let mut store = FieldValueStore::default();
        store.set("firstName", "Ann");
        store.set("city", "Austin");
        store
    }

    #[test]
    fn test_submit_and_close() {
        let mut table = SubmissionRecordTable::default();
        assert!(!table.is_visible());

        table.submit();
        assert!(table.is_submitted());
        assert!(table.is_confirmation_open());
        assert!(!table.is_visible());

        table.close_confirmation();
        assert!(table.is_submitted());
        assert!(table.is_visible());

        table.resubmit();
        assert!(table.is_submitted());
        assert!(table.is_confirmation_open());
    }

    #[test]
    fn test_edit_field_posts_message_without_changing_value() {
        let now = Instant::now();
        let store = filled_store();
        let mut bus = TransientMessageBus::default();
        let mut table = SubmissionRecordTable::default();
        table.submit();

        assert!(table.edit_field("city", &store, &mut bus, now));
        assert_eq!(table.editing(), Some("city"));
        assert_eq!(bus.get("city"), Some("Field \"city\" is now editable."));
        assert_eq!(store.get("city"), Some("Austin"));
    }

    #[test]
    fn test_edit_absent_field_is_silent() {
        let store = filled_store();
        let mut bus = TransientMessageBus::default();
        let mut table = SubmissionRecordTable::default();

        assert!(!table.edit_field("cvv", &store, &mut bus, Instant::now()));
        assert!(table.editing().is_none());
        assert!(bus.is_empty());
    }

    #[test]
    fn test_delete_field_removes_row_and_keeps_notice() {
        let now = Instant::now();
        let mut store = filled_store();
        let mut bus = TransientMessageBus::default();
        let mut table = SubmissionRecordTable::default();
        table.submit();
        table.edit_field("firstName", &store, &mut bus, now);

        assert!(table.delete_field("firstName", &mut store, &mut bus, now));
        assert!(table.editing().is_none());

        let rows = table.rows(&store, &bus);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "city");
        assert_eq!(
            table.orphan_notices(&store, &bus, &[SAVE_KEY]),
            vec![(
                "firstName".to_string(),
                "Field \"firstName\" has been deleted.".to_string()
            )]
        );

        bus.tick(now + Duration::from_secs(3));
        assert!(table.orphan_notices(&store, &bus, &[SAVE_KEY]).is_empty());
    }

    #[test]
    fn test_delete_absent_field_is_silent() {
        let mut store = filled_store();
        let mut bus = TransientMessageBus::default();
        let mut table = SubmissionRecordTable::default();

        assert!(!table.delete_field("zipCode", &mut store, &mut bus, Instant::now()));
        assert_eq!(store.len(), 2);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_rows_carry_messages() {
        let now = Instant::now();
        let store = filled_store();
        let mut bus = TransientMessageBus::default();
        let mut table = SubmissionRecordTable::default();
        bus.post(SAVE_KEY, "Saved Personal Data", now);
        table.edit_field("firstName", &store, &mut bus, now);

        let rows = table.rows(&store, &bus);
        assert_eq!(rows[0].message.as_deref(), Some("Field \"firstName\" is now editable."));
        assert_eq!(rows[1].message, None);
        assert!(table.orphan_notices(&store, &bus, &[SAVE_KEY]).is_empty());
    }
}

//! Form engine tying schema lookup, steps, values, progress and messages
//! together behind the operations the terminal UI calls.

use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::domain::{
    DEFAULT_TTL, FieldDefinition, FieldValueStore, FormError, ProgressCalculator, RecordRow,
    SAVE_KEY, SchemaRegistry, StepController, StepId, StepSchema, SubmissionRecordTable,
    TransientMessageBus,
};
use crate::infrastructure::{Clock, SystemClock};

/// Banner shown while the active step's schema cannot be loaded.
pub const LOAD_ERROR_TEXT: &str = "Failed to load the form structure. Please try again.";

/// Owns the whole form session.
///
/// # Examples
///
/// ```
/// use stepform::application::FormEngine;
/// use stepform::domain::{SchemaRegistry, StepId};
///
/// let mut engine = FormEngine::new(SchemaRegistry::standard().unwrap());
/// engine.set_value("firstName", "Ann");
/// assert_eq!(engine.progress(), 33);
///
/// engine.advance_step();
/// assert_eq!(engine.active_step(), StepId::Address);
/// assert_eq!(engine.value("firstName"), Some("Ann"));
/// ```
#[derive(Debug)]
pub struct FormEngine {
    registry: SchemaRegistry,
    steps: StepController,
    store: FieldValueStore,
    bus: TransientMessageBus,
    records: SubmissionRecordTable,
    clock: Box<dyn Clock>,
    load_error: Option<String>,
    progress: u8,
    /// Every field name of every schema looked up so far.
    known_fields: HashSet<String>,
}

impl FormEngine {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self::with_clock(registry, Box::new(SystemClock), DEFAULT_TTL)
    }

    pub fn with_clock(registry: SchemaRegistry, clock: Box<dyn Clock>, ttl: Duration) -> Self {
        let mut engine = Self {
            registry,
            steps: StepController::default(),
            store: FieldValueStore::default(),
            bus: TransientMessageBus::new(ttl),
            records: SubmissionRecordTable::default(),
            clock,
            load_error: None,
            progress: 0,
            known_fields: HashSet::new(),
        };
        engine.load_active_schema();
        engine
    }

    pub fn active_step(&self) -> StepId {
        self.steps.current()
    }

    /// Fields of the active step, or `None` while the load error is set.
    pub fn schema(&self) -> Option<&StepSchema> {
        if self.load_error.is_some() {
            return None;
        }
        self.registry.lookup(self.steps.current()).ok()
    }

    pub fn values(&self) -> Vec<(String, String)> {
        self.store.snapshot()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.store.get(name)
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn messages(&self) -> BTreeMap<String, String> {
        self.bus.snapshot()
    }

    pub fn message(&self, key: &str) -> Option<&str> {
        self.bus.get(key)
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn is_submitted(&self) -> bool {
        self.records.is_submitted()
    }

    pub fn is_confirmation_open(&self) -> bool {
        self.records.is_confirmation_open()
    }

    pub fn record_table_visible(&self) -> bool {
        self.records.is_visible()
    }

    pub fn editing_record(&self) -> Option<&str> {
        self.records.editing()
    }

    pub fn record_rows(&self) -> Vec<RecordRow> {
        self.records.rows(&self.store, &self.bus)
    }

    /// Messages left behind by deleted rows.
    pub fn record_notices(&self) -> Vec<(String, String)> {
        self.records.orphan_notices(&self.store, &self.bus, &[SAVE_KEY])
    }

    /// Required fields of the active step that are still blank.
    pub fn missing_required(&self) -> Vec<&FieldDefinition> {
        self.schema()
            .map(|schema| {
                schema
                    .fields()
                    .iter()
                    .filter(|f| f.is_required() && !self.store.is_filled(f.name()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// When the next message expires, for sizing the event-poll timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.bus.next_deadline()
    }

    /// Stores a value for any field of a schema seen this session. Other
    /// names are dropped.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        if !self.known_fields.contains(name) {
            debug!(name, "ignoring value for unknown field");
            return false;
        }
        self.store.set(name, value);
        self.recompute_progress();
        true
    }

    /// Removes the value and announces the deletion.
    pub fn delete_value(&mut self, name: &str) -> bool {
        let now = self.clock.now();
        let deleted = self
            .records
            .delete_field(name, &mut self.store, &mut self.bus, now);
        if deleted {
            self.recompute_progress();
        }
        deleted
    }

    /// Announces that a captured value is open for editing.
    pub fn edit_field(&mut self, name: &str) -> bool {
        let now = self.clock.now();
        self.records.edit_field(name, &self.store, &mut self.bus, now)
    }

    pub fn finish_record_edit(&mut self) {
        self.records.finish_editing();
    }

    /// Posts the save confirmation for the active step. Payment has none.
    pub fn save(&mut self) -> bool {
        let text = match self.steps.current() {
            StepId::Personal => "Saved Personal Data",
            StepId::Address => "Saved Address Data",
            StepId::Payment => {
                debug!("save ignored on payment step");
                return false;
            }
        };
        let now = self.clock.now();
        self.bus.post(SAVE_KEY, text, now);
        true
    }

    pub fn advance_step(&mut self) -> bool {
        if !self.steps.advance() {
            return false;
        }
        info!(step = %self.steps.current(), "advanced");
        self.load_active_schema();
        true
    }

    pub fn select_step(&mut self, step: StepId) {
        self.steps.select(step);
        info!(step = %step, "step selected");
        self.load_active_schema();
    }

    /// Selects a step by raw identifier. An unknown identifier leaves the
    /// active step alone but raises the load error until a valid step is
    /// selected.
    pub fn select_step_id(&mut self, id: &str) {
        match id.parse::<StepId>() {
            Ok(step) => self.select_step(step),
            Err(err) => self.fail_load(&err),
        }
    }

    pub fn submit_final(&mut self) {
        self.records.submit();
    }

    pub fn resubmit(&mut self) {
        self.records.resubmit();
    }

    pub fn close_confirmation(&mut self) {
        self.records.close_confirmation();
    }

    /// Fires due message expiries. Returns how many messages went away.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        self.bus.tick(now)
    }

    fn load_active_schema(&mut self) {
        let names = self
            .registry
            .lookup(self.steps.current())
            .map(|schema| schema.names().map(str::to_string).collect::<Vec<_>>());
        match names {
            Ok(names) => {
                self.known_fields.extend(names);
                self.load_error = None;
            }
            Err(err) => {
                self.fail_load(&err);
                return;
            }
        }
        self.recompute_progress();
    }

    fn fail_load(&mut self, err: &FormError) {
        warn!(error = %err, "failed to load step schema");
        self.load_error = Some(LOAD_ERROR_TEXT.to_string());
        self.progress = 0;
    }

    fn recompute_progress(&mut self) {
        self.progress = match self.schema() {
            Some(schema) => ProgressCalculator::compute(&self.store, schema),
            None => 0,
        };
    }
}

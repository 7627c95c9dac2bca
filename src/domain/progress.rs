use super::models::StepSchema;
use super::store::FieldValueStore;

/// Completion of the active step as a whole percentage.
pub struct ProgressCalculator;

impl ProgressCalculator {
    /// Share of `schema`'s fields holding a non-empty value, rounded to the
    /// nearest percent. Values of fields outside the schema are ignored.
    pub fn compute(store: &FieldValueStore, schema: &StepSchema) -> u8 {
        let total = schema.len();
        if total == 0 {
            return 0;
        }
        let filled = schema.names().filter(|name| store.is_filled(name)).count();
        ((filled * 100 + total / 2) / total) as u8
    }
}

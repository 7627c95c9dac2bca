use indexmap::IndexMap;

/// Entered values keyed by field name, shared by every step.
///
/// Iteration follows the order in which each name was first entered, so a
/// value overwritten later keeps its place while a deleted and re-entered
/// one moves to the end.
///
/// # Examples
///
/// ```
/// use stepform::domain::FieldValueStore;
///
/// let mut store = FieldValueStore::default();
/// store.set("lastName", "Lee");
/// store.set("firstName", "Ann");
/// store.set("lastName", "Li");
/// assert_eq!(
///     store.snapshot(),
///     vec![("lastName".to_string(), "Li".to_string()), ("firstName".to_string(), "Ann".to_string())]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldValueStore {
    values: IndexMap<String, String>,
}

impl FieldValueStore {
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Removes the entry. Returns `false` if there was nothing to remove.
    pub fn delete(&mut self, name: &str) -> bool {
        self.values.shift_remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether the field has been given a non-empty value.
    pub fn is_filled(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

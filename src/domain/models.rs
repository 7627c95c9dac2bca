use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{FormError, FormResult};

/// One of the fixed sections of the form, in the order they are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepId {
    Personal,
    Address,
    Payment,
}

impl StepId {
    pub const ALL: [StepId; 3] = [StepId::Personal, StepId::Address, StepId::Payment];

    /// Identifier used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Personal => "personal",
            StepId::Address => "address",
            StepId::Payment => "payment",
        }
    }

    /// Label shown in the step picker.
    pub fn title(&self) -> &'static str {
        match self {
            StepId::Personal => "Personal Info",
            StepId::Address => "Address",
            StepId::Payment => "Payment Info",
        }
    }

    /// The step reached by advancing, or `None` from the last step.
    pub fn next(&self) -> Option<StepId> {
        match self {
            StepId::Personal => Some(StepId::Address),
            StepId::Address => Some(StepId::Payment),
            StepId::Payment => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            StepId::Personal => 0,
            StepId::Address => 1,
            StepId::Payment => 2,
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepId {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(StepId::Personal),
            "address" => Ok(StepId::Address),
            "payment" => Ok(StepId::Payment),
            other => Err(FormError::UnknownStep(other.to_string())),
        }
    }
}

/// Input kind of a field; decides how the value is edited and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
    Date,
    Password,
    Dropdown,
}

/// Immutable description of a single input on a step.
///
/// Options are only carried by dropdown fields; the constructors are the
/// only way to build one, so a text field can never hold options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    name: String,
    field_type: FieldType,
    label: String,
    required: bool,
    options: Vec<String>,
}

impl FieldDefinition {
    fn new(name: &str, field_type: FieldType, label: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            label: label.to_string(),
            required: false,
            options: Vec::new(),
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, FieldType::Text, label)
    }

    pub fn number(name: &str, label: &str) -> Self {
        Self::new(name, FieldType::Number, label)
    }

    pub fn date(name: &str, label: &str) -> Self {
        Self::new(name, FieldType::Date, label)
    }

    pub fn password(name: &str, label: &str) -> Self {
        Self::new(name, FieldType::Password, label)
    }

    pub fn dropdown<I, S>(name: &str, label: &str, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::new(name, FieldType::Dropdown, label);
        field.options = options.into_iter().map(Into::into).collect();
        field
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Dropdown choices in display order; empty for every other type.
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// Ordered field definitions for one step.
///
/// # Examples
///
/// ```
/// use stepform::domain::{FieldDefinition, StepId, StepSchema};
///
/// let schema = StepSchema::new(
///     StepId::Personal,
///     vec![FieldDefinition::text("firstName", "First Name").required()],
/// ).unwrap();
/// assert_eq!(schema.len(), 1);
///
/// let duplicate = StepSchema::new(
///     StepId::Personal,
///     vec![FieldDefinition::text("a", "A"), FieldDefinition::text("a", "A again")],
/// );
/// assert!(duplicate.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSchema {
    step: StepId,
    fields: Vec<FieldDefinition>,
}

impl StepSchema {
    /// Builds a schema, rejecting duplicate field names.
    pub fn new(step: StepId, fields: Vec<FieldDefinition>) -> FormResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(FormError::DuplicateField {
                    step,
                    name: field.name().to_string(),
                });
            }
        }
        Ok(Self { step, fields })
    }

    pub fn step(&self) -> StepId {
        self.step
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }
}

//! Fixed table of step schemas.

use std::collections::HashMap;

use super::errors::{FormError, FormResult};
use super::models::{FieldDefinition, StepId, StepSchema};

/// Read-only lookup from step to its field definitions.
///
/// Built once at start-up; nothing mutates it afterwards.
///
/// # Examples
///
/// ```
/// use stepform::domain::{SchemaRegistry, StepId};
///
/// let registry = SchemaRegistry::standard().unwrap();
/// let personal = registry.lookup(StepId::Personal).unwrap();
/// assert_eq!(personal.names().collect::<Vec<_>>(), ["firstName", "lastName", "age"]);
/// assert!(registry.lookup_id("billing").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<StepId, StepSchema>,
}

impl SchemaRegistry {
    /// Registers the given schemas. A later schema for the same step wins.
    pub fn new(schemas: impl IntoIterator<Item = StepSchema>) -> Self {
        Self {
            schemas: schemas.into_iter().map(|s| (s.step(), s)).collect(),
        }
    }

    /// The personal / address / payment table the form ships with.
    pub fn standard() -> FormResult<Self> {
        let personal = StepSchema::new(
            StepId::Personal,
            vec![
                FieldDefinition::text("firstName", "First Name").required(),
                FieldDefinition::text("lastName", "Last Name").required(),
                FieldDefinition::number("age", "Age"),
            ],
        )?;
        let address = StepSchema::new(
            StepId::Address,
            vec![
                FieldDefinition::text("street", "Street").required(),
                FieldDefinition::text("city", "City").required(),
                FieldDefinition::dropdown("state", "State", ["California", "Texas", "New York"])
                    .required(),
                FieldDefinition::text("zipCode", "Zip Code"),
            ],
        )?;
        let payment = StepSchema::new(
            StepId::Payment,
            vec![
                FieldDefinition::text("cardNumber", "Card Number").required(),
                FieldDefinition::date("expiryDate", "Expiry Date").required(),
                FieldDefinition::password("cvv", "CVV").required(),
                FieldDefinition::text("cardholderName", "Cardholder Name").required(),
            ],
        )?;
        Ok(Self::new([personal, address, payment]))
    }

    pub fn lookup(&self, step: StepId) -> FormResult<&StepSchema> {
        self.schemas.get(&step).ok_or(FormError::SchemaNotFound(step))
    }

    /// Looks up a step by its raw identifier.
    pub fn lookup_id(&self, id: &str) -> FormResult<&StepSchema> {
        self.lookup(id.parse()?)
    }
}

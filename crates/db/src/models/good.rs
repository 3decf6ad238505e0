use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

pub const GOODS_COLLECTION: &str = "goods";

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Origin {
    #[default]
    Cee,
    Extra,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

/// Inventory item as stored, including the two derived totals.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Good {
    pub id: String,
    pub invoice_number: String,
    pub invoice_date: DateTime<Utc>,
    pub model: String,
    pub comp: String,
    pub origin: Origin,
    pub gender: Gender,
    #[serde(rename = "type")]
    pub clothing_type: String,
    pub quantity: u32,
    pub area: f64,
    pub value: f64,
    pub accessories_value: f64,
    pub weight: f64,
    pub accessories_weight: f64,
    pub total_value: f64,
    pub total_weight: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A form field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Submitted add/edit item form, before validation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct GoodForm {
    pub invoice_number: String,
    pub invoice_date: DateTime<Utc>,
    pub model: String,
    #[serde(rename = "type")]
    pub clothing_type: String,
    pub comp: String,
    pub origin: Origin,
    pub gender: Gender,
    pub quantity: u32,
    pub area: f64,
    pub value: f64,
    pub accessories_value: f64,
    pub weight: f64,
    pub accessories_weight: f64,
}

impl GoodForm {
    /// Validate the form. Validation failures are resolved here, in the form
    /// layer; the mutation path only accepts [`ValidGood`].
    pub fn validate(self) -> Result<ValidGood, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.invoice_number.trim().is_empty() {
            errors.push(FieldError::new("invoiceNumber", "Invoice number is required."));
        }
        if self.model.trim().is_empty() {
            errors.push(FieldError::new("model", "Model is required."));
        }
        if self.clothing_type.trim().is_empty() {
            errors.push(FieldError::new("type", "Please select a clothing type."));
        }
        if self.comp.trim().is_empty() {
            errors.push(FieldError::new("comp", "Please select a composition."));
        }
        if self.quantity < 1 {
            errors.push(FieldError::new("quantity", "Quantity must be at least 1."));
        }
        if self.area < 0.0 {
            errors.push(FieldError::new("area", "Area cannot be negative."));
        }
        if self.value < 0.0 {
            errors.push(FieldError::new("value", "Value cannot be negative."));
        }
        if self.accessories_value < 0.0 {
            errors.push(FieldError::new(
                "accessoriesValue",
                "Accessories value cannot be negative.",
            ));
        }
        if self.weight < 0.0 {
            errors.push(FieldError::new("weight", "Weight cannot be negative."));
        }
        if self.accessories_weight < 0.0 {
            errors.push(FieldError::new(
                "accessoriesWeight",
                "Accessories weight cannot be negative.",
            ));
        }

        if errors.is_empty() {
            Ok(ValidGood { form: self })
        } else {
            Err(errors)
        }
    }
}

/// A validated item form. The only way to obtain one is through
/// [`GoodForm::validate`].
#[derive(Debug, Clone)]
pub struct ValidGood {
    form: GoodForm,
}

impl ValidGood {
    /// `quantity * value + accessoriesValue`, recomputed from the submitted
    /// fields on every write so it can never drift from its inputs.
    pub fn total_value(&self) -> f64 {
        f64::from(self.form.quantity) * self.form.value + self.form.accessories_value
    }

    /// `weight + accessoriesWeight`, recomputed on every write.
    pub fn total_weight(&self) -> f64 {
        self.form.weight + self.form.accessories_weight
    }

    pub fn form(&self) -> &GoodForm {
        &self.form
    }

    /// Store fields for creating a new item.
    pub fn create_fields(&self, created_by: &str) -> Map<String, Value> {
        let now = Utc::now();
        let mut fields = self.base_fields();
        fields.insert("createdBy".into(), Value::from(created_by));
        fields.insert("createdAt".into(), serde_json::to_value(now).unwrap_or(Value::Null));
        fields.insert("updatedAt".into(), serde_json::to_value(now).unwrap_or(Value::Null));
        fields
    }

    /// Store fields for updating an existing item. `createdBy`/`createdAt`
    /// are left untouched.
    pub fn update_fields(&self) -> Map<String, Value> {
        let mut fields = self.base_fields();
        fields.insert(
            "updatedAt".into(),
            serde_json::to_value(Utc::now()).unwrap_or(Value::Null),
        );
        fields
    }

    fn base_fields(&self) -> Map<String, Value> {
        let mut fields = match serde_json::to_value(&self.form) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        fields.insert("totalValue".into(), Value::from(self.total_value()));
        fields.insert("totalWeight".into(), Value::from(self.total_weight()));
        fields
    }
}

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use super::good::FieldError;
use crate::store::DocPath;

/// The two type lookup collections managed from the admin screen.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TypeCategory {
    ClothingTypes,
    CompositionTypes,
}

impl TypeCategory {
    pub fn collection(&self) -> &'static str {
        match self {
            TypeCategory::ClothingTypes => "clothing_types",
            TypeCategory::CompositionTypes => "composition_types",
        }
    }
}

/// Lookup entry (clothing type or composition).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TypeDoc {
    pub id: String,
    pub name: String,
}

impl TypeDoc {
    pub fn path(&self, category: TypeCategory) -> DocPath {
        DocPath::new(category.collection(), self.id.clone())
    }
}

/// Submitted add/edit type form.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TypeForm {
    pub name: String,
}

impl TypeForm {
    pub fn validate(self) -> Result<ValidType, Vec<FieldError>> {
        if self.name.trim().chars().count() < 2 {
            return Err(vec![FieldError {
                field: "name",
                message: "Name must be at least 2 characters.",
            }]);
        }
        Ok(ValidType { form: self })
    }
}

/// A validated type form, obtainable only through [`TypeForm::validate`].
#[derive(Debug, Clone)]
pub struct ValidType {
    form: TypeForm,
}

impl ValidType {
    pub fn name(&self) -> &str {
        &self.form.name
    }

    pub fn fields(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut fields = serde_json::Map::new();
        fields.insert("name".into(), serde_json::Value::from(self.form.name.clone()));
        fields
    }
}

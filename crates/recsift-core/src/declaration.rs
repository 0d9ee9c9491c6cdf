//! Explicit per-column type declarations.
//!
//! Column types are declared up front instead of being guessed from whichever
//! value happens to come first. Declarations are keyed by `storage_key`, so
//! `"Billing Amount"`, `"billing amount"` and `"BillingAmount"` all match the
//! same entry.
//!
//! YAML form:
//! ```yaml
//! columns:
//!   - { name: "Name", type: "Utf8" }
//!   - { name: "Age", type: "Int64" }
//!   - { name: "Date of Admission", type: "Date" }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{storage_key, DataType};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DeclarationDoc {
    columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ColumnDef {
    name: String,
    #[serde(rename = "type")]
    data_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDeclaration {
    types: BTreeMap<String, DataType>,
}

impl TypeDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, data_type: DataType) -> Self {
        self.declare(name, data_type);
        self
    }

    pub fn declare(&mut self, name: &str, data_type: DataType) {
        self.types.insert(storage_key(name), data_type);
    }

    pub fn lookup(&self, name: &str) -> Option<DataType> {
        self.types.get(&storage_key(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Column layout of the hospital admissions export the tool was built for.
    pub fn healthcare() -> Self {
        Self::new()
            .with("Name", DataType::Utf8)
            .with("Age", DataType::Int64)
            .with("Gender", DataType::Utf8)
            .with("Blood Type", DataType::Utf8)
            .with("Medical Condition", DataType::Utf8)
            .with("Date of Admission", DataType::Date)
            .with("Doctor", DataType::Utf8)
            .with("Hospital", DataType::Utf8)
            .with("Insurance Provider", DataType::Utf8)
            .with("Billing Amount", DataType::Float64)
            .with("Room Number", DataType::Int64)
            .with("Admission Type", DataType::Utf8)
            .with("Discharge Date", DataType::Date)
            .with("Medication", DataType::Utf8)
            .with("Test Results", DataType::Utf8)
    }

    pub fn from_yaml(src: &str) -> Result<Self> {
        let doc: DeclarationDoc = serde_yaml::from_str(src)?;
        let mut decl = Self::new();
        for col in doc.columns {
            let data_type = col.data_type.parse::<DataType>().map_err(Error::Schema)?;
            decl.declare(&col.name, data_type);
        }
        Ok(decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_uses_storage_key() {
        let decl = TypeDeclaration::healthcare();
        assert_eq!(decl.lookup("billing amount"), Some(DataType::Float64));
        assert_eq!(decl.lookup("RoomNumber"), Some(DataType::Int64));
        assert_eq!(decl.lookup("Shoe Size"), None);
    }

    #[test]
    fn parses_yaml() {
        let src = r#"
columns:
  - { name: "Name", type: "Utf8" }
  - { name: "Visits", type: "int" }
"#;
        let decl = TypeDeclaration::from_yaml(src).unwrap();
        assert_eq!(decl.len(), 2);
        assert_eq!(decl.lookup("visits"), Some(DataType::Int64));
    }

    #[test]
    fn rejects_unknown_type() {
        let src = "columns:\n  - { name: \"X\", type: \"Decimal\" }\n";
        assert!(matches!(
            TypeDeclaration::from_yaml(src),
            Err(Error::Schema(_))
        ));
    }
}

//! Cell-edit type validation.
//!
//! The target type of an edit is always the column's existing type. Text
//! columns refuse numeric-looking input so a string column never silently
//! turns numeric.

use std::fmt;

use recsift_core::schema::DataType;
use recsift_core::temporal::parse_date;
use recsift_core::types::Value;

/// An edit that did not fit its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub column: String,
    /// `None` when the original cell had no usable type at all.
    pub required: Option<DataType>,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.required {
            Some(dt) => write!(
                f,
                "In the '{}' column a value of type {} is required.",
                self.column, dt
            ),
            None => write!(f, "The '{}' column cannot be edited.", self.column),
        }
    }
}

impl std::error::Error for Rejection {}

/// Validate `proposed` for a column of type `data_type`.
pub fn validate(column: &str, data_type: DataType, proposed: &str) -> Result<Value, Rejection> {
    let reject = || Rejection {
        column: column.to_string(),
        required: Some(data_type),
    };

    match data_type {
        DataType::Int64 => parse_int(proposed).map(Value::Int).ok_or_else(reject),
        DataType::Float64 => parse_float(proposed).map(Value::Float).ok_or_else(reject),
        DataType::Date => parse_date(proposed).map(Value::Date).ok_or_else(reject),
        DataType::Utf8 => {
            if parse_int(proposed).is_some() || parse_float(proposed).is_some() {
                Err(reject())
            } else {
                Ok(Value::Str(proposed.to_string()))
            }
        }
        DataType::Boolean => Err(reject()),
    }
}

/// Validate `proposed` against the type of the value it would replace.
pub fn validate_against(
    column: &str,
    original: &Value,
    proposed: &str,
) -> Result<Value, Rejection> {
    match original.data_type() {
        Some(dt) => validate(column, dt, proposed),
        None => Err(Rejection {
            column: column.to_string(),
            required: None,
        }),
    }
}

fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(s: &str) -> Value {
        Value::Date(parse_date(s).unwrap())
    }

    #[test]
    fn integer_column_boundary() {
        assert_eq!(validate("Age", DataType::Int64, "12"), Ok(Value::Int(12)));
        assert_eq!(validate("Age", DataType::Int64, " -3 "), Ok(Value::Int(-3)));
        let err = validate("Age", DataType::Int64, "12.5").unwrap_err();
        assert_eq!(err.required, Some(DataType::Int64));
        assert_eq!(err.column, "Age");
        assert!(validate("Age", DataType::Int64, "twelve").is_err());
        assert!(validate("Age", DataType::Int64, "").is_err());
    }

    #[test]
    fn float_column_accepts_integers_too() {
        assert_eq!(
            validate("Billing Amount", DataType::Float64, "12"),
            Ok(Value::Float(12.0))
        );
        assert_eq!(
            validate("Billing Amount", DataType::Float64, "1e3"),
            Ok(Value::Float(1000.0))
        );
        assert!(validate("Billing Amount", DataType::Float64, "lots").is_err());
    }

    #[test]
    fn date_column_uses_flexible_parsing() {
        assert_eq!(
            validate("Discharge Date", DataType::Date, "03/14/2024"),
            Ok(iso("2024-03-14"))
        );
        assert!(validate("Discharge Date", DataType::Date, "soon").is_err());
    }

    #[test]
    fn text_column_refuses_numbers() {
        assert_eq!(
            validate_against("Name", &Value::Str("Alice".into()), "Bob"),
            Ok(Value::Str("Bob".into()))
        );
        assert!(validate_against("Name", &Value::Str("Alice".into()), "123").is_err());
        assert!(validate_against("Name", &Value::Str("Alice".into()), "4.5").is_err());
        assert!(validate_against("Name", &Value::Str("Alice".into()), "nan").is_err());
        assert_eq!(
            validate_against("Name", &Value::Str("Alice".into()), "Room 12"),
            Ok(Value::Str("Room 12".into()))
        );
    }

    #[test]
    fn other_types_are_always_refused() {
        assert!(validate("Flag", DataType::Boolean, "true").is_err());
        let err = validate_against("Discharge Date", &Value::Null, "2024-01-01").unwrap_err();
        assert_eq!(err.required, None);
    }

    #[test]
    fn rejection_names_column_and_type() {
        let err = validate("Room Number", DataType::Int64, "A1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "In the 'Room Number' column a value of type int is required."
        );
    }
}

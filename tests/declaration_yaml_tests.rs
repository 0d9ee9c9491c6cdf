//! Column type declarations loaded from YAML.


use std::sync::Arc;

use recsift::core::config::AppConfig;
use recsift::core::declaration::TypeDeclaration;
use recsift::core::error::SchemaError;
use recsift::core::schema::DataType;
use recsift::core::types::Value;
use recsift::exec::{ScriptedVoice, Session, SessionError};
use recsift::operators::OpError;
use test_data_gen::write_csv;

const CLINIC_YAML: &str = r#"
columns:
  - name: "Name"
    type: "Utf8"
  - name: "Visits"
    type: "Int64"
  - name: "Balance"
    type: "Float64"
  - name: "Last Visit Date"
    type: "Utf8"
"#;

#[test]
fn test_parse_declaration() {
    let decl = TypeDeclaration::from_yaml(CLINIC_YAML).unwrap();
    assert_eq!(decl.len(), 4);
    assert_eq!(decl.lookup("Balance"), Some(DataType::Float64));
}

#[test]
fn test_malformed_yaml_is_a_config_error() {
    let result = TypeDeclaration::from_yaml("columns: [ { name: ");
    assert!(result.is_err());
}

#[test]
fn test_session_uses_declared_types() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("clinic.yaml");
    std::fs::write(&schema, CLINIC_YAML).unwrap();
    let csv = write_csv(
        dir.path(),
        "clinic.csv",
        "Name,Visits,Balance,Last Visit Date\nann lee,3,10.25,2024-05-01\nbo kim,x,7,05/02/2024\n",
    );

    let mut config = AppConfig::default();
    config.db_path = dir.path().join("clinic.db").display().to_string();
    config.schema_path = Some(schema.display().to_string());
    let mut session = Session::from_config(config, Arc::new(ScriptedVoice::default())).unwrap();

    let report = session.load_csv(&csv).unwrap();
    assert_eq!(report.coercion_failures.get("Visits"), Some(&1));

    let set = session.model().unwrap().records();
    assert_eq!(set.value(0, 1), Some(&Value::Int(3)));
    assert_eq!(set.value(1, 1), Some(&Value::Null));
    assert_eq!(set.value(1, 2), Some(&Value::Float(7.0)));
    // a header containing "date" is always a date column
    assert_eq!(set.schema().fields[3].data_type, DataType::Date);
}

#[test]
fn test_undeclared_column_rejects_load() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "extra.csv", "Name,Shoe Size\nann,7\n");
    let mut config = AppConfig::default();
    config.db_path = dir.path().join("x.db").display().to_string();
    let mut session = Session::from_config(config, Arc::new(ScriptedVoice::default())).unwrap();

    match session.load_csv(&csv) {
        Err(SessionError::Op(OpError::Schema(SchemaError::UndeclaredColumn(c)))) => {
            assert_eq!(c, "Shoe Size")
        }
        other => panic!("unexpected load result: {other:?}"),
    }
    assert!(session.model().is_none());
}

#[test]
fn test_missing_schema_file() {
    let mut config = AppConfig::default();
    config.schema_path = Some("/nonexistent/types.yaml".into());
    let result = Session::from_config(config, Arc::new(ScriptedVoice::default()));
    assert!(matches!(result, Err(SessionError::Config(_))));
}

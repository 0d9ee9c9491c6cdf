//! Grid edits and name search over a loaded record set.


use recsift::core::declaration::TypeDeclaration;
use recsift::core::schema::DataType;
use recsift::core::types::{RawTable, Value};
use recsift::operators::{filter::filter, CellRole, Normalizer, OpError, TableModel, ViewEvent};
use test_data_gen::{generate_patients, healthcare_table};

fn model_of(raw: &RawTable) -> TableModel {
    let decl = TypeDeclaration::healthcare();
    TableModel::new(Normalizer::new(&decl).run(raw).unwrap().records)
}

fn people(names: &[&str]) -> TableModel {
    let raw = RawTable::new(
        vec!["Name".into(), "Age".into()],
        names
            .iter()
            .enumerate()
            .map(|(i, n)| vec![n.to_string(), (30 + i).to_string()])
            .collect(),
    );
    model_of(&raw)
}

#[test]
fn integer_cell_boundary() {
    let mut m = people(&["Alice", "Bob"]);
    match m.set_data(0, 1, "12.5") {
        Err(OpError::Rejected(r)) => {
            assert_eq!(r.column, "Age");
            assert_eq!(r.required, Some(DataType::Int64));
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
    assert_eq!(m.records().value(0, 1), Some(&Value::Int(30)));

    m.set_data(0, 1, "12").unwrap();
    assert_eq!(m.records().value(0, 1), Some(&Value::Int(12)));
}

#[test]
fn text_cell_refuses_numbers() {
    let mut m = people(&["Alice"]);
    assert!(m.set_data(0, 0, "123").is_err());
    assert_eq!(m.data(0, 0, CellRole::Display).as_deref(), Some("Alice"));
    m.set_data(0, 0, "Alicia").unwrap();
    assert_eq!(m.records().name(0), Some("Alicia"));
}

#[test]
fn search_is_case_insensitive_substring() {
    let m = people(&["Alice", "alice2", "Bob"]);
    let set = m.records();
    // names are title-cased on load
    assert_eq!(set.name(1), Some("Alice2"));
    assert_eq!(filter(set, Some("ali")), vec![0, 1]);
    assert_eq!(filter(set, Some("ALI")), vec![0, 1]);
    assert_eq!(filter(set, Some("")), vec![0, 1, 2]);
    assert_eq!(filter(set, None), vec![0, 1, 2]);
}

#[test]
fn filtered_view_edits_write_through() {
    let mut m = model_of(&healthcare_table(generate_patients(40)));
    // "Patient Number 1", 10..=19
    let visible = m.apply_filter(Some("number 1"));
    assert_eq!(visible, 11);
    m.take_events();

    let age = m.records().schema().index_of("Age").unwrap();
    let pos = m.position(3).unwrap();
    m.set_data(3, age, "77").unwrap();
    assert_eq!(m.take_events(), vec![ViewEvent::DataChanged { row: 3, column: age }]);

    assert_eq!(m.apply_filter(None), 40);
    assert_eq!(m.records().value(pos, age), Some(&Value::Int(77)));
    assert_eq!(
        m.data(pos, age, CellRole::Display).as_deref(),
        Some("77")
    );
}

#[test]
fn date_cell_accepts_flexible_input() {
    let mut m = model_of(&healthcare_table(generate_patients(2)));
    let discharge = m.records().schema().index_of("Discharge Date").unwrap();
    m.set_data(0, discharge, "March 3, 2024").unwrap();
    assert_eq!(
        m.data(0, discharge, CellRole::Display).as_deref(),
        Some("2024-03-03")
    );
    assert!(m.set_data(0, discharge, "next week").is_err());
}

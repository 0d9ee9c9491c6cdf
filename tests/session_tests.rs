//! Session flows: load from disk, search, edit, send, and background slots.


use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use recsift::core::config::AppConfig;
use recsift::core::declaration::TypeDeclaration;
use recsift::core::types::{RecordSet, Value};
use recsift::exec::{
    OperationKind, ScriptedVoice, Session, SessionError, SessionEvent, StoreOutcome,
};
use recsift::store::{RecordStore, SqliteStore, StoreError, StoredRow, TableSpec};
use test_data_gen::{generate_patients, to_csv, write_csv, HEALTHCARE_HEADERS};

/// Store whose inserts wait until the test opens the gate.
struct GatedStore {
    inner: SqliteStore,
    gate: Mutex<Receiver<()>>,
}

impl RecordStore for GatedStore {
    fn insert_all(&self, records: &RecordSet) -> recsift::store::Result<usize> {
        self.gate
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .recv()
            .map_err(|_| StoreError::Poisoned)?;
        self.inner.insert_all(records)
    }

    fn fetch_all(&self) -> recsift::store::Result<Vec<StoredRow>> {
        self.inner.fetch_all()
    }

    fn count(&self) -> recsift::store::Result<u64> {
        self.inner.count()
    }
}

/// Store that commits inserts but cannot read anything back.
struct WriteOnlyStore {
    inner: SqliteStore,
}

impl RecordStore for WriteOnlyStore {
    fn insert_all(&self, records: &RecordSet) -> recsift::store::Result<usize> {
        self.inner.insert_all(records)
    }

    fn fetch_all(&self) -> recsift::store::Result<Vec<StoredRow>> {
        Err(StoreError::Poisoned)
    }

    fn count(&self) -> recsift::store::Result<u64> {
        Err(StoreError::Poisoned)
    }
}

fn memory_store() -> SqliteStore {
    SqliteStore::open_in_memory(TableSpec::people("people").unwrap()).unwrap()
}

fn session_with(store: Arc<dyn RecordStore>) -> Session {
    Session::new(
        AppConfig::default(),
        TypeDeclaration::healthcare(),
        store,
        Arc::new(ScriptedVoice::default()),
    )
}

#[test]
fn load_search_edit_send_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut rows = generate_patients(12);
    rows.push(rows[0].clone());
    let csv = write_csv(dir.path(), "admissions.csv", &to_csv(&HEALTHCARE_HEADERS, &rows));

    let mut config = AppConfig::default();
    config.db_path = dir.path().join("healthcare.db").display().to_string();
    let mut session = Session::from_config(config, Arc::new(ScriptedVoice::default())).unwrap();

    let report = session.load_csv(&csv).unwrap();
    assert_eq!(report.initial_rows, 13);
    assert_eq!(report.final_rows, 12);

    let t0 = Instant::now();
    session.set_fragment("NUMBER 1", t0);
    let events = session.tick(t0 + Duration::from_millis(300));
    assert_eq!(events, vec![SessionEvent::Filtered { visible: 3 }]);

    session.edit(0, 1, "64").unwrap();
    let err = session.edit(0, 1, "sixty").unwrap_err();
    assert_eq!(
        err.to_string(),
        "In the 'Age' column a value of type int is required."
    );

    session.send_to_store().unwrap();
    let event = session.wait_for_store().unwrap();
    assert_eq!(
        event,
        SessionEvent::Stored(StoreOutcome {
            rows: 12,
            total: Some(12)
        })
    );

    let store = SqliteStore::open_path(
        dir.path().join("healthcare.db"),
        TableSpec::people("people").unwrap(),
    )
    .unwrap();
    let stored = store.fetch_all().unwrap();
    assert_eq!(stored.len(), 12);
    assert_eq!(stored[1].get("name"), Some(&Value::Str("Patient Number 1".into())));
    assert_eq!(stored[1].get("age"), Some(&Value::Int(64)));
}

#[test]
fn edits_after_send_do_not_reach_the_store() {
    let inner = memory_store();
    let (open, gate) = channel();
    let store = Arc::new(GatedStore {
        inner: inner.clone(),
        gate: Mutex::new(gate),
    });
    let mut session = session_with(store);

    let csv = to_csv(&["Name", "Age"], &[
        vec!["alice".into(), "30".into()],
        vec!["bob".into(), "40".into()],
    ]);
    let raw = recsift::io::CsvReader::default().read(csv.as_bytes()).unwrap();
    session.load_raw(&raw).unwrap();

    session.send_to_store().unwrap();
    assert!(!session.send_enabled());
    assert!(matches!(
        session.send_to_store(),
        Err(SessionError::Busy(OperationKind::Persist))
    ));

    // mutate the working set while the worker holds its snapshot
    session.edit(0, 0, "Mallory").unwrap();
    session.edit(1, 1, "99").unwrap();

    open.send(()).unwrap();
    let event = session.wait_for_store().unwrap();
    assert!(matches!(event, SessionEvent::Stored(StoreOutcome { rows: 2, .. })));
    assert!(session.send_enabled());

    let stored = inner.fetch_all().unwrap();
    assert_eq!(stored[0].get("name"), Some(&Value::Str("Alice".into())));
    assert_eq!(stored[1].get("age"), Some(&Value::Int(40)));
    assert_eq!(
        session.model().unwrap().records().name(0),
        Some("Mallory")
    );
}

#[test]
fn failed_send_is_reported_not_raised() {
    let store = memory_store();
    let mut session = session_with(Arc::new(store.clone()));

    let csv = to_csv(&["Name", "Shoe Size"], &[vec!["alice".into(), "9".into()]]);
    let raw = recsift::io::CsvReader::default().read(csv.as_bytes()).unwrap();
    let mut config = AppConfig::default();
    config.infer_types = true;
    let mut session_infer = Session::new(
        config,
        TypeDeclaration::healthcare(),
        Arc::new(store.clone()),
        Arc::new(ScriptedVoice::default()),
    );
    assert!(session.load_raw(&raw).is_err());
    session_infer.load_raw(&raw).unwrap();

    session_infer.send_to_store().unwrap();
    let event = session_infer.wait_for_store().unwrap();
    match &event {
        SessionEvent::StoreFailed(msg) => assert!(msg.contains("Shoe Size")),
        other => panic!("expected a failed send, got {other:?}"),
    }
    assert!(event
        .message()
        .unwrap()
        .starts_with("Something went wrong: "));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn completion_arrives_through_tick() {
    let store = memory_store();
    let mut session = session_with(Arc::new(store));
    let csv = to_csv(&["Name"], &[vec!["nora".into()]]);
    let raw = recsift::io::CsvReader::default().read(csv.as_bytes()).unwrap();
    session.load_raw(&raw).unwrap();
    session.send_to_store().unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut seen = Vec::new();
    while seen.is_empty() && Instant::now() < deadline {
        seen = session.tick(Instant::now());
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(
        seen,
        vec![SessionEvent::Stored(StoreOutcome {
            rows: 1,
            total: Some(1)
        })]
    );
}

#[test]
fn committed_send_succeeds_when_readback_fails() {
    let inner = memory_store();
    let mut session = session_with(Arc::new(WriteOnlyStore {
        inner: inner.clone(),
    }));
    let csv = to_csv(&["Name", "Age"], &[
        vec!["alice".into(), "30".into()],
        vec!["bob".into(), "40".into()],
    ]);
    let raw = recsift::io::CsvReader::default().read(csv.as_bytes()).unwrap();
    session.load_raw(&raw).unwrap();

    session.send_to_store().unwrap();
    let event = session.wait_for_store().unwrap();
    assert_eq!(
        event,
        SessionEvent::Stored(StoreOutcome {
            rows: 2,
            total: None
        })
    );
    assert_eq!(event.message().as_deref(), Some("Data sent successfully!"));
    assert_eq!(inner.count().unwrap(), 2);
}

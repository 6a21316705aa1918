use std::cell::RefCell;
use std::rc::Rc;

use data_master::loader::{DocumentLoader, LoadResult};
use data_master::metrics::{OperationMetrics, OperationObserver};
use data_master::{
    ActionState, CellValue, Column, ColumnType, Document, EditorEvent, EditorSession, LoadError,
    MemoryLoader, SessionConfig, SessionError,
};

fn sample_loader() -> MemoryLoader {
    MemoryLoader::from_rows(
        vec![
            Column::new("id", ColumnType::Integer),
            Column::new("name", ColumnType::Text),
        ],
        vec![
            vec![CellValue::Integer(1), CellValue::from("a")],
            vec![CellValue::Integer(2), CellValue::from("b")],
        ],
    )
    .unwrap()
}

fn loaded_session() -> EditorSession {
    let mut session = EditorSession::default();
    session.load(&mut sample_loader()).unwrap();
    session
}

struct FailingLoader;

impl DocumentLoader for FailingLoader {
    fn source(&self) -> String {
        "nowhere".to_string()
    }

    fn load(&mut self) -> LoadResult<Document> {
        Err(LoadError::Failed("connection refused".to_string()))
    }
}

fn names(session: &EditorSession) -> Vec<String> {
    session
        .document()
        .rows()
        .iter()
        .map(|row| format!("{}:{}", row[0], row[1]))
        .collect()
}

#[test]
fn test_edit_undo_redo_then_insert_prunes_branch() {
    let mut session = loaded_session();

    session.set_value_by_name(0, "name", "z").unwrap();
    assert!(session.can_undo());

    assert!(session.undo().unwrap());
    assert_eq!(names(&session), vec!["1:a", "2:b"]);
    assert!(session.can_redo());

    assert!(session.redo().unwrap());
    assert_eq!(names(&session), vec!["1:z", "2:b"]);

    session.undo().unwrap();
    session
        .insert_row(2, vec![CellValue::Integer(3), CellValue::from("c")])
        .unwrap();
    assert_eq!(names(&session), vec!["1:a", "2:b", "3:c"]);
    assert_eq!(session.history().len(), 1);
    assert!(!session.can_redo());
    assert!(!session.redo().unwrap());
}

#[test]
fn test_insert_after_full_redo_keeps_edit() {
    let mut session = loaded_session();
    session.set_value(0, 1, "z").unwrap();
    session.undo().unwrap();
    session.redo().unwrap();
    session
        .insert_row(2, vec![CellValue::Integer(3), CellValue::from("c")])
        .unwrap();
    assert_eq!(names(&session), vec!["1:z", "2:b", "3:c"]);
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_rejected_edit_is_not_recorded() {
    let mut session = loaded_session();
    let err = session.set_value(0, 0, "not a number").unwrap_err();
    assert!(matches!(err, SessionError::Document(_)));
    assert!(!session.can_undo());
    assert_eq!(names(&session), vec!["1:a", "2:b"]);
}

#[test]
fn test_add_and_delete_rows() {
    let mut session = loaded_session();
    let index = session.add_row().unwrap();
    assert_eq!(index, 2);
    assert!(session.document().row(2).unwrap().iter().all(CellValue::is_missing));

    session.set_value(2, 0, 3i64).unwrap();
    let removed = session.delete_rows(&[0, 2, 2]).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(names(&session), vec!["2:b"]);
    // add, edit, and one delete per row
    assert_eq!(session.history().len(), 4);

    session.jump_to(-1).unwrap();
    assert_eq!(names(&session), vec!["1:a", "2:b"]);
    session.jump_to(3).unwrap();
    assert_eq!(names(&session), vec!["2:b"]);
}

#[test]
fn test_delete_rows_checks_every_index_first() {
    let mut session = loaded_session();
    let err = session.delete_rows(&[0, 5]).unwrap_err();
    assert!(matches!(err, SessionError::Document(_)));
    assert_eq!(session.document().row_count(), 2);
    assert!(session.history().is_empty());
}

#[test]
fn test_timeline_selection_maps_to_jump_target() {
    let mut session = loaded_session();
    session.set_value(0, 1, "x").unwrap();
    session.set_value(1, 1, "y").unwrap();

    session.select_timeline_entry(0).unwrap();
    assert_eq!(names(&session), vec!["1:a", "2:b"]);
    session.select_timeline_entry(1).unwrap();
    assert_eq!(names(&session), vec!["1:x", "2:b"]);

    let timeline = session.timeline();
    assert!(timeline[1].is_current);
    assert!(session.select_timeline_entry(5).is_err());
}

#[test]
fn test_restart_only_when_document_drifted() {
    let mut session = loaded_session();
    assert!(!session.can_restart());
    assert!(!session.restart().unwrap());

    session.set_value(0, 1, "z").unwrap();
    assert!(session.can_restart());

    // Undoing back to the loaded state disables restart again
    session.undo().unwrap();
    assert!(!session.can_restart());
    session.redo().unwrap();

    assert!(session.restart().unwrap());
    assert_eq!(names(&session), vec!["1:a", "2:b"]);
    assert!(session.history().is_empty());
    assert_eq!(session.original(), session.document());
}

#[test]
fn test_redundant_restart_sends_no_events() {
    let mut session = loaded_session();
    let seen = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    session.subscribe(move |_: &EditorEvent| *sink.borrow_mut() += 1);

    session.restart().unwrap();
    assert_eq!(*seen.borrow(), 0);
}

#[test]
fn test_empty_session_cannot_restart() {
    let session = EditorSession::default();
    assert_eq!(session.action_state(), ActionState::default());
}

#[test]
fn test_action_state_tracks_history() {
    let mut session = loaded_session();
    session.set_value(0, 1, "z").unwrap();
    session.undo().unwrap();
    assert_eq!(
        session.action_state(),
        ActionState {
            has_data: true,
            can_undo: false,
            can_redo: true,
            can_restart: false,
            has_timeline: true,
        }
    );
}

#[test]
fn test_successful_load_clears_history_and_takes_snapshot() {
    let mut session = loaded_session();
    session.set_value(0, 1, "z").unwrap();

    session.load(&mut sample_loader()).unwrap();
    assert!(session.history().is_empty());
    assert_eq!(session.history().current_index(), -1);
    assert_eq!(session.original(), session.document());
}

#[test]
fn test_failed_load_resets_session() {
    let mut session = loaded_session();
    session.set_value(0, 1, "z").unwrap();

    let err = session.load(&mut FailingLoader).unwrap_err();
    assert!(matches!(err, SessionError::Load(LoadError::Failed(_))));
    assert!(session.document().is_empty());
    assert!(session.original().is_empty());
    assert!(session.history().is_empty());
    assert!(!session.can_restart());
}

#[test]
fn test_failed_load_can_keep_document() {
    let config = SessionConfig {
        reset_on_load_failure: false,
        ..SessionConfig::default()
    };
    let mut session = EditorSession::new(config);
    session.load(&mut sample_loader()).unwrap();
    session.set_value(0, 1, "z").unwrap();

    assert!(session.load(&mut FailingLoader).is_err());
    assert_eq!(names(&session), vec!["1:z", "2:b"]);
    assert!(session.history().is_empty());
    assert!(session.can_restart());
}

#[test]
fn test_view_receives_document_and_history_events() {
    let mut session = loaded_session();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = session.subscribe(move |event: &EditorEvent| sink.borrow_mut().push(event.clone()));

    session.set_value(1, 1, "q").unwrap();
    session.undo().unwrap();
    assert!(session.unsubscribe(id));
    session.redo().unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            EditorEvent::CellChanged { row: 1, col: 1 },
            EditorEvent::HistoryChanged { len: 1, current_index: 0 },
            EditorEvent::CellChanged { row: 1, col: 1 },
            EditorEvent::HistoryChanged { len: 1, current_index: -1 },
        ]
    );
}

#[test]
fn test_metrics_record_success_and_failure() {
    let mut session = loaded_session();
    session.set_value(0, 1, "z").unwrap();
    assert!(session.set_value(0, 0, "bad").is_err());

    let summary = session.performance_summary().unwrap();
    // load, good edit, bad edit
    assert_eq!(summary.total_operations, 3);
    assert_eq!(summary.successful_operations, 2);
    assert_eq!(summary.failed_operations, 1);

    let recorder = session.metrics().unwrap();
    let operations: Vec<&str> = recorder.borrow().metrics().map(|m| m.operation).collect();
    assert_eq!(operations, vec!["load", "set_value", "set_value"]);
}

#[test]
fn test_metrics_can_be_disabled() {
    let config = SessionConfig {
        record_metrics: false,
        ..SessionConfig::default()
    };
    let mut session = EditorSession::new(config);
    session.load(&mut sample_loader()).unwrap();
    assert!(session.metrics().is_none());
    assert!(session.performance_summary().is_none());
}

#[test]
fn test_custom_observer_sees_operations() {
    struct Collect(Rc<RefCell<Vec<(&'static str, bool)>>>);

    impl OperationObserver for Collect {
        fn operation_finished(&mut self, metrics: OperationMetrics) {
            self.0.borrow_mut().push((metrics.operation, metrics.success));
        }
    }

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut session = loaded_session();
    session.set_observer(Box::new(Collect(Rc::clone(&seen))));

    session.undo().unwrap();
    session.add_row().unwrap();
    assert!(session.jump_to(7).is_err());

    assert_eq!(
        *seen.borrow(),
        vec![("undo", true), ("add_row", true), ("jump_to", false)]
    );
    assert!(session.metrics().is_none());
}

use data_master::command::{Command, CommandHistory, HistoryError, ORIGINAL_STATE_LABEL};
use data_master::{CellValue, Column, ColumnType, Document};

// Helper to create a document with columns [id:int, name:text] and rows (1,"a"), (2,"b")
fn create_test_document() -> Document {
    Document::from_rows(
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

fn text(document: &Document, row: usize, col: usize) -> String {
    document.get(row, col).unwrap().to_string()
}

#[test]
fn test_cell_edit_undo_redo() {
    let mut document = create_test_document();
    let mut history = CommandHistory::new();

    let cmd = document.edit_cell(0, 1, "z").unwrap();
    history.record(cmd);
    assert_eq!(text(&document, 0, 1), "z");
    assert!(history.can_undo());
    assert!(!history.can_redo());

    assert!(history.undo(&mut document).unwrap());
    assert_eq!(text(&document, 0, 1), "a");
    assert!(history.can_redo());

    assert!(history.redo(&mut document).unwrap());
    assert_eq!(text(&document, 0, 1), "z");
}

#[test]
fn test_undo_redo_at_boundaries_are_noops() {
    let mut document = create_test_document();
    let mut history = CommandHistory::new();
    let before = document.clone();

    assert!(!history.undo(&mut document).unwrap());
    assert!(!history.redo(&mut document).unwrap());
    assert_eq!(history.current_index(), -1);
    assert_eq!(document, before);

    history.record(document.edit_cell(1, 0, 7i64).unwrap());
    assert!(!history.redo(&mut document).unwrap());
    assert_eq!(history.current_index(), 0);
}

#[test]
fn test_row_delete_undo_restores_captured_row() {
    let mut document = create_test_document();
    document.append_row(false).unwrap();
    document.set_value(2, 0, 3i64).unwrap();
    document.set_value(2, 1, "c").unwrap();
    let before = document.clone();
    let mut history = CommandHistory::new();

    let cmd = document.delete_row(2, true).unwrap().unwrap();
    assert_eq!(
        cmd,
        Command::RowDelete {
            index: 2,
            data: vec![CellValue::Integer(3), CellValue::from("c")],
        }
    );
    history.record(cmd);
    assert_eq!(document.row_count(), 2);

    history.undo(&mut document).unwrap();
    assert_eq!(document.row_count(), 3);
    assert_eq!(document, before);
}

#[test]
fn test_row_insert_replays_captured_data() {
    let mut document = create_test_document();
    let mut history = CommandHistory::new();

    let cmd = document
        .insert_row(1, vec![CellValue::from("9"), CellValue::from("x")], true)
        .unwrap()
        .unwrap();
    // Stored row is the coerced one
    assert_eq!(
        cmd,
        Command::RowInsert {
            index: 1,
            data: vec![CellValue::Integer(9), CellValue::from("x")],
            appended: false,
        }
    );
    history.record(cmd);

    history.undo(&mut document).unwrap();
    assert_eq!(document.row_count(), 2);
    assert_eq!(text(&document, 1, 1), "b");

    history.redo(&mut document).unwrap();
    assert_eq!(document.row(1).unwrap(), &[CellValue::Integer(9), CellValue::from("x")][..]);
    assert_eq!(text(&document, 2, 1), "b");
}

#[test]
fn test_record_after_undo_prunes_redo_branch() {
    let mut document = create_test_document();
    let mut history = CommandHistory::new();

    history.record(document.edit_cell(0, 1, "p").unwrap());
    history.record(document.edit_cell(0, 1, "q").unwrap());
    history.record(document.edit_cell(0, 1, "r").unwrap());
    history.undo(&mut document).unwrap();
    history.undo(&mut document).unwrap();
    assert_eq!(history.current_index(), 0);
    assert_eq!(text(&document, 0, 1), "p");

    history.record(document.edit_cell(1, 1, "new").unwrap());
    assert_eq!(history.len(), 2);
    assert_eq!(history.current_index(), 1);
    assert!(!history.can_redo());
    assert!(!history.redo(&mut document).unwrap());
}

#[test]
fn test_jump_to_moves_in_both_directions() {
    let mut document = create_test_document();
    let original = document.clone();
    let mut history = CommandHistory::new();

    for value in ["p", "q", "r"] {
        history.record(document.edit_cell(0, 1, value).unwrap());
    }

    assert_eq!(history.jump_to(-1, &mut document).unwrap(), 3);
    assert_eq!(document, original);

    assert_eq!(history.jump_to(1, &mut document).unwrap(), 2);
    assert_eq!(text(&document, 0, 1), "q");
    assert_eq!(history.jump_to(1, &mut document).unwrap(), 0);
}

#[test]
fn test_jump_to_out_of_range_is_rejected() {
    let mut document = create_test_document();
    let mut history = CommandHistory::new();
    history.record(document.edit_cell(0, 1, "p").unwrap());

    let result = history.jump_to(1, &mut document);
    assert_eq!(
        result,
        Err(HistoryError::TargetOutOfRange { target: 1, min: -1, max: 0 })
    );
    assert!(history.jump_to(-2, &mut document).is_err());
    assert_eq!(history.current_index(), 0);
    assert_eq!(text(&document, 0, 1), "p");
}

#[test]
fn test_replay_against_desynchronised_document_fails_without_moving_cursor() {
    let mut document = create_test_document();
    let mut history = CommandHistory::new();
    history.record(document.edit_cell(1, 1, "z").unwrap());

    // Out-of-band structural change the history never heard about
    document.delete_row(1, false).unwrap();

    let err = history.undo(&mut document).unwrap_err();
    assert!(err.to_string().contains("out of range"));
    assert_eq!(history.current_index(), 0);
    assert!(history.can_undo());
}

#[test]
fn test_clear_resets_cursor() {
    let mut document = create_test_document();
    let mut history = CommandHistory::new();
    history.record(document.edit_cell(0, 1, "p").unwrap());
    history.undo(&mut document).unwrap();

    history.clear();
    assert!(history.is_empty());
    assert_eq!(history.current_index(), -1);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn test_timeline_labels_and_current_marker() {
    let mut document = create_test_document();
    let mut history = CommandHistory::new();
    history.record(document.edit_cell(0, 1, "z").unwrap());
    history.record(document.delete_row(1, true).unwrap().unwrap());
    history.undo(&mut document).unwrap();

    let timeline = history.timeline(&document);
    assert_eq!(timeline.len(), 3);
    assert_eq!(timeline[0].label, ORIGINAL_STATE_LABEL);
    assert_eq!(timeline[0].target, -1);
    assert_eq!(timeline[1].label, "001: Edit cell (0, 'name') to 'z'");
    assert_eq!(timeline[2].label, "002: Delete row at index 1");
    let current: Vec<bool> = timeline.iter().map(|e| e.is_current).collect();
    assert_eq!(current, vec![false, true, false]);
}

#[test]
fn test_appended_rows_are_labelled_as_added() {
    let mut document = create_test_document();
    let mut history = CommandHistory::new();
    history.record(document.append_row(true).unwrap().unwrap());
    let insert = document
        .insert_row(0, vec![CellValue::from(5i64), CellValue::from("e")], true)
        .unwrap()
        .unwrap();
    history.record(insert);

    let labels: Vec<String> = history.timeline(&document).into_iter().map(|e| e.label).collect();
    assert_eq!(labels[1], "001: Add new row");
    assert_eq!(labels[2], "002: Insert row at index 0");

    // The appended row replays at the end it was added to
    history.undo(&mut document).unwrap();
    history.undo(&mut document).unwrap();
    assert_eq!(document.row_count(), 2);
    history.redo(&mut document).unwrap();
    assert_eq!(document.row_count(), 3);
    assert!(document.row(2).unwrap().iter().all(CellValue::is_missing));
}

#[test]
fn test_history_changes_are_announced() {
    use data_master::{EditorEvent, EventBus};
    use std::cell::RefCell;
    use std::rc::Rc;

    let bus = Rc::new(EventBus::new());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    bus.subscribe(Box::new(move |event: &EditorEvent| sink.borrow_mut().push(event.clone())));

    let mut document = create_test_document();
    let mut history = CommandHistory::with_event_bus(Rc::clone(&bus));
    history.record(document.edit_cell(0, 1, "z").unwrap());
    history.undo(&mut document).unwrap();
    history.clear();

    assert_eq!(
        *seen.borrow(),
        vec![
            EditorEvent::HistoryChanged { len: 1, current_index: 0 },
            EditorEvent::HistoryChanged { len: 1, current_index: -1 },
            EditorEvent::HistoryChanged { len: 0, current_index: -1 },
        ]
    );
}

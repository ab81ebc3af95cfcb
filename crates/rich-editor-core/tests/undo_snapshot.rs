use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rich_editor_core::{
    ChangeSource, ContentChangedEvent, ContentPosition, Editor, EditorError, EditorOptions,
    InsertOption, SelectTarget,
};
use serde_json::json;

fn editor(content: &str) -> Editor {
    Editor::new(EditorOptions::default().with_initial_content(content)).unwrap()
}

fn record(editor: &mut Editor) -> Rc<RefCell<Vec<ContentChangedEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    editor.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

fn append(editor: &mut Editor, html: &str) -> rich_editor_core::Result<bool> {
    editor.insert_content(html, &InsertOption::at(ContentPosition::End))
}

#[test]
fn test_nested_transactions_notify_once_with_outer_payload() {
    let mut editor = editor("<div>a</div>");
    let events = record(&mut editor);

    let outer = editor
        .add_undo_snapshot_with(Some(ChangeSource::Format), |editor, _, _| {
            assert_eq!(editor.transaction_depth(), 1);
            append(editor, "b")?;
            let inner = editor.add_undo_snapshot_with(Some(ChangeSource::Paste), |editor, _, _| {
                assert_eq!(editor.transaction_depth(), 2);
                append(editor, "c")?;
                Ok("inner")
            })?;
            assert_eq!(inner, "inner");
            Ok(json!({ "changed": 2 }))
        })
        .unwrap();

    assert_eq!(outer, json!({ "changed": 2 }));
    assert_eq!(editor.transaction_depth(), 0);
    assert_eq!(editor.get_content(), "<div>abc</div>");
    assert_eq!(
        *events.borrow(),
        vec![ContentChangedEvent {
            source: ChangeSource::Format,
            data: Some(json!({ "changed": 2 })),
        }]
    );

    // before and after the whole batch, nothing in between
    assert_eq!(editor.undo_snapshots().len(), 2);
}

#[test]
fn test_unit_payload_and_missing_source() {
    let mut editor = editor("<div>a</div>");
    let events = record(&mut editor);

    editor.add_undo_snapshot(Some(ChangeSource::Cut)).unwrap();
    editor
        .add_undo_snapshot_with(None, |editor, _, _| append(editor, "b"))
        .unwrap();

    assert_eq!(
        *events.borrow(),
        vec![ContentChangedEvent {
            source: ChangeSource::Cut,
            data: None,
        }]
    );
}

#[test]
fn test_failed_callback_emits_nothing_and_releases_depth() {
    let mut editor = editor("<div>a</div>");
    let events = record(&mut editor);

    let result: rich_editor_core::Result<()> =
        editor.add_undo_snapshot_with(Some(ChangeSource::Format), |editor, _, _| {
            editor.add_undo_snapshot_with(Some(ChangeSource::Format), |editor, _, _| {
                let root = editor.root();
                Err(EditorError::Detached(root))
            })
        });
    assert!(matches!(result, Err(EditorError::Detached(_))));
    assert_eq!(editor.transaction_depth(), 0);
    assert!(events.borrow().is_empty());

    editor
        .add_undo_snapshot_with(Some(ChangeSource::Paste), |editor, _, _| append(editor, "x"))
        .unwrap();
    assert_eq!(events.borrow().len(), 1);
    assert_eq!(events.borrow()[0].data, Some(json!(true)));
}

#[test]
fn test_callback_receives_normalized_selection() {
    let mut editor = editor("<p>hello</p>");
    let root = editor.root();
    let p = editor.tree().first_child(root).unwrap();
    let text = editor.tree().first_child(p).unwrap();
    assert!(editor.select(SelectTarget::NodeContents(p)));

    let mut seen = None;
    editor
        .add_undo_snapshot_with(None, |_, start, end| {
            seen = start.zip(end);
            Ok(())
        })
        .unwrap();
    let (start, end) = seen.unwrap();
    assert_eq!((start.node(), start.offset()), (text, 0));
    assert_eq!((end.node(), end.offset()), (text, 5));
}

#[test]
fn test_callback_without_selection_gets_none() {
    let mut editor = editor("<p>x</p>");
    let none = editor
        .add_undo_snapshot_with(None, |_, start, end| Ok(start.is_none() && end.is_none()))
        .unwrap();
    assert!(none);
}

#[test]
fn test_undo_redo_cycle() {
    let mut editor = editor("<div>a</div>");
    let events = record(&mut editor);
    assert!(!editor.can_undo());

    editor
        .add_undo_snapshot_with(Some(ChangeSource::Format), |editor, _, _| append(editor, "b"))
        .unwrap();
    assert!(editor.can_undo());
    assert!(!editor.can_redo());

    assert!(editor.undo().unwrap());
    assert_eq!(editor.get_content(), "<div>a</div>");
    assert!(editor.can_redo());
    assert!(!editor.undo().unwrap());

    assert!(editor.redo().unwrap());
    assert_eq!(editor.get_content(), "<div>ab</div>");
    assert!(!editor.can_redo());

    let sources: Vec<ChangeSource> = events.borrow().iter().map(|e| e.source.clone()).collect();
    assert_eq!(
        sources,
        vec![ChangeSource::Format, ChangeSource::Undo, ChangeSource::Redo]
    );
}

#[test]
fn test_unrecorded_changes_are_kept_for_redo() {
    let mut editor = editor("<div>a</div>");
    editor.set_content("<p>z</p>").unwrap();
    assert!(editor.can_undo());
    assert!(!editor.can_redo());

    assert!(editor.undo().unwrap());
    assert_eq!(editor.get_content(), "<div>a</div>");
    assert!(editor.redo().unwrap());
    assert_eq!(editor.get_content(), "<p>z</p>");
}

#[test]
fn test_undo_restores_selection() {
    let mut editor = editor("");
    editor.set_content("<div>abc</div>").unwrap();
    let text = editor.tree().first_leaf(editor.root()).unwrap();
    assert!(editor.select(SelectTarget::Points {
        start: (text, 1),
        end: (text, 2),
    }));
    editor.add_undo_snapshot(None).unwrap();

    editor
        .add_undo_snapshot_with(None, |editor, _, _| {
            editor.tree_mut().set_text(text, "abcdef")?;
            Ok(())
        })
        .unwrap();
    assert_eq!(editor.get_content(), "<div>abcdef</div>");

    assert!(editor.undo().unwrap());
    assert_eq!(editor.get_content(), "<div>abc</div>");
    let range = editor.get_selection_range().unwrap();
    let restored = editor.tree().first_leaf(editor.root()).unwrap();
    assert_ne!(restored, text);
    assert_eq!((range.start().node(), range.start().offset()), (restored, 1));
    assert_eq!((range.end().node(), range.end().offset()), (restored, 2));
}

#[test]
fn test_history_size_cap() {
    let mut editor =
        Editor::new(EditorOptions::default().with_undo_max_size(30).with_initial_content("x"))
            .unwrap();
    for word in ["aaaaaaaaaa", "bbbbbbbbbb", "cccccccccc", "dddddddddd"] {
        editor
            .add_undo_snapshot_with(None, |editor, _, _| editor.set_content(word))
            .unwrap();
    }
    assert!(editor.undo_snapshots().total_size() <= 30);
    assert!(editor.undo().unwrap());
    assert_eq!(editor.get_content(), "cccccccccc");
    assert!(editor.undo().unwrap());
    assert!(!editor.undo().unwrap());
}

#[test]
fn test_history_steps_reuse_tree_nodes() {
    let mut editor = editor("<div>a<b>b</b></div>");
    let baseline = editor.tree().node_count();

    for i in 0..200 {
        editor.set_content(&format!("<p>{i}</p>")).unwrap();
        editor.add_undo_snapshot(None).unwrap();
    }
    for _ in 0..100 {
        assert!(editor.undo().unwrap());
    }
    for _ in 0..50 {
        assert!(editor.redo().unwrap());
        assert!(editor.undo().unwrap());
    }
    assert!(editor.tree().node_count() <= baseline);

    while editor.undo().unwrap() {}
    assert_eq!(editor.get_content(), "<div>a<b>b</b></div>");
    assert_eq!(editor.tree().node_count(), baseline);

    // released slots are recycled instead of growing the arena
    let leaf = editor.tree().first_leaf(editor.root()).unwrap();
    assert!(leaf.index() < 16);
}

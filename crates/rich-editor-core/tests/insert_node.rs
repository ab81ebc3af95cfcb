use pretty_assertions::assert_eq;
use rich_editor_core::{
    ContentPosition, Editor, EditorError, EditorOptions, InsertOption, SelectTarget,
};

fn editor(content: &str) -> Editor {
    Editor::new(EditorOptions::default().with_initial_content(content)).unwrap()
}

fn select_text(editor: &mut Editor, leaf: usize, start: usize, end: usize) {
    let tree = editor.tree();
    let mut node = tree.first_leaf(editor.root()).unwrap();
    for _ in 0..leaf {
        node = tree.next_leaf(editor.root(), node).unwrap();
    }
    assert!(editor.select(SelectTarget::Points {
        start: (node, start),
        end: (node, end),
    }));
}

#[test]
fn test_begin_inserts_inside_first_block() {
    let mut editor = editor("<div>hello</div>");
    let inserted = editor
        .insert_content("X", &InsertOption::at(ContentPosition::Begin))
        .unwrap();
    assert!(inserted);
    assert_eq!(editor.get_content(), "<div>Xhello</div>");
}

#[test]
fn test_end_on_new_line_adds_a_block() {
    let mut editor = editor("<div>hello</div>");
    editor
        .insert_content(
            "X",
            &InsertOption::at(ContentPosition::End).with_insert_on_new_line(true),
        )
        .unwrap();
    assert_eq!(editor.get_content(), "<div>hello</div><div>X</div>");
}

#[test]
fn test_begin_on_empty_root_becomes_sole_child() {
    let mut editor = editor("");
    editor
        .insert_content("<p>x</p>", &InsertOption::at(ContentPosition::Begin))
        .unwrap();
    assert_eq!(editor.get_content(), "<p>x</p>");
    assert_eq!(editor.tree().children(editor.root()).len(), 1);
}

#[test]
fn test_end_after_trailing_text_run() {
    let mut editor = editor("<p>a</p>tail");
    editor
        .insert_content("<b>!</b>", &InsertOption::at(ContentPosition::End))
        .unwrap();
    assert_eq!(editor.get_content(), "<p>a</p>tail<b>!</b>");
}

#[test]
fn test_outside_goes_after_the_root() {
    let mut editor = editor("<p>inside</p>");
    let node = editor.tree_mut().create_element("hr");
    editor
        .insert_node(node, &InsertOption::at(ContentPosition::Outside))
        .unwrap();
    assert_eq!(editor.get_content(), "<p>inside</p>");
    assert_eq!(editor.tree().next_sibling(editor.root()), Some(node));
    assert!(!editor.contains(node));
}

#[test]
fn test_selection_start_replaces_selected_text() {
    let mut editor = editor("<div>hello world</div>");
    select_text(&mut editor, 0, 0, 5);
    editor
        .insert_content("bye", &InsertOption::default())
        .unwrap();
    assert_eq!(editor.get_content(), "<div>bye world</div>");

    let tree = editor.tree();
    let range = editor.get_selection_range().unwrap();
    assert!(range.is_collapsed(tree));
    let bye = tree.first_leaf(editor.root()).unwrap();
    assert_eq!(tree.text(bye).as_deref(), Some("bye"));
    assert!(range.start().is_after(tree, &rich_editor_core::Position::new(tree, bye, 2)));
}

#[test]
fn test_selection_start_keeps_selection_when_not_replacing() {
    let mut editor = editor("<div>abcd</div>");
    select_text(&mut editor, 0, 1, 3);
    let option = InsertOption::default()
        .with_replace_selection(false)
        .with_update_cursor(false);
    editor.insert_content("X", &option).unwrap();
    assert_eq!(editor.get_content(), "<div>aXbcd</div>");

    let range = editor.get_selection_range().unwrap();
    let tail = editor.tree().last_leaf(editor.root()).unwrap();
    assert_eq!(editor.tree().text(tail).as_deref(), Some("bcd"));
    assert_eq!((range.start().node(), range.start().offset()), (tail, 0));
    assert_eq!((range.end().node(), range.end().offset()), (tail, 2));

    editor.insert_content("Y", &InsertOption::default()).unwrap();
    assert_eq!(editor.get_content(), "<div>aXYd</div>");
}

#[test]
fn test_kept_selection_follows_split_while_focused() {
    let mut editor = editor("<div>abcd</div>");
    editor.focus();
    select_text(&mut editor, 0, 1, 3);
    let option = InsertOption::default()
        .with_replace_selection(false)
        .with_update_cursor(false);
    editor.insert_content("X", &option).unwrap();

    let range = editor.get_selection_range().unwrap();
    assert!(!range.is_collapsed(editor.tree()));
    editor.insert_content("Y", &InsertOption::default()).unwrap();
    assert_eq!(editor.get_content(), "<div>aXYd</div>");
}

#[test]
fn test_kept_selection_after_new_line_insertion() {
    let mut editor = editor("<div>ab</div><div>cd</div><div>ef</div>");
    let root = editor.root();
    let ab = editor.tree().first_leaf(root).unwrap();
    assert!(editor.select(SelectTarget::Points {
        start: (ab, 1),
        end: (root, 3),
    }));
    let option = InsertOption::default()
        .with_replace_selection(false)
        .with_update_cursor(false)
        .with_insert_on_new_line(true);
    editor.insert_content("X<b>Y</b>", &option).unwrap();
    assert_eq!(
        editor.get_content(),
        "<div>ab</div><div>X<b>Y</b></div><div>cd</div><div>ef</div>"
    );

    let range = editor.get_selection_range().unwrap();
    assert_eq!((range.start().node(), range.start().offset()), (ab, 1));
    assert_eq!((range.end().node(), range.end().offset()), (root, 4));
}

#[test]
fn test_fragment_with_block_retypes_paragraph() {
    let mut editor = editor("<p>ab</p>");
    select_text(&mut editor, 0, 1, 1);
    editor
        .insert_content("<div>X</div>", &InsertOption::default())
        .unwrap();
    assert_eq!(editor.get_content(), "<div>a<div>X</div>b</div>");
}

#[test]
fn test_single_node_does_not_retype_paragraph() {
    let mut editor = editor("<p>ab</p>");
    select_text(&mut editor, 0, 1, 1);
    let node = editor.tree_mut().create_element("img");
    editor.insert_node(node, &InsertOption::default()).unwrap();
    assert_eq!(editor.get_content(), "<p>a<img>b</p>");
}

#[test]
fn test_selection_start_on_new_line_goes_after_block() {
    let mut editor = editor("<div>ab</div><div>cd</div>");
    select_text(&mut editor, 0, 1, 1);
    editor
        .insert_content(
            "X",
            &InsertOption::default().with_insert_on_new_line(true),
        )
        .unwrap();
    assert_eq!(editor.get_content(), "<div>ab</div><div>X</div><div>cd</div>");
}

#[test]
fn test_selection_start_without_selection_reports_false() {
    let mut editor = editor("<div>a</div>");
    let inserted = editor
        .insert_content("X", &InsertOption::default())
        .unwrap();
    assert!(!inserted);
    assert_eq!(editor.get_content(), "<div>a</div>");
}

#[test]
fn test_inserting_an_ancestor_of_root_fails() {
    let mut editor = editor("<div>a</div>");
    let document = editor.tree().document();
    let root = editor.root();
    assert!(matches!(
        editor.insert_node(root, &InsertOption::at(ContentPosition::Begin)),
        Err(EditorError::HierarchyRequest { .. })
    ));
    assert!(matches!(
        editor.insert_node(document, &InsertOption::at(ContentPosition::End)),
        Err(EditorError::HierarchyRequest { .. })
    ));
}

#[test]
fn test_delete_and_replace_node() {
    let mut editor = editor("<p>a</p><p>b</p>");
    let root = editor.root();
    let first = editor.tree().children(root)[0];
    let second = editor.tree().children(root)[1];

    let replacement = editor.tree_mut().create_element("hr");
    editor.replace_node(first, replacement).unwrap();
    assert_eq!(editor.get_content(), "<hr><p>b</p>");

    editor.delete_node(second).unwrap();
    assert_eq!(editor.get_content(), "<hr>");

    assert!(matches!(
        editor.delete_node(second),
        Err(EditorError::OutsideRoot { .. })
    ));
}

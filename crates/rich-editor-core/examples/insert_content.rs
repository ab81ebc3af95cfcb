//! Insertion and undo example
//!
//! Demonstrates the insertion modes, transactions and change notifications.
//! Run with `RUST_LOG=rich_editor_core=debug` to see the kernel's tracing output.

use rich_editor_core::{
    ChangeSource, ContentPosition, Editor, EditorOptions, InsertOption, Position, SelectTarget,
};
use tracing_subscriber::EnvFilter;

fn main() -> rich_editor_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Rich editor insertion example ===\n");

    let mut editor =
        Editor::new(EditorOptions::default().with_initial_content("<p>hello world</p>"))?;
    editor.subscribe(|event| {
        println!("  content changed: {} (data: {:?})", event.source, event.data);
    });
    println!("1. Initial content: {}", editor.get_content());

    editor.add_undo_snapshot_with(Some(ChangeSource::Format), |editor, _, _| {
        editor.insert_content(
            "<h1>Title</h1>",
            &InsertOption::at(ContentPosition::Begin).with_insert_on_new_line(true),
        )?;
        editor.insert_content(
            "<p>footer</p>",
            &InsertOption::at(ContentPosition::End).with_insert_on_new_line(true),
        )?;
        Ok("framed")
    })?;
    println!("2. After framing: {}", editor.get_content());

    let root = editor.root();
    let paragraph = editor.tree().children(root)[1];
    if let Some(text) = editor.tree().first_leaf(paragraph) {
        let cursor = Position::new(editor.tree(), text, 5);
        editor.select(SelectTarget::Position(cursor));
    }
    editor.add_undo_snapshot_with(Some(ChangeSource::Paste), |editor, _, _| {
        editor.insert_content(",", &InsertOption::default())
    })?;
    println!("3. After pasting at the cursor: {}", editor.get_content());

    println!("\n4. Blocks:");
    let mut traverser = editor.get_body_traverser();
    let mut block = traverser.current_block_element();
    while let Some(current) = block {
        println!("  - {:?}", current.text_content(editor.tree()));
        block = traverser.get_next_block_element(editor.tree());
    }

    println!("\n5. Undo:");
    while editor.undo()? {
        println!("  {}", editor.get_content());
    }
    Ok(())
}

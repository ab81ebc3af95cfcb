use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rich_editor_core::{
    ChangeSource, ContentPosition, Editor, EditorOptions, InsertOption, Position, SelectTarget,
};

fn large_content(paragraphs: usize) -> String {
    let mut out = String::with_capacity(paragraphs * 96);
    for i in 0..paragraphs {
        out.push_str(&format!(
            "<p>{i:05} the quick <b>brown</b> fox <a href=\"#{i}\">jumps</a> over the lazy dog</p>"
        ));
    }
    out
}

fn bench_load(c: &mut Criterion) {
    let content = large_content(5_000);
    c.bench_function("load/5k_paragraphs", |b| {
        b.iter(|| {
            let editor =
                Editor::new(EditorOptions::default().with_initial_content(black_box(&content)))
                    .unwrap();
            black_box(editor.tree().node_count());
        })
    });
}

fn bench_body_traversal(c: &mut Criterion) {
    let editor = Editor::new(EditorOptions::default().with_initial_content(large_content(2_000)))
        .unwrap();
    c.bench_function("traverse/inline_elements_2k_paragraphs", |b| {
        b.iter(|| {
            let tree = editor.tree();
            let mut traverser = editor.get_body_traverser();
            let mut count = 0usize;
            let mut current = traverser.current_inline_element();
            while current.is_some() {
                count += 1;
                current = traverser.get_next_inline_element(tree);
            }
            black_box(count);
        })
    });
}

fn bench_insert_at_selection(c: &mut Criterion) {
    let content = large_content(1_000);
    c.bench_function("insert/100_nodes_at_selection", |b| {
        b.iter_batched(
            || {
                let mut editor =
                    Editor::new(EditorOptions::default().with_initial_content(content.as_str()))
                        .unwrap();
                let root = editor.root();
                let middle = editor.tree().children(root)[500];
                let leaf = editor.tree().first_leaf(middle).unwrap();
                let position = Position::new(editor.tree(), leaf, 3);
                editor.select(SelectTarget::Position(position));
                editor
            },
            |mut editor| {
                for _ in 0..100 {
                    let node = editor.tree_mut().create_text("x");
                    editor.insert_node(node, &InsertOption::default()).unwrap();
                }
                black_box(editor.tree().node_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_undo_transactions(c: &mut Criterion) {
    let content = large_content(200);
    c.bench_function("undo/50_transactions", |b| {
        b.iter_batched(
            || Editor::new(EditorOptions::default().with_initial_content(content.as_str())).unwrap(),
            |mut editor| {
                for _ in 0..50 {
                    editor
                        .add_undo_snapshot_with(Some(ChangeSource::Format), |editor, _, _| {
                            editor.insert_content("<p>more</p>", &InsertOption::at(ContentPosition::End))
                        })
                        .unwrap();
                }
                while editor.undo().unwrap() {}
                black_box(editor.get_content().len());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_load,
    bench_body_traversal,
    bench_insert_at_selection,
    bench_undo_transactions
);
criterion_main!(benches);

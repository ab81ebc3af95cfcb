use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rich_editor_core::{
    ContentTree, NodeId, NodeKind, Position, PositionType, SelectionRange, markup::parse_fragment,
};

fn setup(html: &str) -> (ContentTree, NodeId) {
    let mut tree = ContentTree::default();
    let root = tree.create_element("div");
    tree.append_child(tree.document(), root).unwrap();
    let fragment = parse_fragment(&mut tree, html).unwrap();
    tree.append_child(root, fragment).unwrap();
    (tree, root)
}

fn random_tree(rng: &mut StdRng) -> (ContentTree, NodeId, Vec<NodeId>) {
    const TAGS: [&str; 6] = ["div", "p", "b", "span", "br", "img"];
    const WORDS: [&str; 4] = ["a", "hello", "日本", "x y"];

    let mut tree = ContentTree::default();
    let root = tree.create_element("div");
    tree.append_child(tree.document(), root).unwrap();
    let mut nodes = vec![root];

    for _ in 0..rng.gen_range(1..40) {
        let containers: Vec<NodeId> = nodes
            .iter()
            .copied()
            .filter(|&n| tree.kind(n) == NodeKind::Element)
            .collect();
        let parent = containers[rng.gen_range(0..containers.len())];
        let node = if rng.gen_bool(0.5) {
            tree.create_text(WORDS[rng.gen_range(0..WORDS.len())])
        } else {
            tree.create_element(TAGS[rng.gen_range(0..TAGS.len())])
        };
        tree.append_child(parent, node).unwrap();
        nodes.push(node);
    }
    (tree, root, nodes)
}

fn random_position(rng: &mut StdRng, tree: &ContentTree, nodes: &[NodeId]) -> Position {
    let node = nodes[rng.gen_range(0..nodes.len())];
    let end = Position::end_offset(tree, node);
    Position::new(tree, node, rng.gen_range(0..=end + 2))
}

#[test]
fn test_normalize_is_idempotent_on_random_trees() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let (tree, _root, nodes) = random_tree(&mut rng);
        for _ in 0..20 {
            let position = random_position(&mut rng, &tree, &nodes);
            assert!(position.offset() <= Position::end_offset(&tree, position.node()));

            let once = position.normalize(&tree);
            assert_eq!(once.normalize(&tree), once);
            assert!(position.equal_to(&tree, &once));
            match tree.kind(once.node()) {
                NodeKind::Text | NodeKind::VoidElement => {}
                NodeKind::Element | NodeKind::Fragment => {
                    assert!(tree.children(once.node()).is_empty())
                }
            }
        }
    }
}

#[test]
fn test_compare_is_antisymmetric_and_ranges_are_ordered() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let (tree, _root, nodes) = random_tree(&mut rng);
        for _ in 0..20 {
            let a = random_position(&mut rng, &tree, &nodes);
            let b = random_position(&mut rng, &tree, &nodes);
            assert_eq!(a.compare(&tree, &b), b.compare(&tree, &a).reverse());
            assert_eq!(a.compare(&tree, &a), Ordering::Equal);

            let range = SelectionRange::new(&tree, a, b);
            assert!(!range.start().is_after(&tree, &range.end()));
            assert!(range.contains_position(&tree, &a));
            assert!(range.contains_position(&tree, &b));
        }
    }
}

#[test]
fn test_symbolic_anchors() {
    let (tree, root) = setup("<p>ab</p><img><p>cd</p>");
    let img = tree.children(root)[1];

    let before = Position::at(&tree, img, PositionType::Before).unwrap();
    assert_eq!((before.node(), before.offset()), (root, 1));
    let after = Position::at(&tree, img, PositionType::After).unwrap();
    assert_eq!((after.node(), after.offset()), (root, 2));
    assert!(after.is_after(&tree, &before));

    let end = Position::at(&tree, root, PositionType::End).unwrap();
    assert!(end.is_at_end());
    let cd = tree.last_leaf(root).unwrap();
    assert!(end.equal_to(&tree, &Position::new(&tree, cd, 2)));
}

#[test]
fn test_void_position_maps_onto_parent() {
    let (tree, root) = setup("a<br>b");
    let br = tree.children(root)[1];
    assert_eq!(Position::new(&tree, br, 0).to_dom_point(&tree), (root, 1));
    assert_eq!(Position::new(&tree, br, 1).to_dom_point(&tree), (root, 2));
}

#[test]
fn test_range_from_node_selects_it() {
    let (tree, root) = setup("<p>one</p><p>two</p>");
    let second = tree.children(root)[1];
    let range = SelectionRange::from_node(&tree, second).unwrap();
    assert!(range.contains_node(&tree, second));
    assert!(!range.contains_node(&tree, tree.children(root)[0]));
    assert!(!range.is_collapsed(&tree));

    let host = range.get_range(&tree);
    assert_eq!((host.start_container, host.start_offset), (root, 1));
    assert_eq!((host.end_container, host.end_offset), (root, 2));
}

#[test]
fn test_delete_across_blocks_keeps_both_blocks() {
    let (mut tree, root) = setup("<p>hello</p><p>big</p><p>world</p>");
    let hello = tree.first_leaf(root).unwrap();
    let world = tree.last_leaf(root).unwrap();
    let range = SelectionRange::new(
        &tree,
        Position::new(&tree, hello, 2),
        Position::new(&tree, world, 3),
    );
    let at = range.delete_contents(&mut tree).unwrap();
    assert_eq!(
        rich_editor_core::markup::serialize_children(&tree, root),
        "<p>he</p><p>ld</p>"
    );
    assert_eq!((at.node(), at.offset()), (hello, 2));
}

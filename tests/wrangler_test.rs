use phylomesa::{
    PreservePolicy, TREE_NAME_PREFIX, TranslationTable, Tree, TreeSummary, TreeWrangler,
};

fn named(newick: &str, name: &str) -> Tree {
    let mut tree: Tree = newick.parse().unwrap();
    tree.set_tree_name(name);
    tree
}

fn names(wrangler: &TreeWrangler) -> Vec<&str> {
    wrangler.iter().map(|tree| tree.tree_name()).collect()
}

#[test]
fn test_added_tree_has_living_leaves_and_dead_internals() {
    let mut tree = Tree::seeded();
    let root = tree.root();
    let (left, right) = tree.speciate(root);
    // Undo the kill done by speciate to show that adding marks internals.
    tree.make_alive(root);

    let mut wrangler = TreeWrangler::new();
    let index = wrangler.add_tree(tree);
    let tree = wrangler.get(index).unwrap();

    assert!(tree.is_node_alive(left));
    assert!(tree.is_node_alive(right));
    assert!(tree.is_node_dead(root));
    for node_id in tree.node_ids_preorder() {
        assert_eq!(tree.is_node_alive(node_id), tree.is_leaf(node_id));
    }
}

#[test]
fn test_added_tree_keeps_extinct_tips() {
    let mut tree: Tree = "((A,B),C);".parse().unwrap();
    let a = tree.node_id_by_name("A").unwrap();
    tree.kill_leaf(a, PreservePolicy::None);

    let mut wrangler = TreeWrangler::new();
    let _ = wrangler.add_tree(tree);
    let tree = wrangler.active_tree().unwrap();
    assert!(tree.is_node_dead(a));
    assert!(tree.is_tree_paleo());
    assert_eq!(tree.count_alive_leaves(), 2);
}

#[test]
fn test_unnamed_trees_get_generated_names() {
    let mut wrangler = TreeWrangler::new();
    let _ = wrangler.seed_tree();
    let _ = wrangler.add_tree(named("(A,B);", "primates"));
    let _ = wrangler.add_tree("(C,D);".parse().unwrap());
    assert_eq!(names(&wrangler), vec!["tree_1", "primates", "tree_3"]);

    let _ = wrangler.delete_tree(0);
    let _ = wrangler.seed_tree();
    assert_eq!(names(&wrangler), vec!["primates", "tree_3", "tree_4"]);
    assert!(names(&wrangler).iter().all(|name| !name.is_empty()));
    assert!(wrangler.get(1).unwrap().tree_name().starts_with(TREE_NAME_PREFIX));
}

#[test]
fn test_active_index_follows_deletions() {
    let mut wrangler = TreeWrangler::new();
    assert_eq!(wrangler.active_index(), None);
    assert!(wrangler.active_tree().is_none());

    for name in ["a", "b", "c"] {
        let _ = wrangler.add_tree(named("(A,B);", name));
    }
    assert_eq!(wrangler.active_index(), Some(0));

    wrangler.set_active(2);
    let removed = wrangler.delete_tree(0);
    assert_eq!(removed.tree_name(), "a");
    assert_eq!(wrangler.active_index(), Some(1));
    assert_eq!(wrangler.active_tree().unwrap().tree_name(), "c");

    // Deleting the active last tree moves the selection to the new last.
    let _ = wrangler.delete_tree(1);
    assert_eq!(wrangler.active_index(), Some(0));
    assert_eq!(wrangler.active_tree().unwrap().tree_name(), "b");

    let _ = wrangler.delete_tree(0);
    assert!(wrangler.is_empty());
    assert_eq!(wrangler.active_index(), None);

    let _ = wrangler.add_tree(named("(A,B);", "d"));
    assert_eq!(wrangler.active_index(), Some(0));
}

#[test]
fn test_deletion_scenarios() {
    let test_cases = vec![
        ("delete before active", 2, 0, Some(1), "c"),
        ("delete active in the middle", 1, 1, Some(1), "c"),
        ("delete active first", 0, 0, Some(0), "b"),
        ("delete after active", 0, 2, Some(0), "a"),
        ("delete active last", 2, 2, Some(1), "b"),
    ];
    for (name, active, deleted, expected_index, expected_name) in test_cases {
        println!("Testing: {name}");
        let mut wrangler = TreeWrangler::new();
        for tree_name in ["a", "b", "c"] {
            let _ = wrangler.add_tree(named("(A,B);", tree_name));
        }
        wrangler.set_active(active);
        let _ = wrangler.delete_tree(deleted);
        assert_eq!(wrangler.len(), 2);
        assert_eq!(wrangler.active_index(), expected_index);
        assert_eq!(wrangler.active_tree().unwrap().tree_name(), expected_name);
    }

    // Deleting an active tree other than the first selects the new last tree.
    let mut wrangler = TreeWrangler::new();
    for tree_name in ["a", "b", "c", "d"] {
        let _ = wrangler.add_tree(named("(A,B);", tree_name));
    }
    wrangler.set_active(1);
    let _ = wrangler.delete_tree(1);
    assert_eq!(wrangler.active_index(), Some(2));
    assert_eq!(wrangler.active_tree().unwrap().tree_name(), "d");

    wrangler.set_active(0);
    let _ = wrangler.delete_tree(0);
    assert_eq!(wrangler.active_index(), Some(0));
    assert_eq!(wrangler.active_tree().unwrap().tree_name(), "c");
}

#[test]
#[should_panic]
fn test_set_active_out_of_range_panics() {
    let mut wrangler = TreeWrangler::new();
    let _ = wrangler.seed_tree();
    wrangler.set_active(1);
}

#[test]
fn test_duplicate_active_tree_is_deep() {
    let mut wrangler = TreeWrangler::new();
    assert_eq!(wrangler.duplicate_active_tree(), None);

    let _ = wrangler.add_tree(named("((A:1,B:1):1,C:2);", "original"));
    let copy_index = wrangler.duplicate_active_tree().unwrap();
    assert_eq!(copy_index, 1);
    assert_eq!(wrangler.active_index(), Some(0));
    assert_eq!(wrangler.get(1).unwrap().tree_name(), "tree_2");

    let copy = wrangler.get_mut(copy_index).unwrap();
    let a = copy.node_id_by_name("A").unwrap();
    copy.set_node_name(a, "Z");
    copy.set_branch_length(a, 5e0);

    let original = wrangler.get(0).unwrap();
    assert_eq!(original.leaf_names(), vec!["A", "B", "C"]);
    assert_eq!(original.phylo_age(), 2e0);
    assert_eq!(wrangler.get(1).unwrap().leaf_names(), vec!["Z", "B", "C"]);
}

#[test]
fn test_translation_table_spans_all_trees() {
    let mut wrangler = TreeWrangler::new();
    let _ = wrangler.add_tree("(Pan,Homo);".parse().unwrap());
    let _ = wrangler.add_tree("(Gorilla,(Homo,Pongo));".parse().unwrap());

    let mut table = TranslationTable::new();
    wrangler.calc_translation_table(&mut table);
    assert_eq!(table.names(), vec!["Gorilla", "Homo", "Pan", "Pongo"]);
    assert_eq!(table.get_name(3), Ok("Pan"));
}

#[test]
fn test_summaries_and_report() {
    let mut wrangler = TreeWrangler::new();
    let _ = wrangler.add_tree(named("((A,B),C);", "first"));
    let _ = wrangler.seed_tree();
    wrangler.set_active(1);

    let summaries = wrangler.summaries();
    assert_eq!(
        summaries,
        vec![
            ("first", TreeSummary { nodes: 5, leaves: 3, living_leaves: 3 }),
            ("tree_2", TreeSummary { nodes: 1, leaves: 1, living_leaves: 1 }),
        ]
    );

    let report = wrangler.report();
    println!("{report}");
    assert_eq!(
        report,
        "2 trees\n  1. first: 5 nodes, 3 leaves (3 living)\n* 2. tree_2: 1 nodes, 1 leaves (1 living)\n"
    );
}

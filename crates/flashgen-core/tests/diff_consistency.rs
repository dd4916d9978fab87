use flashgen_core::ConfigTree;

fn sample() -> ConfigTree {
    let mut tree = ConfigTree::new();
    tree.set("cache.memorySizeMB", 17).expect("set");
    tree.set("cache.flashSizeMB", 950).expect("set");
    tree.set("log.percentLog", 50.0).expect("set");
    tree.set("trace.format", "Zipf").expect("set");
    tree
}

#[test]
fn diff_of_identical_trees_is_empty() {
    let tree = sample();
    let diff = tree.diff(&tree.clone());
    assert!(diff.is_empty());
}

#[test]
fn presence_diff_is_commutative() {
    let a = sample();
    let mut b = sample();
    b.set("sets.setCapacity", 4096).expect("set");
    b.delete("log.percentLog").expect("delete");

    let forward = a.diff(&b);
    let backward = b.diff(&a);
    assert_eq!(forward.presence, backward.presence);
    assert!(forward.presence.contains("sets"));
    assert!(forward.presence.contains("log.percentLog"));
}

#[test]
fn value_diff_reports_dotted_keys() {
    let a = sample();
    let mut b = sample();
    b.set("cache.flashSizeMB", 900).expect("set");
    b.set("trace.format", "Churn").expect("set");

    let diff = a.diff(&b);
    assert!(diff.presence.is_empty());
    let values: Vec<_> = diff.values.iter().cloned().collect();
    assert_eq!(values, vec!["cache.flashSizeMB", "trace.format"]);
}

#[test]
fn nested_presence_changes_carry_their_prefix() {
    let a = sample();
    let mut b = sample();
    b.set("log.readmit", 2).expect("set");

    let diff = a.diff(&b);
    assert!(diff.presence.contains("log.readmit"));
    assert!(!diff.presence.contains("log"));
}

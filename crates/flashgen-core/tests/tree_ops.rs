use flashgen_core::{ConfigTree, Entry, GenError, Scalar};

#[test]
fn dotted_set_matches_stepwise_reads() {
    let mut tree = ConfigTree::new();
    tree.set("cache.log.percentLog", 50.0).expect("set");

    let cache = tree.get("cache").and_then(Entry::as_node).expect("cache node");
    let log = cache.get("log").and_then(Entry::as_node).expect("log node");
    let leaf = log.scalar("percentLog").expect("leaf");
    assert_eq!(leaf, &Scalar::Float(50.0));
    assert_eq!(tree.scalar("cache.log.percentLog"), Some(&Scalar::Float(50.0)));
}

#[test]
fn root_leaf_assignment_is_rejected() {
    let mut tree = ConfigTree::new();
    let err = tree.set("slowWarmup", 1).expect_err("root leaf");
    assert!(matches!(err, GenError::Structure(_)));
    assert!(tree.is_empty());
}

#[test]
fn descending_through_a_leaf_is_rejected() {
    let mut tree = ConfigTree::new();
    tree.set("cache.memorySizeMB", 17).expect("set");
    let err = tree
        .set("cache.memorySizeMB.nested", 1)
        .expect_err("leaf descent");
    assert!(matches!(err, GenError::Structure(_)));
}

#[test]
fn set_overwrites_existing_leaf() {
    let mut tree = ConfigTree::new();
    tree.set("cache.memorySizeMB", 17).expect("set");
    tree.set("cache.memorySizeMB", 34).expect("overwrite");
    assert_eq!(tree.scalar("cache.memorySizeMB"), Some(&Scalar::int(34)));
}

#[test]
fn contains_never_creates_nodes() {
    let mut tree = ConfigTree::new();
    tree.set("cache.memorySizeMB", 17).expect("set");
    let before = tree.clone();

    assert!(tree.contains("cache"));
    assert!(tree.contains("cache.memorySizeMB"));
    assert!(!tree.contains("log"));
    assert!(!tree.contains("log.percentLog"));
    assert!(!tree.contains("cache.memorySizeMB.deeper"));

    assert_eq!(tree, before);
}

#[test]
fn get_never_creates_nodes() {
    let mut tree = ConfigTree::new();
    tree.set("cache.memorySizeMB", 17).expect("set");
    let before = tree.clone();

    assert!(tree.get("log.percentLog").is_none());
    assert_eq!(tree, before);
}

#[test]
fn delete_removes_a_leaf() {
    let mut tree = ConfigTree::new();
    tree.set("log.percentLog", 50.0).expect("set");
    tree.set("log.readmit", 1).expect("set");
    tree.delete("log.readmit").expect("delete");
    assert!(!tree.contains("log.readmit"));
    assert!(tree.contains("log.percentLog"));
}

#[test]
fn delete_of_absent_path_fails() {
    let mut tree = ConfigTree::new();
    tree.set("log.percentLog", 50.0).expect("set");

    let err = tree.delete("log.readmit").expect_err("absent key");
    assert!(matches!(err, GenError::Missing(_)));
    let err = tree.delete("sets.setCapacity").expect_err("absent scope");
    assert!(matches!(err, GenError::Missing(_)));
}

#[test]
fn clones_share_no_substructure() {
    let mut original = ConfigTree::new();
    original.set("cache.memorySizeMB", 17).expect("set");
    let mut copy = original.clone();
    copy.set("cache.memorySizeMB", 34).expect("set copy");
    copy.set("cache.flashSizeMB", 950).expect("set copy");

    assert_eq!(original.scalar("cache.memorySizeMB"), Some(&Scalar::int(17)));
    assert!(!original.contains("cache.flashSizeMB"));
}

#[test]
fn wide_and_plain_integers_compare_equal() {
    assert_eq!(Scalar::wide_int(256), Scalar::int(256));
    assert_ne!(Scalar::int(256), Scalar::Float(256.0));

    let mut a = ConfigTree::new();
    a.set("log.flushBlockSizeKB", Scalar::wide_int(256)).expect("set");
    let mut b = ConfigTree::new();
    b.set("log.flushBlockSizeKB", Scalar::int(256)).expect("set");
    assert_eq!(a, b);
}

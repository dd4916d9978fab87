use flashgen_core::{ConfigTree, GenError, Scalar};
use proptest::prelude::*;

fn sample() -> ConfigTree {
    let mut tree = ConfigTree::new();
    tree.set("cache.memorySizeMB", 17).expect("set");
    tree.set("cache.flashSizeMB", 950).expect("set");
    tree.set("log.percentLog", 50.0).expect("set");
    tree.set("log.flushBlockSizeKB", Scalar::wide_int(256)).expect("set");
    tree.set("trace.format", "Zipf").expect("set");
    tree
}

#[test]
fn render_is_deterministic_and_sorted() {
    let rendered = sample().render();
    let expected = "\
cache = {
  flashSizeMB = 950;
  memorySizeMB = 17;
};
log = {
  flushBlockSizeKB = 256L;
  percentLog = 50.0;
};
trace = {
  format = \"Zipf\";
};
";
    assert_eq!(rendered, expected);
}

#[test]
fn parse_of_rendered_text_rebuilds_the_tree() {
    let tree = sample();
    let reparsed = ConfigTree::parse(&tree.render()).expect("parse");
    assert_eq!(reparsed, tree);
    assert!(tree.diff(&reparsed).is_empty());
}

#[test]
fn wide_integer_suffix_survives_the_round_trip() {
    let tree = sample();
    let rendered = tree.render();
    assert!(rendered.contains("flushBlockSizeKB = 256L;"));
    let reparsed = ConfigTree::parse(&rendered).expect("parse");
    assert_eq!(reparsed.render(), rendered);
}

#[test]
fn integral_floats_keep_their_decimal_point() {
    let mut tree = ConfigTree::new();
    tree.set("log.percentLog", 100.0).expect("set");
    let rendered = tree.render();
    assert!(rendered.contains("percentLog = 100.0;"));
    let reparsed = ConfigTree::parse(&rendered).expect("parse");
    assert_eq!(reparsed.scalar("log.percentLog"), Some(&Scalar::Float(100.0)));
}

#[test]
fn booleans_parse_in_both_spellings() {
    let tree = ConfigTree::parse("log = {\n  adjust = true;\n  legacy = False;\n};\n")
        .expect("parse");
    assert_eq!(tree.scalar("log.adjust"), Some(&Scalar::Bool(true)));
    assert_eq!(tree.scalar("log.legacy"), Some(&Scalar::Bool(false)));
}

#[test]
fn colon_aggregate_spelling_is_normalized() {
    let text = "stats : \n{\n  collectionIntervalPower = 6;\n};\n";
    let tree = ConfigTree::parse(text).expect("parse");
    assert_eq!(
        tree.scalar("stats.collectionIntervalPower"),
        Some(&Scalar::int(6))
    );
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let text = "\
# template header
cache = {
  memorySizeMB = 17; # inline note

};
";
    let tree = ConfigTree::parse(text).expect("parse");
    assert_eq!(tree.scalar("cache.memorySizeMB"), Some(&Scalar::int(17)));
}

#[test]
fn malformed_lines_abort_the_parse() {
    let missing_terminator = "cache = {\n  memorySizeMB = 17\n};\n";
    assert!(matches!(
        ConfigTree::parse(missing_terminator),
        Err(GenError::Parse(_))
    ));

    let missing_assignment = "cache = {\n  memorySizeMB;\n};\n";
    assert!(matches!(
        ConfigTree::parse(missing_assignment),
        Err(GenError::Parse(_))
    ));

    let bad_literal = "cache = {\n  memorySizeMB = seventeen;\n};\n";
    assert!(matches!(
        ConfigTree::parse(bad_literal),
        Err(GenError::Parse(_))
    ));

    let underflow = "};\n";
    assert!(matches!(ConfigTree::parse(underflow), Err(GenError::Parse(_))));

    let unterminated = "cache = {\n  memorySizeMB = 17;\n";
    assert!(matches!(
        ConfigTree::parse(unterminated),
        Err(GenError::Parse(_))
    ));
}

#[test]
fn top_level_leaves_violate_the_root_invariant() {
    let err = ConfigTree::parse("memorySizeMB = 17;\n").expect_err("root leaf");
    assert!(matches!(err, GenError::Structure(_)));
}

#[test]
fn files_round_trip_without_staging_leftovers() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("template.cfg");
    let tree = sample();
    tree.write_file(&path).expect("write");

    let reloaded = ConfigTree::from_file(&path).expect("read");
    assert_eq!(reloaded, tree);

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

fn scalar_strategy() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        any::<i64>().prop_map(Scalar::int),
        any::<i64>().prop_map(Scalar::wide_int),
        any::<bool>().prop_map(Scalar::Bool),
        any::<f64>()
            .prop_filter("finite floats only", |value| value.is_finite())
            .prop_map(Scalar::Float),
        "[a-zA-Z0-9_./ -]{0,12}".prop_map(Scalar::Str),
    ]
}

fn path_strategy() -> impl Strategy<Value = String> {
    // Fixed depth keeps generated leaf paths from colliding with
    // generated intermediate scopes.
    ("[a-f]{1,4}", "[a-f]{1,4}", "[a-f]{1,4}")
        .prop_map(|(a, b, c)| format!("{a}.{b}.{c}"))
}

proptest! {
    #[test]
    fn set_built_trees_round_trip(entries in proptest::collection::vec((path_strategy(), scalar_strategy()), 1..24)) {
        let mut tree = ConfigTree::new();
        for (path, scalar) in entries {
            tree.set(&path, scalar).expect("set");
        }
        let reparsed = ConfigTree::parse(&tree.render()).expect("parse");
        prop_assert_eq!(&reparsed, &tree);
        prop_assert!(tree.diff(&reparsed).is_empty());
    }
}

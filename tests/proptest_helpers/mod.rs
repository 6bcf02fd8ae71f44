#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Any finite or infinite float, rendered the way annotation tools write them.
pub fn arb_coord() -> BoxedStrategy<String> {
    prop_oneof![
        (-2.0f64..3.0).prop_map(|v| format!("{v}")),
        (-2.0f64..3.0).prop_map(|v| format!("{v:.6}")),
        Just("inf".to_string()),
        Just("-inf".to_string()),
        Just("1e-9".to_string()),
    ]
    .boxed()
}

/// A class id token: integers, negative integers and float-formatted ids.
pub fn arb_class_token() -> BoxedStrategy<String> {
    prop_oneof![
        (0u32..80).prop_map(|v| v.to_string()),
        (-5i32..0).prop_map(|v| v.to_string()),
        (0.0f64..10.0).prop_map(|v| format!("{v:.1}")),
    ]
    .boxed()
}

/// A syntactically valid 5-token label row.
pub fn arb_valid_line() -> BoxedStrategy<String> {
    (
        arb_class_token(),
        arb_coord(),
        arb_coord(),
        arb_coord(),
        arb_coord(),
    )
        .prop_map(|(c, x, y, w, h)| format!("{c} {x} {y} {w} {h}"))
        .boxed()
}

/// A row with the wrong number of numeric tokens.
pub fn arb_wrong_arity_line() -> BoxedStrategy<String> {
    prop_oneof![
        prop::collection::vec(arb_coord(), 1..5),
        prop::collection::vec(arb_coord(), 6..10),
    ]
    .prop_map(|tokens| tokens.join(" "))
    .boxed()
}

/// A label file body mixing valid and malformed rows.
pub fn arb_label_file() -> BoxedStrategy<Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            3 => arb_valid_line(),
            1 => arb_wrong_arity_line(),
        ],
        0..12,
    )
    .boxed()
}

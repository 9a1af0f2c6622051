//! Integration tests for the experiment framework.

mod common;

use common::{make_engine, make_experiment_config, EXPERIMENT_1_ID, USER_1, USER_2};
use echotune_engine::experiments::ExperimentStatus;

// =============================================================================
// Assignment
// =============================================================================

#[test]
fn test_assignment_is_idempotent() {
    let engine = make_engine();
    engine
        .experiments()
        .create_experiment(make_experiment_config(EXPERIMENT_1_ID));

    let first = engine
        .experiments()
        .assign_variant(USER_1, EXPERIMENT_1_ID)
        .unwrap();
    let second = engine
        .experiments()
        .assign_variant(USER_1, EXPERIMENT_1_ID)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_distinct_users_spread_over_variants() {
    let engine = make_engine();
    engine
        .experiments()
        .create_experiment(make_experiment_config(EXPERIMENT_1_ID));

    let mut control = 0;
    let total = 10_000;
    for i in 0..total {
        let assignment = engine
            .experiments()
            .assign_variant(&format!("synthetic-user-{}", i), EXPERIMENT_1_ID)
            .unwrap();
        if assignment.variant_id == "control" {
            control += 1;
        }
    }
    let ratio = control as f64 / total as f64;
    assert!(
        (0.45..=0.55).contains(&ratio),
        "control ratio {} outside tolerance",
        ratio
    );
    assert_eq!(engine.experiments().user_count(EXPERIMENT_1_ID), total);
}

#[test]
fn test_paused_experiment_stops_assigning() {
    let engine = make_engine();
    engine
        .experiments()
        .create_experiment(make_experiment_config(EXPERIMENT_1_ID));
    engine
        .experiments()
        .assign_variant(USER_1, EXPERIMENT_1_ID)
        .unwrap();
    engine
        .experiments()
        .set_status(EXPERIMENT_1_ID, ExperimentStatus::Paused);

    assert!(engine
        .experiments()
        .assign_variant(USER_2, EXPERIMENT_1_ID)
        .is_none());
    // Existing assignment survives the status change.
    assert!(engine
        .experiments()
        .get_assignment(USER_1, EXPERIMENT_1_ID)
        .is_some());
}

// =============================================================================
// Metrics + results
// =============================================================================

#[test]
fn test_results_expose_descriptive_stats() {
    let engine = make_engine();
    engine
        .experiments()
        .create_experiment(make_experiment_config(EXPERIMENT_1_ID));
    for value in [1.0, 2.0, 3.0, 4.0] {
        engine
            .experiments()
            .record_metric(EXPERIMENT_1_ID, "control", "ctr", value, Some(USER_1));
    }

    let results = engine.experiments().get_results(EXPERIMENT_1_ID).unwrap();
    let stats = &results.metrics["control"]["ctr"];
    assert_eq!(stats.count, 4);
    assert!((stats.mean - 2.5).abs() < 1e-9);
    assert!((stats.median - 2.5).abs() < 1e-9);
    assert!((stats.std_dev - 1.118).abs() < 1e-3);
}

#[test]
fn test_results_summary_counts_assigned_users() {
    let engine = make_engine();
    engine
        .experiments()
        .create_experiment(make_experiment_config(EXPERIMENT_1_ID));
    engine
        .experiments()
        .assign_variant(USER_1, EXPERIMENT_1_ID)
        .unwrap();
    engine
        .experiments()
        .assign_variant(USER_2, EXPERIMENT_1_ID)
        .unwrap();

    let results = engine.experiments().get_results(EXPERIMENT_1_ID).unwrap();
    assert_eq!(results.summary.total_users, 2);
    assert!(results.summary.elapsed_days >= 0);
}

#[test]
fn test_results_for_unknown_experiment_is_none() {
    let engine = make_engine();
    assert!(engine.experiments().get_results("ghost").is_none());
}

#[test]
fn test_metric_against_unknown_experiment_is_silent_noop() {
    let engine = make_engine();
    engine
        .experiments()
        .record_metric("ghost", "control", "ctr", 1.0, None);
    assert!(engine.experiments().get_results("ghost").is_none());
}

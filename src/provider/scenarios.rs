//! End-to-end runs of both providers against an in-memory filer

use super::reconciler;
use declarative::{
    AutoConfirm, AutoDecline, ExecuteOptions, NoProgress, PendingAction, Reconciler,
    ResourceDeclaration, RunReport, Value,
};
use filerkit::backend::memory::{MemoryBackend, VolumeRecord};
use filerkit::{Call, Client, ObjectKind, RetryConfig};
use std::sync::Arc;

fn setup() -> (MemoryBackend, Reconciler) {
    let filer = MemoryBackend::new();
    let retry = RetryConfig {
        max_attempts: 1,
        ..Default::default()
    };
    let client = Client::with_backend(Box::new(filer.clone())).with_retry(retry);
    (filer, reconciler(Arc::new(client)))
}

fn run(reconciler: &Reconciler, kind: &str, declarations: &[ResourceDeclaration]) -> RunReport {
    reconciler
        .run(
            kind,
            declarations,
            &ExecuteOptions::default(),
            &mut NoProgress,
            &mut AutoConfirm,
        )
        .unwrap()
}

fn qtree(name: &str, volume: &str) -> ResourceDeclaration {
    ResourceDeclaration::new("qtree", name).with_parameter("volume", volume)
}

fn volume(name: &str) -> ResourceDeclaration {
    ResourceDeclaration::new("volume", name)
        .with_parameter("aggregate", "aggr0")
        .with_property("initsize", "20g")
        .with_property("snapreserve", 20_i64)
}

#[test]
fn test_volume_then_qtrees_converge() {
    let (filer, reconciler) = setup();
    assert_eq!(reconciler.kinds(), ["volume", "qtree"]);

    let volumes = [volume("vol1")];
    let qtrees = [qtree("q1", "vol1"), qtree("q2", "vol1")];

    assert_eq!(run(&reconciler, "volume", &volumes).summary.created, 1);
    assert_eq!(run(&reconciler, "qtree", &qtrees).summary.created, 2);

    let state = filer.state();
    assert_eq!(state.volumes["vol1"].size.as_deref(), Some("20g"));
    assert_eq!(state.qtrees.len(), 2);

    filer.clear_calls();
    let again = run(&reconciler, "volume", &volumes);
    assert_eq!(again.summary.total_changes(), 0);
    assert!(again.plan.entries[0].drift.is_empty());
    let again = run(&reconciler, "qtree", &qtrees);
    assert_eq!(again.summary.no_change, 2);
    assert!(filer.mutations().is_empty());
}

#[test]
fn test_absent_qtree_is_deleted_by_path() {
    let (filer, reconciler) = setup();
    filer.add_volume("vol1", VolumeRecord::new("aggr0"));
    filer.add_qtree("vol1", "old");

    let declarations = [ResourceDeclaration::new("qtree", "old").absent()];
    let report = run(&reconciler, "qtree", &declarations);

    assert_eq!(report.plan.entries[0].action, PendingAction::Destroy);
    assert_eq!(report.summary.removed, 1);
    assert_eq!(
        filer.mutations(),
        [Call::Delete(ObjectKind::Qtree, "/vol/vol1/old".to_string())]
    );
}

#[test]
fn test_absent_and_missing_is_a_no_op() {
    let (filer, reconciler) = setup();
    let report = run(
        &reconciler,
        "qtree",
        &[ResourceDeclaration::new("qtree", "gone").absent()],
    );
    assert_eq!(report.summary.no_change, 1);
    assert!(filer.mutations().is_empty());
}

#[test]
fn test_failed_create_does_not_stop_the_batch() {
    let (filer, reconciler) = setup();
    filer.add_volume("vol1", VolumeRecord::new("aggr0"));
    filer.fail_create(ObjectKind::Qtree, "q2");

    let report = run(
        &reconciler,
        "qtree",
        &[qtree("q1", "vol1"), qtree("q2", "vol1"), qtree("q3", "vol1")],
    );

    assert_eq!(report.summary.created, 2);
    assert_eq!(report.summary.failed, 1);
    let names: Vec<String> = filer.state().qtrees.into_iter().map(|q| q.name).collect();
    assert_eq!(names, ["q1", "q3"]);
}

#[test]
fn test_qtree_in_missing_volume_fails() {
    let (filer, reconciler) = setup();
    let report = run(&reconciler, "qtree", &[qtree("q1", "nope")]);
    assert_eq!(report.summary.failed, 1);
    assert!(filer.state().qtrees.is_empty());
}

#[test]
fn test_invalid_declaration_is_rejected_without_calls() {
    let (filer, reconciler) = setup();
    let declarations = [
        volume("vol1"),
        volume("vol2").with_property("snapreserve", "150"),
    ];
    let report = run(&reconciler, "volume", &declarations);

    assert_eq!(report.plan.rejected.len(), 1);
    assert_eq!(report.plan.rejected[0].identity, "vol2");
    assert_eq!(report.summary.created, 1);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(filer.mutations().len(), 1);
}

#[test]
fn test_dry_run_and_declined_commit_nothing() {
    let (filer, reconciler) = setup();
    let declarations = [volume("vol1")];

    let dry_run = ExecuteOptions {
        dry_run: true,
        ..Default::default()
    };
    let report = reconciler
        .run("volume", &declarations, &dry_run, &mut NoProgress, &mut AutoConfirm)
        .unwrap();
    assert_eq!(report.summary.skipped, 1);

    let report = reconciler
        .run(
            "volume",
            &declarations,
            &ExecuteOptions::default(),
            &mut NoProgress,
            &mut AutoDecline,
        )
        .unwrap();
    assert_eq!(report.summary.skipped, 1);
    assert!(filer.mutations().is_empty());
}

#[test]
fn test_drift_is_reported_not_corrected() {
    let (filer, reconciler) = setup();
    filer.add_volume(
        "vol1",
        VolumeRecord::new("aggr0")
            .with_option("nosnap", "on")
            .with_schedule("hours", "6")
            .with_schedule("minutes", " "),
    );

    let declaration = ResourceDeclaration::new("volume", "vol1")
        .with_parameter("aggregate", "aggr0")
        .with_property("options", Value::map([("nosnap", "off")]))
        .with_property(
            "snapschedule",
            Value::map([("hours", "6"), ("minutes", "0")]),
        );
    let report = run(&reconciler, "volume", &[declaration]);

    let entry = &report.plan.entries[0];
    assert_eq!(entry.action, PendingAction::NoOp);
    let drifted: Vec<&str> = entry.drift.iter().map(|d| d.property.as_str()).collect();
    assert_eq!(drifted, ["options"]);
    assert!(filer.mutations().is_empty());
}

#[test]
fn test_discovery_failure_aborts_the_kind() {
    let (filer, reconciler) = setup();
    filer.fail_list(ObjectKind::Qtree);

    let err = reconciler
        .run(
            "qtree",
            &[qtree("q1", "vol1")],
            &ExecuteOptions::default(),
            &mut NoProgress,
            &mut AutoConfirm,
        )
        .unwrap_err();
    assert!(err.to_string().contains("failed to discover qtree instances"));
    assert!(filer.mutations().is_empty());

    // Other kinds are unaffected
    assert_eq!(run(&reconciler, "volume", &[volume("vol1")]).summary.created, 1);
}

#[test]
fn test_failed_delete_keeps_the_volume() {
    let (filer, reconciler) = setup();
    filer.add_volume("vol1", VolumeRecord::new("aggr0"));
    filer.fail_delete(ObjectKind::Volume, "vol1");

    let report = run(
        &reconciler,
        "volume",
        &[ResourceDeclaration::new("volume", "vol1").absent()],
    );
    assert_eq!(report.summary.failed, 1);
    assert!(filer.state().volumes.contains_key("vol1"));
}

//! Task store integration tests — round-trips, deletes, quarantine.

use minuted::storage::TaskStore;
use minuted::tasks::EnhancedTask;

fn sample_task(name: &str) -> EnhancedTask {
    EnhancedTask {
        task_name: name.to_string(),
        owner: "Mike Chen".to_string(),
        due_date: "Friday".to_string(),
        priority: "Medium".to_string(),
        confidence_score: 0.7,
        difficulty: "Medium".to_string(),
        category: "General".to_string(),
        predicted_deadline: Some("2026-08-07".to_string()),
        has_dependency: false,
        dependency_info: None,
        risk_level: "Low".to_string(),
        risk_description: None,
        progress_estimate: "Not Started".to_string(),
    }
}

fn temp_store() -> (tempfile::TempDir, TaskStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
    (dir, store)
}

#[test]
fn batch_round_trip_most_recent_first() {
    let (_dir, store) = temp_store();
    let batch: Vec<EnhancedTask> = (1..=5)
        .map(|i| sample_task(&format!("Task number {i}")))
        .collect();

    let (stored, failed) = store.create_batch(&batch, "note-1");
    assert_eq!((stored, failed), (5, 0));

    let tasks = store.all_tasks();
    assert_eq!(tasks.len(), 5);
    assert_eq!(tasks[0].task_name, "Task number 5", "newest first");
    assert_eq!(tasks[4].task_name, "Task number 1");

    let ids: Vec<u64> = tasks.iter().rev().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5], "contiguous ids on a fresh store");
}

#[test]
fn delete_removes_exactly_one() {
    let (_dir, store) = temp_store();
    let id_one = store.create(&sample_task("Keep this one"), "n1").unwrap();
    let id_two = store.create(&sample_task("Remove this one"), "n1").unwrap();

    assert!(store.delete(id_two).unwrap());
    assert_eq!(store.count(), 1);
    assert_eq!(store.all_tasks()[0].id, id_one);
}

#[test]
fn delete_unknown_id_is_a_negative_result_not_an_error() {
    let (_dir, store) = temp_store();
    store.create(&sample_task("The only task"), "n1").unwrap();

    let deleted = store.delete(42).unwrap();
    assert!(!deleted);
    assert_eq!(store.count(), 1);
}

#[test]
fn ids_stay_monotonic_across_deletions() {
    let (_dir, store) = temp_store();
    for i in 1..=3 {
        store.create(&sample_task(&format!("Task number {i}")), "n1").unwrap();
    }
    assert!(store.delete(3).unwrap());
    assert!(store.delete(2).unwrap());

    let next = store.create(&sample_task("A later task"), "n1").unwrap();
    assert_eq!(next, 4, "deleted ids must not come back");
}

#[test]
fn clear_then_analytics_is_all_zeroes() {
    let (_dir, store) = temp_store();
    store.create_batch(
        &[sample_task("One task here"), sample_task("Two tasks here")],
        "n1",
    );

    store.clear().unwrap();

    let analytics = store.analytics();
    assert_eq!(analytics.total_tasks, 0);
    assert!(analytics.by_priority.is_empty());
    assert!(analytics.by_category.is_empty());
    assert_eq!(analytics.avg_confidence, 0.0);
}

#[test]
fn analytics_aggregates_by_label() {
    let (_dir, store) = temp_store();
    let mut high = sample_task("Urgent one");
    high.priority = "High".to_string();
    high.risk_level = "High".to_string();
    high.has_dependency = true;
    store.create(&high, "n1").unwrap();
    store.create(&sample_task("Calm one"), "n1").unwrap();

    let analytics = store.analytics();
    assert_eq!(analytics.total_tasks, 2);
    assert_eq!(analytics.by_priority["High"], 1);
    assert_eq!(analytics.by_priority["Medium"], 1);
    assert_eq!(analytics.high_risk_count, 1);
    assert_eq!(analytics.with_dependencies, 1);
    assert!((analytics.avg_confidence - 0.7).abs() < 1e-9);
}

#[test]
fn timeline_sorts_by_predicted_date() {
    let (_dir, store) = temp_store();
    let mut later = sample_task("Later task");
    later.predicted_deadline = Some("2026-09-20".to_string());
    let mut sooner = sample_task("Sooner task");
    sooner.predicted_deadline = Some("2026-08-10".to_string());
    let mut undated = sample_task("Undated task");
    undated.predicted_deadline = None;

    store.create_batch(&[later, sooner, undated], "n1");

    let timeline = store.timeline();
    assert_eq!(timeline.total_tasks, 2);
    assert_eq!(timeline.timeline[0].task, "Sooner task");
    assert_eq!(timeline.timeline[1].task, "Later task");
}

#[test]
fn corrupt_file_is_quarantined_and_store_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(&path, "[{\"id\": 1, truncated garbage").unwrap();

    let store = TaskStore::open(&path).unwrap();
    assert_eq!(store.count(), 0, "corrupt content reads as empty");

    let quarantined: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.contains(".corrupt-"))
        .collect();
    assert_eq!(quarantined.len(), 1, "original bytes are preserved aside");

    store.create(&sample_task("Fresh start"), "n1").unwrap();
    assert_eq!(store.count(), 1);
}

#[test]
fn on_disk_format_is_a_json_array() {
    let (_dir, store) = temp_store();
    store.create(&sample_task("Array check"), "n1").unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let array = value.as_array().expect("top-level JSON array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["id"], 1);
    assert_eq!(array[0]["source_note_id"], "n1");
    assert_eq!(array[0]["status"], "pending");
}

#[test]
fn note_filter_returns_only_that_notes_tasks() {
    let (_dir, store) = temp_store();
    store.create(&sample_task("From the standup"), "standup").unwrap();
    store.create(&sample_task("From the retro"), "retro").unwrap();
    store.create(&sample_task("Standup follow-up"), "standup").unwrap();

    let tasks = store.tasks_for_note("standup");
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.source_note_id == "standup"));
}

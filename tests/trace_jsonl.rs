use compass_harness::config::AssessmentConfig;
use compass_harness::{
    aggregate, load_config_from_path, generate_scenarios_seeded, JsonlTraceSink, RawResponse,
    ScoringEvent, ScoringObserver,
};
use tempfile::tempdir;

#[derive(Debug, serde::Deserialize)]
struct TraceRow {
    sequence: usize,
    run_id: Option<String>,
    event: serde_json::Value,
}

fn shipped_config() -> AssessmentConfig {
    load_config_from_path(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("config/assessments/scholarly-identity.json"),
    )
    .unwrap()
}

#[test]
fn jsonl_trace_sink_writes_events_and_flushes_on_join() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");

    let (sink, worker) = JsonlTraceSink::new(&path).unwrap();
    let sink = sink.with_run_id("run-1");
    sink.on_event(&ScoringEvent::Coordinates(compass_harness::Coordinates::new(
        0.2, -0.4,
    )))
    .unwrap();
    sink.on_event(&ScoringEvent::Coordinates(compass_harness::Coordinates::new(
        0.0, 0.0,
    )))
    .unwrap();

    drop(sink);
    worker.join().unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: TraceRow = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first.sequence, 0);
    assert_eq!(first.run_id.as_deref(), Some("run-1"));
    assert_eq!(first.event["stage"], "coordinates");
    assert_eq!(first.event["y"], -0.4);
}

#[test]
fn scoring_run_traces_every_stage() {
    let cfg = shipped_config();
    let scenarios = generate_scenarios_seeded(&cfg, 5).unwrap();
    let responses: Vec<RawResponse> = scenarios
        .iter()
        .map(|s| RawResponse::new(&s.id, 7))
        .collect();

    let dir = tempdir().unwrap();
    let path = dir.path().join("score.jsonl");
    let (sink, worker) = JsonlTraceSink::new(&path).unwrap();
    aggregate(&cfg, &scenarios, &responses, &sink).unwrap();
    drop(sink);
    worker.join().unwrap();

    let rows: Vec<TraceRow> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    // 10 preferences, 4 categories, 2 dimensions, 1 coordinate pair.
    assert_eq!(rows.len(), 17);
    assert!(rows.iter().enumerate().all(|(i, r)| r.sequence == i));
    assert_eq!(rows[0].event["stage"], "preference");
    assert_eq!(rows[10].event["stage"], "category");
    assert_eq!(rows[14].event["stage"], "dimension");
    assert_eq!(rows[16].event["stage"], "coordinates");
}

use serde_json::json;
use tracelens_runtime::{Error, LiveTrace, RunStore};
use tracelens_testing::fixtures::sequential_workflow;
use tracelens_testing::{SpanLine, TestWorld};

#[test]
fn test_missing_runs_dir_lists_nothing() {
    let store = RunStore::new("/definitely/not/here");
    assert!(store.list_runs().unwrap().is_empty());
    assert_eq!(store.latest_run_id().unwrap(), None);
    assert!(matches!(store.resolve(None), Err(Error::NoRuns(_))));
}

#[test]
fn test_manifest_sidecar_is_preferred() -> anyhow::Result<()> {
    let world = TestWorld::new()?;
    world.add_run("run-20260101-research", &sequential_workflow())?;
    world.add_manifest(
        "run-20260101-research",
        &json!({
            "run_id": "run-20260101-research",
            "command": "research",
            "status": "failed",
            "start_time": "2026-01-01T10:00:00Z",
            "duration_seconds": 12.5,
            "span_count": 99,
            "llm_calls": 4,
            "total_tokens": 1000,
            "estimated_cost": 0.002
        }),
    )?;

    let store = RunStore::new(world.runs_dir());
    let run = store.manifest("run-20260101-research")?;
    assert_eq!(run.status, "failed");
    assert_eq!(run.span_count, 99);
    assert!(!run.is_ok());
    Ok(())
}

#[test]
fn test_missing_sidecar_is_synthesized() -> anyhow::Result<()> {
    let world = TestWorld::new()?;
    world.add_run("run-20260101-research", &sequential_workflow())?;

    let store = RunStore::new(world.runs_dir());
    let run = store.manifest("run-20260101-research")?;
    assert_eq!(run.command, "research");
    assert_eq!(run.span_count, 7);
    assert_eq!(run.llm_calls, 2);
    assert!(run.is_ok());
    Ok(())
}

#[test]
fn test_list_runs_newest_first_and_skips_strays() -> anyhow::Result<()> {
    let world = TestWorld::new()?;
    world.add_run(
        "run-old",
        &[SpanLine::new("agk.agent.run", "a").timed(0, 100)],
    )?;
    world.add_run(
        "run-new",
        &[SpanLine::new("agk.agent.run", "b").timed(60_000, 100)],
    )?;
    std::fs::create_dir_all(world.run_dir("empty-dir"))?;
    std::fs::write(world.runs_dir().join("notes.txt"), "not a run")?;

    let store = RunStore::new(world.runs_dir());
    let ids: Vec<String> = store.list_runs()?.into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["run-new", "run-old"]);
    Ok(())
}

#[test]
fn test_resolve_named_and_unknown() -> anyhow::Result<()> {
    let world = TestWorld::new()?;
    world.add_run("run-1", &sequential_workflow())?;
    let store = RunStore::new(world.runs_dir());

    assert_eq!(store.resolve(Some("run-1"))?, "run-1");
    assert_eq!(store.resolve(None)?, "run-1");
    let err = store.resolve(Some("run-404")).unwrap_err();
    assert_eq!(err.to_string(), "Trace not found: run-404");
    Ok(())
}

#[test]
fn test_latest_ignores_non_run_dirs() -> anyhow::Result<()> {
    let world = TestWorld::new()?;
    world.add_run("run-a", &sequential_workflow())?;
    std::fs::create_dir_all(world.run_dir("scratch"))?;

    let store = RunStore::new(world.runs_dir());
    assert_eq!(store.latest_run_id()?.as_deref(), Some("run-a"));
    Ok(())
}

#[test]
fn test_read_spans_skips_malformed_lines() -> anyhow::Result<()> {
    let world = TestWorld::new()?;
    let good = SpanLine::new("agk.agent.run", "a").line();
    world.add_raw_run("run-raw", &format!("{}\nnot json\n\n{}\n", good, good))?;

    let store = RunStore::new(world.runs_dir());
    assert_eq!(store.read_spans("run-raw")?.len(), 2);
    Ok(())
}

#[test]
fn test_invalid_utf8_line_matches_live_reader() -> anyhow::Result<()> {
    let world = TestWorld::new()?;
    let a = SpanLine::new("agk.agent.run", "a").line();
    let c = SpanLine::new("agk.llm.generate", "c").parent("a").line();
    let path = world.add_raw_run("run-bytes", "")?;
    let mut content = format!("{}\n", a).into_bytes();
    content.extend_from_slice(b"\xff\xfe garbage\n");
    content.extend_from_slice(format!("{}\n", c).as_bytes());
    std::fs::write(&path, content)?;

    let store = RunStore::new(world.runs_dir());
    let spans = store.read_spans("run-bytes")?;
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[1].span_id(), "c");
    assert_eq!(LiveTrace::open(&path)?.spans().len(), spans.len());
    Ok(())
}

#[test]
fn test_sidecar_only_reads_manifest_file() -> anyhow::Result<()> {
    let world = TestWorld::new()?;
    world.add_run("run-20260101-research", &sequential_workflow())?;
    let store = RunStore::new(world.runs_dir());
    assert!(store.sidecar("run-20260101-research")?.is_none());

    world.add_manifest("run-20260101-research", &json!({"command": "research", "status": "success"}))?;
    let run = store.sidecar("run-20260101-research")?.unwrap();
    assert_eq!(run.run_id, "run-20260101-research");
    assert_eq!(run.span_count, 0);
    Ok(())
}

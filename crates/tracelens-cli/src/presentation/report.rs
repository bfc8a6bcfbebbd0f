use std::path::Path;

use tracelens_engine::{TraceObject, diagram};
use tracelens_runtime::RunEntry;
use tracelens_runtime::store::{MANIFEST_FILE, TRACE_FILE};
use tracelens_types::TraceRun;

use super::Styler;
use super::format::{format_cost, format_secs, format_timestamp};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

/// One row per run, newest first as given.
pub fn run_table(entries: &[RunEntry], style: &Styler) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&style.heading(&format!(
        "{:<40} {:<12} {:<8} {:<10} {:<10} {:<12}",
        "Run ID", "Command", "Status", "Duration", "LLM Calls", "Tokens"
    )));
    out.push('\n');
    out.push_str(&"-".repeat(92));
    out.push('\n');

    for entry in entries {
        let run = &entry.run;
        let status = if run.is_ok() {
            style.ok(&format!("{:<8}", "✅ OK"))
        } else {
            style.fail(&format!("{:<8}", "❌ ERROR"))
        };
        out.push_str(&format!(
            "{:<40} {:<12} {} {:<10} {:<10} {:<12}\n",
            entry.id,
            run.command,
            status,
            format_secs(run.duration_secs),
            run.llm_calls,
            run.total_tokens
        ));
    }
    out
}

/// The `view` report: run information, execution stats and file locations.
pub fn run_report(run: &TraceRun, run_path: &Path, style: &Styler) -> String {
    let status = if run.is_ok() {
        style.ok(&format!("✅ {}", run.status))
    } else {
        style.fail(&format!("❌ {}", run.status))
    };
    let completed = run
        .end_time
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        String::new(),
        style.heading("Run Information"),
        rule(),
        format!("{:<21}{}", "Run ID:", run.run_id),
        format!("{:<21}{}", "Command:", run.command),
        format!("{:<21}{}", "Status:", status),
        format!("{:<21}{}", "Started:", format_timestamp(&run.start_time)),
        format!("{:<21}{}", "Completed:", completed),
        format!("{:<21}{}", "Duration:", format_secs(run.duration_secs)),
        String::new(),
        style.heading("Execution Stats"),
        rule(),
        format!("{:<21}{}", "Spans:", run.span_count),
        format!("{:<21}{}", "LLM Calls:", run.llm_calls),
        format!("{:<21}{}", "Total Tokens:", run.total_tokens),
        format!("{:<21}{}", "Estimated Cost:", format_cost(run.estimated_cost)),
        String::new(),
        style.heading("Files"),
        rule(),
        format!(
            "{:<21}{}",
            "Trace:",
            style.accent(&run_path.join(TRACE_FILE).display().to_string())
        ),
        format!(
            "{:<21}{}",
            "Manifest:",
            style.accent(&run_path.join(MANIFEST_FILE).display().to_string())
        ),
        String::new(),
    ];
    lines.join("\n")
}

/// Markdown document wrapping the flowchart.
pub fn mermaid_document(trace: &TraceObject) -> String {
    let mut out = format!("# Agent Trace: {}\n\n", trace.run_id);
    out.push_str(&format!(
        "**Events:** {} | **Duration:** {}ms\n\n",
        trace.summary.total_events, trace.summary.total_duration_ms
    ));
    out.push_str("## Execution Flow\n\n");
    out.push_str(&diagram::render(trace));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn run(status: &str) -> TraceRun {
        TraceRun {
            run_id: "run-20260101-chat".to_string(),
            command: "chat".to_string(),
            status: status.to_string(),
            start_time: "2026-01-01T10:00:00Z".to_string(),
            end_time: Some("2026-01-01T10:00:05Z".to_string()),
            duration_secs: 5.0,
            span_count: 7,
            llm_calls: 2,
            total_tokens: 150,
            estimated_cost: 0.0003,
        }
    }

    #[test]
    fn test_run_table_rows() {
        let entries = vec![
            RunEntry {
                id: "run-20260101-chat".to_string(),
                path: PathBuf::from("/runs/run-20260101-chat"),
                run: run("completed"),
            },
            RunEntry {
                id: "run-20260102-fail".to_string(),
                path: PathBuf::from("/runs/run-20260102-fail"),
                run: run("failed"),
            },
        ];
        let table = run_table(&entries, &Styler::plain());
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[1].starts_with("Run ID"));
        assert!(lines[3].starts_with("run-20260101-chat"));
        assert!(lines[3].contains("✅ OK"));
        assert!(lines[3].contains("5.00s"));
        assert!(lines[4].contains("❌ ERROR"));
    }

    #[test]
    fn test_run_report_sections() {
        let report = run_report(
            &run("completed"),
            Path::new("/runs/run-20260101-chat"),
            &Styler::plain(),
        );
        assert!(report.contains("Run Information"));
        assert!(report.contains("Status:              ✅ completed"));
        assert!(report.contains("Started:             2026-01-01 10:00:00"));
        assert!(report.contains("Estimated Cost:      $0.0003"));
        assert!(report.contains("/runs/run-20260101-chat/trace.jsonl"));
    }

    #[test]
    fn test_mermaid_document_header() {
        let trace = TraceObject::collect("run-1", &[]);
        let doc = mermaid_document(&trace);
        assert!(doc.starts_with("# Agent Trace: run-1\n\n**Events:** 0 | **Duration:** 0ms\n\n## Execution Flow\n\n```mermaid\n"));
    }
}

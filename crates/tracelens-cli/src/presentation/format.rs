use tracelens_types::parse_timestamp;

/// Truncate to `max_chars` characters, collapsing whitespace and newlines.
pub fn truncate(s: &str, max_chars: usize) -> String {
    let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() <= max_chars {
        normalized
    } else {
        let truncated: String = normalized.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// First eight characters of an id followed by an ellipsis.
pub fn short_id(id: &str) -> String {
    if id.chars().count() <= 8 {
        id.to_string()
    } else {
        let head: String = id.chars().take(8).collect();
        format!("{}...", head)
    }
}

pub fn format_secs(secs: f64) -> String {
    format!("{:.2}s", secs)
}

pub fn format_cost(cost: f64) -> String {
    format!("${:.4}", cost)
}

/// `2026-01-01 10:00:00` for RFC3339 input, the raw text otherwise.
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        None if raw.is_empty() => "-".to_string(),
        None => raw.to_string(),
    }
}

/// Strip the namespace prefixes attribute keys are written with.
pub fn short_key(key: &str) -> &str {
    let key = key.strip_prefix("agk.").unwrap_or(key);
    let key = key.strip_prefix("llm.").unwrap_or(key);
    key.strip_prefix("workflow.").unwrap_or(key)
}

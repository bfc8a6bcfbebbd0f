use tracelens_types::Span;

/// Case-insensitive substring match over a span's name, display name,
/// attribute keys and values, and status. `query` must already be lowercase.
pub fn matches_query(span: &Span, query: &str) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(query);

    hit(&span.name)
        || hit(&span.friendly_name())
        || span
            .attrs()
            .into_iter()
            .any(|(key, value)| hit(key) || hit(&value.to_string()))
        || hit(&span.status.code)
        || hit(&span.status.description)
}

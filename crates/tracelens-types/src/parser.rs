use std::io::BufRead;

use crate::span::Span;

/// Spans recovered from a chunk of input plus a count of lines that were
/// not valid span records.
#[derive(Debug, Default)]
pub struct ParseReport {
    pub spans: Vec<Span>,
    pub skipped: usize,
}

/// Parse newline-delimited span records. Blank lines are ignored and
/// malformed lines are dropped; neither stops the parse.
pub fn parse_str(data: &str) -> ParseReport {
    let mut report = ParseReport::default();
    for line in data.lines() {
        parse_line(line, &mut report);
    }
    report
}

/// Same as [`parse_str`] over any buffered reader. Lines are split on raw
/// bytes and decoded lossily, so invalid UTF-8 only spoils its own line. A
/// read error ends the parse with whatever was recovered so far.
pub fn parse_lines<R: BufRead>(mut reader: R) -> ParseReport {
    let mut report = ParseReport::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => parse_line(&String::from_utf8_lossy(&buf), &mut report),
            Err(_) => {
                report.skipped += 1;
                break;
            }
        }
    }
    report
}

fn parse_line(line: &str, report: &mut ParseReport) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    match serde_json::from_str::<Span>(line) {
        Ok(span) => report.spans.push(span),
        Err(_) => report.skipped += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_blank_and_malformed_lines() {
        let data = concat!(
            r#"{"Name":"a","SpanContext":{"SpanID":"1"}}"#,
            "\n\n",
            "{not json\n",
            r#"{"Name":"b","SpanContext":{"SpanID":"2"},"Parent":{"SpanID":"1"}}"#,
            "\n",
            "   \n",
            "[1,2,3]\n",
        );
        let report = parse_str(data);
        assert_eq!(report.spans.len(), 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.spans[1].parent_span_id(), Some("1"));
    }

    #[test]
    fn test_reader_variant_matches_str_variant() {
        let data = "{\"Name\":\"a\"}\r\n{\"Name\":\"b\"}\n";
        let report = parse_lines(data.as_bytes());
        assert_eq!(report.spans.len(), 2);
        assert_eq!(report.spans[0].name, "a");
    }

    #[test]
    fn test_invalid_utf8_line_does_not_end_parse() {
        let mut data = br#"{"Name":"a","SpanContext":{"SpanID":"1"}}"#.to_vec();
        data.extend_from_slice(b"\n\xff\xfe garbage\n");
        data.extend_from_slice(br#"{"Name":"c","SpanContext":{"SpanID":"3"}}"#);
        data.push(b'\n');

        let report = parse_lines(data.as_slice());
        assert_eq!(report.spans.len(), 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.spans[1].name, "c");
    }
}

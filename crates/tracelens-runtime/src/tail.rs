use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracelens_types::{Span, parse_str};

use crate::{Error, Result};

/// Read spans appended to `path` since `last_offset`.
///
/// The file is stat'ed, then opened read-only and seeked on every call; no
/// handle is kept between polls so an external writer is never contended
/// with. Only newline-terminated records are consumed: the returned offset
/// points just past the last complete line, so a record the writer is still
/// in the middle of is picked up by a later poll. A file that has not grown
/// (or has shrunk) yields nothing and leaves the offset unchanged.
pub fn poll(path: &Path, last_offset: u64) -> Result<(Vec<Span>, u64)> {
    let size = std::fs::metadata(path)
        .map_err(|e| Error::io(path, e))?
        .len();
    if size <= last_offset {
        return Ok((Vec::new(), last_offset));
    }

    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    file.seek(SeekFrom::Start(last_offset))
        .map_err(|e| Error::io(path, e))?;

    let mut buf = Vec::with_capacity((size - last_offset) as usize);
    file.take(size - last_offset)
        .read_to_end(&mut buf)
        .map_err(|e| Error::io(path, e))?;

    let Some(last_newline) = buf.iter().rposition(|&b| b == b'\n') else {
        return Ok((Vec::new(), last_offset));
    };
    let complete = &buf[..=last_newline];
    let text = String::from_utf8_lossy(complete);
    let report = parse_str(&text);

    if report.skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped = report.skipped,
            "dropped malformed trace lines"
        );
    }
    tracing::debug!(
        path = %path.display(),
        from = last_offset,
        bytes = complete.len(),
        spans = report.spans.len(),
        "polled trace file"
    );

    Ok((report.spans, last_offset + complete.len() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const A: &str = r#"{"Name":"a","SpanContext":{"SpanID":"1"}}"#;
    const B: &str = r#"{"Name":"b","SpanContext":{"SpanID":"2"},"Parent":{"SpanID":"1"}}"#;

    #[test]
    fn test_poll_reads_from_offset() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", A).unwrap();

        let (spans, offset) = poll(file.path(), 0).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(offset, A.len() as u64 + 1);

        writeln!(file, "{}", B).unwrap();
        let (spans, offset2) = poll(file.path(), offset).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "b");
        assert_eq!(offset2, std::fs::metadata(file.path()).unwrap().len());
    }

    #[test]
    fn test_poll_without_growth_is_noop() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", A).unwrap();
        let (_, offset) = poll(file.path(), 0).unwrap();

        let (spans, again) = poll(file.path(), offset).unwrap();
        assert!(spans.is_empty());
        assert_eq!(again, offset);
    }

    #[test]
    fn test_partial_line_waits_for_newline() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", A).unwrap();
        write!(file, "{}", &B[..10]).unwrap();
        file.flush().unwrap();

        let (spans, offset) = poll(file.path(), 0).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(offset, A.len() as u64 + 1);

        let (spans, same) = poll(file.path(), offset).unwrap();
        assert!(spans.is_empty());
        assert_eq!(same, offset);

        writeln!(file, "{}", &B[10..]).unwrap();
        let (spans, _) = poll(file.path(), offset).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "b");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}\n{{garbage\n\n{}", A, B).unwrap();
        let (spans, _) = poll(file.path(), 0).unwrap();
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("trace.jsonl");
        assert!(matches!(poll(&missing, 0), Err(Error::Io { .. })));
    }
}

use memento::Memento;
use memento::tree_snapshot::{TreeSnapshot, TreeSnapshotOptions};

pub mod fixtures;

/// Escape text the way [`TreeSnapshot`] writes text and attribute values, so
/// expected snapshot lines can be built from raw strings.
pub fn escape_text(text: &str) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(&mut out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
    out
}

/// Snapshot line for a node's text at `depth`.
pub fn text_line(depth: usize, text: &str) -> String {
    format!("{}\"{}\"", "  ".repeat(depth), escape_text(text))
}

pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let max = expected.len().max(actual.len());
    let mut out = String::new();
    use std::fmt::Write;
    let missing = "<missing>";
    let mismatch = (0..max).find(|&i| expected.get(i) != actual.get(i));
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            i + 1,
            start + 1,
            end
        );
        for line_idx in start..end {
            let left = expected
                .get(line_idx)
                .map(String::as_str)
                .unwrap_or(missing);
            let right = actual.get(line_idx).map(String::as_str).unwrap_or(missing);
            let marker = if line_idx == i { ">" } else { " " };
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {left}", line_idx + 1);
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {right}", line_idx + 1);
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// Assert that `root` snapshots to exactly `expected`, attributes sorted.
#[track_caller]
pub fn assert_snapshot<S: AsRef<str>>(root: &Memento, expected: &[S]) {
    let expected: Vec<String> = expected.iter().map(|s| s.as_ref().to_string()).collect();
    let snapshot = TreeSnapshot::new(root, TreeSnapshotOptions::default());
    let actual = snapshot.as_lines();
    if expected != actual {
        panic!("snapshot mismatch\n{}", diff_lines(&expected, actual));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn escape_text_matches_snapshot_escaping() {
        assert_eq!(escape_text("a\"b\\c\nd\te"), "a\\\"b\\\\c\\nd\\te");
        assert_eq!(escape_text("café"), "caf\\u{E9}");

        let root = Memento::new_root("n");
        root.put_text_data("line\r\n\"é\"");
        assert_snapshot(&root, &["<n>".to_string(), text_line(1, "line\r\n\"é\"")]);
    }

    #[test]
    fn diff_lines_points_at_first_mismatch() {
        let report = diff_lines(&lines(&["a", "b", "c"]), &lines(&["a", "x", "c"]));
        assert!(report.starts_with("first mismatch at line 2"), "{report}");
        assert!(report.contains(">    2  expected: b"), "{report}");
        assert!(report.contains(">    2    actual: x"), "{report}");
    }

    #[test]
    fn diff_lines_reports_missing_lines() {
        let report = diff_lines(&lines(&["a", "b"]), &lines(&["a"]));
        assert!(report.contains("actual: <missing>"), "{report}");
        assert!(report.ends_with("expected 2 lines, actual 1 lines\n"), "{report}");
    }

    #[test]
    #[should_panic(expected = "snapshot mismatch")]
    fn assert_snapshot_panics_with_diff() {
        assert_snapshot(&Memento::new_root("a"), &["<b>"]);
    }
}

//! Log text helpers.

use chrono::{DateTime, FixedOffset};

/// Returns at most the last `lines` lines of `text`.
///
/// A trailing newline does not count as an extra empty line, and the
/// returned text keeps the line terminators of the input.
#[must_use]
pub fn tail_lines(text: &str, lines: usize) -> &str {
    if lines == 0 {
        return "";
    }
    let body = text.strip_suffix('\n').unwrap_or(text);
    let mut seen = 0;
    for (idx, byte) in body.bytes().enumerate().rev() {
        if byte == b'\n' {
            seen += 1;
            if seen == lines {
                return &text[idx + 1..];
            }
        }
    }
    text
}

/// Joins two output streams, stdout first, and trims the result to `lines`
/// trailing lines. Used for build output, which carries no timestamps.
#[must_use]
pub fn merge_streams(stdout: &str, stderr: &str, lines: usize) -> String {
    let mut merged = String::with_capacity(stdout.len() + stderr.len() + 1);
    merged.push_str(stdout);
    if !stdout.is_empty() && !stdout.ends_with('\n') && !stderr.is_empty() {
        merged.push('\n');
    }
    merged.push_str(stderr);
    tail_lines(&merged, lines).to_string()
}

/// Splits an RFC 3339 timestamp prefix, as written by
/// `docker logs --timestamps`, off a log line.
#[must_use]
pub fn split_timestamp(line: &str) -> Option<(DateTime<FixedOffset>, &str)> {
    let (stamp, text) = line.split_once(' ').unwrap_or((line, ""));
    let at = DateTime::parse_from_rfc3339(stamp).ok()?;
    Some((at, text))
}

struct StampedLine<'a> {
    at: Option<DateTime<FixedOffset>>,
    text: &'a str,
}

/// Lines without a prefix inherit the timestamp of the line before them.
fn stamp_lines(stream: &str) -> Vec<StampedLine<'_>> {
    let mut last = None;
    stream
        .lines()
        .map(|line| match split_timestamp(line) {
            Some((at, text)) => {
                last = Some(at);
                StampedLine { at: last, text }
            }
            None => StampedLine { at: last, text: line },
        })
        .collect()
}

/// Interleaves timestamped stdout and stderr lines in write order, strips
/// the timestamps, and trims the result to `lines` trailing lines.
///
/// Each stream is already in order, so this is a stable two-way merge. On
/// equal timestamps the stdout line comes first.
#[must_use]
pub fn interleave_timestamped(stdout: &str, stderr: &str, lines: usize) -> String {
    let mut out = stamp_lines(stdout).into_iter().peekable();
    let mut err = stamp_lines(stderr).into_iter().peekable();
    let mut merged = String::with_capacity(stdout.len() + stderr.len());
    loop {
        let next = match (out.peek(), err.peek()) {
            (Some(o), Some(e)) if e.at < o.at => err.next(),
            (Some(_), _) => out.next(),
            (None, Some(_)) => err.next(),
            (None, None) => break,
        };
        if let Some(line) = next {
            merged.push_str(line.text);
            merged.push('\n');
        }
    }
    tail_lines(&merged, lines).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_keeps_last_lines() {
        assert_eq!(tail_lines("a\nb\nc\n", 2), "b\nc\n");
    }

    #[test]
    fn tail_without_trailing_newline() {
        assert_eq!(tail_lines("a\nb\nc", 2), "b\nc");
    }

    #[test]
    fn tail_shorter_text_is_unchanged() {
        assert_eq!(tail_lines("a\nb\n", 50), "a\nb\n");
        assert_eq!(tail_lines("", 50), "");
    }

    #[test]
    fn tail_zero_is_empty() {
        assert_eq!(tail_lines("a\nb\n", 0), "");
    }

    #[test]
    fn merge_limits_combined_output() {
        let merged = merge_streams("o1\no2\n", "e1\ne2\n", 3);
        assert_eq!(merged, "o2\ne1\ne2\n");
    }

    #[test]
    fn merge_separates_unterminated_stdout() {
        assert_eq!(merge_streams("out", "err\n", 10), "out\nerr\n");
    }

    #[test]
    fn split_timestamp_strips_prefix() {
        let (at, text) = split_timestamp("2024-05-01T10:00:00.5Z hello world").unwrap();
        assert_eq!(text, "hello world");
        assert_eq!(at.timestamp_subsec_millis(), 500);
        assert!(split_timestamp("hello world").is_none());
    }

    #[test]
    fn interleave_follows_write_order() {
        let stdout = "2024-05-01T10:00:00.000000001Z out1\n2024-05-01T10:00:01Z out2\n";
        let stderr = "2024-05-01T10:00:00.5Z err1\n2024-05-01T10:00:01.25Z err2\n";
        assert_eq!(
            interleave_timestamped(stdout, stderr, 50),
            "out1\nerr1\nout2\nerr2\n"
        );
    }

    #[test]
    fn interleave_tails_after_merging() {
        let stdout = "2024-05-01T10:00:00Z out1\n2024-05-01T10:00:02Z out2\n";
        let stderr = "2024-05-01T10:00:01Z err1\n";
        assert_eq!(interleave_timestamped(stdout, stderr, 2), "err1\nout2\n");
    }

    #[test]
    fn interleave_compares_instants_across_offsets() {
        let stdout = "2024-05-01T12:00:00+02:00 later\n";
        let stderr = "2024-05-01T09:59:59Z earlier\n";
        assert_eq!(interleave_timestamped(stdout, stderr, 10), "earlier\nlater\n");
    }

    #[test]
    fn unstamped_lines_stay_with_their_predecessor() {
        let stdout = "2024-05-01T10:00:00Z start\n  continued\n2024-05-01T10:00:05Z end\n";
        let stderr = "2024-05-01T10:00:03Z warn\n";
        assert_eq!(
            interleave_timestamped(stdout, stderr, 10),
            "start\n  continued\nwarn\nend\n"
        );
    }

    #[test]
    fn equal_timestamps_put_stdout_first() {
        let stdout = "2024-05-01T10:00:00Z out\n";
        let stderr = "2024-05-01T10:00:00Z err\n";
        assert_eq!(interleave_timestamped(stdout, stderr, 10), "out\nerr\n");
    }
}

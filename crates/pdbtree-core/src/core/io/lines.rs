//! Line-level helpers shared by every record decoder.
//!
//! PDB records are fixed-width: every column offset used elsewhere in this crate is
//! relative to an 80-character line. [`split_lines`] produces those lines, the locator
//! functions find records by their leading keyword, and [`merge_lines`] stitches
//! continuation records back into one logical string.

/// Width of a normalized record line.
pub const LINE_WIDTH: usize = 80;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// A record line located by its keyword.
///
/// The full line is kept so that absolute column offsets remain valid; [`Record::rest`]
/// exposes the text after the keyword for callers that only care about the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    keyword: &'a str,
    line: &'a str,
}

impl<'a> Record<'a> {
    /// The full normalized line, keyword included.
    pub fn line(&self) -> &'a str {
        self.line
    }

    /// The line with the matched keyword prefix stripped.
    pub fn rest(&self) -> &'a str {
        &self.line[self.keyword.len()..]
    }

    pub fn keyword(&self) -> &'a str {
        self.keyword
    }
}

/// Splits raw file text into normalized 80-column lines.
///
/// Accepts `\n`, `\r\n` and bare `\r` line endings. A leading byte-order mark is
/// stripped. Lines that are blank after trimming are dropped; the rest are right-padded
/// (or truncated) to [`LINE_WIDTH`] characters.
pub fn split_lines(text: &str) -> Vec<String> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    text.split('\n')
        .flat_map(|line| line.split('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(normalize_line)
        .collect()
}

/// Pads or truncates a single line to exactly [`LINE_WIDTH`] characters.
pub fn normalize_line(line: &str) -> String {
    let mut normalized: String = line.chars().take(LINE_WIDTH).collect();
    let width = normalized.chars().count();
    normalized.extend(std::iter::repeat_n(' ', LINE_WIDTH - width));
    normalized
}

/// Returns the first line starting with `keyword`, or `None`.
pub fn get_line<'a, S: AsRef<str>>(keyword: &'a str, lines: &'a [S]) -> Option<Record<'a>> {
    lines
        .iter()
        .map(<S as AsRef<str>>::as_ref)
        .find(|line| line.starts_with(keyword))
        .map(|line| Record { keyword, line })
}

/// Returns every line starting with `keyword`, in file order.
pub fn get_lines<'a, S: AsRef<str>>(keyword: &'a str, lines: &'a [S]) -> Vec<Record<'a>> {
    lines
        .iter()
        .map(<S as AsRef<str>>::as_ref)
        .filter(|line| line.starts_with(keyword))
        .map(|line| Record { keyword, line })
        .collect()
}

/// Joins the text of continuation lines starting at character `offset`.
///
/// Each fragment is stripped of surrounding whitespace before joining, so the blank
/// column after a continuation counter does not leak into the result. Caller order is
/// trusted; continuation counters inside the lines are not consulted.
pub fn merge_lines<S: AsRef<str>>(lines: &[S], offset: usize, join: &str) -> String {
    lines
        .iter()
        .map(|line| {
            let line: &str = line.as_ref();
            line.char_indices()
                .nth(offset)
                .map_or("", |(idx, _)| &line[idx..])
                .trim()
        })
        .collect::<Vec<_>>()
        .join(join)
}

/// Like [`merge_lines`] but for located records.
pub fn merge_records(records: &[Record<'_>], offset: usize, join: &str) -> String {
    let lines: Vec<&str> = records.iter().map(Record::line).collect();
    merge_lines(&lines, offset, join)
}

/// Extracts 1-based, inclusive columns `start..=end`, trimmed.
///
/// Columns count characters, not bytes, matching the padding done by
/// [`normalize_line`]. Columns beyond the end of the line decode to an empty string.
pub fn columns(line: &str, start: usize, end: usize) -> &str {
    let from = byte_offset(line, start.saturating_sub(1));
    let to = byte_offset(line, end.max(start.saturating_sub(1)));
    line[from..to].trim()
}

/// Byte offset of the character at index `col`, or the line length past the end.
fn byte_offset(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_pads_to_eighty_columns() {
        let lines = split_lines("line1\nline2");
        assert_eq!(lines, vec![normalize_line("line1"), normalize_line("line2")]);
        assert!(lines.iter().all(|l| l.len() == LINE_WIDTH));
    }

    #[test]
    fn split_lines_handles_windows_line_endings() {
        let lines = split_lines("line1\r\nline2");
        assert_eq!(lines, vec![normalize_line("line1"), normalize_line("line2")]);
    }

    #[test]
    fn split_lines_removes_empty_lines() {
        let lines = split_lines("line1\n\n   \nline2\n");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("line2"));
    }

    #[test]
    fn split_lines_of_empty_input_is_empty() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("\n\r\n").is_empty());
    }

    #[test]
    fn normalize_line_truncates_long_lines() {
        let long = "X".repeat(100);
        assert_eq!(normalize_line(&long).len(), LINE_WIDTH);
    }

    #[test]
    fn get_line_returns_first_match() {
        let lines = ["AAA   X", "AAA   Y", "BBBBBBX"];
        let record = get_line("BBBBBB", &lines).unwrap();
        assert_eq!(record.line(), "BBBBBBX");
        assert_eq!(record.rest(), "X");

        let record = get_line("AAA", &lines).unwrap();
        assert_eq!(record.line(), "AAA   X");
        assert_eq!(record.rest(), "   X");
    }

    #[test]
    fn get_line_returns_none_without_match() {
        let lines = ["AAA   X", "AAA   Y", "BBBBBBX"];
        assert!(get_line("AA ", &lines).is_none());
        assert!(get_line("aaa", &lines).is_none());
    }

    #[test]
    fn get_lines_returns_all_matches_in_order() {
        let lines = ["AAA   X", "AAA   Y", "BBBBBBX"];
        let found: Vec<_> = get_lines("AAA", &lines).iter().map(|r| r.line()).collect();
        assert_eq!(found, vec!["AAA   X", "AAA   Y"]);
        assert!(get_lines("CC", &lines).is_empty());
    }

    #[test]
    fn merge_lines_joins_from_offset() {
        let lines = ["0123456789 ", "abcdefghij ", "0123456789 "];
        assert_eq!(merge_lines(&lines, 5, " "), "56789 fghij 56789");
        assert_eq!(merge_lines(&lines, 8, " "), "89 ij 89");
        assert_eq!(merge_lines(&lines, 5, ""), "56789fghij56789");
        assert_eq!(merge_lines(&lines, 8, "."), "89.ij.89");
    }

    #[test]
    fn merge_lines_is_idempotent_and_handles_empty_input() {
        let lines = ["TITLE     L1".to_string(), "TITLE    2 L2".to_string()];
        let first = merge_lines(&lines, 10, " ");
        assert_eq!(first, merge_lines(&lines, 10, " "));
        assert_eq!(first, "L1 L2");
        let empty: [&str; 0] = [];
        assert_eq!(merge_lines(&empty, 10, " "), "");
    }

    #[test]
    fn merge_lines_tolerates_short_lines() {
        assert_eq!(merge_lines(&["abc", "0123456789XY"], 10, "|"), "|XY");
    }

    #[test]
    fn columns_are_one_based_and_inclusive() {
        let line = normalize_line("HEADER    UNKNOWN FUNCTION");
        assert_eq!(columns(&line, 1, 6), "HEADER");
        assert_eq!(columns(&line, 11, 50), "UNKNOWN FUNCTION");
        assert_eq!(columns("ABC", 2, 10), "BC");
        assert_eq!(columns("ABC", 5, 10), "");
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let line = normalize_line("ATOM      1 NÉ   UNK A   1");
        assert_eq!(columns(&line, 13, 16), "NÉ");
        assert_eq!(columns(&line, 18, 20), "UNK");
        assert_eq!(columns(&line, 22, 22), "A");
        assert_eq!(columns(&line, 23, 26), "1");
        assert_eq!(columns("ÉÉÉ", 2, 2), "É");
    }

    #[test]
    fn split_lines_strips_byte_order_mark() {
        let lines = split_lines("\u{feff}HEADER    X\nEND");
        assert!(lines[0].starts_with("HEADER"));
        assert!(get_line("HEADER", &lines).is_some());
        assert_eq!(lines.len(), 2);
    }
}

//! The `RECORD` integrity record
//!
//! One CSV row per archive member: `path,sha256=<digest>,<size>`. The digest
//! is the urlsafe base64 encoding of the SHA-256 hash without padding. The
//! row for `RECORD` itself has empty hash and size fields, because its own
//! bytes are still being produced when it is rendered.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

/// The hash algorithm named in every row
pub const HASH_ALGORITHM: &str = "sha256";

/// Hash `content` the way `RECORD` expects it, without the `sha256=` prefix
pub fn record_digest(content: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(content))
}

/// One row of the `RECORD` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    /// Archive member path, always with `/` separators
    pub path: String,

    /// `<algorithm>=<digest>`, or `None` for the row of `RECORD` itself
    pub hash: Option<String>,

    /// Content length in bytes, or `None` for the row of `RECORD` itself
    pub size: Option<u64>,
}

impl RecordRow {
    /// A row describing `content` stored at `path`
    pub fn hashed(path: impl Into<String>, content: &[u8]) -> Self {
        Self {
            path: path.into(),
            hash: Some(format!("{HASH_ALGORITHM}={}", record_digest(content))),
            size: Some(content.len() as u64),
        }
    }

    /// A row without hash or size
    pub fn unhashed(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hash: None,
            size: None,
        }
    }

    /// Render the row as a single CSV line, without the line terminator
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{}",
            quote_field(&self.path),
            self.hash.as_deref().unwrap_or_default(),
            self.size.map(|s| s.to_string()).unwrap_or_default()
        )
    }

    /// Parse a single CSV line. Returns `None` for malformed lines.
    pub fn parse(line: &str) -> Option<Self> {
        let (path, rest) = split_path_field(line)?;
        let (hash, size) = rest.split_once(',')?;
        if size.contains(',') {
            return None;
        }

        let size = match size.trim() {
            "" => None,
            size => Some(size.parse().ok()?),
        };

        Some(Self {
            path,
            hash: (!hash.is_empty()).then(|| hash.to_string()),
            size,
        })
    }

    /// Whether this row matches the given member content
    pub fn matches(&self, content: &[u8]) -> bool {
        let expected = RecordRow::hashed(self.path.clone(), content);
        self.hash == expected.hash && self.size == expected.size
    }
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split off the (possibly quoted) first field, returning it and the rest after the comma
fn split_path_field(line: &str) -> Option<(String, &str)> {
    let Some(quoted) = line.strip_prefix('"') else {
        let (path, rest) = line.split_once(',')?;
        return Some((path.to_string(), rest));
    };

    let mut path = String::new();
    let mut chars = quoted.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if c != '"' {
            path.push(c);
            continue;
        }
        if chars.peek().is_some_and(|(_, next)| *next == '"') {
            chars.next();
            path.push('"');
            continue;
        }
        let rest = quoted[idx + 1..].strip_prefix(',')?;
        return Some((path, rest));
    }
    None
}

/// The accumulated `RECORD` of a wheel
///
/// Rows keep insertion order, which is the order members are written to the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityRecord {
    rows: Vec<RecordRow>,
}

impl IntegrityRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a member that was written with the given content
    pub fn add(&mut self, path: impl Into<String>, content: &[u8]) {
        self.rows.push(RecordRow::hashed(path, content));
    }

    /// The rows recorded so far
    pub fn rows(&self) -> &[RecordRow] {
        &self.rows
    }

    /// Close the record by appending the row for `record_path` itself
    ///
    /// Returns the rendered file content. The record is consumed, so no
    /// member can be added after its own row.
    pub fn finish(mut self, record_path: &str) -> (Vec<RecordRow>, String) {
        self.rows.push(RecordRow::unhashed(record_path));
        let content = render_rows(&self.rows);
        (self.rows, content)
    }

    /// Parse the content of a `RECORD` file, skipping blank lines
    ///
    /// Quoted paths may span line breaks. Returns the 1-based number of the
    /// line a malformed row starts on as error.
    pub fn parse(content: &str) -> std::result::Result<Vec<RecordRow>, usize> {
        split_records(content)
            .into_iter()
            .filter(|(_, record)| !record.trim().is_empty())
            .map(|(line, record)| RecordRow::parse(record).ok_or(line))
            .collect()
    }
}

/// Split CSV content into records, keeping line breaks inside quoted fields
///
/// Each record comes with the 1-based line it starts on. A `\r` before the
/// terminating `\n` is dropped.
fn split_records(content: &str) -> Vec<(usize, &str)> {
    let mut records = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    let mut line = 1;
    let mut start_line = 1;

    for (idx, c) in content.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\n' => {
                if !in_quotes {
                    let record = &content[start..idx];
                    records.push((start_line, record.strip_suffix('\r').unwrap_or(record)));
                    start = idx + 1;
                    start_line = line + 1;
                }
                line += 1;
            }
            _ => {}
        }
    }

    if start < content.len() {
        records.push((start_line, &content[start..]));
    }
    records
}

fn render_rows(rows: &[RecordRow]) -> String {
    rows.iter().fold(String::new(), |mut out, row| {
        out.push_str(&row.to_line());
        out.push('\n');
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_digest() {
        // sha256 of the empty string, urlsafe base64 without padding
        assert_eq!(
            record_digest(b""),
            "47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU"
        );
        assert!(!record_digest(b"hello").ends_with('='));
    }

    #[test]
    fn test_finish_appends_own_row_last() {
        let mut record = IntegrityRecord::new();
        record.add("mypkg/__init__.py", b"__version__ = \"0.1\"\n");
        record.add("mypkg-0.1.dist-info/METADATA", b"Metadata-Version: 2.1\n");

        let (rows, content) = record.finish("mypkg-0.1.dist-info/RECORD");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], RecordRow::unhashed("mypkg-0.1.dist-info/RECORD"));

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("mypkg/__init__.py,sha256="));
        assert!(lines[0].ends_with(",20"));
        assert_eq!(lines[2], "mypkg-0.1.dist-info/RECORD,,");
    }

    #[test]
    fn test_parse_round_trips_rendered_rows() {
        let mut record = IntegrityRecord::new();
        record.add("pkg/odd, \"name\".txt", b"data");
        record.add("pkg/plain.py", b"");
        let (rows, content) = record.finish("pkg-1.0.dist-info/RECORD");

        assert!(content.starts_with("\"pkg/odd, \"\"name\"\".txt\",sha256="));
        assert_eq!(IntegrityRecord::parse(&content), Ok(rows));
    }

    #[test]
    fn test_parse_paths_with_line_breaks() {
        let mut record = IntegrityRecord::new();
        record.add("pkg/first\nsecond.txt", b"data");
        record.add("pkg/carriage\r\nreturn.txt", b"");
        record.add("pkg/plain.py", b"x");
        let (rows, content) = record.finish("pkg-1.0.dist-info/RECORD");

        assert_eq!(content.lines().count(), 6);
        assert_eq!(IntegrityRecord::parse(&content), Ok(rows));
    }

    #[test]
    fn test_parse_reports_starting_line() {
        let content = "\"a\nb\",sha256=x,1\nbroken\n";
        assert_eq!(IntegrityRecord::parse(content), Err(3));
        assert_eq!(IntegrityRecord::parse("a,,\r\nb,,\r\n").map(|rows| rows.len()), Ok(2));
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert_eq!(IntegrityRecord::parse("a,sha256=x,1\nbroken\n"), Err(2));
        assert_eq!(IntegrityRecord::parse("a,sha256=x,notanumber\n"), Err(1));
    }

    #[test]
    fn test_row_matches_content() {
        let row = RecordRow::hashed("a.py", b"print(1)\n");
        assert!(row.matches(b"print(1)\n"));
        assert!(!row.matches(b"print(2)\n"));
        assert!(!RecordRow::unhashed("a.py").matches(b""));
    }
}

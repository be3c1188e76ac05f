//! Single-column CSV store for extracted rows.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;

/// Header written as the first record of every file.
pub const HEADER: &str = "Title";

/// UTF-8 byte-order mark, so spreadsheet tools detect the encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes rows to a CSV file.
///
/// Layout: BOM, the `Title` header, then one record per row, CRLF-terminated.
/// Each save truncates the file; nothing is appended or merged.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Write all rows, replacing any previous contents. Returns rows written.
    pub fn save<S: AsRef<str>>(&self, rows: &[S]) -> Result<usize> {
        let mut file = File::create(&self.path)?;
        file.write_all(UTF8_BOM)?;

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);

        writer.write_record([HEADER])?;
        for row in rows {
            writer.write_record([row.as_ref()])?;
        }
        writer.flush()?;

        debug!(path = %self.path.display(), rows = rows.len(), "CSV saved");
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn read(path: &Path) -> Vec<u8> {
        std::fs::read(path).unwrap()
    }

    #[test]
    fn test_save_writes_bom_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("out.csv"));

        let written = store.save(&["First", "Second"]).unwrap();
        assert_eq!(written, 2);

        let bytes = read(store.path());
        assert!(bytes.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(text, "Title\r\nFirst\r\nSecond\r\n");
    }

    #[test]
    fn test_header_only_when_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("empty.csv"));

        let rows: [&str; 0] = [];
        assert_eq!(store.save(&rows).unwrap(), 0);

        let bytes = read(store.path());
        assert_eq!(&bytes[UTF8_BOM.len()..], b"Title\r\n");
    }

    #[test]
    fn test_header_is_fixed_regardless_of_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("h.csv"));
        store.save(&["Name", "Title"]).unwrap();

        let bytes = read(store.path());
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(text.lines().next(), Some("Title"));
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("q.csv"));
        store.save(&["a, b", "say \"hi\"", "line\nbreak"]).unwrap();

        let bytes = read(store.path());
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(
            text,
            "Title\r\n\"a, b\"\r\n\"say \"\"hi\"\"\"\r\n\"line\nbreak\"\r\n"
        );
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("out.csv"));

        store.save(&["old 1", "old 2", "old 3"]).unwrap();
        store.save(&["new"]).unwrap();

        let bytes = read(store.path());
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(text, "Title\r\nnew\r\n");
        assert!(!text.contains("old"));
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file.
        let store = CsvStore::new(dir.path());
        assert!(store.save(&["x"]).is_err());

        let missing = CsvStore::new(dir.path().join("no/such/dir/out.csv"));
        assert!(missing.save(&["x"]).is_err());
    }
}

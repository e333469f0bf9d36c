//! Output sinks — CSV file writer with atomic tmp→rename

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Buffered CSV writer with atomic tmp→rename.
///
/// Headers are emitted from the first serialized record's field names.
/// The file only appears under its final name after [`finalize`], so a
/// crashed run never leaves a truncated CSV behind — stale `.tmp` files
/// are swept by [`cleanup_tmp_files`] on the next run.
///
/// [`finalize`]: CsvSink::finalize
pub struct CsvSink {
    writer: csv::Writer<File>,
    tmp_path: PathBuf,
    final_path: PathBuf,
    row_count: usize,
}

impl std::fmt::Debug for CsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink")
            .field("final_path", &self.final_path)
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

impl CsvSink {
    /// Create a new sink writing to `<output_dir>/<filename>` via a tmp file.
    pub fn new(output_dir: &Path, filename: &str) -> std::io::Result<Self> {
        let final_path = output_dir.join(filename);
        let tmp_path = output_dir.join(format!("{filename}.tmp"));

        // Clean up stale tmp file
        if tmp_path.exists() {
            fs::remove_file(&tmp_path)?;
        }

        let file = File::create(&tmp_path)?;
        Ok(Self {
            writer: csv::Writer::from_writer(file),
            tmp_path,
            final_path,
            row_count: 0,
        })
    }

    /// Serialize one record as a CSV row.
    pub fn write_record<T: Serialize>(&mut self, record: &T) -> std::io::Result<()> {
        self.writer
            .serialize(record)
            .map_err(std::io::Error::other)?;
        self.row_count += 1;
        Ok(())
    }

    /// Rows written so far.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Path the file will have after finalize.
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Finalize: flush and atomically rename tmp → final. Returns row count.
    pub fn finalize(mut self) -> std::io::Result<usize> {
        self.writer.flush()?;
        drop(self.writer);
        fs::rename(&self.tmp_path, &self.final_path)?;
        Ok(self.row_count)
    }
}

/// Remove stale .tmp files in the output directory
pub fn cleanup_tmp_files(output_dir: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "tmp") {
            log::warn!("Removing stale tmp file: {}", path.display());
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use tempfile::TempDir;

    #[derive(Serialize)]
    struct Row {
        id: String,
        precio: f64,
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let mut sink = CsvSink::new(dir.path(), "out.csv").unwrap();
        sink.write_record(&Row {
            id: "a".into(),
            precio: 1.5,
        })
        .unwrap();
        sink.write_record(&Row {
            id: "b".into(),
            precio: 2.0,
        })
        .unwrap();
        let rows = sink.finalize().unwrap();
        assert_eq!(rows, 2);

        let content = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("id,precio"));
        assert_eq!(lines.next(), Some("a,1.5"));
        assert_eq!(lines.next(), Some("b,2.0"));
    }

    #[test]
    fn file_absent_until_finalize() {
        let dir = TempDir::new().unwrap();
        let mut sink = CsvSink::new(dir.path(), "out.csv").unwrap();
        sink.write_record(&Row {
            id: "a".into(),
            precio: 1.0,
        })
        .unwrap();
        assert!(!dir.path().join("out.csv").exists());
        assert!(dir.path().join("out.csv.tmp").exists());
        sink.finalize().unwrap();
        assert!(dir.path().join("out.csv").exists());
        assert!(!dir.path().join("out.csv.tmp").exists());
    }

    #[test]
    fn cleanup_removes_stale_tmp() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dead.csv.tmp"), "x").unwrap();
        fs::write(dir.path().join("keep.csv"), "y").unwrap();
        cleanup_tmp_files(dir.path()).unwrap();
        assert!(!dir.path().join("dead.csv.tmp").exists());
        assert!(dir.path().join("keep.csv").exists());
    }
}

//! String-valued tabular frame with CSV I/O and hash joins.
//!
//! The merge pipeline needs a handful of table operations (inner join on
//! key columns, column renames and drops, deterministic column ordering)
//! over CSV extracts whose schemas are only known at runtime. A frame of
//! owned strings keeps every cell exactly as it appeared on disk; typed
//! interpretation happens only where a computation needs it.
//!
//! Join naming follows the usual convention for column collisions: a
//! non-key column present on both sides comes out as `{name}_x` (left)
//! and `{name}_y` (right). Repeated folds can therefore produce duplicate
//! column names; `collapse_duplicate_columns` resolves them keeping the
//! first occurrence.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result, ensure};

/// Empty cells stand for missing values throughout the pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Frame {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Index of the first column named `name`.
    pub fn col(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value by row index and column name (first occurrence).
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.col(name)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Cannot open {}", path.display()))?;
        let columns: Vec<String> = reader
            .headers()
            .with_context(|| format!("Cannot read header of {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();
        let mut frame = Frame::new(columns);
        for record in reader.records() {
            let record =
                record.with_context(|| format!("Malformed row in {}", path.display()))?;
            frame.rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(frame)
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Cannot create {}", path.display()))?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Rename the first column called `from` to `to`. No-op when absent.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if let Some(idx) = self.col(from) {
            self.columns[idx] = to.to_string();
        }
    }

    pub fn add_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// New frame with only the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Frame> {
        let indices: Vec<usize> = names
            .iter()
            .map(|n| self.col(n).with_context(|| format!("No column '{n}'")))
            .collect::<Result<_>>()?;
        let mut out = Frame::new(names.iter().map(|n| n.to_string()).collect());
        for row in &self.rows {
            out.rows.push(indices.iter().map(|&i| row[i].clone()).collect());
        }
        Ok(out)
    }

    /// Inner hash-join on equally-named key columns. Output columns are the
    /// left columns followed by the right non-key columns; non-key names
    /// present on both sides get `_x`/`_y` suffixes. Row order follows the
    /// left frame, then right match order within one left row.
    pub fn inner_join(&self, right: &Frame, keys: &[&str]) -> Result<Frame> {
        let left_keys: Vec<usize> = keys
            .iter()
            .map(|k| self.col(k).with_context(|| format!("No left key '{k}'")))
            .collect::<Result<_>>()?;
        let right_keys: Vec<usize> = keys
            .iter()
            .map(|k| right.col(k).with_context(|| format!("No right key '{k}'")))
            .collect::<Result<_>>()?;

        let key_set: HashSet<&str> = keys.iter().copied().collect();
        let left_nonkey: HashSet<&str> = self
            .columns
            .iter()
            .map(String::as_str)
            .filter(|c| !key_set.contains(c))
            .collect();
        let overlap: HashSet<&str> = right
            .columns
            .iter()
            .map(String::as_str)
            .filter(|c| left_nonkey.contains(c))
            .collect();

        let mut columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if overlap.contains(c.as_str()) {
                    format!("{c}_x")
                } else {
                    c.clone()
                }
            })
            .collect();
        let right_nonkey: Vec<usize> = (0..right.columns.len())
            .filter(|i| !right_keys.contains(i))
            .collect();
        for &i in &right_nonkey {
            let c = &right.columns[i];
            if overlap.contains(c.as_str()) {
                columns.push(format!("{c}_y"));
            } else {
                columns.push(c.clone());
            }
        }

        let mut index: HashMap<Vec<&str>, Vec<usize>> = HashMap::new();
        for (i, row) in right.rows.iter().enumerate() {
            let key: Vec<&str> = right_keys.iter().map(|&k| row[k].as_str()).collect();
            index.entry(key).or_default().push(i);
        }

        let mut out = Frame::new(columns);
        for row in &self.rows {
            let key: Vec<&str> = left_keys.iter().map(|&k| row[k].as_str()).collect();
            let Some(matches) = index.get(&key) else {
                continue;
            };
            for &m in matches {
                let mut combined = row.clone();
                combined.extend(right_nonkey.iter().map(|&i| right.rows[m][i].clone()));
                out.rows.push(combined);
            }
        }
        Ok(out)
    }

    /// Drop rows containing any empty cell.
    pub fn drop_incomplete_rows(&mut self) {
        self.rows.retain(|row| row.iter().all(|v| !v.is_empty()));
    }

    /// Keep the first occurrence of each column name, dropping later ones.
    pub fn collapse_duplicate_columns(&mut self) {
        let mut seen: HashSet<String> = HashSet::new();
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| seen.insert(c.clone()))
            .collect();
        self.apply_column_mask(&keep);
    }

    /// Drop every column whose name starts with one of the prefixes.
    pub fn drop_prefixed_columns(&mut self, prefixes: &[&str]) {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| !prefixes.iter().any(|p| c.starts_with(p)))
            .collect();
        self.apply_column_mask(&keep);
    }

    pub fn drop_column(&mut self, name: &str) {
        if let Some(idx) = self.col(name) {
            self.columns.remove(idx);
            for row in &mut self.rows {
                row.remove(idx);
            }
        }
    }

    /// Reorder columns lexicographically. Date-suffixed price columns
    /// (precio_YYYYMMDD) come out in chronological order as a consequence.
    pub fn sort_columns(&mut self) {
        let mut order: Vec<usize> = (0..self.columns.len()).collect();
        order.sort_by(|&a, &b| self.columns[a].cmp(&self.columns[b]));
        self.columns = order.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            *row = order.iter().map(|&i| row[i].clone()).collect();
        }
    }

    /// Stable row sort by the named columns, compared as strings.
    pub fn sort_rows_by(&mut self, names: &[&str]) -> Result<()> {
        let indices: Vec<usize> = names
            .iter()
            .map(|n| self.col(n).with_context(|| format!("No column '{n}'")))
            .collect::<Result<_>>()?;
        self.rows.sort_by(|a, b| {
            indices
                .iter()
                .map(|&i| a[i].cmp(&b[i]))
                .find(|o| o.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(())
    }

    /// Drop rows whose values in the named columns repeat an earlier row.
    pub fn dedup_rows_by(&mut self, names: &[&str]) -> Result<()> {
        let indices: Vec<usize> = names
            .iter()
            .map(|n| self.col(n).with_context(|| format!("No column '{n}'")))
            .collect::<Result<_>>()?;
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        self.rows
            .retain(|row| seen.insert(indices.iter().map(|&i| row[i].clone()).collect()));
        Ok(())
    }

    /// Drop rows identical to an earlier row in every column.
    pub fn dedup_rows_exact(&mut self) {
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        self.rows.retain(|row| seen.insert(row.clone()));
    }

    /// Stack frames vertically, aligning columns by name. The column set is
    /// the union in first-appearance order; cells absent from a source
    /// frame are empty.
    pub fn concat(frames: &[Frame]) -> Result<Frame> {
        ensure!(!frames.is_empty(), "Nothing to concatenate");
        let mut columns: Vec<String> = Vec::new();
        for frame in frames {
            for c in &frame.columns {
                if !columns.contains(c) {
                    columns.push(c.clone());
                }
            }
        }
        let mut out = Frame::new(columns);
        for frame in frames {
            let mapping: Vec<Option<usize>> =
                out.columns.iter().map(|c| frame.col(c)).collect();
            for row in &frame.rows {
                out.rows.push(
                    mapping
                        .iter()
                        .map(|m| m.map(|i| row[i].clone()).unwrap_or_default())
                        .collect(),
                );
            }
        }
        Ok(out)
    }

    fn apply_column_mask(&mut self, keep: &[bool]) {
        let mut iter = keep.iter();
        self.columns.retain(|_| *iter.next().unwrap());
        for row in &mut self.rows {
            let mut iter = keep.iter();
            row.retain(|_| *iter.next().unwrap());
        }
    }
}

use crate::error::AnalysisError;
use crate::geometry::PointSet;
use crate::Result;
use nalgebra::Vector3;
use std::fs;
use std::path::Path;

/// Numeric table from a cpptraj-style ASCII data file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    rows: Vec<Vec<f64>>,
}

impl DataTable {
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns present in every row
    pub fn ncols(&self) -> usize {
        self.rows.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn column(&self, index: usize) -> Result<Vec<f64>> {
        if index >= self.ncols() {
            return Err(AnalysisError::mismatch(
                "data table column",
                index + 1,
                self.ncols(),
            ));
        }
        Ok(self.rows.iter().map(|row| row[index]).collect())
    }
}

/// Parse whitespace-separated columns.
///
/// Lines starting with `#`, lines with fewer than two columns and lines
/// holding a non-numeric token are skipped.
pub fn parse_columns(text: &str) -> DataTable {
    let rows = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                return None;
            }
            parts
                .iter()
                .map(|p| p.parse::<f64>())
                .collect::<std::result::Result<Vec<f64>, _>>()
                .ok()
        })
        .collect();
    DataTable { rows }
}

pub fn load_columns<P: AsRef<Path>>(path: P) -> Result<DataTable> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let table = parse_columns(&text);
    tracing::debug!(path = %path.display(), rows = table.len(), "Loaded data table");
    Ok(table)
}

/// Parse a multi-frame XYZ file: atom count, comment, then `label x y z` lines
pub fn parse_xyz_frames(text: &str) -> Result<Vec<PointSet>> {
    let lines: Vec<&str> = text.lines().collect();
    let mut frames = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].trim().is_empty() {
            i += 1;
            continue;
        }
        let count: usize = lines[i].trim().parse().map_err(|_| {
            AnalysisError::parse(i + 1, format!("expected atom count, found '{}'", lines[i].trim()))
        })?;
        // Skip the comment line
        let first = i + 2;
        if first > lines.len() || count > lines.len() - first {
            return Err(AnalysisError::parse(
                lines.len(),
                format!("frame declares {} atoms but the file ends early", count),
            ));
        }

        let mut points = Vec::with_capacity(count);
        for (offset, line) in lines[first..first + count].iter().enumerate() {
            let line_no = first + offset + 1;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return Err(AnalysisError::parse(line_no, "expected 'label x y z'"));
            }
            let mut xyz = [0.0f64; 3];
            for (slot, token) in xyz.iter_mut().zip(&parts[1..4]) {
                *slot = token.parse().map_err(|_| {
                    AnalysisError::parse(line_no, format!("invalid coordinate '{}'", token))
                })?;
            }
            points.push(Vector3::new(xyz[0], xyz[1], xyz[2]));
        }
        frames.push(PointSet::new(points));
        i = first + count;
    }

    Ok(frames)
}

pub fn load_xyz_frames<P: AsRef<Path>>(path: P) -> Result<Vec<PointSet>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let frames = parse_xyz_frames(&text)?;
    tracing::debug!(path = %path.display(), frames = frames.len(), "Loaded XYZ frames");
    Ok(frames)
}

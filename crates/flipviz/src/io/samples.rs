//! Checkpoint sample files: `x density [err]` rows.
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array1;

use crate::config::AxisBounds;
use crate::error::PlotError;
use crate::io::table::read_numeric_table;
use crate::paths::ExperimentPaths;

/// Empirical density estimate captured at one update count, sorted by `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensitySamples {
    pub update_count: Option<u64>,
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    /// Per-sample uncertainty, present when the file has a third column.
    pub err: Option<Array1<f64>>,
}

impl DensitySamples {
    /// Pair up the columns, sorted by `x`. Every column must have as many values as `x`.
    pub fn new(x: Vec<f64>, y: Vec<f64>, err: Option<Vec<f64>>) -> Result<Self, PlotError> {
        for found in std::iter::once(y.len()).chain(err.as_ref().map(Vec::len)) {
            if found != x.len() {
                return Err(PlotError::ColumnLengthMismatch {
                    expected: x.len(),
                    found,
                });
            }
        }
        let mut order: Vec<usize> = (0..x.len()).collect();
        order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));
        let pick = |v: &[f64]| order.iter().map(|&i| v[i]).collect::<Array1<f64>>();
        Ok(Self {
            update_count: None,
            x: pick(&x),
            y: pick(&y),
            err: err.as_deref().map(pick),
        })
    }

    pub fn with_update_count(mut self, update_count: u64) -> Self {
        self.update_count = Some(update_count);
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Smallest positive gap between neighbouring `x` values.
    pub fn bar_width(&self) -> Option<f64> {
        self.x
            .iter()
            .zip(self.x.iter().skip(1))
            .map(|(a, b)| b - a)
            .filter(|d| *d > 0.0)
            .reduce(f64::min)
    }

    /// Rescale so the bars enclose unit area, for files holding raw counts.
    pub fn normalized(&self, fallback_width: f64) -> Self {
        let width = self.bar_width().unwrap_or(fallback_width);
        let area: f64 = self.y.sum() * width;
        if area <= 0.0 {
            return self.clone();
        }
        Self {
            update_count: self.update_count,
            x: self.x.clone(),
            y: &self.y / area,
            err: self.err.as_ref().map(|e| e / area),
        }
    }

    pub fn count_outside(&self, bounds: &AxisBounds) -> usize {
        self.x.iter().filter(|&&x| !bounds.contains_x(x)).count()
    }
}

/// Read a checkpoint sample file with two (`x y`) or three (`x y err`) columns.
pub fn read_density_samples<P: AsRef<Path>>(path: P) -> Result<DensitySamples> {
    let table = read_numeric_table(&path)?;
    if table.columns != 2 && table.columns != 3 {
        return Err(table
            .malformed(
                0,
                format!("expected 2 or 3 columns (x, y[, err]), found {}", table.columns),
            )
            .into());
    }

    let err = if table.columns == 3 {
        let err = table.column(2);
        if let Some(idx) = err.iter().position(|e| *e < 0.0) {
            return Err(table
                .malformed(idx, format!("negative uncertainty {}", err[idx]))
                .into());
        }
        Some(err)
    } else {
        None
    };

    Ok(DensitySamples::new(table.column(0), table.column(1), err)?)
}

/// Resolve and load the samples of one checkpoint, naming the update count on failure.
pub fn load_checkpoint(paths: &ExperimentPaths, update_count: u64) -> Result<DensitySamples> {
    let path = paths.checkpoint_path(update_count);
    if !path.is_file() {
        return Err(PlotError::MissingCheckpoint { update_count, path }.into());
    }
    let samples = read_density_samples(&path).with_context(|| {
        format!(
            "Failed to load checkpoint for update count {}: {}",
            update_count,
            path.display()
        )
    })?;
    log::debug!(
        "Loaded {} samples for update count {} from {}",
        samples.len(),
        update_count,
        path.display()
    );
    Ok(samples.with_update_count(update_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_samples_are_sorted_by_x() {
        let samples = DensitySamples::new(
            vec![1.0, -1.0, 0.0],
            vec![0.3, 0.1, 0.2],
            Some(vec![0.03, 0.01, 0.02]),
        )
        .unwrap();
        assert_eq!(samples.x.to_vec(), vec![-1.0, 0.0, 1.0]);
        assert_eq!(samples.y.to_vec(), vec![0.1, 0.2, 0.3]);
        assert_eq!(samples.err.unwrap().to_vec(), vec![0.01, 0.02, 0.03]);
    }

    #[test]
    fn test_rejects_columns_of_different_length() {
        assert_eq!(
            DensitySamples::new(vec![0.0, 1.0], vec![0.1], None).unwrap_err(),
            PlotError::ColumnLengthMismatch {
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            DensitySamples::new(vec![0.0, 1.0], vec![0.1, 0.2], Some(vec![0.01; 3])).unwrap_err(),
            PlotError::ColumnLengthMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_bar_width_uses_smallest_gap() {
        let samples = DensitySamples::new(vec![0.0, 0.5, 1.5, 2.0], vec![1.0; 4], None).unwrap();
        assert_eq!(samples.bar_width(), Some(0.5));
        let single = DensitySamples::new(vec![0.0], vec![1.0], None).unwrap();
        assert_eq!(single.bar_width(), None);
    }

    #[test]
    fn test_normalized_has_unit_area() {
        let samples = DensitySamples::new(vec![0.0, 0.5, 1.0], vec![2.0, 4.0, 2.0], None).unwrap();
        let normalized = samples.normalized(1.0);
        let area: f64 = normalized.y.sum() * 0.5;
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_load_checkpoint_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ExperimentPaths::new(dir.path(), "exp").unwrap();
        let err = load_checkpoint(&paths, 60).unwrap_err();
        match err.downcast_ref::<PlotError>() {
            Some(PlotError::MissingCheckpoint { update_count, path }) => {
                assert_eq!(*update_count, 60);
                assert_eq!(path, &dir.path().join("exp-pdf-60.out"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_load_checkpoint_tags_update_count() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ExperimentPaths::new(dir.path(), "exp").unwrap();
        fs::write(paths.checkpoint_path(40), "-1 0.1 0.01\n1 0.2 0.02\n").unwrap();
        let samples = load_checkpoint(&paths, 40).unwrap();
        assert_eq!(samples.update_count, Some(40));
        assert_eq!(samples.len(), 2);
        assert!(samples.err.is_some());
    }

    #[test]
    fn test_malformed_checkpoint_mentions_update_count() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ExperimentPaths::new(dir.path(), "exp").unwrap();
        fs::write(paths.checkpoint_path(340), "-1 0.1\n1 oops\n").unwrap();
        let err = load_checkpoint(&paths, 340).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("update count 340"), "{}", message);
        assert!(matches!(
            err.downcast_ref::<PlotError>(),
            Some(PlotError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_wrong_column_count_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("four.out");
        fs::write(&path, "1 2 3 4\n").unwrap();
        assert!(read_density_samples(&path).is_err());
    }
}

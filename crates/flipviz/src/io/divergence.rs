//! KL-divergence trace: one `update_count kld` row per evaluation.
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array1;

use crate::io::table::read_numeric_table;

#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceTrace {
    pub counts: Vec<u64>,
    pub kld: Array1<f64>,
}

impl DivergenceTrace {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Points with `count_min <= count <= count_max`, in count order.
    pub fn points_within(&self, count_min: u64, count_max: u64) -> Vec<(f64, f64)> {
        self.counts
            .iter()
            .zip(self.kld.iter())
            .filter(|(c, _)| **c >= count_min && **c <= count_max)
            .map(|(c, k)| (*c as f64, *k))
            .collect()
    }

    pub fn value_at(&self, update_count: u64) -> Option<f64> {
        self.counts
            .iter()
            .position(|c| *c == update_count)
            .map(|idx| self.kld[idx])
    }
}

/// Read a divergence trace; update counts must be non-negative integers.
pub fn read_divergence_trace<P: AsRef<Path>>(path: P) -> Result<DivergenceTrace> {
    let path = path.as_ref();
    let table = read_numeric_table(path)
        .with_context(|| format!("Failed to load divergence trace: {}", path.display()))?;
    if table.columns != 2 {
        return Err(table
            .malformed(
                0,
                format!("expected 2 columns (update_count, kld), found {}", table.columns),
            )
            .into());
    }

    let mut rows: Vec<(u64, f64)> = Vec::with_capacity(table.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let count = row[0];
        if count < 0.0 || count.fract() != 0.0 || count > u64::MAX as f64 {
            return Err(table
                .malformed(idx, format!("update count {} is not a non-negative integer", count))
                .into());
        }
        rows.push((count as u64, row[1]));
    }
    rows.sort_by_key(|(count, _)| *count);

    log::debug!("Loaded {} divergence rows from {}", rows.len(), path.display());

    Ok(DivergenceTrace {
        counts: rows.iter().map(|(c, _)| *c).collect(),
        kld: rows.iter().map(|(_, k)| *k).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlotError;
    use std::fs;

    #[test]
    fn test_reads_and_sorts_trace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exp-kld.out");
        fs::write(&path, "60 0.08\n40.0 0.12\n500 0.01\n").unwrap();
        let trace = read_divergence_trace(&path).unwrap();
        assert_eq!(trace.counts, vec![40, 60, 500]);
        assert_eq!(trace.kld.to_vec(), vec![0.12, 0.08, 0.01]);
        assert_eq!(trace.value_at(60), Some(0.08));
        assert_eq!(trace.value_at(70), None);
    }

    #[test]
    fn test_points_within_is_inclusive() {
        let trace = DivergenceTrace {
            counts: vec![10, 40, 250, 500, 510],
            kld: Array1::from_vec(vec![0.2, 0.1, 0.05, 0.01, 0.009]),
        };
        let points = trace.points_within(40, 500);
        assert_eq!(points, vec![(40.0, 0.1), (250.0, 0.05), (500.0, 0.01)]);
    }

    #[test]
    fn test_fractional_count_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exp-kld.out");
        fs::write(&path, "40 0.1\n40.5 0.2\n").unwrap();
        let err = read_divergence_trace(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlotError>(),
            Some(PlotError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_three_columns_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exp-kld.out");
        fs::write(&path, "40 0.1 0.2\n").unwrap();
        assert!(read_divergence_trace(&path).is_err());
    }
}

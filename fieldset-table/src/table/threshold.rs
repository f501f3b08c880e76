//! Running-sum threshold classification

use log::trace;

use super::TableRow;
use super::number::round_to;

/// Running sum over the threshold field for one pass over the rows.
///
/// A fresh accumulator starts at zero. It is created at the start of every
/// build or reorder pass and dropped at its end, so no sum carries over
/// between independent operations.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdAccumulator {
    threshold: f64,
    accuracy: u32,
    running_sum: f64,
}

/// Outcome of adding one row's value to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdStep {
    /// Sum up to and including this row.
    pub running_sum: f64,
    /// True if this row took the sum over the threshold.
    pub crossed: bool,
}

impl ThresholdAccumulator {
    /// Creates an accumulator at zero.
    pub fn new(threshold: f64, accuracy: u32) -> Self {
        Self {
            threshold,
            accuracy,
            running_sum: 0.0,
        }
    }

    /// Adds a value, rounding both the value and the new sum to the configured
    /// accuracy.
    ///
    /// Only the step where the sum goes from at-or-below the threshold to
    /// above it reports `crossed`.
    pub fn add(&mut self, value: f64) -> ThresholdStep {
        let previous = self.running_sum;
        let running_sum = round_to(previous + round_to(value, self.accuracy), self.accuracy);
        self.running_sum = running_sum;
        ThresholdStep {
            running_sum,
            crossed: running_sum > self.threshold && previous <= self.threshold,
        }
    }

    /// Returns the current sum.
    pub fn running_sum(&self) -> f64 {
        self.running_sum
    }
}

/// Feeds a built row's threshold cell into the accumulator and stamps the row.
///
/// Rows whose threshold cell is absent, non-numeric or falsy do not
/// contribute and keep `running_sum` unset.
pub(crate) fn stamp_row(row: &mut TableRow, acc: &mut ThresholdAccumulator) {
    let Some(value) = row
        .cells
        .iter()
        .find(|c| c.is_threshold && c.field_type.is_numeric() && c.value.is_truthy())
        .and_then(|c| c.value.as_f64())
    else {
        return;
    };

    let step = acc.add(value);
    row.running_sum = Some(step.running_sum);
    if step.crossed {
        trace!("threshold crossed at row {:?} (sum {})", row.id(), step.running_sum);
        row.classes.threshold = true;
    }
}

/// Reclassifies every row from scratch in the given order.
pub(crate) fn classify_rows(rows: &mut [TableRow], threshold: f64, accuracy: u32, draggable: bool) {
    let mut acc = ThresholdAccumulator::new(threshold, accuracy);
    for row in rows.iter_mut() {
        row.classes = super::RowClasses::base(draggable);
        row.running_sum = None;
        stamp_row(row, &mut acc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_the_crossing_step_is_flagged() {
        let mut acc = ThresholdAccumulator::new(8.0, 2);
        let steps: Vec<_> = [5.0, 5.0, 5.0].iter().map(|v| acc.add(*v)).collect();

        assert_eq!(
            steps.iter().map(|s| s.crossed).collect::<Vec<_>>(),
            vec![false, true, false]
        );
        assert_eq!(steps[2].running_sum, 15.0);
    }

    #[test]
    fn test_reaching_the_threshold_exactly_does_not_cross() {
        let mut acc = ThresholdAccumulator::new(10.0, 2);
        assert!(!acc.add(10.0).crossed);
        assert!(acc.add(0.01).crossed);
    }

    #[test]
    fn test_sum_is_rounded_each_step() {
        let mut acc = ThresholdAccumulator::new(100.0, 2);
        acc.add(0.1);
        acc.add(0.2);
        assert_eq!(acc.running_sum(), 0.3);
    }

    #[test]
    fn test_value_is_rounded_before_it_is_added() {
        let mut acc = ThresholdAccumulator::new(1.0, 0);
        assert_eq!(acc.add(0.4).running_sum, 0.0);
        assert_eq!(acc.add(0.6).running_sum, 1.0);
        assert!(acc.add(0.6).crossed);
    }
}

use std::{cmp::Ordering, slice::Iter};

/// The objective value of a solution: the weighted total and the raw value of every indicator
/// (in the order of the summands of the objective).
///
/// Higher totals are better.
#[derive(Debug, Clone)]
pub struct ObjectiveValue {
    total: f64,
    indicator_values: Vec<f64>,
}

impl ObjectiveValue {
    pub(super) fn new(total: f64, indicator_values: Vec<f64>) -> ObjectiveValue {
        ObjectiveValue {
            total,
            indicator_values,
        }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn iter(&self) -> Iter<f64> {
        self.indicator_values.iter()
    }

    /// method for printing the difference between two values in green (improvement) or red
    pub(super) fn print_difference(value: f64, value_for_comparison: f64) -> String {
        if value > value_for_comparison {
            format!("(\x1b[0;32m+{:2.1}\x1b[0m)", value - value_for_comparison)
        } else if value < value_for_comparison {
            format!("(\x1b[0;31m-{:2.1}\x1b[0m)", value_for_comparison - value)
        } else {
            String::new()
        }
    }
}

impl Ord for ObjectiveValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total.total_cmp(&other.total)
    }
}

impl PartialOrd for ObjectiveValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ObjectiveValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for ObjectiveValue {}

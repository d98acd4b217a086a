use std::fmt;

use crate::{EvaluatedSolution, Indicator, ObjectiveValue};

/// Defines the figures of a solution that form the objective.
/// It is static throughout optimization.
///
/// The objective is a linear combination of indicators and is to be maximized. Costs enter with
/// a negative coefficient.
pub struct Objective<S> {
    summands: Vec<(f64, Box<dyn Indicator<S>>)>,
}

impl<S> Objective<S> {
    pub fn new(summands: Vec<(f64, Box<dyn Indicator<S>>)>) -> Objective<S> {
        Objective { summands }
    }

    pub fn evaluate(&self, solution: S) -> EvaluatedSolution<S> {
        let objective_value = self.objective_value(&solution);
        EvaluatedSolution::new(solution, objective_value)
    }

    pub fn objective_value(&self, solution: &S) -> ObjectiveValue {
        let indicator_values: Vec<f64> = self
            .summands
            .iter()
            .map(|(_, indicator)| indicator.evaluate(solution))
            .collect();
        let total = self
            .summands
            .iter()
            .zip(indicator_values.iter())
            .map(|((coefficient, _), value)| coefficient * value)
            .sum();
        ObjectiveValue::new(total, indicator_values)
    }

    pub fn indicator_names(&self) -> impl Iterator<Item = String> + '_ {
        self.summands.iter().map(|(_, indicator)| indicator.name())
    }

    pub fn print_objective_value(&self, objective_value: &ObjectiveValue) {
        println!("objective ({}): {:.2}", self, objective_value.total());
        for ((_, indicator), value) in self.summands.iter().zip(objective_value.iter()) {
            println!("  {}: {:.2}", indicator.name(), value);
        }
    }

    pub fn print_objective_value_with_comparison(
        &self,
        objective_value: &ObjectiveValue,
        comparison: &ObjectiveValue,
    ) {
        println!(
            "objective: {:.2} {}",
            objective_value.total(),
            ObjectiveValue::print_difference(objective_value.total(), comparison.total())
        );
        for (((_, indicator), value), comparison_value) in self
            .summands
            .iter()
            .zip(objective_value.iter())
            .zip(comparison.iter())
        {
            println!(
                "  {}: {:.2} {}",
                indicator.name(),
                value,
                ObjectiveValue::print_difference(*value, *comparison_value)
            );
        }
    }

    pub fn objective_value_to_json(&self, objective_value: &ObjectiveValue) -> serde_json::Value {
        let mut indicators = serde_json::Map::new();
        for ((_, indicator), value) in self.summands.iter().zip(objective_value.iter()) {
            indicators.insert(indicator.name(), serde_json::json!(value));
        }
        serde_json::json!({
            "objective": objective_value.total(),
            "indicators": indicators,
        })
    }
}

/// The objective as formula, e.g. `production - mobilisation - 1000*landingExcess`.
impl<S> fmt::Display for Objective<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (coefficient, indicator)) in self.summands.iter().enumerate() {
            let sign = if *coefficient < 0.0 { "-" } else { "+" };
            if i > 0 {
                write!(f, " {} ", sign)?;
            } else if sign == "-" {
                write!(f, "-")?;
            }
            if coefficient.abs() == 1.0 {
                write!(f, "{}", indicator.name())?;
            } else {
                write!(f, "{}*{}", coefficient.abs(), indicator.name())?;
            }
        }
        Ok(())
    }
}

pub mod evaluated_solution;
pub mod indicator;
pub mod objective;
pub mod objective_value;

pub use evaluated_solution::EvaluatedSolution;
pub use indicator::Indicator;
pub use objective::Objective;
pub use objective_value::ObjectiveValue;

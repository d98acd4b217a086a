pub mod base_types;
pub mod calendar;
pub mod error;
pub mod json_serialisation;
pub mod mobilisation;
pub mod operational_problem;
pub mod problem;
pub mod test_utilities;

pub use error::ModelError;
pub use operational_problem::OperationalProblem;
pub use problem::Problem;

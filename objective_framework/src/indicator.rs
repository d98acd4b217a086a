/// A single figure of a solution, e.g. produced volume or mobilisation cost.
pub trait Indicator<S>: Send + Sync {
    fn evaluate(&self, solution: &S) -> f64;

    fn name(&self) -> String;
}

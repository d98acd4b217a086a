use model::json_serialisation::load_problem_from_json;
use model::OperationalProblem;
use solver::{MultiStart, RunHooks, SolverConfig, SolverError};

use std::sync::Arc;
use std::time as stdtime;

/// Loads the scenario (with its optional `solver` section), runs all attempts and returns the
/// result record of the best one together with a summary of every attempt.
pub fn run(input_data: serde_json::Value, hooks: RunHooks) -> Result<serde_json::Value, SolverError> {
    let config = match input_data.get("solver") {
        Some(solver_config) => SolverConfig::from_json(solver_config.clone())?,
        None => SolverConfig::default(),
    };
    let problem = load_problem_from_json(input_data)?;
    let problem = Arc::new(OperationalProblem::build(Arc::new(problem))?);
    let config = SolverConfig {
        scenario_name: config
            .scenario_name
            .or_else(|| Some(problem.problem().name.clone())),
        ..config
    };
    let verbose = config.verbose;
    let start_time = stdtime::Instant::now();

    let multi_start = MultiStart::new(problem.clone(), config, hooks)?;
    let result = multi_start.run()?;

    let runtime_duration = stdtime::Instant::now().duration_since(start_time);

    if verbose {
        println!("\n\nFinal schedule:");
        result.best.schedule.print(&problem);
    }
    println!("\nAttempts:");
    for attempt in result.attempts.iter() {
        match (&attempt.objective, &attempt.error) {
            (Some(objective), _) => println!(
                "  {} (seed {}, preset {}): {:.2}",
                attempt.index,
                attempt.seed,
                attempt.preset.as_deref().unwrap_or("-"),
                objective
            ),
            (None, Some(error)) => println!(
                "  {} (seed {}): failed: {}",
                attempt.index, attempt.seed, error
            ),
            (None, None) => {}
        }
    }
    println!(
        "\nFinal objective value: {:.2} ({})",
        result.best.objective, result.best.meta.telemetry_run_id
    );
    println!("Running time: {:0.2}sec", runtime_duration.as_secs_f32());

    Ok(serde_json::json!({
        "objectiveValue": result.best.objective,
        "result": result.best.to_json(),
        "attempts": result.attempts,
    }))
}

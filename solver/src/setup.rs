use std::ops::Range;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use model::OperationalProblem;
use objective_framework::Objective;
use solution::json_serialisation::schedule_from_rows;
use solution::Schedule;

use crate::cancellation::CancellationToken;
use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::greedy::Greedy;
use crate::locks::LockedAssignments;
use crate::objective::{self, ScheduleWithKpis};
use crate::operators::{OperatorContext, OperatorRegistry};
use crate::repair::{RepairEngine, RepairStats};
use crate::telemetry::{NoTelemetry, RunRecorder, TelemetrySink};
use crate::watch::WatchPublisher;
use crate::Solution;

/// The collaborators injected into a run.
#[derive(Clone)]
pub struct RunHooks {
    pub telemetry: Arc<dyn TelemetrySink>,
    pub watch: Option<WatchPublisher>,
    pub cancellation: Option<CancellationToken>,
}

impl Default for RunHooks {
    fn default() -> Self {
        RunHooks {
            telemetry: Arc::new(NoTelemetry),
            watch: None,
            cancellation: None,
        }
    }
}

impl RunHooks {
    pub fn with_telemetry(telemetry: Arc<dyn TelemetrySink>) -> RunHooks {
        RunHooks {
            telemetry,
            ..RunHooks::default()
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map_or(false, |token| token.is_cancelled())
    }
}

/// Everything a search driver needs, resolved and validated once per run: the problem, the
/// objective, the operator registry, the locks, the repair engine and the worker pool.
pub struct SearchSetup {
    problem: Arc<OperationalProblem>,
    config: SolverConfig,
    objective: Arc<Objective<ScheduleWithKpis>>,
    registry: OperatorRegistry,
    locks: Arc<LockedAssignments>,
    repair: RepairEngine,
    warm_start: Option<Schedule>,
    pool: Option<rayon::ThreadPool>,
    hooks: RunHooks,
}

impl SearchSetup {
    pub fn new(
        problem: Arc<OperationalProblem>,
        config: SolverConfig,
        hooks: RunHooks,
    ) -> Result<SearchSetup, SolverError> {
        config.validate()?;
        let registry = OperatorRegistry::from_config(&config)?;
        let locks = Arc::new(LockedAssignments::from_config(
            &problem,
            &config.locked_assignments,
        )?);
        let warm_start = if config.initial_assignments.is_empty() {
            None
        } else {
            Some(
                schedule_from_rows(&config.initial_assignments, &problem)
                    .map_err(|err| SolverError::InvalidConfig(format!("initial assignments: {}", err)))?,
            )
        };
        let pool = if config.workers() > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.workers())
                    .build()
                    .map_err(|err| SolverError::InvalidConfig(err.to_string()))?,
            )
        } else {
            None
        };
        Ok(SearchSetup {
            objective: Arc::new(objective::build(config.landing_penalty)),
            repair: RepairEngine::new(problem.clone(), locks.clone()),
            problem,
            config,
            registry,
            locks,
            warm_start,
            pool,
            hooks,
        })
    }

    pub fn problem(&self) -> &OperationalProblem {
        &self.problem
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn objective(&self) -> Arc<Objective<ScheduleWithKpis>> {
        self.objective.clone()
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    pub fn locks(&self) -> &LockedAssignments {
        &self.locks
    }

    pub fn repair_stats(&self) -> RepairStats {
        self.repair.stats()
    }

    pub fn is_cancelled(&self) -> bool {
        self.hooks.is_cancelled()
    }

    pub fn scenario(&self) -> String {
        self.config
            .scenario_name
            .clone()
            .unwrap_or_else(|| self.problem.problem().name.clone())
    }

    /// Deterministic id of a run: `{solver}-{seed}`.
    pub fn run_id(&self, solver: &str) -> String {
        format!("{}-{}", solver, self.config.seed)
    }

    pub fn evaluate(&self, schedule: Schedule) -> Solution {
        self.objective
            .evaluate(ScheduleWithKpis::new(schedule, &self.problem))
    }

    /// Re-imposes the locks and repairs the dirty slots.
    pub fn sanitize(&self, mut schedule: Schedule) -> Schedule {
        self.locks.impose(&mut schedule);
        self.repair.limited(schedule).0
    }

    /// Greedy construction (or the warm start) with the locks imposed and fully repaired.
    pub fn initial_solution(&self) -> Solution {
        let mut schedule = match &self.warm_start {
            Some(schedule) => schedule.clone(),
            None => Greedy::new(self.problem.clone(), self.locks.clone()).construct(),
        };
        self.locks.impose(&mut schedule);
        let (schedule, _) = self.repair.full(schedule);
        self.evaluate(schedule)
    }

    /// Lets the registry pick an operator and build a sanitized neighbor.
    pub fn propose(
        &self,
        schedule: &Schedule,
        rng: &mut StdRng,
        strength: usize,
    ) -> Option<(&'static str, Schedule)> {
        let sanitizer = |candidate: Schedule| self.sanitize(candidate);
        let mut context = OperatorContext {
            problem: &self.problem,
            schedule,
            locks: &self.locks,
            sanitizer: &sanitizer,
            rng,
            strength,
        };
        self.registry.propose(&mut context)
    }

    /// Random stream of one iteration. Independent of the order in which iterations are
    /// evaluated.
    pub fn iteration_rng(&self, iteration: usize) -> StdRng {
        StdRng::seed_from_u64(mix_seed(self.config.seed, iteration as u64))
    }

    /// Number of iterations whose candidates are built at once (at least 1).
    pub fn batch_span(&self) -> usize {
        self.config.batch_size().max(1)
    }

    /// Maps `f` over the range on the worker pool of the run. The results keep the order of
    /// the range.
    pub fn map_batch<T, F>(&self, range: Range<usize>, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        match &self.pool {
            Some(pool) if range.len() > 1 => pool.install(|| range.into_par_iter().map(f).collect()),
            _ => range.map(f).collect(),
        }
    }

    /// Share of the workers that a batch of `batch` candidates keeps busy.
    pub fn worker_utilisation(&self, batch: usize) -> f64 {
        let workers = self.config.workers().max(1);
        batch.min(workers) as f64 / workers as f64
    }

    pub(crate) fn recorder(&self, solver: &'static str) -> RunRecorder {
        RunRecorder::new(
            self.run_id(solver),
            solver,
            self.scenario(),
            self.config.iterations,
            self.config.snapshot_interval,
            self.hooks.telemetry.clone(),
            self.hooks.watch.clone(),
            self.config.verbose,
        )
    }
}

/// Derives an independent seed for a sub-stream (splitmix64 finalizer).
pub fn mix_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

use model::OperationalProblem;
use objective_framework::{Indicator, Objective};
use solution::evaluation::evaluate;
use solution::{Schedule, ScheduleKpis};

/// A schedule together with its key figures, so that the indicators need no replay.
#[derive(Clone, Debug)]
pub struct ScheduleWithKpis {
    schedule: Schedule,
    kpis: ScheduleKpis,
}

impl ScheduleWithKpis {
    pub fn new(schedule: Schedule, problem: &OperationalProblem) -> ScheduleWithKpis {
        let kpis = evaluate(problem, &schedule);
        ScheduleWithKpis { schedule, kpis }
    }

    pub fn get_schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn get_kpis(&self) -> &ScheduleKpis {
        &self.kpis
    }
}

/// Volume removed from the blocks.
struct ProductionIndicator;

impl Indicator<ScheduleWithKpis> for ProductionIndicator {
    fn evaluate(&self, schedule_with_kpis: &ScheduleWithKpis) -> f64 {
        schedule_with_kpis.get_kpis().production
    }

    fn name(&self) -> String {
        String::from("production")
    }
}

/// Sum of the relocation costs of all machines.
struct MobilisationIndicator;

impl Indicator<ScheduleWithKpis> for MobilisationIndicator {
    fn evaluate(&self, schedule_with_kpis: &ScheduleWithKpis) -> f64 {
        schedule_with_kpis.get_kpis().mobilisation_cost
    }

    fn name(&self) -> String {
        String::from("mobilisation")
    }
}

/// Number of slots held by machines beyond the daily capacity of a landing.
struct LandingExcessIndicator;

impl Indicator<ScheduleWithKpis> for LandingExcessIndicator {
    fn evaluate(&self, schedule_with_kpis: &ScheduleWithKpis) -> f64 {
        schedule_with_kpis.get_kpis().landing_excess as f64
    }

    fn name(&self) -> String {
        String::from("landingExcess")
    }
}

/// production - mobilisation - landing_penalty * landingExcess (maximized)
pub fn build(landing_penalty: f64) -> Objective<ScheduleWithKpis> {
    Objective::new(vec![
        (
            1.0,
            Box::new(ProductionIndicator) as Box<dyn Indicator<ScheduleWithKpis>>,
        ),
        (-1.0, Box::new(MobilisationIndicator)),
        (-landing_penalty, Box::new(LandingExcessIndicator)),
    ])
}

pub mod evaluation;
pub mod json_serialisation;
mod schedule;
pub mod sequencing;
pub mod test_utilities;

pub use evaluation::ScheduleKpis;
pub use schedule::{Schedule, SlotChange};
pub use sequencing::{SequencingOutcome, SequencingTracker, Violation};

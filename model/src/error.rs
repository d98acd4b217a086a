use derive_more::Display;

/// Structural errors in a scenario. They are raised while the problem is built, never during
/// search.
#[derive(Display, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[display(fmt = "block '{}' references undefined harvest system '{}'", block, system)]
    UnknownHarvestSystem { block: String, system: String },
    #[display(fmt = "harvest system '{}' references undefined role '{}'", system, role)]
    UnknownRole { system: String, role: String },
    #[display(fmt = "block '{}' references undefined landing '{}'", block, landing)]
    UnknownLanding { block: String, landing: String },
    #[display(fmt = "unknown machine '{}'", _0)]
    UnknownMachine(String),
    #[display(fmt = "unknown block '{}'", _0)]
    UnknownBlock(String),
    #[display(fmt = "unknown shift '{}'", _0)]
    UnknownShift(String),
    #[display(fmt = "head start {} of role '{}' in system '{}' is negative", value, role, system)]
    InvalidHeadStart {
        system: String,
        role: String,
        value: f64,
    },
    #[display(fmt = "invalid scenario: {}", _0)]
    InvalidScenario(String),
}

impl std::error::Error for ModelError {}

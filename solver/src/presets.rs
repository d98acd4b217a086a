/// A named weight vector for the operator registry plus auxiliary knobs. Knobs left `None`
/// fall back to the configuration defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub weights: &'static [(&'static str, f64)],
    pub batch_size: Option<usize>,
    pub workers: Option<usize>,
    pub perturbation_strength: Option<usize>,
    pub tabu_tenure: Option<usize>,
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "balanced",
        weights: &[
            ("swap", 1.0),
            ("move", 1.0),
            ("block_insertion", 0.5),
            ("cross_exchange", 0.5),
            ("mobilisation_shake", 0.2),
        ],
        batch_size: None,
        workers: None,
        perturbation_strength: None,
        tabu_tenure: None,
    },
    Preset {
        name: "explore",
        weights: &[
            ("swap", 1.0),
            ("move", 1.0),
            ("block_insertion", 1.0),
            ("cross_exchange", 1.0),
            ("mobilisation_shake", 0.5),
        ],
        batch_size: Some(4),
        workers: Some(4),
        perturbation_strength: Some(5),
        tabu_tenure: Some(20),
    },
    Preset {
        name: "mobilisation",
        weights: &[
            ("swap", 0.5),
            ("move", 0.5),
            ("block_insertion", 0.8),
            ("cross_exchange", 0.3),
            ("mobilisation_shake", 1.5),
        ],
        batch_size: None,
        workers: None,
        perturbation_strength: Some(3),
        tabu_tenure: None,
    },
    Preset {
        name: "stabilise",
        weights: &[
            ("swap", 0.5),
            ("move", 1.5),
            ("block_insertion", 0.0),
            ("cross_exchange", 0.0),
            ("mobilisation_shake", 0.0),
        ],
        batch_size: Some(1),
        workers: Some(1),
        perturbation_strength: Some(1),
        tabu_tenure: Some(5),
    },
];

pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

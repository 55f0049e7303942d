pub mod loaders;
pub mod record;
pub mod scenario;
pub mod solution;

pub use loaders::{load_scenario, load_scenario_or_builtin};
pub use record::{Combo, Record, Scalar};
pub use scenario::{nse_vs_sdr, Scenario, ScenarioFile};
pub use solution::{filter_solved, Solution, SolveResult};

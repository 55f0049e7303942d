pub mod toml_loader;

pub use toml_loader::{load_scenario, load_scenario_or_builtin};

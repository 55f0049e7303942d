pub mod exporter;
pub mod solver;

pub use exporter::{DebugBundle, Exporter};
pub use solver::Solver;

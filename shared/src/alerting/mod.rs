//! Weather-threshold alerting: rule evaluation, dispatch de-duplication and
//! fetch cycle coordination

pub mod cycle;
pub mod evaluator;
pub mod guard;

pub use cycle::{AlertCycle, CycleOutcome, SnapshotSequence};
pub use evaluator::{evaluate, evaluate_rules, is_heavy_rain, RuleOutcome};
pub use guard::{DispatchGuard, GuardState};

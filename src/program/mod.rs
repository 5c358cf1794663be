//! Contract programs: a DAG of contract algorithms under a time budget.
//!
//! [`ContractProgram`] ties together the DAG, the performance profile
//! store, and the current [`Allocation`]. It evaluates the expected
//! global utility of any allocation and can optimize its own allocation
//! with [`HillClimbRunner`](crate::climb::HillClimbRunner).

mod allocation;
mod config;
mod contract;
mod propagation;

pub use allocation::Allocation;
pub use config::{GlobalUtility, ProgramConfig};
pub use contract::ContractProgram;
pub use propagation::QualityPropagator;

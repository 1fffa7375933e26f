//! Kernel operations of the reference B-rep kernel.
//!
//! Operations never edit existing entities. Each one adds what it creates,
//! reuses what it leaves untouched, and reports the rest through an
//! [`OperationHistory`].

pub mod creation;
pub mod history;
pub mod modification;
pub mod query;
pub mod transform;

pub use history::OperationHistory;

//! Persistent naming of B-rep sub-shapes across parametric recomputation.
//!
//! A small reference kernel ([`topology`], [`operations`]) produces shapes;
//! [`identity`] gives their sub-shapes ids that survive recomputation;
//! [`history`] links those ids across features; [`feature`] drives both.

pub mod error;
pub mod feature;
pub mod geometry;
pub mod history;
pub mod identity;
pub mod kernel;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{Result, ToponymError};

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

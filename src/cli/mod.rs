//! Workflow entry points used by the binary

pub mod orchestration;

pub use orchestration::{Release, ReleaseOutcome, Stage};

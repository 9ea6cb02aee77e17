//! A small declarative test catalogue engine.
//!
//! Cases are registered explicitly in [`Group`]s and executed sequentially by a
//! [`Runner`], which supports group and per-test hooks, OS conditions, runtime
//! assumptions, repetition and data-driven runs.

pub mod case;
pub mod condition;
pub mod env;
pub mod runner;
pub mod source;
pub mod suite;

pub use case::{
    assume_true, check, check_eq, check_err, Case, CaseKind, CaseResult, Interrupt, Invocation,
    RepetitionInfo,
};
pub use condition::{Condition, HostOs};
pub use env::{EnvSource, LayeredEnv, MapEnv, ProcessEnv};
pub use runner::{Outcome, Report, ReportEntry, Runner};
pub use source::{Arguments, ResourceLoader, Source};
pub use suite::{Group, Lifecycle};

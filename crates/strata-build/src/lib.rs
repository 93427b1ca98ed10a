//! Build orchestration.
//!
//! [`build`] runs the whole pipeline: load the resolver, enumerate
//! permutations, resolve each permutation on its own task against the
//! shared file cache, then run every configured output's filters,
//! transforms and renderer. Failures in one permutation or one output
//! are recorded without cancelling siblings.

pub mod orchestrator;

pub use orchestrator::{
    build, BuildConfig, BuildError, BuildReport, Limits, OutputConfig, OutputResult, OutputState,
};

//! Core library for the `swarmstage` CLI.
//!
//! A staged-ramp load generator: a [`schedule::StageScheduler`] turns a
//! list of (duration, users) stages into a per-tick target, the
//! [`controller::Controller`] grows and shrinks a population of workers
//! toward it, and each worker runs a bounded number of task iterations,
//! reports completion once, and parks until the run-wide stop fires.
pub mod args;
pub mod config;
pub mod controller;
pub mod error;
pub mod schedule;
pub mod shutdown;
pub mod task;
pub mod worker;

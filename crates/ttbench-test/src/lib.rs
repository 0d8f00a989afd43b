//! Shared test fixtures for ttbench crates.
//!
//! - [`instances`] - Small validated instances and their text and XML forms
//! - [`adapters`] - Solver adapters with scripted outcomes
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! ttbench-test = { workspace = true }
//! ```
//!
//! This crate depends on `ttbench-solver`, so the solver crate itself cannot
//! use it.

pub mod adapters;
pub mod instances;

pub use adapters::{FailingAdapter, ScriptedAdapter};
pub use instances::{grid_instance, two_by_two, SAMPLE_TEXT, SAMPLE_XML, UNRESOLVED_TEXT};

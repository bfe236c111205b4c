//! BDD step definitions for the review watcher

pub mod cycle_steps;

//! liftlog - Local workout log
//!
//! Workouts own ordered exercises, exercises own sets. A SQLite store
//! backs history, auto-repeat and PR derivations.

pub mod db;
pub mod exercises;
pub mod history;
pub mod store;

pub use db::Database;
pub use store::Store;

//! # Domain Models
//!
//! Pure types shared by every MCQ Platform crate. The only dependency is `serde`:
//! no I/O, networking or heavy logic, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod registry;

//! Mission risk profile planning workflows for flying training squadrons.
//!
//! The crate is organized around the assessment wizard: a compiled-in
//! question catalog, a pure scoring fold, an explicit navigation state
//! machine, and the export pipeline that turns a finished assessment into a
//! document and outbound mail.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

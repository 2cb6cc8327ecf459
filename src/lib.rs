//! rcmet-wizard - Step sequencing for the RCMET model evaluation wizard
//!
//! The core is [`wizard::StepSequence`]; [`session`] persists it between
//! requests and [`rest`] exposes it over HTTP.

pub mod config;
pub mod evaluation;
pub mod logging;
pub mod render;
pub mod rest;
pub mod session;
pub mod wizard;

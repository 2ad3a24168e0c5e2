//! Agent for reporting coding activity to a remote time-tracking service.
//! The host editor feeds activity events in; a rate-limiting gate decides
//! which ones are worth a heartbeat, and approved ones go out as HTTP
//! posts. No state survives the process, so a lost heartbeat stays lost.
//!

pub mod agent;
pub mod cli;
pub mod config;
pub mod editor_api;
pub mod transport;
pub mod utils;

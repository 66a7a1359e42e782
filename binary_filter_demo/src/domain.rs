//! This module defines the domain of the demo, the messages it sends and the run that sends them
//! The messaging platform is only ever reached through [ports]

pub mod models;
pub mod ports;
pub mod service;

//! This module defines concrete implementations of the required outbound ports
//! Outbound ports are things in the outside world that we reach out to

pub mod aws;

#[cfg(any(test, feature = "mock"))]
pub mod memory;

//! This module defines the ways a run can be started

pub mod cli;

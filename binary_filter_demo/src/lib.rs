//! Publishes two messages to an sns topic, only one of them carrying a binary attribute, then
//! reads back what a queue subscribed with the filter policy `{"Trace": ["true"]}` received.
//!
//! The documentation says binary attributes are ignored when a filter policy is evaluated, so
//! both messages should arrive. In practice only the message without the binary attribute does.
//! The crate follows the hexagonal layout, [domain] holds the run and its ports, [outbound]
//! the sns/sqs adapters and [inbound] the command line.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

#![deny(missing_docs)]
//! This crate provides the standardized initialization process used by the demo binaries.
//! This is used to provide consistent behaviour with e.g. tracing configurations

use demo_env::Environment;
use tracing_subscriber::EnvFilter;

/// struct which defines the behaviour for instantiation
#[derive(Debug)]
pub struct DemoEntrypoint {
    env: Environment,
}

impl Default for DemoEntrypoint {
    fn default() -> Self {
        DemoEntrypoint {
            env: Environment::new_or_prod(),
        }
    }
}

/// sentinel struct which guarantees that we called [DemoEntrypoint::init]
#[derive(Debug)]
pub struct InitializedEntrypoint(());

impl DemoEntrypoint {
    /// create a new instance of [Self] from an input [Environment]
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    /// consume self, initialize this binary, and return a proof that it was initialized [InitializedEntrypoint]
    ///
    /// Tracing is always written to stderr, stdout belongs to the demo's own console output.
    pub fn init(self) -> InitializedEntrypoint {
        dotenv::dotenv().ok();
        std::panic::set_hook(Box::new(tracing_panic::panic_hook));

        match self.env {
            Environment::Local => {
                tracing_subscriber::fmt()
                    .with_ansi(true)
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_writer(std::io::stderr)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty()
                    .init();
            }
            Environment::Production | Environment::Develop => {
                tracing_subscriber::fmt()
                    .with_ansi(false)
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_writer(std::io::stderr)
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .flatten_event(true)
                    .init();
            }
        }

        InitializedEntrypoint(())
    }
}

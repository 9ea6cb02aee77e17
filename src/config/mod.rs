pub mod suite_config;

pub use suite_config::{RunnerConfig, SuiteConfig};

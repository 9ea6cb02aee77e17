pub mod config;
pub mod core;
pub mod domain;
pub mod harness;
pub mod utils;

pub use config::SuiteConfig;
pub use crate::core::manager::ContactManager;
pub use domain::model::{Contact, ValidationPolicy};
pub use domain::ports::ContactStore;
pub use utils::error::{ContactError, Result};

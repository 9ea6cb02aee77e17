pub mod manager;

pub use crate::domain::model::{Contact, ValidationPolicy};
pub use crate::domain::ports::ContactStore;
pub use crate::utils::error::Result;

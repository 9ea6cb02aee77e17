use serde::{Deserialize, Serialize};

/// A single contact book entry. Fields are fixed once the contact is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    first_name: String,
    last_name: String,
    phone_number: String,
}

impl Contact {
    // Only the manager builds contacts, after validation.
    pub(crate) fn new(first_name: String, last_name: String, phone_number: String) -> Self {
        Self {
            first_name,
            last_name,
            phone_number,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Field-wise match, used by callers that filter the read view.
    pub fn matches(&self, first_name: &str, last_name: &str, phone_number: &str) -> bool {
        self.first_name == first_name
            && self.last_name == last_name
            && self.phone_number == phone_number
    }
}

/// How strictly `add_contact` treats present-but-empty values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Only absent values are rejected.
    #[default]
    Lenient,
    /// Absent, empty and whitespace-only values are rejected.
    Strict,
}

use crate::domain::model::Contact;
use crate::utils::error::Result;

/// An ordered, append-only collection of contacts.
pub trait ContactStore {
    /// Validates the three values and appends a new contact. A rejected add leaves the store unchanged.
    fn add_contact(
        &mut self,
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<()>;

    /// Stored contacts in insertion order.
    fn get_all_contacts(&self) -> &[Contact];
}

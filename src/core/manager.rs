use crate::domain::model::{Contact, ValidationPolicy};
use crate::domain::ports::ContactStore;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_blank_field, validate_present_field};

#[derive(Debug, Clone, Default)]
pub struct ContactManager {
    contacts: Vec<Contact>,
    policy: ValidationPolicy,
}

impl ContactManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self {
            contacts: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    fn check_field<'a>(&self, field_name: &str, value: Option<&'a str>) -> Result<&'a str> {
        let value = validate_present_field(field_name, value)?;
        if self.policy == ValidationPolicy::Strict {
            validate_non_blank_field(field_name, value)?;
        }
        Ok(value)
    }

    fn validate_contact<'a>(
        &self,
        first_name: Option<&'a str>,
        last_name: Option<&'a str>,
        phone_number: Option<&'a str>,
    ) -> Result<Contact> {
        let first_name = self.check_field("firstName", first_name)?;
        let last_name = self.check_field("lastName", last_name)?;
        let phone_number = self.check_field("phoneNumber", phone_number)?;

        Ok(Contact::new(
            first_name.to_string(),
            last_name.to_string(),
            phone_number.to_string(),
        ))
    }
}

impl ContactStore for ContactManager {
    fn add_contact(
        &mut self,
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<()> {
        // 驗證全部欄位後才寫入，失敗時不改變狀態
        let contact = match self.validate_contact(first_name, last_name, phone_number) {
            Ok(contact) => contact,
            Err(e) => {
                tracing::warn!("Rejected contact: {}", e);
                return Err(e);
            }
        };

        tracing::debug!(
            "Added contact {} {} (total: {})",
            contact.first_name(),
            contact.last_name(),
            self.contacts.len() + 1
        );
        self.contacts.push(contact);
        Ok(())
    }

    fn get_all_contacts(&self) -> &[Contact] {
        &self.contacts
    }
}

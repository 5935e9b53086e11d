use std::borrow::Cow;

use super::types::{Customer, CustomerRef, Inquiry};

/// Read-only customer reference data
#[derive(Debug, Clone, Default)]
pub struct CustomerDirectory {
    customers: Vec<Customer>,
}

impl CustomerDirectory {
    pub fn new(customers: Vec<Customer>) -> Self {
        Self { customers }
    }

    pub fn get(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Resolve the customer behind an inquiry. Anonymous submitters get a
    /// synthesized record; a known id missing from the directory yields None.
    pub fn resolve<'a>(&'a self, inquiry: &Inquiry) -> Option<Cow<'a, Customer>> {
        match &inquiry.customer {
            CustomerRef::Known(id) => self.get(id).map(Cow::Borrowed),
            CustomerRef::Anonymous { name, email } => Some(Cow::Owned(Customer::anonymous(
                &inquiry.id,
                name,
                email,
                inquiry.timestamp,
            ))),
        }
    }

    /// Display name for prompts and lists
    pub fn display_name(&self, inquiry: &Inquiry) -> Option<String> {
        self.resolve(inquiry).map(|c| c.name.clone())
    }
}

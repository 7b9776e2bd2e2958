use crate::{messages::ANONYMOUS_CUSTOMER, models::Customer};

/// Who is using the terminal right now
///
/// Handed to every command handler; there is no process-wide customer.
#[derive(Debug, Clone, Default)]
pub struct Session {
    customer: Option<Customer>,
}

impl Session {
    /// Creates an anonymous session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.customer.is_some()
    }

    /// Makes `customer` the authenticated customer, replacing any earlier copy
    pub fn authenticate(&mut self, customer: Customer) {
        self.customer = Some(customer);
    }

    /// Returns to the anonymous state
    pub fn clear(&mut self) {
        self.customer = None;
    }

    /// Text printed before the prompt marker
    pub fn prompt_label(&self) -> String {
        match &self.customer {
            Some(customer) => customer.to_string(),
            None => ANONYMOUS_CUSTOMER.to_string(),
        }
    }
}

//! Customer profile model.

/// A registered customer.
///
/// Usernames are unique across the customer file. The password is stored
/// as entered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Customer {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_num: String,
    pub email: String,
    pub password: String,
}

impl Customer {
    /// Profile fields in record order, without the password.
    pub fn profile_fields(&self) -> [&str; 6] {
        [
            &self.username,
            &self.first_name,
            &self.last_name,
            &self.address,
            &self.phone_num,
            &self.email,
        ]
    }
}

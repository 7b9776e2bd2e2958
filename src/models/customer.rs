use std::fmt::Display;

/// A registered customer as stored in the `customers` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Customer {
    #[sqlx(rename = "customerid")]
    pub customer_id: i32,
    pub email: String,
    #[sqlx(rename = "firstname")]
    pub first_name: String,
    #[sqlx(rename = "lastname")]
    pub last_name: String,
    /// Number of sessions currently signed in
    #[sqlx(rename = "sessioncount")]
    pub session_count: i32,
    #[sqlx(rename = "planid")]
    pub plan_id: i32,
}

impl Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// Details collected at sign-up
///
/// The password is stored as given; the `customers` schema has no room for
/// a salt or hash format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub plan_id: i32,
}

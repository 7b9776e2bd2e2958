pub mod customer;
pub mod movie;
pub mod plan;

pub use customer::{Customer, NewCustomer};
pub use movie::{Movie, MovieMatch};
pub use plan::Plan;

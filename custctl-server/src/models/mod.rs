//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod customer;
pub mod validation;

pub use customer::{Customer, CustomerEmail, CustomerName, NewCustomer, MAX_FIELD_LEN};
pub use validation::ValidationError;

//! Staff authorization
//!
//! - [`Operator`]: the signed-in cashier, with role based permission checks
//! - [`permissions`]: permission names and role defaults
//! - [`StaffDirectory`]: argon2 hashed PINs, used to authorize price overrides

mod operator;
pub mod permissions;
mod staff;

pub use operator::Operator;
pub use staff::{StaffDirectory, StaffMember, hash_pin, verify_pin};

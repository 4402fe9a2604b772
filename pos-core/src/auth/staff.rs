use super::Operator;
use super::permissions;
use crate::checkout::PriceAuthorizer;
use crate::store::CheckoutError;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use std::collections::HashMap;

const MIN_PIN_LEN: usize = 4;
const MAX_PIN_LEN: usize = 12;

/// Hash a PIN using argon2
pub fn hash_pin(pin: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let pin_hash = argon2.hash_password(pin.as_bytes(), &salt)?;
    Ok(pin_hash.to_string())
}

/// Verify a PIN against an argon2 hash
pub fn verify_pin(pin: &str, pin_hash: &str) -> Result<bool, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(pin_hash)?;
    Ok(Argon2::default()
        .verify_password(pin.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub operator: Operator,
    pub pin_hash: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Staff PIN registry
///
/// Usernames are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaffDirectory {
    members: HashMap<String, StaffMember>,
}

impl StaffDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a staff member, hashing the PIN
    pub fn register(&mut self, operator: Operator, pin: &str) -> Result<(), CheckoutError> {
        let len = pin.chars().count();
        if !(MIN_PIN_LEN..=MAX_PIN_LEN).contains(&len) {
            return Err(CheckoutError::Validation(
                ErrorCode::ValueOutOfRange,
                format!(
                    "PIN must be between {} and {} characters",
                    MIN_PIN_LEN, MAX_PIN_LEN
                ),
            ));
        }
        let pin_hash = hash_pin(pin).map_err(|e| CheckoutError::Internal(e.to_string()))?;
        self.insert(StaffMember {
            operator,
            pin_hash,
            is_active: true,
        });
        Ok(())
    }

    /// Insert a member whose PIN is already hashed
    pub fn insert(&mut self, member: StaffMember) {
        self.members
            .insert(member.operator.username.to_lowercase(), member);
    }

    pub fn set_active(&mut self, username: &str, is_active: bool) -> bool {
        match self.members.get_mut(&username.to_lowercase()) {
            Some(member) => {
                member.is_active = is_active;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, username: &str) -> Option<&StaffMember> {
        self.members.get(&username.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check a username / PIN pair
    ///
    /// Unknown users and wrong PINs produce the same error.
    pub fn authenticate(&self, username: &str, pin: &str) -> Result<Operator, CheckoutError> {
        let invalid = || {
            CheckoutError::Authorization(
                ErrorCode::InvalidCredentials,
                "Invalid username or PIN".to_string(),
            )
        };

        let member = self.get(username).ok_or_else(invalid)?;
        let verified = verify_pin(pin, &member.pin_hash).map_err(|e| {
            tracing::error!(username = %username, error = %e, "Stored PIN hash is unreadable");
            invalid()
        })?;
        if !verified {
            tracing::warn!(target: "security", username = %username, "PIN verification failed");
            return Err(invalid());
        }
        if !member.is_active {
            return Err(CheckoutError::Authorization(
                ErrorCode::AccountDisabled,
                format!("Account {} is disabled", member.operator.username),
            ));
        }
        Ok(member.operator.clone())
    }
}

impl PriceAuthorizer for StaffDirectory {
    fn authorize_price_override(&self, username: &str, pin: &str) -> Result<Operator, CheckoutError> {
        let operator = self.authenticate(username, pin)?;
        if !operator.has_permission(permissions::MODIFY_PRICE) {
            tracing::warn!(
                target: "security",
                username = %operator.username,
                "Price override attempted without permission"
            );
            return Err(CheckoutError::Authorization(
                ErrorCode::PermissionDenied,
                format!("{} may not override prices", operator.display_name),
            ));
        }
        Ok(operator)
    }
}

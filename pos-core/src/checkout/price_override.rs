//! Price-override authorization gate
//!
//! ```text
//! Idle --request_edit--> Challenged --verify--> Authorized --set_new_price--> Idle
//!                            ^   |
//!                            +---+ wrong credentials
//! ```
//!
//! Every edit is challenged again; an authorization is never carried over
//! to another line or a second price.

use crate::auth::Operator;
use crate::money;
use crate::store::CheckoutError;
use shared::error::ErrorCode;
use shared::models::CartItem;
use std::sync::Arc;

/// Capability that decides who may override prices
pub trait PriceAuthorizer: Send + Sync {
    /// Verify credentials and the price override permission
    fn authorize_price_override(&self, username: &str, pin: &str) -> Result<Operator, CheckoutError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    Idle,
    Challenged {
        product_id: String,
        current_price: f64,
    },
    Authorized {
        product_id: String,
        current_price: f64,
        authorized_by: String,
    },
}

/// Single-use permission to change one cart line's unit price
///
/// Only the gate can mint one; [`Cart::override_price`](super::Cart::override_price)
/// consumes it.
#[derive(Debug, PartialEq)]
pub struct PriceOverrideGrant {
    product_id: String,
    previous_price: f64,
    new_price: f64,
    authorized_by: String,
}

impl PriceOverrideGrant {
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn previous_price(&self) -> f64 {
        self.previous_price
    }

    pub fn new_price(&self) -> f64 {
        self.new_price
    }

    /// Username of the approving staff member
    pub fn authorized_by(&self) -> &str {
        &self.authorized_by
    }
}

pub struct PriceOverrideGate {
    authorizer: Arc<dyn PriceAuthorizer>,
    state: GateState,
}

impl std::fmt::Debug for PriceOverrideGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceOverrideGate")
            .field("authorizer", &"<PriceAuthorizer>")
            .field("state", &self.state)
            .finish()
    }
}

impl PriceOverrideGate {
    pub fn new(authorizer: Arc<dyn PriceAuthorizer>) -> Self {
        Self {
            authorizer,
            state: GateState::Idle,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Open a challenge for `item`, replacing any pending one
    pub fn request_edit(&mut self, item: &CartItem) {
        tracing::debug!(product_id = %item.product_id, "Price edit challenged");
        self.state = GateState::Challenged {
            product_id: item.product_id.clone(),
            current_price: item.unit_price,
        };
    }

    /// Answer the pending challenge
    ///
    /// Wrong credentials keep the challenge open so the cashier can retry.
    pub fn verify(&mut self, username: &str, pin: &str) -> Result<(), CheckoutError> {
        let GateState::Challenged {
            product_id,
            current_price,
        } = &self.state
        else {
            return Err(CheckoutError::Precondition(
                ErrorCode::AuthorizationRequired,
                "No price edit is pending".to_string(),
            ));
        };

        let operator = self.authorizer.authorize_price_override(username, pin)?;
        tracing::debug!(
            product_id = %product_id,
            authorized_by = %operator.username,
            "Price edit authorized"
        );
        self.state = GateState::Authorized {
            product_id: product_id.clone(),
            current_price: *current_price,
            authorized_by: operator.username,
        };
        Ok(())
    }

    /// Mint the grant for the authorized line and reset the gate
    pub fn set_new_price(&mut self, value: f64) -> Result<PriceOverrideGrant, CheckoutError> {
        let GateState::Authorized {
            product_id,
            current_price,
            authorized_by,
        } = &self.state
        else {
            return Err(CheckoutError::Precondition(
                ErrorCode::AuthorizationRequired,
                "Price edit has not been authorized".to_string(),
            ));
        };

        let new_price = money::validate_price(value, "new price")?;
        let grant = PriceOverrideGrant {
            product_id: product_id.clone(),
            previous_price: *current_price,
            new_price,
            authorized_by: authorized_by.clone(),
        };
        self.state = GateState::Idle;
        Ok(grant)
    }

    pub fn cancel(&mut self) {
        self.state = GateState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaffDirectory;
    use crate::checkout::{Cart, CartContext};
    use shared::models::Product;

    fn gate() -> PriceOverrideGate {
        let mut staff = StaffDirectory::new();
        staff
            .register(Operator::with_role(1, "marta", "Marta", "manager"), "4821")
            .unwrap();
        staff
            .register(Operator::with_role(2, "jose", "Jose", "user"), "1111")
            .unwrap();
        PriceOverrideGate::new(Arc::new(staff))
    }

    fn cart() -> Cart {
        let mut cart = Cart::new(CartContext::Sale);
        cart.add_item(&Product::new("p1", "Cable", 10.0, 5)).unwrap();
        cart.add_item(&Product::new("p1", "Cable", 10.0, 5)).unwrap();
        cart
    }

    #[test]
    fn test_full_override_flow() {
        let mut gate = gate();
        let mut cart = cart();

        gate.request_edit(cart.item("p1").unwrap());
        gate.verify("marta", "4821").unwrap();
        let grant = gate.set_new_price(8.5).unwrap();
        assert_eq!(grant.previous_price(), 10.0);
        assert_eq!(grant.authorized_by(), "marta");
        assert_eq!(gate.state(), &GateState::Idle);

        cart.override_price(grant).unwrap();
        let line = cart.item("p1").unwrap();
        assert_eq!(line.unit_price, 8.5);
        assert_eq!(line.total, 17.0);
    }

    #[test]
    fn test_wrong_pin_keeps_challenge_open() {
        let mut gate = gate();
        let cart = cart();
        gate.request_edit(cart.item("p1").unwrap());

        let err = gate.verify("marta", "0000").unwrap_err();
        assert!(matches!(err, CheckoutError::Authorization(..)));
        assert!(matches!(gate.state(), GateState::Challenged { .. }));

        gate.verify("marta", "4821").unwrap();
        assert!(matches!(gate.state(), GateState::Authorized { .. }));
    }

    #[test]
    fn test_operator_without_permission_is_refused() {
        let mut gate = gate();
        gate.request_edit(cart().item("p1").unwrap());
        let err = gate.verify("jose", "1111").unwrap_err();
        assert_eq!(err.code(), ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_price_requires_authorization_each_time() {
        let mut gate = gate();
        assert!(gate.set_new_price(5.0).is_err());

        gate.request_edit(cart().item("p1").unwrap());
        assert!(gate.set_new_price(5.0).is_err());

        gate.verify("marta", "4821").unwrap();
        gate.set_new_price(5.0).unwrap();
        let err = gate.set_new_price(4.0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AuthorizationRequired);
    }

    #[test]
    fn test_negative_price_keeps_authorization() {
        let mut gate = gate();
        gate.request_edit(cart().item("p1").unwrap());
        gate.verify("marta", "4821").unwrap();

        let err = gate.set_new_price(-1.0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProductInvalidPrice);
        assert_eq!(gate.set_new_price(0.0).unwrap().new_price(), 0.0);
    }

    #[test]
    fn test_verify_without_challenge() {
        let mut gate = gate();
        let err = gate.verify("marta", "4821").unwrap_err();
        assert_eq!(err.code(), ErrorCode::AuthorizationRequired);
    }
}

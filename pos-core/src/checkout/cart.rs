//! Cart accumulator

use crate::money;
use crate::store::CheckoutError;
use super::PriceOverrideGrant;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{CartItem, Product};

/// What the cart is being rung up for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartContext {
    Sale,
    /// Purchases add stock, so quantities are not capped
    Purchase,
    /// Parts used by a repair
    Service,
}

impl CartContext {
    pub fn caps_at_stock(&self) -> bool {
        !matches!(self, Self::Purchase)
    }
}

/// Live stock lookup used when changing quantities
pub trait StockSource {
    fn stock_of(&self, product_id: &str) -> Option<u32>;
}

impl StockSource for [Product] {
    fn stock_of(&self, product_id: &str) -> Option<u32> {
        self.iter().find(|p| p.id == product_id).map(|p| p.stock)
    }
}

impl StockSource for Vec<Product> {
    fn stock_of(&self, product_id: &str) -> Option<u32> {
        self.as_slice().stock_of(product_id)
    }
}

/// In-progress line items
///
/// One line per product. Never touches catalog stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    context: CartContext,
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new(context: CartContext) -> Self {
        Self {
            context,
            items: Vec::new(),
        }
    }

    pub fn context(&self) -> CartContext {
        self.context
    }

    /// Add one unit of `product`
    ///
    /// Sale and service carts refuse to go above the product's stock; the
    /// cart is left unchanged.
    pub fn add_item(&mut self, product: &Product) -> Result<(), CheckoutError> {
        let context = self.context;
        if let Some(line) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let next = line.quantity.saturating_add(1);
            if context.caps_at_stock() && next > product.stock {
                return Err(out_of_stock(product, product.stock));
            }
            line.quantity = next;
            line.total = money::line_total(line.unit_price, line.quantity);
            return Ok(());
        }

        if context.caps_at_stock() && product.stock == 0 {
            return Err(out_of_stock(product, 0));
        }

        let unit_price = match context {
            CartContext::Purchase => product.cost.unwrap_or(product.price),
            CartContext::Sale | CartContext::Service => product.price,
        };
        let unit_price = money::validate_price(unit_price, "price")?;

        self.items.push(CartItem {
            product_id: product.id.clone(),
            code: product.code.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            unit_price,
            quantity: 1,
            total: unit_price,
        });
        Ok(())
    }

    /// Change a line's quantity by `delta`, never below 1
    ///
    /// Increases beyond the current catalog stock are rejected in sale and
    /// service carts. Returns the new quantity.
    pub fn update_quantity<S>(
        &mut self,
        product_id: &str,
        delta: i64,
        stock: &S,
    ) -> Result<u32, CheckoutError>
    where
        S: StockSource + ?Sized,
    {
        let context = self.context;
        let line = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| line_not_found(product_id))?;

        let requested = i64::from(line.quantity)
            .saturating_add(delta)
            .clamp(1, i64::from(u32::MAX));
        let requested = u32::try_from(requested).unwrap_or(u32::MAX);

        if context.caps_at_stock() && requested > line.quantity {
            let available = stock.stock_of(product_id).ok_or_else(|| {
                CheckoutError::NotFound(
                    ErrorCode::ProductNotFound,
                    format!("Product {} not found", product_id),
                )
            })?;
            if requested > available {
                tracing::warn!(
                    product_id = %product_id,
                    requested,
                    available,
                    "Quantity exceeds stock, cart unchanged"
                );
                return Err(CheckoutError::Validation(
                    ErrorCode::ProductOutOfStock,
                    format!(
                        "Only {} units of {} in stock",
                        available, line.name
                    ),
                ));
            }
        }

        line.quantity = requested;
        line.total = money::line_total(line.unit_price, requested);
        Ok(requested)
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<CartItem, CheckoutError> {
        let index = self
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or_else(|| line_not_found(product_id))?;
        Ok(self.items.remove(index))
    }

    /// Apply an authorized price change
    ///
    /// Grants are minted by [`PriceOverrideGate`](super::PriceOverrideGate)
    /// and consumed here.
    pub fn override_price(&mut self, grant: PriceOverrideGrant) -> Result<(), CheckoutError> {
        let line = self
            .items
            .iter_mut()
            .find(|i| i.product_id == grant.product_id())
            .ok_or_else(|| line_not_found(grant.product_id()))?;

        tracing::info!(
            target: "audit",
            product_id = %line.product_id,
            old_price = line.unit_price,
            new_price = grant.new_price(),
            authorized_by = %grant.authorized_by(),
            "Cart price overridden"
        );
        line.unit_price = grant.new_price();
        line.total = money::line_total(line.unit_price, line.quantity);
        Ok(())
    }

    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn total(&self) -> f64 {
        money::sum(self.items.iter().map(|i| i.total))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

fn out_of_stock(product: &Product, available: u32) -> CheckoutError {
    tracing::warn!(
        product_id = %product.id,
        available,
        "Product out of stock, cart unchanged"
    );
    CheckoutError::Validation(
        ErrorCode::ProductOutOfStock,
        format!("Only {} units of {} in stock", available, product.name),
    )
}

fn line_not_found(product_id: &str) -> CheckoutError {
    CheckoutError::NotFound(
        ErrorCode::CartItemNotFound,
        format!("Product {} is not in the cart", product_id),
    )
}

use super::*;
use crate::auth::Operator;
use crate::checkout::{CartContext, PaymentInput};
use crate::ledger::balance_for;
use crate::money;
use shared::models::PaymentMethod;

mod test_returns;

const NOW: i64 = 1_700_000_000_000;

fn cashier() -> Operator {
    Operator::with_role(1, "rosa", "Rosa", "user")
}

fn manager() -> Operator {
    Operator::with_role(2, "carlos", "Carlos", "manager")
}

fn meta(operator: &Operator) -> CommandMetadata {
    CommandMetadata::new(operator).at(NOW)
}

/// p1 10.00 ×10, p2 5.50 ×4, p3 30.00 ×1; Ana has 50.00 Saldo Favor
fn create_test_store() -> Store {
    Store::new(
        vec![
            Product::new("p1", "Cable USB", 10.0, 10),
            Product::new("p2", "Funda", 5.5, 4),
            Product::new("p3", "Cargador", 30.0, 1),
        ],
        vec![Client::new("c1", "Ana", 50.0), Client::new("c2", "Luis", 0.0)],
        vec![BankAccount {
            id: "b1".to_string(),
            bank_name: "BCP".to_string(),
            account_number: "191-0000000-0-00".to_string(),
            holder: Some("Tienda".to_string()),
        }],
        CheckoutSettings::default(),
    )
}

fn cart(store: &Store, context: CartContext, lines: &[(&str, u32)]) -> Cart {
    let mut cart = Cart::new(context);
    for (product_id, quantity) in lines {
        let product = store.product(product_id).unwrap().clone();
        for _ in 0..*quantity {
            cart.add_item(&product).unwrap();
        }
    }
    cart
}

fn yape(amount: f64, reference: &str) -> PaymentInput {
    PaymentInput::transfer(PaymentMethod::Yape, amount, reference, "b1")
}

/// Sell `lines` for cash, exact amount
fn sell_for_cash(store: &mut Store, lines: &[(&str, u32)]) -> Ticket {
    let mut cart = cart(store, CartContext::Sale, lines);
    let mut payments = store.payment_collector(cart.total(), None).unwrap();
    payments.add_payment(PaymentInput::cash(cart.total())).unwrap();
    store
        .process_sale(&mut cart, &payments, None, &meta(&cashier()))
        .unwrap()
}

/// Materialized balances must match a full scan of the ledger
fn assert_balances_consistent(store: &Store) {
    for filter in [BucketFilter::Todos, BucketFilter::Efectivo, BucketFilter::Digital] {
        let scanned = balance_for(filter, store.cash_movements());
        assert!(
            money::money_eq(store.balance(filter), scanned),
            "{} running {} vs scanned {}",
            filter,
            store.balance(filter),
            scanned
        );
    }
    assert_eq!(
        store.balances().movement_count(),
        store.cash_movements().len()
    );
}

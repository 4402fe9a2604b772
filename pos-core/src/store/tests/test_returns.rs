use super::*;
use shared::models::{MovementKind, StockMovementKind, categories};

/// Sale #1: p1 ×2 + p2 ×1 paid 15.00 cash + 10.50 Yape
fn mixed_sale(store: &mut Store) {
    let mut cart = cart(store, CartContext::Sale, &[("p1", 2), ("p2", 1)]);
    let mut payments = store.payment_collector(cart.total(), None).unwrap();
    payments.add_payment(PaymentInput::cash(15.0)).unwrap();
    payments.add_payment(yape(10.5, "OP1")).unwrap();
    store
        .process_sale(&mut cart, &payments, None, &meta(&cashier()))
        .unwrap();
}

#[test]
fn test_credit_note_refunds_original_buckets() {
    let mut store = create_test_store();
    mixed_sale(&mut store);

    let note = store
        .process_credit_note(
            1,
            &[ReturnRequest::new("p1", 1)],
            RefundRoute::OriginalPayments,
            "Cable defectuoso",
            &meta(&manager()),
        )
        .unwrap();
    assert_eq!(note.total, 10.0);
    assert_eq!(note.refund_breakdown.cash, 10.0);
    assert_eq!(note.refund_breakdown.yape, 0.0);

    assert_eq!(store.product("p1").unwrap().stock, 9);
    let movement = store.stock_movements().last().unwrap();
    assert_eq!(movement.kind, StockMovementKind::Entrada);
    assert_eq!(movement.reference, format!("Nota de Credito #{}", note.id));

    let refund = store.cash_movements().last().unwrap();
    assert_eq!(refund.kind, MovementKind::Egreso);
    assert_eq!(refund.category.as_deref(), Some(categories::CREDIT_NOTE));
    assert_eq!(store.balance(BucketFilter::Efectivo), 5.0);
    assert_balances_consistent(&store);

    // Cash is drained, the rest comes from Yape
    let note = store
        .process_credit_note(
            1,
            &[ReturnRequest::new("p1", 1)],
            RefundRoute::OriginalPayments,
            "",
            &meta(&manager()),
        )
        .unwrap();
    assert_eq!(note.refund_breakdown.cash, 5.0);
    assert_eq!(note.refund_breakdown.yape, 5.0);

    let err = store
        .process_credit_note(
            1,
            &[ReturnRequest::new("p1", 1)],
            RefundRoute::OriginalPayments,
            "",
            &meta(&manager()),
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ReturnExceedsSold);

    store
        .process_credit_note(
            1,
            &[ReturnRequest::new("p2", 1)],
            RefundRoute::OriginalPayments,
            "",
            &meta(&manager()),
        )
        .unwrap();
    let err = store
        .process_credit_note(
            1,
            &[ReturnRequest::new("p2", 1)],
            RefundRoute::OriginalPayments,
            "",
            &meta(&manager()),
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::SaleAlreadyReturned);
    assert_eq!(store.balance(BucketFilter::Todos), 0.0);
    assert_balances_consistent(&store);
}

#[test]
fn test_credit_note_as_store_credit() {
    let mut store = create_test_store();
    let mut cart = cart(&store, CartContext::Sale, &[("p1", 1)]);
    let mut payments = store.payment_collector(cart.total(), Some("c2")).unwrap();
    payments.add_payment(PaymentInput::cash(10.0)).unwrap();
    store
        .process_sale(&mut cart, &payments, Some("c2"), &meta(&cashier()))
        .unwrap();

    let note = store
        .process_credit_note(
            1,
            &[ReturnRequest::new("p1", 1)],
            RefundRoute::StoreCredit,
            "Cambio de modelo",
            &meta(&manager()),
        )
        .unwrap();
    assert_eq!(note.refund_breakdown.wallet, Some(10.0));
    assert_eq!(store.client("c2").unwrap().digital_balance, 10.0);
    // No money left the drawer
    assert_eq!(store.balance(BucketFilter::Efectivo), 10.0);
}

#[test]
fn test_credit_note_needs_refund_permission() {
    let mut store = create_test_store();
    mixed_sale(&mut store);

    let err = store
        .process_credit_note(
            1,
            &[ReturnRequest::new("p1", 1)],
            RefundRoute::OriginalPayments,
            "",
            &meta(&cashier()),
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PermissionDenied);
    assert_eq!(err.kind(), "authorization");
    assert!(store.credit_notes().is_empty());

    let err = store
        .process_credit_note(
            99,
            &[ReturnRequest::new("p1", 1)],
            RefundRoute::OriginalPayments,
            "",
            &meta(&manager()),
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::SaleNotFound);
}

#[test]
fn test_anonymous_sale_cannot_become_store_credit() {
    let mut store = create_test_store();
    mixed_sale(&mut store);

    let err = store
        .process_credit_note(
            1,
            &[ReturnRequest::new("p2", 1)],
            RefundRoute::StoreCredit,
            "",
            &meta(&manager()),
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PaymentInvalidMethod);
    assert_eq!(store.product("p2").unwrap().stock, 3);
}

#[test]
fn test_short_paid_sale_refunds_what_was_collected() {
    let mut store = create_test_store();
    let mut cart = cart(&store, CartContext::Sale, &[("p1", 2), ("p2", 1)]);
    let mut payments = store.payment_collector(cart.total(), None).unwrap();
    payments.add_payment(PaymentInput::cash(25.4)).unwrap();
    store
        .process_sale(&mut cart, &payments, None, &meta(&cashier()))
        .unwrap();

    let first = store
        .process_credit_note(
            1,
            &[ReturnRequest::new("p1", 2)],
            RefundRoute::OriginalPayments,
            "",
            &meta(&manager()),
        )
        .unwrap();
    assert_eq!(first.total, 20.0);

    // The 0.10 shortfall comes off the last return
    let last = store
        .process_credit_note(
            1,
            &[ReturnRequest::new("p2", 1)],
            RefundRoute::OriginalPayments,
            "",
            &meta(&manager()),
        )
        .unwrap();
    assert_eq!(last.items[0].total, 5.5);
    assert_eq!(last.total, 5.4);
    assert_eq!(last.refund_breakdown.cash, 5.4);

    assert_eq!(store.balance(BucketFilter::Todos), 0.0);
    assert_eq!(store.product("p2").unwrap().stock, 4);
    assert_balances_consistent(&store);
}

#[test]
fn test_short_paid_sale_returned_at_once() {
    let mut store = create_test_store();
    let mut cart = cart(&store, CartContext::Sale, &[("p1", 2), ("p2", 1)]);
    let mut payments = store.payment_collector(cart.total(), None).unwrap();
    payments.add_payment(PaymentInput::cash(25.4)).unwrap();
    store
        .process_sale(&mut cart, &payments, None, &meta(&cashier()))
        .unwrap();

    let note = store
        .process_credit_note(
            1,
            &[ReturnRequest::new("p1", 2), ReturnRequest::new("p2", 1)],
            RefundRoute::OriginalPayments,
            "",
            &meta(&manager()),
        )
        .unwrap();
    assert_eq!(note.total, 25.4);
    assert_eq!(note.refund_breakdown.cash, 25.4);
    assert_eq!(store.balance(BucketFilter::Efectivo), 0.0);
}

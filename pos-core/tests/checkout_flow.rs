use pos_core::checkout::GateState;
use pos_core::store::{RefundRoute, ReturnRequest};
use pos_core::{
    BucketFilter, Cart, CartContext, CheckoutSettings, CommandMetadata, ErrorCode, Operator,
    PaymentInput, PriceOverrideGate, StaffDirectory, Store, balance_for,
};
use shared::models::{BankAccount, Client, PaymentMethod, Product};
use std::sync::Arc;

fn seed_store() -> Store {
    let mut mouse = Product::new("P-100", "Mouse inalambrico", 45.0, 6);
    mouse.category = "Accesorios".to_string();
    Store::new(
        vec![mouse, Product::new("P-200", "Pad mouse", 12.0, 20)],
        vec![Client::new("C-1", "Maria Quispe", 20.0)],
        vec![BankAccount {
            id: "BCP-01".to_string(),
            bank_name: "BCP".to_string(),
            account_number: "191-2345678-0-12".to_string(),
            holder: None,
        }],
        CheckoutSettings::default(),
    )
}

fn staff() -> (StaffDirectory, Operator, Operator) {
    let cashier = Operator::with_role(1, "rosa", "Rosa", "user");
    let supervisor = Operator::with_role(2, "carlos", "Carlos", "manager");
    let mut staff = StaffDirectory::new();
    staff
        .register(cashier.clone(), "4321")
        .expect("register cashier");
    staff
        .register(supervisor.clone(), "9876")
        .expect("register supervisor");
    (staff, cashier, supervisor)
}

#[test]
fn test_discounted_sale_survives_snapshot() {
    let (staff, cashier, supervisor) = staff();
    let mut store = seed_store();

    // 1. Ring up: 1 mouse, 2 pads
    let mut cart = Cart::new(CartContext::Sale);
    let mouse = store.product("P-100").expect("mouse").clone();
    let pad = store.product("P-200").expect("pad").clone();
    cart.add_item(&mouse).expect("add mouse");
    cart.add_item(&pad).expect("add pad");
    cart.update_quantity("P-200", 1, &store).expect("second pad");
    assert_eq!(cart.total(), 69.0);

    // 2. Supervisor drops the mouse to 40.00; the cashier alone cannot
    let mut gate = PriceOverrideGate::new(Arc::new(staff));
    gate.request_edit(cart.item("P-100").expect("mouse line"));
    let err = gate.verify("rosa", "4321").expect_err("cashier lacks permission");
    assert_eq!(err.code(), ErrorCode::PermissionDenied);
    assert!(matches!(gate.state(), GateState::Challenged { .. }));
    gate.verify("carlos", "9876").expect("supervisor PIN");
    let grant = gate.set_new_price(40.0).expect("new price");
    cart.override_price(grant).expect("apply override");
    assert!(matches!(gate.state(), GateState::Idle));
    assert_eq!(cart.total(), 64.0);

    // 3. Pay with store credit, Plin and cash
    let mut payments = store
        .payment_collector(cart.total(), Some("C-1"))
        .expect("collector");
    payments.add_payment(PaymentInput::wallet(20.0)).expect("wallet");
    payments
        .add_payment(PaymentInput::transfer(PaymentMethod::Plin, 24.0, "PL-77", "BCP-01"))
        .expect("plin");
    payments.add_payment(PaymentInput::cash(50.0)).expect("cash");
    assert_eq!(payments.change(), 30.0);

    let ticket = store
        .process_sale(&mut cart, &payments, Some("C-1"), &CommandMetadata::new(&cashier))
        .expect("sale");
    assert_eq!(ticket.order_id, 1);
    assert_eq!(ticket.client.as_deref(), Some("Maria Quispe"));
    assert_eq!(ticket.change, 30.0);
    assert_eq!(ticket.detailed_payments.len(), 3);

    assert_eq!(store.client("C-1").expect("client").digital_balance, 0.0);
    assert_eq!(store.balance(BucketFilter::Efectivo), 20.0);
    assert_eq!(store.balance(BucketFilter::Digital), 24.0);

    // 4. Supervisor takes one pad back as store credit
    store
        .process_credit_note(
            1,
            &[ReturnRequest::new("P-200", 1)],
            RefundRoute::StoreCredit,
            "No lo necesita",
            &CommandMetadata::new(&supervisor),
        )
        .expect("credit note");
    assert_eq!(store.client("C-1").expect("client").digital_balance, 12.0);
    assert_eq!(store.product("P-200").expect("pad").stock, 19);

    // 5. Snapshot and reopen
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("store.json");
    store.save(&path).expect("save");
    let mut reopened = Store::open(&path, CheckoutSettings::default()).expect("open");

    assert_eq!(reopened.sales(), store.sales());
    assert_eq!(reopened.credit_notes(), store.credit_notes());
    assert_eq!(reopened.products(), store.products());
    assert_eq!(reopened.balances(), store.balances());
    for filter in [BucketFilter::Todos, BucketFilter::Efectivo, BucketFilter::Digital] {
        assert_eq!(
            reopened.balance(filter),
            balance_for(filter, reopened.cash_movements())
        );
    }

    // 6. Numbering continues after reopening
    let mut cart = Cart::new(CartContext::Sale);
    cart.add_item(&pad).expect("add pad");
    let mut payments = reopened.payment_collector(cart.total(), None).expect("collector");
    payments.add_payment(PaymentInput::cash(12.0)).expect("cash");
    let ticket = reopened
        .process_sale(&mut cart, &payments, None, &CommandMetadata::new(&cashier))
        .expect("second sale");
    assert_eq!(ticket.order_id, 2);
    assert!(
        reopened.cash_movements().last().expect("movement").id
            > store.cash_movements().last().expect("movement").id
    );
}

#[test]
fn test_replayed_command_after_reopen() {
    let (_, cashier, _) = staff();
    let mut store = seed_store();
    let metadata = CommandMetadata::new(&cashier).with_command_id("till-2-000123");

    let mut cart = Cart::new(CartContext::Sale);
    cart.add_item(store.product("P-200").expect("pad")).expect("add pad");
    let mut payments = store.payment_collector(cart.total(), None).expect("collector");
    payments.add_payment(PaymentInput::cash(12.0)).expect("cash");
    store
        .process_sale(&mut cart.clone(), &payments, None, &metadata)
        .expect("sale");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pos").join("store.json");
    store.save(&path).expect("save");
    let mut reopened = Store::open(&path, CheckoutSettings::default()).expect("open");

    let err = reopened
        .process_sale(&mut cart, &payments, None, &metadata)
        .expect_err("replay");
    assert_eq!(err.code(), ErrorCode::CommandAlreadyProcessed);
    assert_eq!(reopened.sales().len(), 1);
    assert_eq!(reopened.product("P-200").expect("pad").stock, 19);
}

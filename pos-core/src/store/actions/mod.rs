//! Command action implementations
//!
//! Each action implements [`CommandHandler`] and handles one business
//! operation. [`CommandAction`] dispatches to them.

use crate::checkout::PaymentInput;
use crate::money;
use crate::store::{
    CheckoutError, CheckoutResult, CommandContext, CommandHandler, CommandMetadata, StoreEvent,
};
use shared::error::ErrorCode;

mod cash_movement;
mod cash_session;
mod credit_note;
mod process_purchase;
mod process_sale;
mod service_order;
mod settlement;
mod wallet;

pub use cash_movement::RecordCashMovementAction;
pub use cash_session::{CloseCashSessionAction, OpenCashSessionAction};
pub use credit_note::{ProcessCreditNoteAction, RefundRoute, ReturnRequest};
pub use process_purchase::ProcessPurchaseAction;
pub use process_sale::ProcessSaleAction;
pub use service_order::{
    FinalizeServiceAction, MarkRepairedAction, OpenServiceOrderAction, ServiceIntake,
    ServiceOutcome, SetServicePartsAction, service_total,
};
pub use wallet::{WalletDirection, WalletTransferAction};

/// CommandAction enum - dispatches to concrete action implementations
#[derive(Debug)]
pub enum CommandAction<'a> {
    ProcessSale(ProcessSaleAction<'a>),
    ProcessPurchase(ProcessPurchaseAction<'a>),
    OpenServiceOrder(OpenServiceOrderAction<'a>),
    SetServiceParts(SetServicePartsAction<'a>),
    MarkRepaired(MarkRepairedAction),
    FinalizeService(FinalizeServiceAction<'a>),
    ProcessCreditNote(ProcessCreditNoteAction<'a>),
    WalletTransfer(WalletTransferAction<'a>),
    RecordCashMovement(RecordCashMovementAction<'a>),
    OpenCashSession(OpenCashSessionAction),
    CloseCashSession(CloseCashSessionAction<'a>),
}

impl CommandHandler for CommandAction<'_> {
    fn name(&self) -> &'static str {
        match self {
            CommandAction::ProcessSale(action) => action.name(),
            CommandAction::ProcessPurchase(action) => action.name(),
            CommandAction::OpenServiceOrder(action) => action.name(),
            CommandAction::SetServiceParts(action) => action.name(),
            CommandAction::MarkRepaired(action) => action.name(),
            CommandAction::FinalizeService(action) => action.name(),
            CommandAction::ProcessCreditNote(action) => action.name(),
            CommandAction::WalletTransfer(action) => action.name(),
            CommandAction::RecordCashMovement(action) => action.name(),
            CommandAction::OpenCashSession(action) => action.name(),
            CommandAction::CloseCashSession(action) => action.name(),
        }
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        match self {
            CommandAction::ProcessSale(action) => action.execute(ctx, metadata),
            CommandAction::ProcessPurchase(action) => action.execute(ctx, metadata),
            CommandAction::OpenServiceOrder(action) => action.execute(ctx, metadata),
            CommandAction::SetServiceParts(action) => action.execute(ctx, metadata),
            CommandAction::MarkRepaired(action) => action.execute(ctx, metadata),
            CommandAction::FinalizeService(action) => action.execute(ctx, metadata),
            CommandAction::ProcessCreditNote(action) => action.execute(ctx, metadata),
            CommandAction::WalletTransfer(action) => action.execute(ctx, metadata),
            CommandAction::RecordCashMovement(action) => action.execute(ctx, metadata),
            CommandAction::OpenCashSession(action) => action.execute(ctx, metadata),
            CommandAction::CloseCashSession(action) => action.execute(ctx, metadata),
        }
    }
}

/// Fail unless the command's operator holds `permission`
pub(crate) fn require_permission(
    metadata: &CommandMetadata,
    permission: &str,
) -> CheckoutResult<()> {
    if metadata.operator.has_permission(permission) {
        return Ok(());
    }
    Err(CheckoutError::Authorization(
        ErrorCode::PermissionDenied,
        format!("{} lacks permission {}", metadata.operator.username, permission),
    ))
}

/// Validate a single tender outside checkout; store credit is not money here
pub(crate) fn resolve_tender(ctx: &CommandContext<'_>, payment: &PaymentInput) -> CheckoutResult<f64> {
    let amount = money::validate_amount(payment.amount, "amount")?;
    if payment.method.is_wallet() {
        return Err(CheckoutError::Validation(
            ErrorCode::PaymentInvalidMethod,
            format!("{} cannot be used here", payment.method),
        ));
    }
    payment.validate_fields()?;
    if let Some(account_id) = payment.account_id.as_deref() {
        if payment.method.requires_reference() {
            ctx.bank_account(account_id)?;
        }
    }
    Ok(amount)
}

//! Till open / close ("apertura y cierre de caja")

use super::require_permission;
use crate::auth::permissions;
use crate::ledger::{BucketFilter, LedgerQuery};
use crate::money;
use crate::store::{
    CheckoutError, CheckoutResult, CommandContext, CommandHandler, CommandMetadata, StoreEvent,
};
use shared::error::ErrorCode;
use shared::models::{CashSession, CashSessionStatus};

fn validate_count(value: f64, field: &str) -> CheckoutResult<f64> {
    money::require_finite(value, field)?;
    if value < 0.0 {
        return Err(CheckoutError::Validation(
            ErrorCode::ValueOutOfRange,
            format!("{} cannot be negative", field),
        ));
    }
    Ok(money::to_f64(money::to_decimal(value)))
}

#[derive(Debug, Clone, Copy)]
pub struct OpenCashSessionAction {
    pub starting_cash: f64,
}

impl CommandHandler for OpenCashSessionAction {
    fn name(&self) -> &'static str {
        "open_cash_session"
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        require_permission(metadata, permissions::CASH_DRAWER)?;
        if let Some(open) = ctx.state().open_cash_session() {
            return Err(CheckoutError::Precondition(
                ErrorCode::CashSessionAlreadyOpen,
                format!("Cash session #{} opened by {} is still open", open.id, open.operator_name),
            ));
        }
        let starting_cash = validate_count(self.starting_cash, "starting_cash")?;

        Ok(vec![StoreEvent::CashSessionSaved(CashSession {
            id: ctx.next_id(),
            operator_id: metadata.operator.id,
            operator_name: metadata.operator_name().to_string(),
            status: CashSessionStatus::Open,
            start_timestamp: metadata.timestamp,
            end_timestamp: None,
            starting_cash,
            expected_cash: None,
            actual_cash: None,
            cash_variance: None,
            note: None,
        })])
    }
}

#[derive(Debug)]
pub struct CloseCashSessionAction<'a> {
    pub actual_cash: f64,
    pub note: Option<&'a str>,
}

impl CommandHandler for CloseCashSessionAction<'_> {
    fn name(&self) -> &'static str {
        "close_cash_session"
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        // 1. Permission and open session
        require_permission(metadata, permissions::CASH_DRAWER)?;
        let session = ctx.state().open_cash_session().ok_or_else(|| {
            CheckoutError::Precondition(
                ErrorCode::CashSessionNotOpen,
                "No cash session is open".to_string(),
            )
        })?;
        let actual_cash = validate_count(self.actual_cash, "actual_cash")?;

        // 2. Cash that should be in the drawer
        let drawer = LedgerQuery::new()
            .bucket(BucketFilter::Efectivo)
            .from(session.start_timestamp)
            .balance(&ctx.state().cash_movements);
        let expected_cash = money::add(session.starting_cash, drawer);
        let cash_variance = money::sub(actual_cash, expected_cash);

        // 3. Close
        let mut closed = session.clone();
        closed.status = CashSessionStatus::Closed;
        closed.end_timestamp = Some(metadata.timestamp);
        closed.expected_cash = Some(expected_cash);
        closed.actual_cash = Some(actual_cash);
        closed.cash_variance = Some(cash_variance);
        closed.note = self
            .note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(vec![StoreEvent::CashSessionSaved(closed)])
    }
}

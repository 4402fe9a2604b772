//! Manual ledger entries: expenses and other income

use super::resolve_tender;
use crate::checkout::PaymentInput;
use crate::store::{
    CheckoutError, CheckoutResult, CommandContext, CommandHandler, CommandMetadata, LedgerEntry,
    StoreEvent,
};
use shared::error::ErrorCode;
use shared::models::{FinancialType, MovementKind};

#[derive(Debug)]
pub struct RecordCashMovementAction<'a> {
    pub kind: MovementKind,
    pub payment: &'a PaymentInput,
    pub concept: &'a str,
    pub category: Option<&'a str>,
    pub financial_type: Option<FinancialType>,
}

impl CommandHandler for RecordCashMovementAction<'_> {
    fn name(&self) -> &'static str {
        "record_cash_movement"
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        let concept = self.concept.trim();
        if concept.is_empty() {
            return Err(CheckoutError::Validation(
                ErrorCode::RequiredField,
                "Concept is required".to_string(),
            ));
        }
        let amount = resolve_tender(ctx, self.payment)?;

        let entry = LedgerEntry {
            kind: self.kind,
            method: self.payment.method,
            amount,
            concept: concept.to_string(),
            category: self
                .category
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            reference_id: None,
            financial_type: self.financial_type,
        };
        Ok(vec![ctx.cash_movement(entry, metadata)])
    }
}

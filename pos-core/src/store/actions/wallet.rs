//! Client wallet (Saldo Favor) deposits and withdrawals

use super::resolve_tender;
use crate::checkout::PaymentInput;
use crate::store::{
    CheckoutResult, CommandContext, CommandHandler, CommandMetadata, LedgerEntry, StoreEvent,
};
use serde::{Deserialize, Serialize};
use shared::models::{MovementKind, categories};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletDirection {
    /// Client leaves money as store credit
    Deposit,
    /// Client takes store credit back as money
    Withdraw,
}

#[derive(Debug)]
pub struct WalletTransferAction<'a> {
    pub client_id: &'a str,
    pub direction: WalletDirection,
    pub payment: &'a PaymentInput,
}

impl CommandHandler for WalletTransferAction<'_> {
    fn name(&self) -> &'static str {
        match self.direction {
            WalletDirection::Deposit => "deposit_to_wallet",
            WalletDirection::Withdraw => "withdraw_from_wallet",
        }
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        // 1. Client and tender
        let client = ctx.client(self.client_id)?;
        let amount = resolve_tender(ctx, self.payment)?;

        // 2. Balance change; withdrawals never overdraw
        let (wallet_event, kind, concept) = match self.direction {
            WalletDirection::Deposit => (
                ctx.credit_wallet(&client.id, amount)?,
                MovementKind::Ingreso,
                format!("Deposito a billetera - {}", client.name),
            ),
            WalletDirection::Withdraw => (
                ctx.debit_wallet(&client.id, amount)?,
                MovementKind::Egreso,
                format!("Retiro de billetera - {}", client.name),
            ),
        };

        // 3. Ledger row for the money that moved
        let entry = LedgerEntry {
            kind,
            method: self.payment.method,
            amount,
            concept,
            category: Some(categories::WALLET.to_string()),
            reference_id: Some(client.id.clone()),
            financial_type: None,
        };
        let cash_event = ctx.cash_movement(entry, metadata);

        Ok(vec![wallet_event, cash_event])
    }
}

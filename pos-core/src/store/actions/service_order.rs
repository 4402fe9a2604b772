//! Service order command handlers
//!
//! Intake, parts, repair and the final hand-over (delivery or return).
//! Status only moves forward: `Pendiente -> Reparado -> Entregado | Devolucion`.

use super::settlement::{Payer, Settlement};
use crate::checkout::{Cart, CartContext, PaymentCollector, local_date_time};
use crate::money;
use crate::store::{
    CheckoutError, CheckoutResult, CommandContext, CommandHandler, CommandMetadata, StoreEvent,
};
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{
    MovementKind, ServiceOrder, ServiceProductItem, ServiceStatus, categories,
};

/// Device handed in at the counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceIntake {
    pub client_id: String,
    pub device: String,
    pub problem: String,
    pub labor_cost: f64,
    /// Charged when the device is returned unrepaired
    #[serde(default)]
    pub diagnosis_fee: f64,
}

/// How a repaired order leaves the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceOutcome {
    /// Repaired and delivered: labor plus parts
    Entregado,
    /// Returned to the client: diagnosis fee only, no parts consumed
    Devolucion,
}

impl ServiceOutcome {
    pub fn status(&self) -> ServiceStatus {
        match self {
            Self::Entregado => ServiceStatus::Entregado,
            Self::Devolucion => ServiceStatus::Devolucion,
        }
    }
}

/// Amount due when `order` leaves with `outcome`
pub fn service_total(order: &ServiceOrder, outcome: ServiceOutcome) -> f64 {
    match outcome {
        ServiceOutcome::Entregado => money::add(
            order.labor_cost,
            money::sum(order.parts.iter().map(|p| p.total)),
        ),
        ServiceOutcome::Devolucion => order.diagnosis_fee,
    }
}

fn transition_error(order: &ServiceOrder, next: ServiceStatus) -> CheckoutError {
    CheckoutError::Precondition(
        ErrorCode::InvalidStatusTransition,
        format!(
            "Service order #{} cannot go from {:?} to {:?}",
            order.id, order.status, next
        ),
    )
}

// ========== Open ==========

#[derive(Debug)]
pub struct OpenServiceOrderAction<'a> {
    pub intake: &'a ServiceIntake,
}

impl CommandHandler for OpenServiceOrderAction<'_> {
    fn name(&self) -> &'static str {
        "open_service_order"
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        let intake = self.intake;

        // 1. Client and device
        let client = ctx.client(&intake.client_id)?;
        let device = intake.device.trim();
        if device.is_empty() {
            return Err(CheckoutError::Validation(
                ErrorCode::RequiredField,
                "Device is required".to_string(),
            ));
        }

        // 2. Prices
        let labor_cost = money::validate_price(intake.labor_cost, "labor_cost")?;
        let diagnosis_fee = money::validate_price(intake.diagnosis_fee, "diagnosis_fee")?;

        // 3. New order
        let order = ServiceOrder {
            id: ctx.next_id(),
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            device: device.to_string(),
            problem: intake.problem.trim().to_string(),
            status: ServiceStatus::Pendiente,
            labor_cost,
            diagnosis_fee,
            parts: Vec::new(),
            entry_timestamp: metadata.timestamp,
            exit_date: None,
            exit_time: None,
            payment_breakdown: None,
            detailed_payments: Vec::new(),
            user: metadata.operator_name().to_string(),
        };

        Ok(vec![StoreEvent::ServiceOrderSaved(order)])
    }
}

// ========== Parts ==========

/// Replace the parts list of an order that has not left the shop
#[derive(Debug)]
pub struct SetServicePartsAction<'a> {
    pub order_id: i64,
    pub parts: &'a Cart,
}

impl CommandHandler for SetServicePartsAction<'_> {
    fn name(&self) -> &'static str {
        "set_service_parts"
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        _metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        if self.parts.context() != CartContext::Service {
            return Err(CheckoutError::Validation(
                ErrorCode::InvalidRequest,
                format!("Parts must come from a service cart, got {:?}", self.parts.context()),
            ));
        }

        let order = ctx.service_order(self.order_id)?;
        if order.status.is_terminal() {
            return Err(CheckoutError::Precondition(
                ErrorCode::InvalidStatusTransition,
                format!("Service order #{} is already closed", order.id),
            ));
        }

        let mut parts = Vec::with_capacity(self.parts.items().len());
        for item in self.parts.items() {
            // Existence only; stock is taken on delivery
            ctx.product(&item.product_id)?;
            parts.push(ServiceProductItem {
                product_id: item.product_id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: item.total,
            });
        }

        let mut updated = order.clone();
        updated.parts = parts;
        Ok(vec![StoreEvent::ServiceOrderSaved(updated)])
    }
}

// ========== Repaired ==========

#[derive(Debug, Clone, Copy)]
pub struct MarkRepairedAction {
    pub order_id: i64,
}

impl CommandHandler for MarkRepairedAction {
    fn name(&self) -> &'static str {
        "mark_repaired"
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        _metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        let order = ctx.service_order(self.order_id)?;
        if !order.status.can_transition_to(ServiceStatus::Reparado) {
            return Err(transition_error(order, ServiceStatus::Reparado));
        }

        let mut updated = order.clone();
        updated.status = ServiceStatus::Reparado;
        Ok(vec![StoreEvent::ServiceOrderSaved(updated)])
    }
}

// ========== Finalize ==========

#[derive(Debug)]
pub struct FinalizeServiceAction<'a> {
    pub order_id: i64,
    pub outcome: ServiceOutcome,
    /// `None` only when nothing is due
    pub payments: Option<&'a PaymentCollector>,
}

impl CommandHandler for FinalizeServiceAction<'_> {
    fn name(&self) -> &'static str {
        "finalize_service"
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        // 1. Load order and check the transition
        let order = ctx.service_order(self.order_id)?;
        let next = self.outcome.status();
        if !order.status.can_transition_to(next) {
            return Err(transition_error(order, next));
        }

        // 2. Settle what is due
        let total = service_total(order, self.outcome);
        let settlement = match self.payments {
            Some(collector) => {
                Settlement::resolve(ctx, collector, total, Payer::Client(&order.client_id))?
            }
            None if money::is_positive(total) => {
                return Err(CheckoutError::Precondition(
                    ErrorCode::PaymentInsufficientAmount,
                    format!("Service order #{} has {:.2} due", order.id, total),
                ));
            }
            None => Settlement::default(),
        };

        // 3. Parts leave stock only on delivery
        let reference = format!("Servicio #{}", order.id);
        let mut events = Vec::new();
        if self.outcome == ServiceOutcome::Entregado {
            for part in &order.parts {
                events.push(ctx.take_stock(&part.product_id, part.quantity, &reference, metadata)?);
            }
        }

        // 4. Store credit
        if settlement.wallet() > 0.0 {
            events.push(ctx.debit_wallet(&order.client_id, settlement.wallet())?);
        }

        // 5. Ledger
        events.extend(settlement.ledger_events(
            ctx,
            MovementKind::Ingreso,
            categories::SERVICE,
            &reference,
            &order.id.to_string(),
            metadata,
        ));

        // 6. Close the order
        let (exit_date, exit_time) = local_date_time(metadata.timestamp, ctx.settings().offset());
        let mut updated = order.clone();
        updated.status = next;
        updated.exit_date = Some(exit_date);
        updated.exit_time = Some(exit_time);
        updated.payment_breakdown = Some(settlement.breakdown);
        updated.detailed_payments = settlement.payments;
        events.push(StoreEvent::ServiceOrderSaved(updated));

        Ok(events)
    }
}

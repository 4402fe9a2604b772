use super::{BucketFilter, balance_where};
use shared::models::{CashMovement, MovementKind};

/// Composable ledger filter
///
/// ```
/// use pos_core::ledger::{BucketFilter, LedgerQuery};
///
/// let query = LedgerQuery::new()
///     .bucket(BucketFilter::Efectivo)
///     .category("Venta")
///     .between(1_700_000_000_000, 1_700_086_400_000);
/// assert_eq!(query.balance(&[]), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerQuery {
    bucket: BucketFilter,
    from: Option<i64>,
    to: Option<i64>,
    category: Option<String>,
    kind: Option<MovementKind>,
}

impl Default for LedgerQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerQuery {
    pub fn new() -> Self {
        Self {
            bucket: BucketFilter::Todos,
            from: None,
            to: None,
            category: None,
            kind: None,
        }
    }

    pub fn bucket(mut self, bucket: BucketFilter) -> Self {
        self.bucket = bucket;
        self
    }

    /// Inclusive lower bound, unix millis
    pub fn from(mut self, timestamp: i64) -> Self {
        self.from = Some(timestamp);
        self
    }

    /// Exclusive upper bound, unix millis
    pub fn to(mut self, timestamp: i64) -> Self {
        self.to = Some(timestamp);
        self
    }

    pub fn between(self, from: i64, to: i64) -> Self {
        self.from(from).to(to)
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn kind(mut self, kind: MovementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, movement: &CashMovement) -> bool {
        self.bucket.matches(movement.payment_method)
            && self.from.is_none_or(|from| movement.timestamp >= from)
            && self.to.is_none_or(|to| movement.timestamp < to)
            && self
                .category
                .as_deref()
                .is_none_or(|c| movement.category.as_deref() == Some(c))
            && self.kind.is_none_or(|k| movement.kind == k)
    }

    pub fn filter<'a>(&'a self, movements: &'a [CashMovement]) -> impl Iterator<Item = &'a CashMovement> + 'a {
        movements.iter().filter(move |m| self.matches(m))
    }

    pub fn balance(&self, movements: &[CashMovement]) -> f64 {
        balance_where(movements, |m| self.matches(m))
    }
}

//! The `OrderLedger` — authoritative order lifecycle state.
//!
//! The ledger is the only place an order's status lives.  Vehicles carry
//! copies of the descriptor while hauling cargo, raters fold events into
//! scores, but "what happened to order N" is answered here.
//!
//! Terminal states (`Delivered`, `Expired`) are frozen: any further
//! transition attempt is an [`OrderError::InvalidTransition`], and
//! [`expire_due`](OrderLedger::expire_due) reports each expiration exactly
//! once.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as HashMap;

use fleet_core::{OrderId, Tick};

use crate::{ConfirmedOrder, OrderError, OrderResult};

// ── OrderStatus ───────────────────────────────────────────────────────────────

/// Lifecycle state of a confirmed order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OrderStatus {
    /// Admitted, waiting for a vehicle to pick it up.
    Pending,
    /// Loaded onto a vehicle.
    InTransit,
    /// Unloaded at its delivery node at the recorded tick.  Terminal.
    Delivered { tick: Tick },
    /// Deadline passed while undelivered.  Terminal.
    Expired,
}

impl OrderStatus {
    /// `true` for `Delivered` and `Expired`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered { .. } | OrderStatus::Expired)
    }

    fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InTransit => "in-transit",
            OrderStatus::Delivered { .. } => "delivered",
            OrderStatus::Expired => "expired",
        }
    }
}

// ── OrderLedger ───────────────────────────────────────────────────────────────

struct LedgerEntry {
    order: ConfirmedOrder,
    status: OrderStatus,
}

/// Tracks every admitted order and its lifecycle status.
#[derive(Default)]
pub struct OrderLedger {
    entries: HashMap<OrderId, LedgerEntry>,
    delivered: u64,
    expired: u64,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self {
            entries: HashMap::default(),
            delivered: 0,
            expired: 0,
        }
    }

    /// Admit a new order as `Pending`.
    ///
    /// # Errors
    /// [`OrderError::DuplicateOrder`] if the ID was admitted before.
    pub fn admit(&mut self, order: ConfirmedOrder) -> OrderResult<()> {
        let id = order.id();
        if self.entries.contains_key(&id) {
            return Err(OrderError::DuplicateOrder(id));
        }
        self.entries.insert(id, LedgerEntry { order, status: OrderStatus::Pending });
        Ok(())
    }

    /// The order descriptor, if admitted.
    pub fn order(&self, id: OrderId) -> Option<&ConfirmedOrder> {
        self.entries.get(&id).map(|e| &e.order)
    }

    /// The order's current status, if admitted.
    pub fn status(&self, id: OrderId) -> Option<OrderStatus> {
        self.entries.get(&id).map(|e| e.status)
    }

    /// Record that the order was loaded onto a vehicle.
    pub fn mark_in_transit(&mut self, id: OrderId) -> OrderResult<()> {
        self.transition(id, OrderStatus::InTransit, |s| s == OrderStatus::Pending)
    }

    /// Record that the order reached its destination at `tick`.
    pub fn mark_delivered(&mut self, id: OrderId, tick: Tick) -> OrderResult<()> {
        self.transition(id, OrderStatus::Delivered { tick }, |s| {
            s == OrderStatus::InTransit
        })?;
        self.delivered += 1;
        Ok(())
    }

    /// Expire every undelivered order whose deadline lies strictly before
    /// `now`, returning the expired descriptors in ID order.
    ///
    /// Already-terminal orders are untouched, so calling this every tick
    /// fires each expiration exactly once.
    pub fn expire_due(&mut self, now: Tick) -> Vec<ConfirmedOrder> {
        let mut expired: Vec<ConfirmedOrder> = self
            .entries
            .values_mut()
            .filter(|e| !e.status.is_terminal() && e.order.deadline() < now)
            .map(|e| {
                e.status = OrderStatus::Expired;
                e.order.clone()
            })
            .collect();
        // HashMap iteration order is arbitrary; sort so emitted expiry
        // events are deterministic across runs.
        expired.sort_by_key(|o| o.id());
        self.expired += expired.len() as u64;
        expired
    }

    fn transition(
        &mut self,
        id: OrderId,
        to: OrderStatus,
        allowed_from: impl Fn(OrderStatus) -> bool,
    ) -> OrderResult<()> {
        let entry = self.entries.get_mut(&id).ok_or(OrderError::UnknownOrder(id))?;
        if !allowed_from(entry.status) {
            return Err(OrderError::InvalidTransition {
                id,
                from: entry.status.label(),
                to: to.label(),
            });
        }
        entry.status = to;
        Ok(())
    }

    // ── Counts ────────────────────────────────────────────────────────────

    /// Total orders ever admitted.
    pub fn total(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered
    }

    pub fn expired_count(&self) -> u64 {
        self.expired
    }

    /// Orders that are neither delivered nor expired yet.
    pub fn open_count(&self) -> u64 {
        self.total() - self.delivered - self.expired
    }
}

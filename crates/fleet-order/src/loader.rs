//! CSV order-schedule loader.
//!
//! # CSV format
//!
//! One row per order:
//!
//! ```csv
//! order_id,tick,pickup_x,pickup_y,delivery_x,delivery_y,deadline,weight
//! 0,0,0,0,3,0,12,1.5
//! 1,2,1,0,3,0,9,0.75
//! ```
//!
//! `tick` and `deadline` are read as signed integers and converted through
//! `Tick::from_signed`, so a negative value in the file surfaces as an
//! out-of-range error at load time rather than a mystery later in the run.
//! Pickup and delivery coordinates must name nodes of the region the
//! schedule will be simulated on.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fleet_core::{Location, OrderId, Tick};
use fleet_region::Region;

use crate::generator::{ScheduledOrderFactory, ScheduledOrderGenerator};
use crate::{ConfirmedOrder, OrderError, OrderResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OrderRecord {
    order_id: u64,
    tick: i64,
    pickup_x: i32,
    pickup_y: i32,
    delivery_x: i32,
    delivery_y: i32,
    deadline: i64,
    weight: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an order schedule from a CSV file, validated against `region`.
pub fn load_orders_csv(path: &Path, region: &Region) -> OrderResult<ScheduledOrderFactory> {
    let file = std::fs::File::open(path).map_err(OrderError::Io)?;
    load_orders_reader(file, region)
}

/// Like [`load_orders_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from embedded
/// fixtures.
pub fn load_orders_reader<R: Read>(
    reader: R,
    region: &Region,
) -> OrderResult<ScheduledOrderFactory> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut schedule: BTreeMap<Tick, Vec<ConfirmedOrder>> = BTreeMap::new();
    let mut seen: std::collections::BTreeSet<OrderId> = std::collections::BTreeSet::new();

    for result in csv_reader.deserialize::<OrderRecord>() {
        let row = result.map_err(|e| OrderError::Parse(e.to_string()))?;

        let id = OrderId(row.order_id);
        if !seen.insert(id) {
            return Err(OrderError::DuplicateOrder(id));
        }

        let created = Tick::from_signed(row.tick)?;
        let deadline = Tick::from_signed(row.deadline)?;
        let pickup = Location::new(row.pickup_x, row.pickup_y);
        let delivery = Location::new(row.delivery_x, row.delivery_y);
        for location in [pickup, delivery] {
            if region.node(location).is_none() {
                return Err(OrderError::UnknownLocation(location));
            }
        }

        let order = ConfirmedOrder::new(id, pickup, delivery, created, deadline, row.weight)?;
        schedule.entry(created).or_default().push(order);
    }

    // Stable per-tick emission order regardless of row order in the file.
    for orders in schedule.values_mut() {
        orders.sort_by_key(|o| o.id());
    }

    Ok(ScheduledOrderFactory::new(ScheduledOrderGenerator::new(schedule)))
}

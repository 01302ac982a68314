use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, info};

use crate::flights::types::FlightRecord;

#[derive(Debug, Error, PartialEq)]
#[error("Invalid price range: min {min} is greater than max {max}")]
pub struct InvalidRange {
    pub min: f64,
    pub max: f64,
}

/// Shared in-memory collection of flight records. Cloning the store
/// clones the handle, not the records; the mutex serializes mutations
/// against reads.
#[derive(Clone, Default)]
pub struct FlightStore {
    inner: Arc<Mutex<Vec<FlightRecord>>>,
}

impl FlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts every record not already stored and returns the subset
    /// actually inserted, in input order.
    pub fn append(&self, records: Vec<FlightRecord>) -> Vec<FlightRecord> {
        let mut flights = self.inner.lock().expect("flight store lock poisoned");
        let mut inserted: Vec<FlightRecord> = Vec::new();
        for record in records {
            if flights.contains(&record) || inserted.contains(&record) {
                debug!(airline = %record.airline, origin = %record.origin,
                       destination = %record.destination, "skipping duplicate flight");
                continue;
            }
            inserted.push(record);
        }
        flights.extend(inserted.iter().cloned());
        if !inserted.is_empty() {
            info!(added = inserted.len(), total = flights.len(), "stored new flights");
        }
        inserted
    }

    /// Snapshot copy in insertion order.
    pub fn list(&self) -> Vec<FlightRecord> {
        self.inner.lock().expect("flight store lock poisoned").clone()
    }

    /// Idempotent.
    pub fn clear(&self) {
        let mut flights = self.inner.lock().expect("flight store lock poisoned");
        flights.clear();
        info!("cleared all flights");
    }

    pub fn filter_by_airline(&self, code: &str) -> Vec<FlightRecord> {
        self.inner
            .lock()
            .expect("flight store lock poisoned")
            .iter()
            .filter(|f| f.airline == code)
            .cloned()
            .collect()
    }

    pub fn filter_by_origin(&self, code: &str) -> Vec<FlightRecord> {
        self.inner
            .lock()
            .expect("flight store lock poisoned")
            .iter()
            .filter(|f| f.origin == code)
            .cloned()
            .collect()
    }

    /// Inclusive bounds on the numeric amount of each record's price
    /// string. Records whose price fails to parse never match.
    pub fn filter_by_price_range(
        &self,
        min: f64,
        max: f64,
    ) -> Result<Vec<FlightRecord>, InvalidRange> {
        if min > max {
            return Err(InvalidRange { min, max });
        }
        Ok(self
            .inner
            .lock()
            .expect("flight store lock poisoned")
            .iter()
            .filter(|f| {
                price_amount(&f.price).is_some_and(|amount| amount >= min && amount <= max)
            })
            .cloned()
            .collect())
    }
}

fn price_amount(price: &str) -> Option<f64> {
    price.split_whitespace().next()?.parse().ok()
}

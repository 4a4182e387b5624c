//! Keyed, insertion-ordered collection of customer records.
//!
//! Every command is synchronous and completes without I/O. Callers that share
//! a registry across tasks wrap it in a single lock (see `handlers::AppState`).

use chrono::Duration;
use std::collections::HashMap;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::errors::AppError;
use crate::models::{CustomerId, CustomerRecord, CustomerSnapshot, Segments};

pub struct Registry {
    records: Vec<CustomerRecord>,
    index: HashMap<CustomerId, usize>,
    clock: Arc<dyn Clock>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("records", &self.records.len())
            .finish()
    }
}

impl Registry {
    /// Empty registry stamped with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: CustomerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Registers a new customer. Fails with `DuplicateId` and leaves the
    /// registry untouched when the id is taken.
    pub fn add(
        &mut self,
        id: CustomerId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<(), AppError> {
        if self.contains(id) {
            return Err(AppError::DuplicateId(id));
        }

        let record = CustomerRecord::new(id, name, email, phone);
        tracing::info!("Customer {} ({}) added", id, record.name());
        self.index.insert(id, self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn record_interaction(
        &mut self,
        id: CustomerId,
        text: impl Into<String>,
    ) -> Result<(), AppError> {
        let now = self.clock.now();
        self.get_mut(id)?.add_interaction(text, now);
        tracing::info!("Interaction recorded for customer {}", id);
        Ok(())
    }

    pub fn record_purchase(&mut self, id: CustomerId, amount: f64) -> Result<(), AppError> {
        let now = self.clock.now();
        self.get_mut(id)?.add_purchase(amount, now);
        tracing::info!("Purchase of ${} recorded for customer {}", amount, id);
        Ok(())
    }

    pub fn get(&self, id: CustomerId) -> Option<&CustomerRecord> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    pub fn get_details(&self, id: CustomerId) -> Result<CustomerSnapshot, AppError> {
        self.get(id)
            .map(CustomerRecord::snapshot)
            .ok_or_else(|| AppError::customer_not_found(id))
    }

    /// Every customer, in registration order.
    pub fn list(&self) -> Vec<CustomerSnapshot> {
        self.records.iter().map(CustomerRecord::snapshot).collect()
    }

    /// Customers whose name or email contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<CustomerSnapshot> {
        let results: Vec<CustomerSnapshot> = self
            .records
            .iter()
            .filter(|r| r.matches(query))
            .map(CustomerRecord::snapshot)
            .collect();
        tracing::debug!("Search {:?} matched {} customers", query, results.len());
        results
    }

    pub fn segment(&self) -> Segments {
        let mut segments = Segments::default();
        for record in &self.records {
            segments.push(record.snapshot());
        }
        tracing::debug!(
            "Segmented {} customers: high={}, medium={}, low={}",
            segments.total(),
            segments.high.len(),
            segments.medium.len(),
            segments.low.len()
        );
        segments
    }

    /// Customers last contacted more than `days` days ago. Customers with no
    /// interaction at all are left out.
    pub fn due_for_follow_up(&self, days: u32) -> Vec<CustomerSnapshot> {
        // No contact predates the earliest representable instant.
        let Some(cutoff) = self
            .clock
            .now()
            .checked_sub_signed(Duration::days(i64::from(days)))
        else {
            return Vec::new();
        };
        self.records
            .iter()
            .filter(|r| r.contacted_before(cutoff))
            .map(CustomerRecord::snapshot)
            .collect()
    }

    /// The `n` highest-scoring customers. Ties keep registration order.
    pub fn top_n(&self, n: usize) -> Vec<CustomerSnapshot> {
        let mut ranked: Vec<CustomerSnapshot> =
            self.records.iter().map(CustomerRecord::snapshot).collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(n);
        ranked
    }

    fn get_mut(&mut self, id: CustomerId) -> Result<&mut CustomerRecord, AppError> {
        match self.index.get(&id) {
            Some(&i) => Ok(&mut self.records[i]),
            None => {
                tracing::warn!("Customer {} not found", id);
                Err(AppError::customer_not_found(id))
            }
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Scoring Constants ============

/// Points contributed by every logged interaction.
pub const INTERACTION_WEIGHT: f64 = 10.0;
/// Fraction of the purchase total counted towards the score.
pub const PURCHASE_WEIGHT: f64 = 0.1;
/// Lowest score of the high-value segment.
pub const HIGH_VALUE_THRESHOLD: f64 = 100.0;
/// Lowest score of the medium-value segment.
pub const MEDIUM_VALUE_THRESHOLD: f64 = 50.0;

// ============ Domain Models ============

/// Caller-assigned customer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub i64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CustomerId {
    fn from(value: i64) -> Self {
        CustomerId(value)
    }
}

/// A logged contact with the customer (call, email, meeting note...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Free-form description, stored as given.
    pub text: String,
    /// When the interaction was logged.
    pub recorded_at: DateTime<Utc>,
}

/// A single recorded purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub amount: f64,
    pub recorded_at: DateTime<Utc>,
}

/// One customer's identity and history.
///
/// Records are only created by [`crate::registry::Registry::add`]. The
/// engagement score is never stored; it is derived from the history every
/// time it is asked for.
#[derive(Debug, Clone)]
pub struct CustomerRecord {
    id: CustomerId,
    name: String,
    email: String,
    phone: String,
    interactions: Vec<Interaction>,
    purchases: Vec<Purchase>,
    last_contact: Option<DateTime<Utc>>,
}

impl CustomerRecord {
    pub(crate) fn new(
        id: CustomerId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            interactions: Vec::new(),
            purchases: Vec::new(),
            last_contact: None,
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn last_contact(&self) -> Option<DateTime<Utc>> {
        self.last_contact
    }

    /// Logs an interaction and moves the last contact date to `at`.
    pub fn add_interaction(&mut self, text: impl Into<String>, at: DateTime<Utc>) {
        self.interactions.push(Interaction {
            text: text.into(),
            recorded_at: at,
        });
        self.last_contact = Some(at);
    }

    /// Records a purchase. Zero and negative amounts are stored as given.
    pub fn add_purchase(&mut self, amount: f64, at: DateTime<Utc>) {
        self.purchases.push(Purchase {
            amount,
            recorded_at: at,
        });
    }

    /// Total amount spent by the customer.
    pub fn total_purchases(&self) -> f64 {
        self.purchases.iter().map(|p| p.amount).sum()
    }

    /// `10 * interactions + 0.1 * total purchases`.
    pub fn engagement_score(&self) -> f64 {
        self.interactions.len() as f64 * INTERACTION_WEIGHT
            + self.total_purchases() * PURCHASE_WEIGHT
    }

    /// Whether the last contact happened strictly before `cutoff`.
    /// Customers that were never contacted are not considered stale.
    pub fn contacted_before(&self, cutoff: DateTime<Utc>) -> bool {
        matches!(self.last_contact, Some(last) if last < cutoff)
    }

    /// Case-insensitive substring match on name or email.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.email.to_lowercase().contains(&query)
    }

    pub fn snapshot(&self) -> CustomerSnapshot {
        CustomerSnapshot {
            customer_id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            total_purchases: self.total_purchases(),
            score: self.engagement_score(),
            interactions: self.interactions.clone(),
            purchases: self.purchases.clone(),
            last_contact_date: self.last_contact,
        }
    }
}

// ============ API Response Models ============

/// Read-only view of a customer returned by every query command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub total_purchases: f64,
    pub score: f64,
    pub interactions: Vec<Interaction>,
    pub purchases: Vec<Purchase>,
    pub last_contact_date: Option<DateTime<Utc>>,
}

impl CustomerSnapshot {
    /// Renders the snapshot as `Key: value` lines, one field per line.
    pub fn to_details_text(&self) -> String {
        let interactions = self
            .interactions
            .iter()
            .map(|i| format!("{} ({})", i.text, i.recorded_at.to_rfc3339()))
            .collect::<Vec<_>>()
            .join(", ");
        let purchases = self
            .purchases
            .iter()
            .map(|p| format!("${} ({})", p.amount, p.recorded_at.to_rfc3339()))
            .collect::<Vec<_>>()
            .join(", ");
        let last_contact = self
            .last_contact_date
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "None".to_string());

        [
            format!("Customer ID: {}", self.customer_id),
            format!("Name: {}", self.name),
            format!("Email: {}", self.email),
            format!("Phone: {}", self.phone),
            format!("Total Purchases: {}", self.total_purchases),
            format!("Score: {}", self.score),
            format!("Interactions: [{}]", interactions),
            format!("Purchases: [{}]", purchases),
            format!("Last Contact Date: {}", last_contact),
        ]
        .join("\n")
    }
}

/// Engagement tier of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    High,
    Medium,
    Low,
}

impl Segment {
    pub fn for_score(score: f64) -> Self {
        if score >= HIGH_VALUE_THRESHOLD {
            Segment::High
        } else if score >= MEDIUM_VALUE_THRESHOLD {
            Segment::Medium
        } else {
            Segment::Low
        }
    }
}

/// All customers partitioned into the three engagement tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segments {
    pub high: Vec<CustomerSnapshot>,
    pub medium: Vec<CustomerSnapshot>,
    pub low: Vec<CustomerSnapshot>,
}

impl Segments {
    pub fn push(&mut self, snapshot: CustomerSnapshot) {
        match Segment::for_score(snapshot.score) {
            Segment::High => self.high.push(snapshot),
            Segment::Medium => self.medium.push(snapshot),
            Segment::Low => self.low.push(snapshot),
        }
    }

    pub fn total(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    fn alice() -> CustomerRecord {
        CustomerRecord::new(
            CustomerId(1),
            "Alice Johnson",
            "alice.johnson@example.com",
            "123-456-7890",
        )
    }

    #[test]
    fn test_new_record_is_empty() {
        let record = alice();
        assert_eq!(record.total_purchases(), 0.0);
        assert_eq!(record.engagement_score(), 0.0);
        assert!(record.last_contact().is_none());
    }

    #[test]
    fn test_interaction_updates_last_contact() {
        let mut record = alice();
        record.add_interaction("Discussed product options", at(1));
        record.add_interaction("", at(4));

        assert_eq!(record.interactions().len(), 2);
        assert_eq!(record.interactions()[1].text, "");
        assert_eq!(record.last_contact(), Some(at(4)));
    }

    #[test]
    fn test_purchase_does_not_touch_last_contact() {
        let mut record = alice();
        record.add_purchase(250.0, at(2));
        assert!(record.last_contact().is_none());
        assert_eq!(record.purchases()[0].recorded_at, at(2));
    }

    #[test]
    fn test_score_after_purchase_then_interaction() {
        let mut record = alice();
        record.add_purchase(250.0, at(1));
        assert_eq!(record.engagement_score(), 25.0);

        record.add_interaction("call", at(2));
        assert_eq!(record.engagement_score(), 35.0);
    }

    #[test]
    fn test_negative_amounts_are_accepted() {
        let mut record = alice();
        record.add_purchase(100.0, at(1));
        record.add_purchase(-40.0, at(2));
        record.add_purchase(0.0, at(3));

        assert_eq!(record.purchases().len(), 3);
        assert_eq!(record.total_purchases(), 60.0);
        assert_eq!(record.engagement_score(), 6.0);
    }

    #[test]
    fn test_contacted_before_is_strict() {
        let mut record = alice();
        assert!(!record.contacted_before(at(10)));

        record.add_interaction("email", at(5));
        assert!(record.contacted_before(at(5) + Duration::seconds(1)));
        assert!(!record.contacted_before(at(5)));
    }

    #[test]
    fn test_matches_name_or_email_ignoring_case() {
        let record = alice();
        assert!(record.matches("ALICE"));
        assert!(record.matches("johnson@EXAMPLE"));
        assert!(record.matches(""));
        assert!(!record.matches("bob"));
        assert!(!record.matches("123-456"));
    }

    #[test]
    fn test_segment_boundaries() {
        assert_eq!(Segment::for_score(100.0), Segment::High);
        assert_eq!(Segment::for_score(99.99), Segment::Medium);
        assert_eq!(Segment::for_score(50.0), Segment::Medium);
        assert_eq!(Segment::for_score(49.99), Segment::Low);
        assert_eq!(Segment::for_score(-5.0), Segment::Low);
    }

    #[test]
    fn test_details_text_lists_every_field() {
        let mut record = alice();
        record.add_purchase(250.0, at(1));
        let text = record.snapshot().to_details_text();

        let labels: Vec<&str> = text
            .lines()
            .map(|line| line.split(':').next().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Customer ID",
                "Name",
                "Email",
                "Phone",
                "Total Purchases",
                "Score",
                "Interactions",
                "Purchases",
                "Last Contact Date",
            ]
        );
        assert!(text.contains("Score: 25"));
        assert!(text.contains("Last Contact Date: None"));
    }

    #[test]
    fn test_snapshot_serializes_id_as_number() {
        let value = serde_json::to_value(alice().snapshot()).unwrap();
        assert_eq!(value["customer_id"], 1);
        assert!(value["last_contact_date"].is_null());
    }
}

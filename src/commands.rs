//! Front-end command boundary.
//!
//! Front-ends hand over raw input (form fields, JSON bodies, scripted
//! console calls). This module coerces it into core types, runs the registry
//! command and produces the status message shown to the user.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::CustomerId;
use crate::registry::Registry;

/// Purchase amount as typed by the user: either already numeric or text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// True when the amount field was left empty.
    pub fn is_blank(&self) -> bool {
        matches!(self, AmountInput::Text(raw) if raw.trim().is_empty())
    }

    /// Coerces the input to a finite `f64`.
    pub fn to_amount(&self) -> Result<f64, AppError> {
        let amount = match self {
            AmountInput::Number(value) => *value,
            AmountInput::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::InvalidAmount(raw.clone()))?,
        };

        if !amount.is_finite() {
            return Err(AppError::InvalidAmount(amount.to_string()));
        }
        Ok(amount)
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

/// Result of a mutating command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandStatus {
    pub customer_id: CustomerId,
    pub message: String,
}

/// Fields of the add-customer form.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewCustomer {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl NewCustomer {
    /// The form refuses to submit until every field is filled in.
    pub fn require_all_fields(&self) -> Result<(), AppError> {
        let missing = [&self.name, &self.email, &self.phone]
            .iter()
            .any(|field| field.trim().is_empty());
        if missing {
            return Err(AppError::BadRequest("Please fill all fields.".to_string()));
        }
        Ok(())
    }
}

pub fn add_customer(registry: &mut Registry, input: NewCustomer) -> Result<CommandStatus, AppError> {
    let NewCustomer {
        customer_id,
        name,
        email,
        phone,
    } = input;
    let message = format!("Customer {} added successfully.", name);
    registry.add(customer_id, name, email, phone)?;
    Ok(CommandStatus {
        customer_id,
        message,
    })
}

pub fn log_interaction(
    registry: &mut Registry,
    id: CustomerId,
    text: impl Into<String>,
) -> Result<CommandStatus, AppError> {
    registry.record_interaction(id, text)?;
    Ok(CommandStatus {
        customer_id: id,
        message: "Interaction recorded.".to_string(),
    })
}

pub fn log_purchase(
    registry: &mut Registry,
    id: CustomerId,
    amount: &AmountInput,
) -> Result<CommandStatus, AppError> {
    let amount = amount.to_amount()?;
    registry.record_purchase(id, amount)?;
    Ok(CommandStatus {
        customer_id: id,
        message: format!("Purchase of ${} recorded.", amount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_coercion() {
        assert_eq!(AmountInput::from(250.0).to_amount(), Ok(250.0));
        assert_eq!(AmountInput::Text(" 12.5 ".into()).to_amount(), Ok(12.5));
        assert_eq!(AmountInput::Text("-3".into()).to_amount(), Ok(-3.0));
        assert_eq!(
            AmountInput::Text("abc".into()).to_amount(),
            Err(AppError::InvalidAmount("abc".into()))
        );
        assert!(AmountInput::Text("".into()).to_amount().is_err());
        assert!(AmountInput::Text("NaN".into()).to_amount().is_err());
        assert!(AmountInput::Text("inf".into()).to_amount().is_err());
    }

    #[test]
    fn test_blank_amount() {
        assert!(AmountInput::Text("".into()).is_blank());
        assert!(AmountInput::Text("  ".into()).is_blank());
        assert!(!AmountInput::Text("0".into()).is_blank());
        assert!(!AmountInput::from(0.0).is_blank());
    }

    #[test]
    fn test_amount_input_accepts_number_or_string_json() {
        let number: AmountInput = serde_json::from_str("150").unwrap();
        let text: AmountInput = serde_json::from_str("\"150\"").unwrap();
        assert_eq!(number.to_amount(), text.to_amount());
    }

    #[test]
    fn test_status_messages() {
        let mut registry = Registry::new();
        let status = add_customer(
            &mut registry,
            NewCustomer {
                customer_id: CustomerId(2),
                name: "Bob Smith".into(),
                email: "bob.smith@example.com".into(),
                phone: "234-567-8901".into(),
            },
        )
        .unwrap();
        assert_eq!(status.message, "Customer Bob Smith added successfully.");

        let status = log_interaction(&mut registry, CustomerId(2), "Sent email").unwrap();
        assert_eq!(status.message, "Interaction recorded.");

        let status = log_purchase(&mut registry, CustomerId(2), &AmountInput::from(150.0)).unwrap();
        assert_eq!(status.message, "Purchase of $150 recorded.");
    }

    #[test]
    fn test_bad_amount_never_reaches_registry() {
        let mut registry = Registry::new();
        registry.add(CustomerId(1), "Alice", "a@example.com", "1").unwrap();

        let err = log_purchase(&mut registry, CustomerId(1), &AmountInput::Text("ten".into()))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidAmount(_)));
        assert!(registry.get(CustomerId(1)).unwrap().purchases().is_empty());
    }

    #[test]
    fn test_require_all_fields() {
        let mut input = NewCustomer {
            customer_id: CustomerId(1),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            phone: "   ".into(),
        };
        assert!(input.require_all_fields().is_err());

        input.phone = "123".into();
        assert!(input.require_all_fields().is_ok());
    }
}

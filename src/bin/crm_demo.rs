//! Console demo: runs the example CRM session against a fresh registry and
//! prints every result as pretty JSON.
//!
//! Usage: cargo run --bin crm_demo [follow_up_days] [top_n]

use rust_crm::commands::{self, AmountInput, NewCustomer};
use rust_crm::config::DEFAULT_FOLLOW_UP_DAYS;
use rust_crm::models::CustomerId;
use rust_crm::registry::Registry;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_section<T: Serialize>(title: &str, value: &T) -> anyhow::Result<()> {
    println!("{}:", title);
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_crm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let follow_up_days: u32 = match args.next() {
        Some(days) => days
            .parse()
            .map_err(|_| anyhow::anyhow!("follow_up_days must be a non-negative integer"))?,
        None => DEFAULT_FOLLOW_UP_DAYS,
    };
    // The example session asks for the top two unless told otherwise.
    let top_n: usize = match args.next() {
        Some(n) => n
            .parse()
            .map_err(|_| anyhow::anyhow!("top_n must be a non-negative integer"))?,
        None => 2,
    };

    let mut registry = Registry::new();

    let customers = [
        (1, "Alice Johnson", "alice.johnson@example.com", "123-456-7890"),
        (2, "Bob Smith", "bob.smith@example.com", "234-567-8901"),
    ];
    for (id, name, email, phone) in customers {
        let input = NewCustomer {
            customer_id: CustomerId(id),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        };
        println!("{}", commands::add_customer(&mut registry, input)?.message);
    }

    let interactions = [
        (1, "Discussed product options"),
        (2, "Sent email about promotions"),
    ];
    for (id, text) in interactions {
        println!(
            "{}",
            commands::log_interaction(&mut registry, CustomerId(id), text)?.message
        );
    }

    for (id, amount) in [(1, 250.0_f64), (2, 150.0)] {
        println!(
            "{}",
            commands::log_purchase(&mut registry, CustomerId(id), &AmountInput::Number(amount))?.message
        );
    }

    println!("{}", registry.get_details(CustomerId(1))?.to_details_text());
    print_section("Customer Segments", &registry.segment())?;
    print_section(
        &format!("Follow-up Reminders ({} days)", follow_up_days),
        &registry.due_for_follow_up(follow_up_days),
    )?;
    print_section("Top Customers", &registry.top_n(top_n))?;

    Ok(())
}

use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use customer_es::config::AppConfig;
use customer_es::domain::customer::{
    ChangeCustomerEmailAddress, CommandOutcome, ConfirmCustomerEmailAddress, CustomerCommand,
    CustomerCommandHandler, CustomerEvent, RegisterCustomer,
};
use customer_es::event_sourcing::DomainEvent;
use customer_es::event_sourcing::InMemoryEventStore;
use customer_es::metrics::Metrics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured filter
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
        )
        .init();

    tracing::info!("🚀 Starting event-sourced Customer demo");

    // === 1. Wire store, metrics and handler ===
    let event_store = Arc::new(InMemoryEventStore::<CustomerEvent>::new("Customer"));
    let metrics = Arc::new(Metrics::new()?);
    let handler = CustomerCommandHandler::new(event_store.clone())
        .with_retry(config.retry_config())
        .with_metrics(metrics.clone());

    let correlation_id = Uuid::new_v4();

    // === 2. Register ===
    let registration = RegisterCustomer::build("john@doe.com", "John", "Doe");
    let customer_id = registration.customer_id;
    let first_hash = registration.confirmation_hash.clone();
    run(&handler, registration.into(), correlation_id).await?;

    // === 3. Confirm, confirm again, confirm with a wrong hash ===
    run(&handler, ConfirmCustomerEmailAddress::build(customer_id, first_hash.as_str()).into(), correlation_id).await?;
    run(&handler, ConfirmCustomerEmailAddress::build(customer_id, first_hash.as_str()).into(), correlation_id).await?;
    run(&handler, ConfirmCustomerEmailAddress::build(customer_id, "not-the-hash").into(), correlation_id).await?;

    // === 4. Change the address and confirm the new one ===
    let change = ChangeCustomerEmailAddress::build(customer_id, "john+changed@doe.com");
    let second_hash = change.confirmation_hash.clone();
    run(&handler, change.into(), correlation_id).await?;
    run(&handler, ConfirmCustomerEmailAddress::build(customer_id, second_hash.as_str()).into(), correlation_id).await?;

    if let Some(state) = handler.load(customer_id).await? {
        tracing::info!(
            customer_id = %state.customer_id,
            name = %state.name,
            email_address = %state.email_address,
            confirmed = state.is_email_address_confirmed,
            version = state.version,
            "Final customer state"
        );
    }

    tracing::info!(
        "📊 Metrics registry holds {} metric families",
        metrics.registry().gather().len()
    );
    tracing::debug!("{}", metrics.render()?);

    tracing::info!("🎉 Demo complete!");

    Ok(())
}

async fn run(
    handler: &CustomerCommandHandler<InMemoryEventStore<CustomerEvent>>,
    command: CustomerCommand,
    correlation_id: Uuid,
) -> anyhow::Result<CommandOutcome> {
    let operation = command.operation();
    let outcome = handler.handle(command, correlation_id).await?;

    if outcome.is_noop() {
        tracing::info!("✅ {}: nothing to record (version {})", operation, outcome.version);
    }
    for event in &outcome.events {
        tracing::info!("✅ {}: {} (version {})", operation, event.name(), outcome.version);
    }

    Ok(outcome)
}

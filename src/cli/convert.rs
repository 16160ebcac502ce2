use anyhow::Result;
use std::sync::Arc;

use crate::cli::ui::{self, StyleType};
use crate::config::AppConfig;
use crate::converter::Converter;
use crate::core::Conversion;
use crate::providers::Registry;

/// Runs one conversion and prints the result with its provenance.
pub async fn run(
    config: &AppConfig,
    amount: f64,
    from: &str,
    to: &str,
    provider_id: u8,
) -> Result<()> {
    let from = from.to_uppercase();
    let to = to.to_uppercase();

    let registry = Registry::new(&config.providers);
    let converter = Converter::new(Arc::new(registry));

    let conversion = converter.convert(amount, &from, &to, provider_id).await;

    if !conversion.converted() {
        let message = if from == to {
            "Pick two different currencies."
        } else {
            "Unable to convert currency, try again."
        };
        eprintln!("{}", ui::style_text(message, StyleType::Error));
        anyhow::bail!("conversion failed: {amount} {from} -> {to} via provider {provider_id}");
    }

    print_conversion(&conversion);
    Ok(())
}

fn print_conversion(conversion: &Conversion) {
    println!(
        "{} {} = {} {}",
        conversion.amount_in,
        conversion.record.from_currency,
        ui::style_text(
            &ui::format_amount(conversion.amount_out),
            StyleType::Amount
        ),
        conversion.record.to_currency,
    );
    if !conversion.record.fetched_info.is_empty() {
        println!(
            "{}",
            ui::style_text(&conversion.record.fetched_info, StyleType::Subtle)
        );
    }
    println!(
        "{}",
        ui::style_text(&conversion.record.disclaimer_url, StyleType::Subtle)
    );
}

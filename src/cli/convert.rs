use super::{FetchOptions, fetch_table, ui};
use crate::core::config::AppConfig;
use crate::core::{RateTable, convert};
use crate::providers::cnb::DATE_FORMAT;
use anyhow::{Result, bail};

fn ensure_available(code: &str, table: &RateTable) -> Result<()> {
    if !table.contains(code) {
        bail!(
            "Currency {} is not available. Available currencies: {}",
            code,
            table.codes().collect::<Vec<_>>().join(", ")
        );
    }
    Ok(())
}

/// Renders `amount from = result to` for the given table.
///
/// Both codes must be present in `table`, and must differ.
pub fn render_conversion(amount: f64, from: &str, to: &str, table: &RateTable) -> Result<String> {
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();
    if from == to {
        bail!("Base and target currency cannot be the same");
    }
    ensure_available(&from, table)?;
    ensure_available(&to, table)?;

    let converted = convert(amount, &from, &to, table);
    let result = format!("{} {}", ui::format_amount(converted), to);
    Ok(format!(
        "{} {} = {}",
        ui::format_amount(amount),
        from,
        ui::style_text(&result, ui::StyleType::Result)
    ))
}

pub async fn run(
    config: &AppConfig,
    options: &FetchOptions,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<()> {
    let fetched = fetch_table(config, options).await?;
    if let Some(notice) = &fetched.notice {
        eprintln!("{notice}");
    }

    println!("{}", render_conversion(amount, from, to, &fetched.table)?);
    if let Some(date) = fetched.table.effective_date() {
        println!(
            "{}",
            ui::style_text(
                &format!("Exchange rates of {}", date.format(DATE_FORMAT)),
                ui::StyleType::Subtle
            )
        );
    }
    Ok(())
}

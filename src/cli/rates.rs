use super::{FetchOptions, fetch_table, ui};
use crate::core::RateTable;
use crate::core::config::AppConfig;
use crate::providers::cnb::DATE_FORMAT;
use anyhow::Result;
use comfy_table::Cell;

impl RateTable {
    pub fn display_as_table(&self) -> String {
        let pivot = self.pivot();

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Code"),
            ui::header_cell("Quantity"),
            ui::header_cell(&format!("Rate ({pivot})")),
        ]);

        for (code, entry) in self.iter() {
            table.add_row(vec![
                Cell::new(code),
                ui::number_cell(ui::format_rate(entry.quantity)),
                ui::number_cell(ui::format_rate(entry.rate)),
            ]);
        }

        let title = match self.effective_date() {
            Some(date) => format!("Exchange rates of {}", date.format(DATE_FORMAT)),
            None => "Exchange rates".to_string(),
        };

        format!(
            "{}\n\n{}",
            ui::style_text(&title, ui::StyleType::Title),
            table
        )
    }
}

pub async fn run(config: &AppConfig, options: &FetchOptions, json: bool) -> Result<()> {
    let fetched = fetch_table(config, options).await?;
    if let Some(notice) = &fetched.notice {
        eprintln!("{notice}");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&fetched.table)?);
    } else {
        println!("{}", fetched.table.display_as_table());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawRow;
    use chrono::NaiveDate;

    fn table() -> RateTable {
        let row = |quantity: &str, code: &str, rate: &str| RawRow {
            country: String::new(),
            currency: String::new(),
            quantity: quantity.to_string(),
            code: code.to_string(),
            rate: rate.to_string(),
        };
        RateTable::from_rows(
            "CZK",
            NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
            &[row("100", "HUF", "6,389"), row("1", "EUR", "23,760")],
        )
    }

    #[test]
    fn test_display_as_table() {
        let output = table().display_as_table();
        assert!(output.contains("Exchange rates of 15.06.2023"));
        assert!(output.contains("Rate (CZK)"));
        assert!(output.contains("HUF"));
        assert!(output.contains("6,389"));
        assert!(output.contains("23,76"));

        let eur = output.find("EUR").unwrap();
        let huf = output.find("HUF").unwrap();
        assert!(eur < huf);
    }

    #[test]
    fn test_degraded_table_display() {
        let output = RateTable::degraded("CZK").display_as_table();
        assert!(output.contains("Exchange rates"));
        assert!(output.contains("CZK"));
    }

    #[test]
    fn test_json_output() {
        let json = serde_json::to_value(table()).unwrap();
        assert_eq!(json["pivot"], "CZK");
        assert_eq!(json["effective_date"], "2023-06-15");
        assert_eq!(json["rates"]["HUF"]["quantity"], 100.0);
        assert_eq!(json["rates"]["EUR"]["rate"], 23.76);
        assert_eq!(json["rates"]["CZK"]["rate"], 1.0);
    }
}

use anyhow::Result;

use crate::cli::ui::{self, StyleType};
use crate::core::codes::CODES;

/// Prints the table of supported currency codes.
pub fn run() -> Result<()> {
    println!(
        "{}",
        ui::style_text("Supported currencies", StyleType::Title)
    );

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);
    for (code, name) in CODES {
        table.add_row(vec![code.to_string(), name.to_string()]);
    }

    println!("{table}");
    Ok(())
}

use std::path::Path;
use std::{env, process::exit};

use scrimscraper::config::Config;
use scrimscraper::fetch::{RowSource, SheetClient};

/// Print a worksheet exactly as the service returns it, one tab-separated
/// line per row. Handy when the team reshuffles the sheet and a view stops
/// finding its header.
fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <WORKSHEET_NAME>", args[0]);
        exit(1);
    }

    if let Err(e) = dump(&args[1]) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn dump(worksheet: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default(Path::new("scrimscraper.yaml"))?;
    if config.spreadsheet_id.is_empty() {
        return Err("spreadsheet_id is not set; add it to scrimscraper.yaml".into());
    }
    let api_key = env::var("SHEETS_API_KEY")?;

    let client = SheetClient::new(api_key);
    let rows = client.fetch_rows(&config.spreadsheet_id, worksheet)?;

    for (i, row) in rows.iter().enumerate() {
        println!("{i}\t{}", row.join("\t"));
    }
    eprintln!("{} rows", rows.len());
    Ok(())
}

//! Scour CLI - interactive console for the cleaning and reporting engine.

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use scour::output::{self, OutputFormat};
use scour::reports::{DEFAULT_PROFIT_LIMIT, DEFAULT_TOP_LIMIT};
use scour::{Dataset, Result};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Scour data console v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let dataset = Dataset::new();
    let mut format = OutputFormat::Table;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("scour> ");
        if stdout.flush().is_err() {
            break; // Output stream closed
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break, // EOF or read error
            Ok(_) => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            ["exit"] | ["quit"] | [".exit"] | [".quit"] => {
                println!("Goodbye!");
                break;
            }
            ["help"] | [".help"] => print_help(),
            [".tables"] => {
                for (name, count) in dataset.table_counts() {
                    println!("  {name}: {count} rows");
                }
            }
            [".format"] => println!("Current format: {format}"),
            [".format", name] => match OutputFormat::parse(name) {
                Ok(parsed) => format = parsed,
                Err(e) => println!("Error: {e}"),
            },
            [".load", table, path] => {
                let loaded = match *table {
                    "customers" => dataset.load_customers_csv(path),
                    "sales" => dataset.load_sales_csv(path),
                    "inventory" => dataset.load_inventory_csv(path),
                    _ => {
                        println!("Unknown table '{table}'; expected customers, sales, or inventory.");
                        continue;
                    }
                };
                match loaded {
                    Ok(count) => println!("Loaded {count} rows into {table}."),
                    Err(e) => println!("Error: {e}"),
                }
            }
            ["clean"] => match dataset.clean() {
                Ok(report) => {
                    println!("  duplicate customers removed: {}", report.duplicate_customers_removed);
                    println!("  duplicate sales removed:     {}", report.duplicate_sales_removed);
                    println!("  genders standardized:        {}", report.genders_standardized);
                    println!("  dates normalized:            {}", report.dates_normalized);
                    println!("  age groups backfilled:       {}", report.age_groups_backfilled);
                }
                Err(e) => println!("Error: {e}"),
            },
            ["refresh"] => {
                dataset.refresh_clean_sales_data();
                println!("Sales data refreshed.");
            }
            ["view"] => {
                let rows = dataset.sales_summary_by_product_region();
                print_report(&rows, format);
            }
            ["report", name] => {
                if let Err(e) = run_report(&dataset, name, format) {
                    println!("Error: {e}");
                }
            }
            _ => println!("Unknown command. Type 'help' for available commands."),
        }
    }

    Ok(())
}

fn run_report(dataset: &Dataset, name: &str, format: OutputFormat) -> Result<()> {
    match name {
        "products" => print_report(&dataset.top_products(DEFAULT_TOP_LIMIT), format),
        "provinces" => print_report(&dataset.top_provinces(DEFAULT_TOP_LIMIT), format),
        "monthly" => print_report(&dataset.monthly_trend()?, format),
        "profit" => print_report(&dataset.inventory_profit(DEFAULT_PROFIT_LIMIT), format),
        "clv" => print_report(&dataset.customer_lifetime_value(), format),
        "discount" => print_report(&dataset.discount_impact(), format),
        "lowstock" => print_report(&dataset.low_stock_high_demand(), format),
        "satisfaction" => print_report(&dataset.satisfaction_by_product(), format),
        _ => println!(
            "Unknown report '{name}'. Available: products, provinces, monthly, profit, clv, discount, lowstock, satisfaction."
        ),
    }
    Ok(())
}

fn print_report<T: output::Tabular + serde::Serialize>(rows: &[T], format: OutputFormat) {
    let mut stdout = io::stdout();
    if let Err(e) = output::write_rows(&mut stdout, rows, format) {
        println!("Error: {e}");
        return;
    }
    println!("({} rows)", rows.len());
}

fn print_help() {
    println!("Commands:");
    println!("  .load <table> <path>   Load a CSV file into customers, sales, or inventory");
    println!("  .tables                Show row counts per table");
    println!("  .format [name]         Show or set the output format (table, csv, json)");
    println!("  clean                  Run the full cleaning pass");
    println!("  refresh                Re-clean the sales table (dedup + date repair)");
    println!("  report <name>          Run a report: products, provinces, monthly, profit,");
    println!("                         clv, discount, lowstock, satisfaction");
    println!("  view                   Show the product/region sales summary");
    println!("  help                   Show this help");
    println!("  exit                   Quit");
}

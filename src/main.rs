// Entry point and high-level CLI flow.
//
// The console stands in for the original dashboard surface:
// - Startup loads the banner asset and the order export; either missing is
//   fatal before any menu appears.
// - Option [1] renders the company page (management / tactical / geographic
//   sections), option [2] the courier page (metric cards, ratings, speed
//   rankings).
// - Option [3] adjusts the two filters (date cutoff, traffic categories)
//   that narrow every view; option [4] reloads the export; option [5]
//   previews cleaned rows.
mod filter;
mod loader;
mod output;
mod reports;
mod types;
mod util;
mod validate;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reports::SpeedOrder;
use std::error::Error;
use std::io::{self, Write};
use std::sync::Mutex;
use types::{CleanOrder, Traffic};

const DATA_PATH: &str = "train.csv";
const LOGO_PATH: &str = "assets/logo.txt";

// The export covers a fixed historical window; the cutoff selector is
// bounded to it.
static DATE_MIN: Lazy<NaiveDate> = Lazy::new(|| NaiveDate::from_ymd_opt(2022, 2, 11).unwrap());
static DATE_MAX: Lazy<NaiveDate> = Lazy::new(|| NaiveDate::from_ymd_opt(2022, 4, 6).unwrap());

// Simple in-memory app state so we load/clean the CSV once per session but
// can render pages and change filters any number of times.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        data: Vec::new(),
        filters: FilterState::default(),
    })
});

struct AppState {
    data: Vec<CleanOrder>,
    filters: FilterState,
}

#[derive(Clone)]
struct FilterState {
    cutoff: NaiveDate,
    traffic: Vec<Traffic>,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            cutoff: *DATE_MAX,
            traffic: Traffic::ALL.to_vec(),
        }
    }
}

impl FilterState {
    fn describe(&self) -> String {
        let traffic: Vec<&str> = self.traffic.iter().map(|t| t.as_str()).collect();
        format!(
            "orders before {}, traffic {}",
            self.cutoff.format("%d-%m-%Y"),
            traffic.join(", ")
        )
    }
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    prompt_line("Enter choice: ")
}

fn prompt_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Clone the cleaned snapshot and the active filters out of the session
/// state. Views work on the clone; the snapshot itself is never mutated.
fn snapshot() -> (Vec<CleanOrder>, FilterState) {
    let state = APP_STATE.lock().unwrap();
    (state.data.clone(), state.filters.clone())
}

fn narrowed() -> (Vec<CleanOrder>, FilterState) {
    let (data, filters) = snapshot();
    let data = filter::before_date(&data, filters.cutoff);
    let data = filter::with_traffic(&data, &filters.traffic);
    (data, filters)
}

fn load_dataset() -> Result<(), Box<dyn Error>> {
    let (data, report) = loader::load_and_clean(DATA_PATH)?;
    println!(
        "Processing dataset... ({} rows loaded, {} kept after cleaning)",
        util::format_int(report.total_rows as i64),
        util::format_int(report.kept_rows as i64)
    );
    println!(
        "Note: {} rows skipped due to validation errors.",
        util::format_int(report.skipped() as i64)
    );
    if report.skipped() > 0 {
        let breakdown = [
            ("missing fields", report.missing_fields),
            ("bad numbers", report.bad_numbers),
            ("bad dates", report.bad_dates),
            ("bad time-taken", report.bad_time_taken),
            ("unknown categories", report.unknown_categories),
            ("unreadable rows", report.read_errors),
        ];
        for (label, count) in breakdown {
            if count > 0 {
                println!("  {}: {}", label, util::format_int(count as i64));
            }
        }
    }
    println!();
    let mut state = APP_STATE.lock().unwrap();
    state.data = data;
    Ok(())
}

/// Handle option [1]: the company page.
fn handle_company_view() {
    let (data, filters) = narrowed();
    println!("Filters: {}\n", filters.describe());

    output::section("Management View");
    output::render_table("Orders by Day", &reports::orders_by_date(&data));
    output::render_table("Traffic Order Share", &reports::share_by_traffic(&data));
    output::render_table(
        "Order Volume by Traffic and City",
        &reports::orders_by_traffic_and_city(&data),
    );

    output::section("Tactical View");
    output::render_table("Orders by Week", &reports::orders_by_week(&data));
    output::render_table(
        "Orders per Courier by Week",
        &reports::orders_per_courier_by_week(&data),
    );

    output::section("Geographic View");
    output::render_table(
        "Median Delivery Location by City and Traffic",
        &reports::median_location_by_city_and_traffic(&data),
    );
}

/// Handle option [2]: the courier page.
fn handle_courier_view() {
    let (data, filters) = narrowed();
    println!("Filters: {}\n", filters.describe());

    output::section("Overall Metrics");
    match reports::fleet_metrics(&data) {
        Some(m) => {
            println!("Oldest courier:          {}", m.oldest_courier);
            println!("Youngest courier:        {}", m.youngest_courier);
            println!("Best vehicle condition:  {}", m.best_vehicle_condition);
            println!("Worst vehicle condition: {}\n", m.worst_vehicle_condition);
        }
        None => println!("(no orders match the current filters)\n"),
    }

    output::section("Ratings");
    output::render_table_head(
        "Mean Rating per Courier",
        &reports::avg_rating_by_courier(&data),
        15,
    );
    output::render_table(
        "Rating by Traffic Density",
        &reports::rating_stats_by_category(&data, |o| o.traffic.to_string()),
    );
    output::render_table(
        "Rating by Weather Condition",
        &reports::rating_stats_by_category(&data, |o| o.weather.clone()),
    );

    output::section("Delivery Speed");
    output::render_table(
        "Top 10 Fastest Couriers per City",
        &reports::top_couriers_by_speed(&data, SpeedOrder::Fastest),
    );
    output::render_table(
        "Top 10 Slowest Couriers per City",
        &reports::top_couriers_by_speed(&data, SpeedOrder::Slowest),
    );
}

/// Handle option [5]: show the first few cleaned rows so the effect of the
/// cleaning pass and the active filters can be eyeballed.
fn handle_inspect() {
    let (data, filters) = narrowed();
    println!("Filters: {}\n", filters.describe());
    output::render_table_head("Cleaned Orders Sample", &data, 5);
}

/// Handle option [3]: prompt for a new date cutoff and traffic selection.
fn handle_filters() {
    let (_, current) = snapshot();
    println!("Current filters: {}\n", current.describe());

    let cutoff = loop {
        let input = prompt_line(&format!(
            "Cutoff date (DD-MM-YYYY, {} to {}, blank keeps current): ",
            DATE_MIN.format("%d-%m-%Y"),
            DATE_MAX.format("%d-%m-%Y")
        ));
        if input.is_empty() {
            break current.cutoff;
        }
        match util::parse_date_safe(Some(&input)) {
            Some(d) if (*DATE_MIN..=*DATE_MAX).contains(&d) => break d,
            Some(_) => println!("Date is outside the dataset range."),
            None => println!("Invalid date. Please use DD-MM-YYYY."),
        }
    };

    let traffic = loop {
        let input = prompt_line(
            "Traffic categories (comma-separated from Low, Medium, High, Jam; blank selects all): ",
        );
        if input.is_empty() {
            break Traffic::ALL.to_vec();
        }
        let mut selected: Vec<Traffic> = Vec::new();
        let mut ok = true;
        for token in input.split(',') {
            match token.trim().parse::<Traffic>() {
                Ok(t) => {
                    if !selected.contains(&t) {
                        selected.push(t);
                    }
                }
                Err(_) => {
                    println!("Unknown traffic category: {}", token.trim());
                    ok = false;
                    break;
                }
            }
        }
        if ok {
            break selected;
        }
    };

    let mut state = APP_STATE.lock().unwrap();
    state.filters = FilterState { cutoff, traffic };
    println!("Filters updated: {}\n", state.filters.describe());
}

/// Handle option [4]: re-read the export, keeping the current filters.
fn handle_reload() {
    if let Err(e) = load_dataset() {
        eprintln!("Failed to reload file: {}\n", e);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    // The banner is display-only, but a broken install should fail loudly
    // rather than render a half-dashboard.
    let logo = std::fs::read_to_string(LOGO_PATH)
        .map_err(|e| format!("cannot read {}: {}", LOGO_PATH, e))?;
    println!("{}", logo);
    println!("Curry Company - Fastest Delivery in Town\n");

    load_dataset()?;

    loop {
        println!("Select view:");
        println!("[1] Company view");
        println!("[2] Courier view");
        println!("[3] Adjust filters");
        println!("[4] Reload dataset");
        println!("[5] Inspect sample rows");
        println!("[0] Exit\n");
        match read_choice().as_str() {
            "1" => {
                println!();
                handle_company_view();
            }
            "2" => {
                println!();
                handle_courier_view();
            }
            "3" => {
                println!();
                handle_filters();
            }
            "4" => {
                println!();
                handle_reload();
            }
            "5" => {
                println!();
                handle_inspect();
            }
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 0-5.\n");
            }
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Startup failed: {}", e);
        std::process::exit(1);
    }
}

// Entry point and high-level CLI flow.
//
// - Option [1] loads both exports and runs the analysis, printing diagnostics.
// - Option [2] writes the ranking and series reports plus a JSON summary.
// - Option [3] shows one region's series inside a percentage window.
// - Option [4] lists the regions available for option [3].
// - Option [5] ranks regions by homeowner vs renter affordability gap.
// `--batch` runs [1] and [2] (and [5] when both affordability exports are
// given) once and exits. End of input on stdin leaves the menu.
use anyhow::Result;
use clap::Parser;
use housing_trends::affordability::{affordability_gaps, affordability_rows, affordability_summary};
use housing_trends::align::region_series;
use housing_trends::cache::TableCache;
use housing_trends::config::{
    RankConfig, DEFAULT_ALL_HOMES_FILE, DEFAULT_SFR_ONLY_FILE, DEFAULT_TOP_N,
};
use housing_trends::error::AppError;
use housing_trends::loader::read_blob;
use housing_trends::logging::init_logging;
use housing_trends::output;
use housing_trends::pipeline::{analyze, Analysis, AnalysisStatus};
use housing_trends::reports::{ranking_rows, series_rows, RankOutcome};
use housing_trends::trend::series_trend;
use housing_trends::util::{format_int, format_number};
use housing_trends::window::select_window;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "housing_trends")]
#[command(about = "Aligns and ranks monthly housing price exports", long_about = None)]
struct Cli {
    /// All-homes export (primary table)
    #[arg(long, default_value = DEFAULT_ALL_HOMES_FILE)]
    all_homes: PathBuf,

    /// Single-family-only export (secondary table)
    #[arg(long, default_value = DEFAULT_SFR_ONLY_FILE)]
    sfr_only: PathBuf,

    /// New-homeowner affordability export
    #[arg(long)]
    homeowner: Option<PathBuf>,

    /// New-renter affordability export
    #[arg(long)]
    renter: Option<PathBuf>,

    /// Directory for CSV/JSON reports
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Number of regions per ranking
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Load, write every report and exit
    #[arg(long, default_value_t = false)]
    batch: bool,
}

// Decoded tables are cached across reloads so re-running option [1] on
// unchanged files skips parsing.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        cache: TableCache::new(),
        analysis: None,
    })
});

struct AppState {
    cache: TableCache,
    analysis: Option<Analysis>,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|e| e.into_inner())
}

/// Print `label` and read one trimmed line. `None` once stdin is closed or
/// unreadable.
fn prompt(label: &str) -> Option<String> {
    print!("{label}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn read_choice() -> Option<String> {
    prompt("Enter choice: ")
}

fn prompt_back_to_menu() -> bool {
    loop {
        let Some(resp) = prompt("Back to Report Selection (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn explain(outcome: &RankOutcome) -> String {
    match outcome {
        RankOutcome::Ranked { current, prior_year, entries } => {
            format!("{} regions, {} vs {}", entries.len(), current, prior_year)
        }
        RankOutcome::NoData => "no rows to rank".to_string(),
        RankOutcome::InsufficientDateRange => "not enough monthly data to compare".to_string(),
        RankOutcome::NoYearAgoComparison { current } => {
            format!("no column one year before {current}")
        }
    }
}

/// Option [1]: read both exports and run the pipeline.
fn handle_load(cli: &Cli) -> Result<()> {
    let primary = read_blob(&cli.all_homes)?;
    let secondary = read_blob(&cli.sfr_only)?;
    let cfg = RankConfig::default().with_top_n(cli.top);

    let mut st = state();
    let analysis = analyze(&primary, &secondary, &mut st.cache, &cfg);
    info!(cached_tables = st.cache.cached_tables(), "exports loaded");

    println!(
        "Processing dataset... ({} regions, {} months, {} aligned points)",
        format_int(analysis.primary_load.kept_rows),
        format_int(analysis.date_columns.len()),
        format_int(analysis.points.len())
    );
    println!(
        "Note: {} all-homes rows and {} single-family rows dropped for malformed fields.",
        format_int(analysis.primary_load.diagnostics.dropped_rows),
        format_int(analysis.secondary_load.diagnostics.dropped_rows)
    );
    println!(
        "Info: {} cells or rows skipped during alignment and ranking.\n",
        format_int(analysis.diagnostics.skips.len())
    );
    match analysis.status {
        AnalysisStatus::NoData => println!("No data: the all-homes export has no rows.\n"),
        AnalysisStatus::NoDateColumns => {
            println!("No monthly columns found; nothing to chart or rank.\n")
        }
        AnalysisStatus::Ready => {}
    }
    st.analysis = Some(analysis);
    Ok(())
}

fn loaded_analysis() -> Result<Analysis> {
    state()
        .analysis
        .clone()
        .ok_or_else(|| AppError::NoData("load the files first (option 1)".to_string()).into())
}

/// Option [2]: write every report and print previews.
fn handle_generate_reports(cli: &Cli) -> Result<()> {
    let analysis = loaded_analysis()?;
    std::fs::create_dir_all(&cli.out_dir)?;
    println!("Generating reports...\n");

    let reports = [
        ("Top Year-over-Year Gainers", "rank_increase.csv", &analysis.rankings.increase),
        ("Top Year-over-Year Decliners", "rank_decrease.csv", &analysis.rankings.decrease),
    ];
    for (idx, (title, file, outcome)) in reports.into_iter().enumerate() {
        let rows = ranking_rows(outcome.entries());
        let path = cli.out_dir.join(file);
        output::write_csv(&path, &rows)?;
        println!("Report {}: {}", idx + 1, title);
        println!("({})\n", explain(outcome));
        output::preview_table_rows(&rows, 3);
        println!("(Full table exported to {})\n", path.display());
    }

    let mut points = analysis.points.clone();
    points.sort_by(|a, b| a.region.cmp(&b.region).then_with(|| a.date.cmp(&b.date)));
    let series = series_rows(&points);
    let path = cli.out_dir.join("aligned_series.csv");
    output::write_csv(&path, &series)?;
    println!("Report 3: Aligned Monthly Series (All Homes vs Single-Family)\n");
    output::preview_table_rows(&series, 3);
    println!("(Full table exported to {})\n", path.display());

    let summary = analysis.summary();
    let path = cli.out_dir.join("summary.json");
    output::write_json(&path, &summary)?;
    println!("Summary Stats ({}):", path.display());
    println!("{}\n", serde_json::to_string(&summary)?);
    info!(out_dir = %cli.out_dir.display(), "reports written");
    Ok(())
}

/// Option [3]: one region, windowed by a percentage range of the date axis.
fn handle_region_view() -> Result<()> {
    let analysis = loaded_analysis()?;
    let Some(region) = prompt("Region name: ") else {
        return Ok(());
    };
    let series = region_series(&analysis.points, &region);
    if series.is_empty() {
        println!("No aligned data for {region:?}.\n");
        return Ok(());
    }
    let lo = prompt("Window start % [0]: ").and_then(|s| s.parse().ok()).unwrap_or(0.0);
    let hi = prompt("Window end % [100]: ").and_then(|s| s.parse().ok()).unwrap_or(100.0);
    let window = select_window(&series, &analysis.date_axis(), lo, hi);
    println!();
    output::preview_table_rows(&series_rows(&window), window.len());
    match series_trend(&window) {
        Some(line) => println!(
            "Trend (last {} months): {} per month\n",
            window.len() - line.start,
            format_number(line.slope, 2)
        ),
        None => println!("Trend: not enough months in the window.\n"),
    }
    Ok(())
}

/// Option [4].
fn handle_list_regions() -> Result<()> {
    let analysis = loaded_analysis()?;
    let regions = analysis.regions();
    for r in &regions {
        println!("  {r}");
    }
    println!("({} regions)\n", format_int(regions.len()));
    Ok(())
}

/// Option [5]: homeowner minus renter affordability at the latest month.
fn handle_affordability(cli: &Cli) -> Result<()> {
    let (Some(homeowner_path), Some(renter_path)) = (&cli.homeowner, &cli.renter) else {
        return Err(AppError::NoData("pass --homeowner and --renter exports".to_string()).into());
    };
    let homeowner_blob = read_blob(homeowner_path)?;
    let renter_blob = read_blob(renter_path)?;

    let (report, diag) = {
        let mut st = state();
        let homeowner = st.cache.decode(&homeowner_blob);
        let renter = st.cache.decode(&renter_blob);
        affordability_gaps(&homeowner.table, &renter.table)
    };
    let Some(latest) = report.latest.as_deref() else {
        println!("No monthly columns in the homeowner export.\n");
        return Ok(());
    };
    info!(latest, regions = report.gaps.len(), skipped = diag.skips.len(), "affordability");

    std::fs::create_dir_all(&cli.out_dir)?;
    let summary = affordability_summary(&report, cli.top);
    let sections = [
        ("Least Affordable Markets", "affordability_least.csv", &summary.least_affordable),
        ("Most Affordable Markets", "affordability_most.csv", &summary.most_affordable),
    ];
    for (title, file, gaps) in sections {
        let rows = affordability_rows(gaps);
        let path = cli.out_dir.join(file);
        output::write_csv(&path, &rows)?;
        println!("{title} ({latest})\n");
        output::preview_table_rows(&rows, 3);
        println!("(Full table exported to {})\n", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    if cli.batch {
        handle_load(&cli)?;
        handle_generate_reports(&cli)?;
        if cli.homeowner.is_some() && cli.renter.is_some() {
            handle_affordability(&cli)?;
        }
        return Ok(());
    }

    loop {
        println!("Housing Price Trends:");
        println!("[1] Load the files");
        println!("[2] Generate Reports");
        println!("[3] View Region Series");
        println!("[4] List Regions");
        println!("[5] Affordability Gap\n");
        let Some(choice) = read_choice() else {
            println!("\nExiting the program.");
            break;
        };
        let result = match choice.as_str() {
            "1" => handle_load(&cli),
            "2" => {
                println!();
                let r = handle_generate_reports(&cli);
                if r.is_ok() && !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
                r
            }
            "3" => handle_region_view(),
            "4" => handle_list_regions(),
            "5" => handle_affordability(&cli),
            _ => {
                println!("Invalid choice. Please enter a number from 1 to 5.\n");
                Ok(())
            }
        };
        if let Err(e) = result {
            eprintln!("Error: {e}\n");
        }
    }
    Ok(())
}

//! Market simulator entry point — CLI wiring and config-driven engine
//! construction.

use std::path::Path;
use std::process;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing_subscriber::EnvFilter;

use vet_sim::config::MarketConfig;
use vet_sim::io::export::export_csv;
use vet_sim::market::clock::{Clock, SystemClock};
use vet_sim::market::deadline::DeadlineGuard;
use vet_sim::market::engine::Engine;
use vet_sim::market::prices::PriceProvider;
use vet_sim::store::JsonFileStore;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    date: Option<NaiveDate>,
    data_path: Option<String>,
    export_csv: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("vet-sim — Single-participant day-ahead electricity market simulator");
    eprintln!();
    eprintln!("Usage: vet-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load market configuration from TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, volatile)");
    eprintln!("  --date <YYYY-MM-DD>      Delivery date to report on (default: tomorrow)");
    eprintln!("  --data <path>            Orders file path (default: from config)");
    eprintln!("  --export-csv <path>      Export PnL details to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server");
        eprintln!("  --port <u16>             API server port (default: 8000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        date: None,
        data_path: None,
        export_csv: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 8000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--date" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --date requires a YYYY-MM-DD argument");
                    process::exit(1);
                }
                match NaiveDate::parse_from_str(&args[i], "%Y-%m-%d") {
                    Ok(d) => cli.date = Some(d),
                    Err(_) => {
                        eprintln!("error: --date value \"{}\" is not YYYY-MM-DD", args[i]);
                        process::exit(1);
                    }
                }
            }
            "--data" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --data requires a path argument");
                    process::exit(1);
                }
                cli.data_path = Some(args[i].clone());
            }
            "--export-csv" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --export-csv requires a path argument");
                    process::exit(1);
                }
                cli.export_csv = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Builds the engine from configuration: price provider, deadline guard,
/// durable store, and the system clock.
fn build_engine(cfg: &MarketConfig, data_path: Option<&str>) -> Engine {
    let provider = PriceProvider::new(cfg.day_ahead.clone(), cfg.real_time.clone());

    #[cfg(feature = "external-prices")]
    let provider = match &cfg.external.day_ahead_url {
        Some(url) => provider.with_fetcher(Arc::new(
            vet_sim::market::prices::HttpPriceFetcher::new(url.clone()),
        )),
        None => provider,
    };
    #[cfg(not(feature = "external-prices"))]
    {
        if cfg.external.day_ahead_url.is_some() {
            eprintln!(
                "warning: external.day_ahead_url is set but vet-sim was built without the external-prices feature"
            );
        }
    }

    let orders_path = data_path.unwrap_or(&cfg.storage.orders_path);
    let store = Arc::new(JsonFileStore::new(orders_path));

    Engine::new(
        provider,
        DeadlineGuard::new(cfg.market.cutoff_hour),
        store,
        Arc::new(SystemClock),
        cfg.market.max_orders_per_hour,
        cfg.market.currency.clone(),
    )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = parse_args();

    // Load config: --config takes priority, then --preset, then baseline default
    let config = if let Some(ref path) = cli.config_path {
        match MarketConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match MarketConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        MarketConfig::baseline()
    };

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let engine = build_engine(&config, cli.data_path.as_deref());

    // Report on the requested delivery date (tomorrow by default)
    let date = cli.date.unwrap_or_else(|| {
        SystemClock
            .now()
            .date()
            .checked_add_days(Days::new(1))
            .expect("tomorrow is a valid date")
    });

    let da = engine.day_ahead_prices(date);
    let rt = engine.real_time_prices(date);
    println!("Prices for {date} (day-ahead source: {})", da.source);
    println!("{:>4}  {:>10}  {:>10}", "HE", "day-ahead", "real-time");
    for (d, r) in da.points().iter().zip(rt.points()) {
        println!("{:>4}  {:>10.2}  {:>10.2}", d.hour, d.price, r.price);
    }

    let orders = match engine.list_orders(date) {
        Ok(orders) => orders,
        Err(e) => {
            eprintln!("error: failed to read orders: {e}");
            process::exit(1);
        }
    };
    println!("\nOrders for {date}: {}", orders.len());
    for o in &orders {
        println!(
            "  {} HE {:>2} {:>4} {:>8.3} MWh @ {:>7.2} $/MWh (submitted {})",
            o.id, o.hour, o.side, o.quantity, o.price, o.created_at
        );
    }

    let report = match engine.compute_pnl(date) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: settlement failed: {e}");
            process::exit(1);
        }
    };
    println!();
    for d in &report.details {
        println!("{d}");
    }
    println!("{report}");

    // Export CSV if requested
    if let Some(ref path) = cli.export_csv {
        if let Err(e) = export_csv(&report.details, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("PnL details written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;

        let state = Arc::new(vet_sim::api::AppState { engine });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(vet_sim::api::serve(state, addr));
    }
}

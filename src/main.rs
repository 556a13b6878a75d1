use clap::Parser;
use csv_age_stats::core::ConfigProvider;
use csv_age_stats::utils::error::{ErrorSeverity, StatsError};
use csv_age_stats::utils::{logger, validation::Validate};
use csv_age_stats::{
    CliConfig, LocalStorage, Statistics, StatsEngine, StatsPipeline, StatsReport, TomlConfig,
};
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let start = Instant::now();
    let args = CliConfig::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting csv-age-stats");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let result = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => run(config, args.monitor).await,
                Err(e) => Err(e),
            }
        }
        None => run(args.clone(), args.monitor).await,
    };

    match result {
        Ok(report) => print_report(&report),
        Err(e) => {
            tracing::error!(
                "Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    println!("Total Runtime: {:?}", start.elapsed());
    Ok(())
}

async fn run<C>(config: C, monitor_enabled: bool) -> Result<StatsReport, StatsError>
where
    C: ConfigProvider + Validate,
{
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        return Err(e);
    }

    let storage = LocalStorage::new(".");
    let pipeline = StatsPipeline::new(storage, config);
    let engine = StatsEngine::new_with_monitoring(pipeline, monitor_enabled);

    engine.run().await
}

fn print_report(report: &StatsReport) {
    if !report.failed_sources.is_empty() {
        println!("\nThese sources returned errors when attempting to retrieve data:");
        for source in &report.failed_sources {
            println!("{}", source);
        }
    }

    match &report.statistics {
        Statistics::NoData => {
            println!(
                "No data was retrieved from the collection of csv sources. Cannot calculate average and median."
            );
        }
        Statistics::Summary {
            total_records,
            mean,
            median,
        } => {
            println!("\n----------------Results-----------------");
            println!(
                "Records: {} from {} of {} sources",
                total_records, report.sources_succeeded, report.sources_total
            );
            println!("The average age is: {}", mean);
            println!("The median age is: {}", median.age);
            if median.low != median.high {
                println!(
                    "(between {} and {}, exact value {})",
                    median.low, median.high, median.exact
                );
            }
            match &median.name {
                Some(name) => {
                    println!("A name corresponding to the median age is: {}", name)
                }
                None => println!(
                    "A name cannot be determined since the median age is not an age in the dataset."
                ),
            }
        }
    }
}

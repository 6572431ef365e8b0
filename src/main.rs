use anyhow::{Context, Result, bail};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use weekly_cases::algorithm::series::SeriesPipeline;
use weekly_cases::models::{ArrowSchema, MacroRegionRow};
use weekly_cases::utils::logging::console::{print_batch_summary, print_schema_info};
use weekly_cases::utils::logging::{create_spinner, finish_progress_bar};
use weekly_cases::utils::{read_table, write_table};
use weekly_cases::{CaseTable, Grouping, PipelineConfig, SeriesStatistics};

const USAGE: &str = "usage: weekly-cases <input.csv|input.parquet> <config.yaml|config.json> [output_dir]";

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(config_path)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let output_dir = args.next().map_or_else(|| PathBuf::from("output"), PathBuf::from);

    let start = Instant::now();
    let config = PipelineConfig::from_path(Path::new(&config_path))
        .with_context(|| format!("loading configuration {config_path}"))?;
    info!("{config}");

    let batch = read_table(Path::new(&input)).with_context(|| format!("reading {input}"))?;
    let table = CaseTable::from_record_batch(&batch).context("reading input columns")?;
    info!("Loaded {} rows from {input}", table.len());

    let spinner = create_spinner(Some("Aligning weeks"));
    let pipeline = SeriesPipeline::new(table).align_weeks()?;
    spinner.set_message("Computing increments");
    let pipeline = pipeline.compute_increments()?;
    spinner.set_message("Adjusting negative increments");
    let pipeline = pipeline.adjust_negatives();
    spinner.set_message("Bounding outliers");
    let pipeline = pipeline.bound_outliers(&config.outliers)?;
    spinner.set_message("Aggregating");
    let output = pipeline.aggregate(&config);
    finish_progress_bar(&spinner, Some("Pipeline stages complete"));

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let corrected = output.table.to_record_batch()?;
    write_table(&output_dir.join("series_corregidas.parquet"), &corrected)?;
    print_batch_summary("series_corregidas", &corrected);
    if log::log_enabled!(log::Level::Debug) {
        print_schema_info(&corrected);
    }

    match output.aggregate.to_record_batch()? {
        Some(grouped) if grouped.num_rows() > 0 => {
            write_table(&output_dir.join("agrupado.parquet"), &grouped)?;
            print_batch_summary("agrupado", &grouped);
        }
        _ => warn!("Aggregate is empty, no grouped output written"),
    }

    if config.grouping == Grouping::Region {
        let summary = output.macro_region_summary();
        if summary.is_empty() {
            warn!("Macro-region roll-up is empty, no macro-region output written");
        } else {
            let rollup = MacroRegionRow::to_record_batch(&summary)?;
            write_table(&output_dir.join("agrupado_macro_region.parquet"), &rollup)?;
            print_batch_summary("agrupado_macro_region", &rollup);
        }

        let target = output.target_region_series();
        if target.is_empty() {
            warn!(
                "No rows for macro-region {:?}",
                config.target_region.as_deref().unwrap_or_default()
            );
        } else {
            info!("{} weeks for the selected macro-region", target.len());
        }
    }

    println!(
        "{}",
        SeriesStatistics::generate_summary(&output.report, &output.aggregate)
    );
    info!("Finished in {:?}", start.elapsed());
    Ok(())
}

use artwork_scraper_lib::{cache, logger, HarvestConfig, Harvester};

use std::env;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");

    logger::init(verbose);

    println!("{}", "=".repeat(60));
    println!("Artwork Scraper Data Refresh");
    println!("{}", "=".repeat(60));
    if verbose {
        println!("(Verbose mode enabled)");
    }
    println!();

    let config = HarvestConfig::default();
    let harvester = Harvester::new(config.clone());
    let dataset = harvester.harvest();

    println!();
    println!("Saving to cache...");
    cache::save(&dataset, &config.cache_path)?;
    println!("Saved to: {}", config.cache_path.display());

    println!();
    println!("{}", "=".repeat(60));
    println!("Summary");
    println!("{}", "=".repeat(60));
    println!("Total paintings:  {}", dataset.len());
    println!("Unique painters:  {}", dataset.unique_painters());
    println!("Unique museums:   {}", dataset.unique_museums());

    if dataset.is_empty() {
        println!("No data fetched!");
        return Ok(());
    }

    println!("With coordinates: {:.1}%", dataset.coordinate_coverage());
    println!("With Wikipedia:   {:.1}%", dataset.reference_coverage());

    println!();
    println!("Done!");
    Ok(())
}

// main.rs - CLI entry point

use std::path::Path;
use tiger_rates::cli::{init_logging, Config};
use tiger_rates::prelude::*;
use tracing::{debug, info};

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<()> {
    let mut args: Args = argh::from_env();

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        eprintln!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    init_logging(args.quiet);
    if let Some(config_path) = &args.config {
        info!("📄 Loaded configuration from: {}", config_path);
    }

    let registry = ReaderRegistry::new();
    if args.list_formats {
        println!("Available formats:");
        for (name, desc) in registry.list_readers() {
            println!("  - {}: {}", name, desc);
        }
        return Ok(());
    }

    // Validate all arguments
    let validation_result = validate_args(&args, &registry)?;

    info!("🚀 {}", tiger_rates::get_info());
    let reader = registry.require(&validation_result.format)?;
    info!("📂 Reading {} input: {}", reader.name(), validation_result.input);
    if args.synonyms.is_some() && !reader.supports_polymorphism() {
        debug!(
            "{} input has no polymorphic states, --synonyms has no effect",
            reader.name()
        );
    }
    let matrix = reader.read(Path::new(&validation_result.input))?;

    let table = compute_rates(matrix, &validation_result.settings)?;

    write_rates_to(args.output.as_deref(), &table, args.names)?;

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use icropper::batch::{default_output, run_batch};
use icropper::cli::{CliArgs, Command, CompressionLevel, PackArgs};
use icropper::config::{IcropperConfig, LoadedConfig, expand_source_files};
use icropper::pipeline::{PackJob, run_job};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., argument parsing fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(if cli.command.verbose() {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("icropper v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Pack(args) => {
            let job = merge_config_with_args(&args)?;
            let report = run_job(&job)?;
            info!(
                "Done! {} textures, {:.1}% usage",
                report.textures.len(),
                report.usage * 100.0
            );
        }
        Command::Batch(args) => {
            let output = default_output(&args.input, args.output.clone());
            run_batch(&args.input, &output, args.compress)?;
            info!("Done!");
        }
    }

    Ok(())
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &PackArgs) -> Result<PackJob> {
    // Load config if specified
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Source directory: CLI > config > default
    let src_path = args.src_path.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(LoadedConfig::resolve_src_path)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    // Source files: CLI args override config
    let src_files = if !args.files.is_empty() {
        expand_source_files(&args.files, &src_path)
            .context("failed to resolve input files")?
    } else if let Some(ref lc) = loaded_config {
        expand_source_files(&lc.config.src_files, &src_path)
            .context("failed to resolve input files from config")?
    } else {
        // This shouldn't happen due to clap's required_unless_present
        Vec::new()
    };

    let out_path = args.out_path.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(LoadedConfig::resolve_out_path)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let mut config = loaded_config
        .map(|lc| lc.config)
        .unwrap_or_else(IcropperConfig::default);

    // Remaining options: CLI > config > default
    if let Some(name) = &args.out_file {
        config.out_file = name.clone();
    }
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(block_size) = args.block_size {
        config.block_size = block_size;
    }
    if let Some(area) = args.crop_min_area {
        config.crop_min_area = area;
    }
    if let Some(ratio) = args.crop_max_ratio {
        config.crop_max_ratio = ratio;
    }
    if let Some(depth) = args.crop_max_depth {
        config.crop_max_depth = depth;
    }
    if let Some(size) = args.max_texture_size {
        config.max_texture_size = size;
    }
    if let Some(size) = args.fixed_texture_size {
        config.fixed_texture_size = size;
    }
    if let Some(padding) = args.texture_padding {
        config.texture_padding = padding;
    }
    if let Some(up) = args.y_axis_up {
        config.y_axis_up = up;
    }
    if let Some(rotate) = args.enable_rotate {
        config.enable_rotate = rotate;
    }
    if let Some(suffix) = &args.texture_suffix {
        config.texture_suffix = suffix.clone();
    }
    if let Some(suffix) = &args.xmlfile_suffix {
        config.xmlfile_suffix = suffix.clone();
    }
    if let Some(suffix) = &args.icbfile_suffix {
        config.icbfile_suffix = suffix.clone();
    }

    // Boolean flags: CLI presence sets them to true, otherwise use config
    config.force_single |= args.force_single;
    if args.xml_only {
        config.xml_only = true;
        config.icb_only = false;
    } else if args.icb_only {
        config.icb_only = true;
        config.xml_only = false;
    }

    // Compress: CLI option overrides config
    let compress = args
        .compress
        .or_else(|| config.compress.as_ref().map(CompressionLevel::from));

    Ok(PackJob {
        src_path,
        src_files,
        out_path,
        out_file: (!config.out_file.is_empty()).then(|| config.out_file.clone()),
        crop: config.crop_options(),
        compositor: config.compositor_options(),
        xml_only: config.xml_only,
        icb_only: config.icb_only,
        compress,
    })
}

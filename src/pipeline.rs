use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::atlas::Compositor;
use crate::cli::CompressionLevel;
use crate::config::{CompositorOptions, CropOptions};
use crate::sprite::load_sources;

/// Everything needed to turn one list of sources into one set of outputs
#[derive(Debug, Clone)]
pub struct PackJob {
    pub src_path: PathBuf,
    /// Source file names relative to `src_path`, in registration order
    pub src_files: Vec<String>,
    pub out_path: PathBuf,
    /// Base name of the outputs; `None` derives it from the first image
    pub out_file: Option<String>,
    pub crop: CropOptions,
    pub compositor: CompositorOptions,
    pub xml_only: bool,
    pub icb_only: bool,
    pub compress: Option<CompressionLevel>,
}

/// What a finished job wrote
#[derive(Debug, Clone, PartialEq)]
pub struct PackReport {
    pub textures: Vec<PathBuf>,
    pub xml: Option<PathBuf>,
    pub usage: f32,
}

/// Load, crop, pack and save one job.
pub fn run_job(job: &PackJob) -> Result<PackReport> {
    let mut images = load_sources(&job.src_files, Some(&job.src_path), job.crop)?;
    info!("Loaded {} images", images.len());

    let mut compositor = Compositor::new(job.compositor.clone());
    if let Some(name) = &job.out_file {
        compositor.set_file_prefix(name.clone());
    }
    for image in &mut images {
        let name = image.file_name().to_string();
        compositor
            .add_image(image)
            .with_context(|| format!("can't add image: {}", name))?;
    }

    compositor.composit().context("packing fragments failed")?;

    let textures = compositor
        .save_textures(&job.out_path, job.compress)
        .context("saving textures failed")?;

    let xml = if job.icb_only {
        None
    } else {
        let path = compositor
            .save_to_xml(&job.out_path)
            .context("saving XML descriptor failed")?;
        info!("Generated {}", path.display());
        Some(path)
    };

    if !job.xml_only {
        compositor
            .save_to_bin(&job.out_path)
            .context("saving binary descriptor failed")?;
    }

    Ok(PackReport {
        textures,
        xml,
        usage: compositor.usage_ratio(),
    })
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{debug, error, info};
use rayon::prelude::*;

use crate::cli::CompressionLevel;
use crate::config::{IcropperConfig, overlay_config};
use crate::error::IcropperError;
use crate::pipeline::{PackJob, run_job};
use crate::sprite::has_extension;

/// Per-directory config file read by the batch walk
pub const DIR_CONFIG_FILE: &str = "_iconfig.json";

/// A named pack job found by the batch walk
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub name: String,
    pub job: PackJob,
}

/// Pack a whole directory tree and fail if any job failed.
///
/// Outputs mirror the source tree under `output`.
pub fn run_batch(input: &Path, output: &Path, compress: Option<CompressionLevel>) -> Result<()> {
    let jobs = collect_jobs(input, output, compress)?;
    if jobs.is_empty() {
        info!("No images to pack under {}", input.display());
        return Ok(());
    }
    info!("Running {} batch jobs...", jobs.len());

    let failures = jobs
        .par_iter()
        .map(|batch| match run_job(&batch.job) {
            Ok(report) => {
                info!(
                    "[OK] {} ({} textures, {:.1}% usage)",
                    batch.name,
                    report.textures.len(),
                    report.usage * 100.0
                );
                0
            }
            Err(e) => {
                error!("[FAILED] {}: {:#}", batch.name, e);
                1
            }
        })
        .sum::<usize>();

    if failures > 0 {
        bail!("{} of {} batch jobs failed", failures, jobs.len());
    }
    Ok(())
}

/// Walk `input` and build the jobs its config files describe.
pub fn collect_jobs(
    input: &Path,
    output: &Path,
    compress: Option<CompressionLevel>,
) -> Result<Vec<BatchJob>> {
    if !input.is_dir() {
        return Err(IcropperError::InputNotFound(input.to_path_buf()).into());
    }

    let walker = Walker {
        input,
        output,
        compress,
    };
    let mut jobs = Vec::new();
    walker.walk_dir(Path::new(""), &IcropperConfig::default(), &mut jobs)?;
    Ok(jobs)
}

struct Walker<'a> {
    input: &'a Path,
    output: &'a Path,
    compress: Option<CompressionLevel>,
}

impl Walker<'_> {
    fn walk_dir(
        &self,
        relative: &Path,
        inherited: &IcropperConfig,
        jobs: &mut Vec<BatchJob>,
    ) -> Result<()> {
        let dir = self.input.join(relative);

        // Named outputs belong to the directory that lists them
        let mut base = inherited.clone();
        base.outputs.clear();

        let config_path = dir.join(DIR_CONFIG_FILE);
        let config = if config_path.is_file() {
            debug!("Applying {}", config_path.display());
            overlay_config(&base, &config_path)?
        } else {
            base
        };

        let mut entries = fs::read_dir(&dir)
            .with_context(|| format!("failed to read directory: {}", dir.display()))?
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("failed to read directory: {}", dir.display()))?;
        entries.sort_by_key(fs::DirEntry::file_name);

        let mut files = Vec::new();
        let mut subdirs = Vec::new();
        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == DIR_CONFIG_FILE
                || config
                    .ignores
                    .iter()
                    .any(|ignored| ignored.eq_ignore_ascii_case(&name))
            {
                continue;
            }

            let path = entry.path();
            if path.is_dir() {
                subdirs.push(name);
            } else if has_extension(&path, &config.filters) {
                files.push(name);
            }
        }

        self.add_dir_jobs(relative, &config, &files, jobs);

        for name in subdirs {
            self.walk_dir(&relative.join(name), &config, jobs)?;
        }
        Ok(())
    }

    fn add_dir_jobs(
        &self,
        relative: &Path,
        config: &IcropperConfig,
        files: &[String],
        jobs: &mut Vec<BatchJob>,
    ) {
        if config.pack_dir {
            if files.is_empty() {
                return;
            }
            let name = if config.pack_name.is_empty() {
                self.dir_name(relative)
            } else {
                config.pack_name.clone()
            };
            jobs.push(self.job(relative, config, name, files));
            return;
        }

        let mut claimed: Vec<&str> = Vec::new();
        for (name, sources) in &config.outputs {
            let sources: Vec<String> = sources
                .iter()
                .flat_map(|entry| entry.split_whitespace())
                .map(str::to_string)
                .collect();
            claimed.extend(
                files
                    .iter()
                    .filter(|file| sources.contains(file))
                    .map(String::as_str),
            );
            jobs.push(self.job(relative, config, name.clone(), &sources));
        }

        if config.process_all {
            for file in files.iter().filter(|file| !claimed.contains(&file.as_str())) {
                let stem = Path::new(file)
                    .file_stem()
                    .map_or_else(|| file.clone(), |stem| stem.to_string_lossy().into_owned());
                jobs.push(self.job(relative, config, stem, std::slice::from_ref(file)));
            }
        }
    }

    fn job(
        &self,
        relative: &Path,
        config: &IcropperConfig,
        name: String,
        files: &[String],
    ) -> BatchJob {
        let src_files = files
            .iter()
            .map(|file| relative.join(file).to_string_lossy().into_owned())
            .collect();

        BatchJob {
            job: PackJob {
                src_path: self.input.to_path_buf(),
                src_files,
                out_path: self.output.join(relative),
                out_file: Some(name.clone()),
                crop: config.crop_options(),
                compositor: config.compositor_options(),
                xml_only: config.xml_only,
                icb_only: config.icb_only,
                compress: self
                    .compress
                    .or_else(|| config.compress.as_ref().map(CompressionLevel::from)),
            },
            name: relative.join(&name).to_string_lossy().into_owned(),
        }
    }

    /// Name of the directory at `relative`; the root uses the input's own name
    fn dir_name(&self, relative: &Path) -> String {
        relative
            .file_name()
            .or_else(|| self.input.file_name())
            .map_or_else(
                || "pack".to_string(),
                |name| name.to_string_lossy().into_owned(),
            )
    }
}

/// Output root used when none is given: the input tree itself
pub fn default_output(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| input.to_path_buf())
}

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::decode::open_image;
use crate::assets::font::FontSource;
use crate::encode::jpeg::{encode_jpeg, search_quality};
use crate::foundation::config::Config;
use crate::foundation::error::{LabelError, LabelResult};
use crate::render::label::{LabelPainter, LabelStyle};
use crate::transform::resize::resize_to_bounds;

/// Suffix appended to the source stem for output files.
pub const OUTPUT_SUFFIX: &str = "_edit";

/// One photo to label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkItem {
    pub source: PathBuf,
    pub caption: String,
}

impl WorkItem {
    pub fn new(source: impl Into<PathBuf>, caption: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            caption: caption.into(),
        }
    }
}

/// What was written for one [`WorkItem`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LabelReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub caption: String,
    pub quality: u8,
    pub width: u32,
    pub height: u32,
    pub bytes: u64,
    pub budget_met: bool,
}

impl LabelReport {
    /// Encoded size in megabytes (1 MB = 1024 * 1024 bytes).
    pub fn size_mb(&self) -> f64 {
        self.bytes as f64 / 1024.0 / 1024.0
    }
}

impl fmt::Display for LabelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .output
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        write!(
            f,
            "file {name}, size {:.2} MB, JPEG quality {}, resolution {}x{}",
            self.size_mb(),
            self.quality,
            self.width,
            self.height
        )
    }
}

/// Options that do not come from the table.
#[derive(Clone, Debug, Default)]
pub struct PipelineOpts {
    pub font: FontSource,
    /// Keep lowest-quality output instead of failing when the size budget is
    /// unreachable.
    pub allow_oversize: bool,
}

/// `<output_dir>/<source stem>_edit.jpg`.
pub fn output_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}{OUTPUT_SUFFIX}.jpg"))
}

/// Resize, fit the size budget, label and write one image at a time.
pub struct ImagePipeline {
    cfg: Config,
    style: LabelStyle,
    painter: LabelPainter,
    allow_oversize: bool,
}

impl ImagePipeline {
    pub fn new(cfg: Config, opts: PipelineOpts) -> LabelResult<Self> {
        cfg.validate()?;
        let painter = LabelPainter::new(&opts.font)?;
        Ok(Self {
            style: LabelStyle::from(&cfg),
            cfg,
            painter,
            allow_oversize: opts.allow_oversize,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Run one item through the pipeline and write its output file.
    ///
    /// The quality search runs on the resized, unlabeled bitmap; the labeled
    /// bitmap is then encoded at the quality found. The report's `budget_met`
    /// reflects the bytes actually written.
    #[tracing::instrument(skip_all, fields(source = %item.source.display()))]
    pub fn process(&mut self, item: &WorkItem, output_dir: &Path) -> LabelResult<LabelReport> {
        let img = open_image(&item.source)?;
        let mut img = resize_to_bounds(img, &self.cfg);

        let budget = self.cfg.max_size_bytes();
        let search = search_quality(&img, budget)?;
        if !search.met {
            if !self.allow_oversize {
                return Err(LabelError::SizeBudget {
                    path: item.source.clone(),
                    budget,
                    smallest: search.bytes,
                });
            }
            tracing::warn!(
                quality = search.quality,
                bytes = search.bytes,
                budget,
                "size budget unreachable, keeping lowest quality"
            );
        }

        if self.painter.draw(&mut img, &item.caption, &self.style)?.is_none() {
            tracing::warn!("empty caption, writing without label");
        }

        let data = encode_jpeg(&img, search.quality)?;
        let bytes = data.len() as u64;
        let budget_met = bytes <= budget;
        if search.met && !budget_met {
            tracing::warn!(
                quality = search.quality,
                bytes,
                budget,
                "labeled image exceeds size budget"
            );
        }

        let output = output_path_for(&item.source, output_dir);
        std::fs::write(&output, &data)
            .with_context(|| format!("write jpeg '{}'", output.display()))?;

        let report = LabelReport {
            source: item.source.clone(),
            output,
            caption: item.caption.clone(),
            quality: search.quality,
            width: img.width(),
            height: img.height(),
            bytes,
            budget_met,
        };
        tracing::info!(
            output = %report.output.display(),
            quality = report.quality,
            bytes = report.bytes,
            width = report.width,
            height = report.height,
            "labeled"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;

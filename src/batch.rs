use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::config::{BoundsCheck, Corner};
use crate::foundation::error::{LabelError, LabelResult};
use crate::pipeline::{ImagePipeline, LabelReport, PipelineOpts, WorkItem};
use crate::workbook::{Workbook, discover_images};

/// Folder created next to the first listed photo.
pub const OUTPUT_DIR_NAME: &str = "output";

/// Pause between deleting and recreating the output folder. Windows can
/// refuse the `mkdir` with "access denied" right after a recursive delete.
pub const RECREATE_DELAY: Duration = Duration::from_millis(500);

/// Everything a run needs besides the table contents.
#[derive(Clone, Debug)]
pub struct BatchOpts {
    pub table: PathBuf,
    /// Scan the table's source folder and write the found paths back first.
    pub populate: bool,
    /// Run the labeling pass.
    pub label: bool,
    pub corner: Corner,
    pub bounds: BoundsCheck,
    pub pipeline: PipelineOpts,
    pub recreate_delay: Duration,
}

impl BatchOpts {
    pub fn new(table: impl Into<PathBuf>) -> Self {
        Self {
            table: table.into(),
            populate: false,
            label: true,
            corner: Corner::default(),
            bounds: BoundsCheck::default(),
            pipeline: PipelineOpts::default(),
            recreate_delay: RECREATE_DELAY,
        }
    }
}

/// Result of [`run_batch`].
#[derive(Clone, Debug, Default)]
pub struct BatchSummary {
    /// Paths written by populate mode, when it ran.
    pub populated: Option<Vec<PathBuf>>,
    /// Recreated output folder, when labeling ran.
    pub output_dir: Option<PathBuf>,
    pub reports: Vec<LabelReport>,
}

/// Populate and/or label according to `opts`.
///
/// `on_report` sees each item as soon as its file is written. The first
/// failing item aborts the run.
pub fn run_batch(
    opts: &BatchOpts,
    mut on_report: impl FnMut(&LabelReport),
) -> LabelResult<BatchSummary> {
    let mut wb = Workbook::open(&opts.table)?;
    let mut cfg = wb.load_config()?;
    cfg.corner = opts.corner;
    cfg.bounds = opts.bounds;

    let mut summary = BatchSummary::default();

    if opts.populate {
        summary.populated = Some(populate_table(&mut wb)?);
    }
    if !opts.label {
        return Ok(summary);
    }

    let items = wb.load_work_items(&cfg.default_caption)?;
    let output_dir = output_dir_for(&items)?;
    // Settings and font must be usable before the previous output is dropped.
    let mut pipeline = ImagePipeline::new(cfg, opts.pipeline.clone())?;

    tracing::info!(output_dir = %output_dir.display(), items = items.len(), "output folder");
    recreate_dir(&output_dir, opts.recreate_delay)?;

    for item in &items {
        let report = pipeline.process(item, &output_dir)?;
        on_report(&report);
        summary.reports.push(report);
    }

    summary.output_dir = Some(output_dir);
    Ok(summary)
}

/// Scan the folder named in the table and record its images, then save.
pub fn populate_table(wb: &mut Workbook) -> LabelResult<Vec<PathBuf>> {
    let dir = wb.source_dir()?;
    let paths = discover_images(&dir)?;
    tracing::info!(dir = %dir.display(), found = paths.len(), "populating table");
    wb.write_paths(&paths)?;
    wb.save()?;
    Ok(paths)
}

/// `<parent of the first item>/output`.
pub fn output_dir_for(items: &[WorkItem]) -> LabelResult<PathBuf> {
    let first = items.first().ok_or(LabelError::NoWorkItems)?;
    let parent = match first.source.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Ok(parent.join(OUTPUT_DIR_NAME))
}

/// Delete `dir` if present, wait `delay`, then create it empty.
pub fn recreate_dir(dir: &Path, delay: Duration) -> LabelResult<()> {
    if dir.is_dir() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("remove output dir '{}'", dir.display()))?;
    }
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir '{}'", dir.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/batch.rs"]
mod tests;

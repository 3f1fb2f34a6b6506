//! Autolabel resizes a batch of photos, fits each one under a file-size budget,
//! stamps a caption box into a corner and writes the result as JPEG.
//!
//! A run is driven by an `.xlsx` table:
//!
//! - Read the settings and `(path, caption)` rows with [`Workbook`]
//! - Push each [`WorkItem`] through an [`ImagePipeline`]
//! - Or let [`run_batch`] do both, including populate mode
#![forbid(unsafe_code)]

pub mod assets;
pub mod batch;
pub mod encode;
pub mod foundation;
pub mod pipeline;
pub mod render;
pub mod transform;
pub mod workbook;

pub use crate::assets::font::FontSource;
pub use crate::batch::{BatchOpts, BatchSummary, run_batch};
pub use crate::foundation::config::{Anchor, BoundsCheck, Config, Corner};
pub use crate::foundation::error::{LabelError, LabelResult};
pub use crate::pipeline::{ImagePipeline, LabelReport, PipelineOpts, WorkItem};
pub use crate::render::label::{LabelGeometry, LabelPainter, LabelStyle};
pub use crate::workbook::Workbook;

//! Adapter over the `.xlsx` table that drives a run.
//!
//! The cell grid is an external file-format contract shared with existing
//! tables: row 2 holds the settings, rows 3.. hold `(path, caption)` pairs.
//! Nothing outside this module knows a cell address.

use std::path::{Path, PathBuf};

use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::foundation::config::Config;
use crate::foundation::error::{LabelError, LabelResult};
use crate::pipeline::WorkItem;

/// Cell addresses of the table layout.
pub mod layout {
    pub const SHEET: &str = "example";

    pub const SOURCE_DIR: &str = "B2";
    pub const DEFAULT_CAPTION: &str = "C2";
    pub const MAX_WIDTH: &str = "D2";
    pub const MAX_HEIGHT: &str = "E2";
    pub const MAX_SIZE_MB: &str = "F2";
    pub const FONT_SIZE: &str = "G2";
    pub const OPACITY: &str = "H2";

    pub const FIRST_ITEM_ROW: u32 = 3;
    pub const PATH_COLUMN: &str = "B";
    pub const CAPTION_COLUMN: &str = "C";

    /// Header row written into new tables.
    pub const HEADERS: [(&str, &str); 7] = [
        ("B1", "source folder / file path"),
        ("C1", "caption"),
        ("D1", "max width"),
        ("E1", "max height"),
        ("F1", "max size (MB)"),
        ("G1", "font size"),
        ("H1", "opacity (%)"),
    ];

    pub fn path_cell(row: u32) -> String {
        format!("{PATH_COLUMN}{row}")
    }

    pub fn caption_cell(row: u32) -> String {
        format!("{CAPTION_COLUMN}{row}")
    }
}

/// Extensions picked up by [`discover_images`], compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An open table plus the path it is saved back to.
pub struct Workbook {
    path: PathBuf,
    book: Spreadsheet,
}

impl Workbook {
    pub fn open(path: impl Into<PathBuf>) -> LabelResult<Self> {
        let path = path.into();
        let book = umya_spreadsheet::reader::xlsx::read(&path).map_err(|e| {
            LabelError::workbook(format!("failed to read table '{}': {e}", path.display()))
        })?;
        Ok(Self { path, book })
    }

    /// Write a new table with headers, `cfg`'s settings and `source_dir` in
    /// the populate cell, and no items.
    pub fn create_template(
        path: impl Into<PathBuf>,
        cfg: &Config,
        source_dir: &Path,
    ) -> LabelResult<Self> {
        let path = path.into();
        let mut book = umya_spreadsheet::new_file_empty_worksheet();
        let sheet = book
            .new_sheet(layout::SHEET)
            .map_err(|e| LabelError::workbook(format!("failed to add sheet: {e}")))?;

        for (cell, title) in layout::HEADERS {
            sheet.get_cell_mut(cell).set_value(title);
        }
        sheet
            .get_cell_mut(layout::SOURCE_DIR)
            .set_value(source_dir.to_string_lossy());
        sheet
            .get_cell_mut(layout::DEFAULT_CAPTION)
            .set_value(cfg.default_caption.as_str());
        sheet
            .get_cell_mut(layout::MAX_WIDTH)
            .set_value_number(f64::from(cfg.max_width));
        sheet
            .get_cell_mut(layout::MAX_HEIGHT)
            .set_value_number(f64::from(cfg.max_height));
        sheet
            .get_cell_mut(layout::MAX_SIZE_MB)
            .set_value_number(cfg.max_size_mb);
        sheet
            .get_cell_mut(layout::FONT_SIZE)
            .set_value_number(f64::from(cfg.font_size));
        sheet
            .get_cell_mut(layout::OPACITY)
            .set_value_number(f64::from(cfg.opacity));

        let wb = Self { path, book };
        wb.save()?;
        Ok(wb)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> LabelResult<()> {
        umya_spreadsheet::writer::xlsx::write(&self.book, &self.path).map_err(|e| {
            LabelError::workbook(format!(
                "failed to save table '{}': {e}",
                self.path.display()
            ))
        })
    }

    fn sheet(&self) -> LabelResult<&Worksheet> {
        self.book
            .get_sheet_collection()
            .iter()
            .find(|s| s.get_name() == layout::SHEET)
            .ok_or_else(|| missing_sheet(&self.path))
    }

    fn sheet_mut(&mut self) -> LabelResult<&mut Worksheet> {
        let path = self.path.clone();
        self.book
            .get_sheet_collection_mut()
            .iter_mut()
            .find(|s| s.get_name() == layout::SHEET)
            .ok_or_else(|| missing_sheet(&path))
    }

    /// Settings from row 2. Corner and bounds policy keep their defaults.
    pub fn load_config(&self) -> LabelResult<Config> {
        let sheet = self.sheet()?;
        let opacity = read_u32(sheet, layout::OPACITY)?;
        let cfg = Config {
            max_width: read_u32(sheet, layout::MAX_WIDTH)?,
            max_height: read_u32(sheet, layout::MAX_HEIGHT)?,
            max_size_mb: read_number(sheet, layout::MAX_SIZE_MB)?,
            default_caption: sheet.get_value(layout::DEFAULT_CAPTION),
            opacity: u8::try_from(opacity).map_err(|_| {
                LabelError::workbook(format!(
                    "cell {} must be within 0..=100, got {opacity}",
                    layout::OPACITY
                ))
            })?,
            font_size: read_u32(sheet, layout::FONT_SIZE)?,
            ..Config::default()
        };
        Ok(cfg)
    }

    /// `(path, caption)` rows from row 3 down to the first blank path cell.
    ///
    /// Blank captions fall back to `default_caption`.
    pub fn load_work_items(&self, default_caption: &str) -> LabelResult<Vec<WorkItem>> {
        let sheet = self.sheet()?;
        let mut items = Vec::new();
        let mut row = layout::FIRST_ITEM_ROW;
        loop {
            let path = sheet.get_value(layout::path_cell(row).as_str());
            let path = path.trim();
            if path.is_empty() {
                break;
            }
            let caption = sheet.get_value(layout::caption_cell(row).as_str());
            let caption = if caption.trim().is_empty() {
                default_caption.to_string()
            } else {
                caption
            };
            items.push(WorkItem::new(path, caption));
            row += 1;
        }

        if items.is_empty() {
            return Err(LabelError::NoWorkItems);
        }
        Ok(items)
    }

    /// Folder scanned by populate mode.
    pub fn source_dir(&self) -> LabelResult<PathBuf> {
        let sheet = self.sheet()?;
        let dir = sheet.get_value(layout::SOURCE_DIR);
        let dir = dir.trim();
        if dir.is_empty() {
            return Err(LabelError::workbook(format!(
                "cell {} must hold the folder to scan",
                layout::SOURCE_DIR
            )));
        }
        Ok(PathBuf::from(dir))
    }

    /// Write `paths` into the path column from row 3 and blank out leftover
    /// paths from a previous, longer list. Does not save.
    pub fn write_paths(&mut self, paths: &[PathBuf]) -> LabelResult<()> {
        let sheet = self.sheet_mut()?;
        let mut row = layout::FIRST_ITEM_ROW;
        for path in paths {
            sheet
                .get_cell_mut(layout::path_cell(row).as_str())
                .set_value(path.to_string_lossy());
            row += 1;
        }
        while !sheet.get_value(layout::path_cell(row).as_str()).is_empty() {
            sheet
                .get_cell_mut(layout::path_cell(row).as_str())
                .set_value("");
            row += 1;
        }
        Ok(())
    }
}

/// Regular files directly inside `dir` with an [`IMAGE_EXTENSIONS`]
/// extension, sorted by path.
pub fn discover_images(dir: &Path) -> LabelResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        LabelError::workbook(format!("failed to scan folder '{}': {e}", dir.display()))
    })?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            LabelError::workbook(format!("failed to scan folder '{}': {e}", dir.display()))
        })?;
        let path = entry.path();
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && is_image_path(&path) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn is_image_path(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("");
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
}

fn missing_sheet(path: &Path) -> LabelError {
    LabelError::workbook(format!(
        "table '{}' has no sheet named '{}'",
        path.display(),
        layout::SHEET
    ))
}

fn read_number(sheet: &Worksheet, cell: &str) -> LabelResult<f64> {
    let raw = sheet.get_value(cell);
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LabelError::workbook(format!("cell {cell} is empty")));
    }
    raw.parse::<f64>()
        .map_err(|_| LabelError::workbook(format!("cell {cell} is not a number: '{raw}'")))
}

fn read_u32(sheet: &Worksheet, cell: &str) -> LabelResult<u32> {
    let v = read_number(sheet, cell)?;
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 || v > f64::from(u32::MAX) {
        return Err(LabelError::workbook(format!(
            "cell {cell} must be a whole non-negative number, got {v}"
        )));
    }
    Ok(v as u32)
}

#[cfg(test)]
#[path = "../tests/unit/workbook.rs"]
mod tests;

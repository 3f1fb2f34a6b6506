use image::RgbImage;

use crate::assets::font::FontSource;
use crate::assets::text::{TextBrushRgba8, TextExtent, TextLayoutEngine, measure};
use crate::foundation::config::{Config, Corner};
use crate::foundation::error::{LabelError, LabelResult};
use crate::render::composite::over_rgb_in_place;

/// Outline width of the label box in pixels.
pub const OUTLINE_WIDTH: u32 = 4;
/// Caption alpha, independent of the box opacity.
pub const TEXT_ALPHA: u8 = 250;
/// Lower bound on the margin unit. Half of it must exceed the outline width so
/// the caption never sits under the outline.
pub const MIN_MARGIN: u32 = 2 * OUTLINE_WIDTH + 2;

/// Inclusive pixel rectangle `[x0, x1] x [y0, y1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl LabelRect {
    pub fn width(&self) -> i64 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> i64 {
        self.y1 - self.y0 + 1
    }
}

/// Placement of the label box and its caption on an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelGeometry {
    /// Box, reaching the image edge on the anchored sides.
    pub rect: LabelRect,
    /// Top-left corner of the laid-out caption.
    pub text_origin: (i64, i64),
    /// Laid-out caption size.
    pub text_size: (i64, i64),
    /// Margin unit; half of it pads the caption on each side.
    pub margin: i64,
}

impl LabelGeometry {
    /// Compute the label box for a `text_size` caption on an `image_size` image.
    ///
    /// Along each axis with anchor factor `c` (0 = start, 1 = end):
    /// `p0 = (extent - text - margin) * c` and
    /// `p1 = (extent - 1) * c + (text + margin) * (1 - c)`.
    pub fn compute(
        image_size: (u32, u32),
        text_size: (i64, i64),
        font_size: u32,
        corner: Corner,
    ) -> Self {
        let (w, h) = (i64::from(image_size.0), i64::from(image_size.1));
        let (tw, th) = text_size;
        let margin = i64::from(font_size.max(MIN_MARGIN));
        let ch = corner.horizontal.factor();
        let cv = corner.vertical.factor();

        let rect = LabelRect {
            x0: (w - tw - margin) * ch,
            y0: (h - th - margin) * cv,
            x1: (w - 1) * ch + (tw + margin) * (1 - ch),
            y1: (h - 1) * cv + (th + margin) * (1 - cv),
        };
        let text_origin = (rect.x0 + margin / 2, rect.y0 + margin / 2);

        Self {
            rect,
            text_origin,
            text_size,
            margin,
        }
    }
}

/// Visual parameters of a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelStyle {
    pub font_size: u32,
    /// Box fill opacity, percent.
    pub opacity: u8,
    pub corner: Corner,
}

impl From<&Config> for LabelStyle {
    fn from(cfg: &Config) -> Self {
        Self {
            font_size: cfg.font_size,
            opacity: cfg.opacity,
            corner: cfg.corner,
        }
    }
}

/// Draws caption boxes onto RGB bitmaps with `vello_cpu`.
pub struct LabelPainter {
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
    ctx: Option<vello_cpu::RenderContext>,
}

impl LabelPainter {
    /// Load the font once for every label of the run.
    pub fn new(font: &FontSource) -> LabelResult<Self> {
        let font_bytes = font.load()?;
        let engine = TextLayoutEngine::new(&font_bytes)?;
        tracing::debug!(family = engine.family_name(), "label font registered");
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            engine,
            font,
            ctx: None,
        })
    }

    /// Family name of the registered font.
    pub fn font_family(&self) -> &str {
        self.engine.family_name()
    }

    /// Size of `caption` laid out at `font_size` px, rounded up to whole pixels.
    pub fn measure(&mut self, caption: &str, font_size: u32) -> LabelResult<(i64, i64)> {
        let layout = self
            .engine
            .layout_plain(caption, font_size as f32, text_brush())?;
        Ok(extent_to_px(measure(&layout)))
    }

    /// Draw the label for `caption` onto `img` in place.
    ///
    /// Returns `None` without touching the bitmap when the caption is blank.
    pub fn draw(
        &mut self,
        img: &mut RgbImage,
        caption: &str,
        style: &LabelStyle,
    ) -> LabelResult<Option<LabelGeometry>> {
        if caption.trim().is_empty() {
            return Ok(None);
        }

        let (img_w, img_h) = img.dimensions();
        let width: u16 = img_w
            .try_into()
            .map_err(|_| LabelError::render("image width exceeds u16 for label rendering"))?;
        let height: u16 = img_h
            .try_into()
            .map_err(|_| LabelError::render("image height exceeds u16 for label rendering"))?;

        let layout = self
            .engine
            .layout_plain(caption, style.font_size as f32, text_brush())?;
        let text_size = extent_to_px(measure(&layout));
        let geom = LabelGeometry::compute((img_w, img_h), text_size, style.font_size, style.corner);

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        let r = geom.rect;
        let fill_alpha = crate::foundation::config::fill_alpha(style.opacity);
        let outer = vello_cpu::kurbo::Rect::new(
            r.x0 as f64,
            r.y0 as f64,
            (r.x1 + 1) as f64,
            (r.y1 + 1) as f64,
        );
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        if fill_alpha > 0 {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, fill_alpha));
            ctx.fill_rect(&outer);
        }

        // Stroke is centered on the path; inset so the outline stays inside the box.
        let half = f64::from(OUTLINE_WIDTH) / 2.0;
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(OUTLINE_WIDTH)));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        ctx.stroke_rect(&outer.inset(-half));

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            geom.text_origin.0 as f64,
            geom.text_origin.1 as f64,
        )));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut layer);
        self.ctx = Some(ctx);

        over_rgb_in_place(&mut **img, layer.data_as_u8_slice())?;
        Ok(Some(geom))
    }
}

fn text_brush() -> TextBrushRgba8 {
    TextBrushRgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: TEXT_ALPHA,
    }
}

fn extent_to_px(e: TextExtent) -> (i64, i64) {
    (e.width as i64, e.height as i64)
}

#[cfg(test)]
#[path = "../../tests/unit/render/label.rs"]
mod tests;

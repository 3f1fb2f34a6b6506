use super::*;
use crate::foundation::config::Anchor;

const CORNERS: [Corner; 4] = [
    Corner::TOP_LEFT,
    Corner::TOP_RIGHT,
    Corner::BOTTOM_LEFT,
    Corner::BOTTOM_RIGHT,
];

fn grey(w: u32, h: u32) -> RgbImage {
    RgbImage::from_pixel(w, h, image::Rgb([128, 128, 128]))
}

fn style(corner: Corner, opacity: u8) -> LabelStyle {
    LabelStyle {
        font_size: 30,
        opacity,
        corner,
    }
}

#[test]
fn rect_contains_text_with_margin_for_every_corner() {
    for corner in CORNERS {
        for font_size in [1u32, 2, 4, 12, 50, 120] {
            let text = (173, 58);
            let g = LabelGeometry::compute((3000, 2250), text, font_size, corner);
            let (tx, ty) = g.text_origin;
            let r = g.rect;
            assert!(tx > r.x0, "{corner:?} fs={font_size}: left margin");
            assert!(ty > r.y0, "{corner:?} fs={font_size}: top margin");
            assert!(tx + text.0 < r.x1, "{corner:?} fs={font_size}: right margin");
            assert!(ty + text.1 < r.y1, "{corner:?} fs={font_size}: bottom margin");
        }
    }
}

#[test]
fn tiny_fonts_keep_text_clear_of_the_outline() {
    let ow = i64::from(OUTLINE_WIDTH);
    for corner in CORNERS {
        for font_size in [1u32, 2, 4, 8, 10] {
            let text = (12, 3);
            let g = LabelGeometry::compute((640, 480), text, font_size, corner);
            let (tx, ty) = g.text_origin;
            let r = g.rect;
            assert_eq!(g.margin, i64::from(MIN_MARGIN));
            // Outline covers [x0, x0 + ow) and (x1 - ow, x1]; text covers [tx, tx + tw).
            assert!(tx > r.x0 + ow - 1, "{corner:?} fs={font_size}: left");
            assert!(ty > r.y0 + ow - 1, "{corner:?} fs={font_size}: top");
            assert!(tx + text.0 - 1 < r.x1 - ow + 1, "{corner:?} fs={font_size}: right");
            assert!(ty + text.1 - 1 < r.y1 - ow + 1, "{corner:?} fs={font_size}: bottom");
        }
    }
}

#[test]
fn rect_reaches_the_anchored_edges() {
    let (w, h) = (800u32, 600u32);
    let text = (100, 40);

    let g = LabelGeometry::compute((w, h), text, 50, Corner::BOTTOM_RIGHT);
    assert_eq!(g.rect.x1, i64::from(w) - 1);
    assert_eq!(g.rect.y1, i64::from(h) - 1);
    assert_eq!(g.rect.x0, 800 - 100 - 50);
    assert_eq!(g.rect.y0, 600 - 40 - 50);
    assert_eq!(g.text_origin, (650 + 25, 510 + 25));

    let g = LabelGeometry::compute((w, h), text, 50, Corner::TOP_LEFT);
    assert_eq!((g.rect.x0, g.rect.y0), (0, 0));
    assert_eq!((g.rect.x1, g.rect.y1), (150, 90));
    assert_eq!(g.text_origin, (25, 25));

    let g = LabelGeometry::compute((w, h), text, 50, Corner::new(Anchor::End, Anchor::Start));
    assert_eq!((g.rect.x0, g.rect.y0), (650, 0));
    assert_eq!((g.rect.x1, g.rect.y1), (799, 90));

    let g = LabelGeometry::compute((w, h), text, 50, Corner::BOTTOM_LEFT);
    assert_eq!((g.rect.x0, g.rect.y0), (0, 510));
    assert_eq!((g.rect.x1, g.rect.y1), (150, 599));
}

#[test]
fn bundled_font_measures_non_empty_caption() {
    let mut painter = LabelPainter::new(&FontSource::Bundled).unwrap();
    assert!(!painter.font_family().is_empty());
    let (w, h) = painter.measure("Test", 50).unwrap();
    assert!(w > 0 && h > 0);
}

#[test]
fn blank_caption_leaves_bitmap_untouched() {
    let mut painter = LabelPainter::new(&FontSource::Bundled).unwrap();
    let mut img = grey(200, 100);
    let before = img.clone();
    let g = painter
        .draw(&mut img, "   ", &style(Corner::BOTTOM_RIGHT, 90))
        .unwrap();
    assert!(g.is_none());
    assert_eq!(img, before);
}

#[test]
fn draws_box_outline_and_keeps_outside_pixels() {
    let mut painter = LabelPainter::new(&FontSource::Bundled).unwrap();
    for corner in CORNERS {
        let mut img = grey(400, 300);
        let g = painter
            .draw(&mut img, "Test", &style(corner, 90))
            .unwrap()
            .unwrap();
        let r = g.rect;

        // Inside the outline, left of the caption: white-ish fill.
        let fill = img.get_pixel((r.x0 + 6) as u32, (r.y0 + 6) as u32);
        assert!(fill[0] > 200, "{corner:?}: fill {fill:?}");

        // On the outline: black.
        let edge = img.get_pixel((r.x0 + 1) as u32, (r.y0 + 1) as u32);
        assert!(edge[0] < 30, "{corner:?}: outline {edge:?}");

        // Opposite side of the image: untouched.
        let far_x = if corner.horizontal == Anchor::End { 2 } else { 397 };
        let far_y = if corner.vertical == Anchor::End { 2 } else { 297 };
        assert_eq!(img.get_pixel(far_x, far_y).0, [128, 128, 128]);

        // Some caption pixels are dark.
        let (tx, ty) = g.text_origin;
        let (tw, th) = g.text_size;
        let mut darkest = 255u8;
        for y in ty..ty + th {
            for x in tx..tx + tw {
                darkest = darkest.min(img.get_pixel(x as u32, y as u32)[0]);
            }
        }
        assert!(darkest < 64, "{corner:?}: no dark caption pixels");
    }
}

#[test]
fn fill_brightness_is_monotonic_in_opacity() {
    let mut painter = LabelPainter::new(&FontSource::Bundled).unwrap();
    let mut prev = 0u8;
    for opacity in [0u8, 25, 50, 75, 100] {
        let mut img = grey(300, 200);
        let g = painter
            .draw(&mut img, "Ab", &style(Corner::TOP_LEFT, opacity))
            .unwrap()
            .unwrap();
        let px = img.get_pixel((g.rect.x0 + 6) as u32, (g.rect.y0 + 6) as u32)[0];
        if opacity == 0 {
            assert_eq!(px, 128);
        }
        if opacity == 100 {
            assert_eq!(px, 255);
        }
        assert!(px >= prev);
        prev = px;
    }
}

#[test]
fn style_follows_config() {
    let cfg = Config {
        font_size: 42,
        opacity: 33,
        corner: Corner::TOP_RIGHT,
        ..Config::default()
    };
    let s = LabelStyle::from(&cfg);
    assert_eq!(s.font_size, 42);
    assert_eq!(s.opacity, 33);
    assert_eq!(s.corner, Corner::TOP_RIGHT);
}

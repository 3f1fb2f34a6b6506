use super::*;

fn write_jpeg(path: &Path, w: u32, h: u32) {
    let img = image::RgbImage::from_fn(w, h, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save(path).unwrap();
}

fn small_config() -> Config {
    Config {
        max_width: 300,
        max_height: 225,
        max_size_mb: 1.0,
        default_caption: "Default".to_string(),
        font_size: 20,
        ..Config::default()
    }
}

#[test]
fn output_name_uses_stem_and_suffix() {
    let out = output_path_for(Path::new("/photos/IMG_0001.JPG"), Path::new("/photos/output"));
    assert_eq!(out, PathBuf::from("/photos/output/IMG_0001_edit.jpg"));

    let out = output_path_for(Path::new("a.b.png"), Path::new("out"));
    assert_eq!(out, PathBuf::from("out/a.b_edit.jpg"));
}

#[test]
fn report_display_matches_status_line() {
    let report = LabelReport {
        source: PathBuf::from("in/a.jpg"),
        output: PathBuf::from("in/output/a_edit.jpg"),
        caption: "Test".to_string(),
        quality: 85,
        width: 3000,
        height: 2250,
        bytes: 1024 * 1024 + 512 * 1024,
        budget_met: true,
    };
    assert_eq!(
        report.to_string(),
        "file a_edit.jpg, size 1.50 MB, JPEG quality 85, resolution 3000x2250"
    );
}

#[test]
fn new_rejects_invalid_config() {
    let cfg = Config {
        opacity: 150,
        ..Config::default()
    };
    assert!(ImagePipeline::new(cfg, PipelineOpts::default()).is_err());
}

#[test]
fn process_resizes_labels_and_writes() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("shot.jpg");
    write_jpeg(&src, 400, 300);
    let out_dir = dir.path().join("output");
    std::fs::create_dir_all(&out_dir).unwrap();

    let mut pipeline = ImagePipeline::new(small_config(), PipelineOpts::default()).unwrap();
    let report = pipeline
        .process(&WorkItem::new(&src, "Test"), &out_dir)
        .unwrap();

    assert_eq!(report.output, out_dir.join("shot_edit.jpg"));
    assert_eq!((report.width, report.height), (300, 225));
    assert_eq!(report.quality, 90);
    assert!(report.budget_met);

    let written = std::fs::read(&report.output).unwrap();
    assert_eq!(written.len() as u64, report.bytes);
    let decoded = image::load_from_memory(&written).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (300, 225));
}

#[test]
fn missing_source_fails_loudly() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = ImagePipeline::new(small_config(), PipelineOpts::default()).unwrap();
    let err = pipeline
        .process(&WorkItem::new(dir.path().join("nope.jpg"), "x"), dir.path())
        .unwrap_err();
    assert!(matches!(err, LabelError::Decode(_)));
}

#[test]
fn unreachable_budget_fails_unless_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("big.jpg");
    write_jpeg(&src, 200, 150);
    let cfg = Config {
        max_size_mb: 0.0001,
        ..small_config()
    };

    let mut strict = ImagePipeline::new(cfg.clone(), PipelineOpts::default()).unwrap();
    let err = strict
        .process(&WorkItem::new(&src, "x"), dir.path())
        .unwrap_err();
    assert!(matches!(err, LabelError::SizeBudget { .. }));
    assert!(!dir.path().join("big_edit.jpg").exists());

    let opts = PipelineOpts {
        allow_oversize: true,
        ..PipelineOpts::default()
    };
    let mut lenient = ImagePipeline::new(cfg, opts).unwrap();
    let report = lenient
        .process(&WorkItem::new(&src, "x"), dir.path())
        .unwrap();
    assert!(!report.budget_met);
    assert_eq!(report.quality, crate::encode::jpeg::MIN_QUALITY);
    assert!(report.output.exists());
}

#[test]
fn budget_met_reflects_the_labeled_file() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("flat.png");
    let flat = image::RgbImage::from_pixel(300, 225, image::Rgb([90, 140, 200]));
    flat.save(&src).unwrap();

    // The unlabeled bitmap fits exactly at the first probed quality.
    let budget = crate::encode::jpeg::encode_jpeg(&flat, 90).unwrap().len() as u64;
    let cfg = Config {
        max_size_mb: budget as f64 / 1024.0 / 1024.0,
        ..small_config()
    };
    assert_eq!(cfg.max_size_bytes(), budget);

    let mut pipeline = ImagePipeline::new(cfg, PipelineOpts::default()).unwrap();
    let report = pipeline
        .process(&WorkItem::new(&src, "Some long caption WWW"), dir.path())
        .unwrap();

    assert_eq!(report.quality, 90);
    assert!(report.bytes > budget);
    assert!(!report.budget_met);
    assert_eq!(std::fs::metadata(&report.output).unwrap().len(), report.bytes);
}

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};

use autolabel::{BatchOpts, BoundsCheck, Config, Corner, FontSource, PipelineOpts, Workbook};

#[derive(Parser, Debug)]
#[command(name = "autolabel", version, about = "Resize, compress and caption photos listed in an xlsx table")]
struct Cli {
    /// Scan the folder in B2 and write the image paths into the table.
    #[arg(short = 'p', long = "populate-table")]
    populate_table: bool,

    /// Skip the labeling pass.
    #[arg(long = "disable-labeling", alias = "dl")]
    disable_labeling: bool,

    /// Workbook driving the run.
    #[arg(short = 't', long, default_value = "example.xlsx")]
    table: PathBuf,

    /// Corner the caption box is placed in.
    #[arg(long, value_enum, default_value_t = CornerArg::BottomRight)]
    corner: CornerArg,

    /// Compare the image height (not width) against the max height.
    #[arg(long)]
    strict_bounds: bool,

    /// Keep lowest-quality output when the size budget cannot be met.
    #[arg(long)]
    allow_oversize: bool,

    /// TTF/OTF font for captions instead of the bundled one.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Write a JSON report of every labeled file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write a new table for the given photo folder and exit.
    #[arg(long, value_name = "DIR")]
    init: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CornerArg {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl From<CornerArg> for Corner {
    fn from(c: CornerArg) -> Self {
        match c {
            CornerArg::TopLeft => Corner::TOP_LEFT,
            CornerArg::TopRight => Corner::TOP_RIGHT,
            CornerArg::BottomLeft => Corner::BOTTOM_LEFT,
            CornerArg::BottomRight => Corner::BOTTOM_RIGHT,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(dir) = &cli.init {
        return cmd_init(&cli.table, dir);
    }

    let opts = BatchOpts {
        populate: cli.populate_table,
        label: !cli.disable_labeling,
        corner: cli.corner.into(),
        bounds: if cli.strict_bounds {
            BoundsCheck::Strict
        } else {
            BoundsCheck::Legacy
        },
        pipeline: PipelineOpts {
            font: FontSource::from(cli.font.clone()),
            allow_oversize: cli.allow_oversize,
        },
        ..BatchOpts::new(cli.table.clone())
    };

    let summary = autolabel::run_batch(&opts, |report| println!("{report}"))?;

    if let Some(paths) = &summary.populated {
        eprintln!(
            "wrote {} image path(s) into {}",
            paths.len(),
            cli.table.display()
        );
    }

    if let Some(path) = &cli.report {
        let json = serde_json::to_vec_pretty(&summary.reports).context("serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("write report '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }

    Ok(())
}

fn cmd_init(table: &std::path::Path, dir: &std::path::Path) -> anyhow::Result<()> {
    if table.exists() {
        anyhow::bail!("refusing to overwrite existing table '{}'", table.display());
    }
    Workbook::create_template(table, &Config::default(), dir)?;
    eprintln!("wrote {}", table.display());
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! PDF Stamp CLI tool
//!
//! Overlays a raster image onto every page of a PDF at one of nine
//! keypad-style anchor positions.

use clap::{ArgAction, CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::process;

use pdf_stamp::geometry::{Length, StampSpec};
use pdf_stamp::pdf::{stamp_pdf, StampOptions};

/// PDF Stamp - place an image stamp on every page of a PDF
// `-h` is taken by --img-h, so the automatic help short flag is disabled
// and --help stays long-only.
#[derive(Parser)]
#[command(name = "pdf-stamp")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true)]
#[command(after_help = "EXAMPLES:
    # Stamp a logo near the bottom-left corner (default position)
    pdf-stamp report.pdf logo.png stamped.pdf

    # Centered watermark, 80mm wide, 30% opacity
    pdf-stamp report.pdf draft.png stamped.pdf -p 5 -w 80 -o 0.3

    # Top-right corner, 5mm from each edge, height-driven size
    pdf-stamp report.pdf seal.png stamped.pdf -p 9 -x 5 -y 5 -h 20")]
struct Cli {
    /// Source PDF file
    source: Option<PathBuf>,

    /// Stamp image (PNG, JPEG or BMP)
    stamp: Option<PathBuf>,

    /// Output PDF file
    output: Option<PathBuf>,

    /// Image position: 1-9 (just like the phone's keypad layout)
    #[arg(short = 'p', long = "img-pos", default_value_t = 1)]
    img_pos: i32,

    /// Horizontal shift [mm] depending on the image position
    #[arg(short = 'x', long = "offset-x", default_value_t = 10.0)]
    offset_x: f64,

    /// Vertical shift [mm] depending on the image position
    #[arg(short = 'y', long = "offset-y", default_value_t = 10.0)]
    offset_y: f64,

    /// Target image width [mm] (can be omitted if height is given)
    #[arg(short = 'w', long = "img-w", default_value_t = 0.0)]
    img_w: f64,

    /// Target image height [mm] (can be omitted if width is given)
    #[arg(short = 'h', long = "img-h", default_value_t = 0.0)]
    img_h: f64,

    /// Opacity of the stamp, between 0 and 1
    #[arg(short = 'o', long, default_value_t = 0.8)]
    opacity: f64,

    /// Display debug information
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

fn main() {
    let cli = Cli::parse();

    let (source, stamp, output) = match (&cli.source, &cli.stamp, &cli.output) {
        (Some(s), Some(st), Some(o)) => (s.clone(), st.clone(), o.clone()),
        _ => {
            // Fewer than three positional arguments: usage, not an error
            let mut cmd = Cli::command();
            let _ = cmd.print_help();
            process::exit(0);
        }
    };

    if let Err(e) = run(&cli, &source, &stamp, &output) {
        // Contract: one-line message on stdout, exit code 1
        println!("ERROR: {}", e);
        process::exit(1);
    }

    println!("SUCCESS: Output generated at: {}", output.display());
}

fn run(cli: &Cli, source: &Path, stamp: &Path, output: &Path) -> anyhow::Result<()> {
    let spec = StampSpec {
        anchor: cli.img_pos,
        offset_x: Length::from_mm(cli.offset_x),
        offset_y: Length::from_mm(cli.offset_y),
        // Flag value 0 means "unset"
        width: (cli.img_w > 0.0).then(|| Length::from_mm(cli.img_w)),
        height: (cli.img_h > 0.0).then(|| Length::from_mm(cli.img_h)),
        opacity: cli.opacity,
    };

    let options = StampOptions {
        spec,
        verbose: cli.verbose,
    };

    stamp_pdf(source, stamp, output, &options)?;

    Ok(())
}

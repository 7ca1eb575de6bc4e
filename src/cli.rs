use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for the `texlayoutc` binary.
#[derive(Parser)]
#[command(name = "texlayoutc")]
#[command(version = "0.1.0")]
#[command(about = "Lay out and render a .tex-like document to PDF", long_about = None)]
pub struct Cli {
    /// Input document source file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output PDF file
    #[arg(short, long, value_name = "PDF")]
    pub output: PathBuf,

    /// TrueType/OpenType font for plain text
    #[arg(long, value_name = "TTF")]
    pub font: PathBuf,

    /// TrueType/OpenType font for \textbf; defaults to `--font` if omitted
    #[arg(long, value_name = "TTF")]
    pub font_bold: Option<PathBuf>,

    /// TrueType/OpenType font for \emph; defaults to `--font` if omitted
    #[arg(long, value_name = "TTF")]
    pub font_italic: Option<PathBuf>,

    /// Font size in points
    #[arg(long, default_value_t = 12.0)]
    pub font_size: f64,

    /// Page width in points (default: A4)
    #[arg(long, default_value_t = 210.0 * 72.0 / 25.4)]
    pub page_width: f64,

    /// Page height in points (default: A4)
    #[arg(long, default_value_t = 297.0 * 72.0 / 25.4)]
    pub page_height: f64,

    /// Page margin in points (default: 10mm)
    #[arg(long, default_value_t = 10.0 * 72.0 / 25.4)]
    pub margin: f64,
}

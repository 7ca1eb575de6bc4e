mod cli;

use std::{error::Error, fs};

use clap::Parser;
use cli::Cli;
use tex_layout::{compile, CompileOptions};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let tex = fs::read_to_string(&cli.input)
        .map_err(|e| format!("failed to read {}: {}", cli.input.display(), e))?;
    let normal_font = fs::read(&cli.font)
        .map_err(|e| format!("failed to read {}: {}", cli.font.display(), e))?;
    let bold_font = cli
        .font_bold
        .as_ref()
        .map(|p| fs::read(p).map_err(|e| format!("failed to read {}: {}", p.display(), e)))
        .transpose()?;
    let italic_font = cli
        .font_italic
        .as_ref()
        .map(|p| fs::read(p).map_err(|e| format!("failed to read {}: {}", p.display(), e)))
        .transpose()?;

    let opts = CompileOptions {
        normal_font,
        bold_font,
        italic_font,
        font_size: cli.font_size,
        page_width_pt: cli.page_width,
        page_height_pt: cli.page_height,
        margin_pt: cli.margin,
    };

    let pdf = compile(&tex, opts).map_err(|e| format!("compilation error: {e}"))?;

    fs::write(&cli.output, &pdf)
        .map_err(|e| format!("failed to write {}: {}", cli.output.display(), e))?;

    println!("wrote PDF to {}", cli.output.display());
    Ok(())
}

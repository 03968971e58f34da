use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::loader::load_image;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Physical scale in pixels per logical unit
    #[arg(short, long)]
    pub scale: Option<f64>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    for (index, path) in args.files.iter().enumerate() {
        let image = load_image(path, args.scale)?;
        let logical = image.logical_size();

        if index > 0 {
            println!();
        }
        println!("File:        {}", path.display());
        println!("Dimensions:  {}x{}", image.width(), image.height());
        println!("Scale:       {} px/unit", image.scale());
        println!("Logical:     {:.3} x {:.3}", logical.width, logical.height);
        println!("Native zoom: {:.4}", 1.0 / image.scale());
    }
    Ok(())
}

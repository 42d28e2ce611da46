//! `assemble` command: single-layer KTX2 files → one KTX2 texture array.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use ktxarray::array::assemble_array;
use ktxarray::config::format_size;
use ktxarray::container::{raw_dfd, read_slice, write_array};
use serde::Serialize;

use super::common::{print_field, print_json, read_file, write_file};
use crate::error::CliError;

/// Arguments for `ktxarray assemble`.
#[derive(Debug, Args)]
pub struct AssembleArgs {
    /// Output KTX2 array file
    pub output: PathBuf,

    /// Input single-layer KTX2 files, in layer order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Print a JSON summary instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct AssembleSummary<'a> {
    output: &'a Path,
    format: String,
    width: u32,
    height: u32,
    depth: usize,
    mip_levels: usize,
    bytes: usize,
}

/// Run the assemble command.
pub fn run(args: AssembleArgs) -> Result<(), CliError> {
    let mut slices = Vec::with_capacity(args.inputs.len());
    let mut dfd = Vec::new();

    for (index, path) in args.inputs.iter().enumerate() {
        let bytes = read_file(path)?;
        let slice = read_slice(&bytes).map_err(|source| decode_error(path, source))?;
        if index == 0 {
            dfd = raw_dfd(&bytes)
                .map_err(|source| decode_error(path, source))?
                .to_vec();
        }
        tracing::debug!(path = %path.display(), levels = slice.mip_count(), "Loaded slice");
        slices.push(slice);
    }

    let array = assemble_array(&slices)?;
    let file = write_array(&array, &dfd);
    write_file(&args.output, &file)?;

    if args.json {
        return print_json(&AssembleSummary {
            output: &args.output,
            format: array.format().to_string(),
            width: array.width(),
            height: array.height(),
            depth: array.depth(),
            mip_levels: array.mip_count(),
            bytes: file.len(),
        });
    }

    println!(
        "{} {}",
        style("Assembled").green().bold(),
        args.output.display()
    );
    print_field("Format", array.format());
    print_field("Size", format!("{}×{}", array.width(), array.height()));
    print_field("Layers", array.depth());
    print_field("Mip levels", array.mip_count());
    print_field("File size", format_size(file.len()));
    Ok(())
}

fn decode_error(path: &Path, source: ktxarray::container::Ktx2Error) -> CliError {
    CliError::Decode {
        path: path.to_path_buf(),
        source,
    }
}

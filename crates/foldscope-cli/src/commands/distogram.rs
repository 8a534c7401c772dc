use crate::cli::DistogramArgs;
use crate::error::{CliError, Result};
use foldscope::core::analytics::distogram::{Distogram, distogram};
use foldscope::core::io::format::StructureFormat;
use foldscope::core::io::pdb::PdbFile;
use foldscope::core::io::traits::StructureFile;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::info;

pub async fn run(args: DistogramArgs) -> Result<()> {
    info!("Loading input structure from {:?}", &args.file);
    let matrix = tokio::task::block_in_place(|| compute(&args.file))?;
    info!("Computed a {0}x{0} distogram.", matrix.size());

    match &args.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            write_csv(&matrix, writer, path)?;
            println!("✓ Distogram ({} residues) written to: {}", matrix.size(), path.display());
        }
        None => write_csv(&matrix, io::stdout().lock(), Path::new("-"))?,
    }
    Ok(())
}

fn compute(path: &Path) -> Result<Distogram> {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    let format = StructureFormat::detect(file_name.as_deref().unwrap_or_default());
    if !format.is_parsed_locally() {
        return Err(CliError::Argument(format!(
            "Distograms need a locally parsed structure; {} files are not supported",
            format
        )));
    }

    let molecule = PdbFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    Ok(distogram(&molecule))
}

fn write_csv(matrix: &Distogram, writer: impl io::Write, path: &Path) -> Result<()> {
    matrix.write_csv(writer).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

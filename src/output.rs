use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use tracing::info;

use crate::model::ModelOutput;
use crate::model::runner::RunError;

/// Writes the outputs of a run as pretty-printed JSON, creating missing
/// parent directories.
pub fn write_outputs<P: AsRef<Path>>(path: P, outputs: &[ModelOutput]) -> Result<(), RunError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, outputs)?;

    info!("Wrote {} output profiles to {}", outputs.len(), path.display());
    Ok(())
}

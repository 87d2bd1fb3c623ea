use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::report::{report_error, MatchReport};
use crate::Result;

pub(super) fn write(report: &MatchReport, file: File, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report).map_err(|e| report_error(path, e))?;
    writer.write_all(b"\n").map_err(|e| report_error(path, e))?;
    writer.flush().map_err(|e| report_error(path, e))
}

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::report::{report_error, MatchReport};
use crate::Result;

pub(super) fn write(report: &MatchReport, mut file: File, path: &Path) -> Result<()> {
    let bytes = build(report)
        .and_then(|mut workbook| workbook.save_to_buffer())
        .map_err(|e| report_error(path, e))?;
    file.write_all(&bytes).map_err(|e| report_error(path, e))?;
    file.flush().map_err(|e| report_error(path, e))
}

fn build(report: &MatchReport) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let score = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name("results")?;
    sheet.write_string_with_format(0, 0, "resume_name", &header)?;
    sheet.write_string_with_format(0, 1, "match_score", &header)?;

    let mut row = 1;
    for result in &report.rows {
        sheet.write_string(row, 0, result.resume_name.as_str())?;
        sheet.write_number_with_format(row, 1, result.match_score, &score)?;
        row += 1;
    }
    sheet.autofit();

    if !report.skipped.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name("skipped")?;
        sheet.write_string_with_format(0, 0, "resume_name", &header)?;
        sheet.write_string_with_format(0, 1, "reason", &header)?;

        let mut row = 1;
        for skipped in &report.skipped {
            sheet.write_string(row, 0, skipped.resume_name.as_str())?;
            sheet.write_string(row, 1, skipped.reason.to_string().as_str())?;
            row += 1;
        }
        sheet.autofit();
    }

    Ok(workbook)
}

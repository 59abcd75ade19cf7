// CSV export of a tableau (current, previous or any history step)
//
// Layout: a header row with an empty corner cell followed by the column
// labels, then one record per row label followed by that row's cells.

use std::path::Path;

use tabstep_engine::TableauView;

use crate::error::SessionFileError;

pub fn export(view: TableauView<'_>, path: &Path) -> Result<(), SessionFileError> {
    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    write_records(view, &mut writer)?;
    writer.flush()?;
    log::info!("exported {}x{} tableau to {}", view.rows(), view.cols(), path.display());
    Ok(())
}

pub fn export_to_string(view: TableauView<'_>) -> Result<String, SessionFileError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    write_records(view, &mut writer)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| SessionFileError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SessionFileError::Csv(e.to_string()))
}

fn write_records<W: std::io::Write>(
    view: TableauView<'_>,
    writer: &mut csv::Writer<W>,
) -> Result<(), SessionFileError> {
    let mut header: Vec<&str> = Vec::with_capacity(view.cols() + 1);
    header.push("");
    header.extend(view.col_vars.iter().map(String::as_str));
    writer.write_record(&header)?;

    for (label, row) in view.row_vars.iter().zip(view.cells) {
        let mut record: Vec<&str> = Vec::with_capacity(row.len() + 1);
        record.push(label);
        record.extend(row.iter().map(String::as_str));
        writer.write_record(&record)?;
    }
    Ok(())
}

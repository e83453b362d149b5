use crate::error::DealFinanceError;
use crate::format::strip_thousands;
use crate::scenarios::store::{CapturedValue, Scenario};
use crate::DealFinanceResult;

/// Download name of the export.
pub const CSV_FILE_NAME: &str = "scenarios.csv";

pub const CSV_MIME_TYPE: &str = "text/csv";

/// Flat CSV of the scenario history.
///
/// The header is the first scenario's field ids in capture order; each later
/// scenario is projected onto those columns. Cells hold the captured string
/// with thousands separators removed. Missing or unrecognised values give an
/// empty cell. Rows end in `\n`. Fields are quoted only when they contain a
/// delimiter, quote or line break, which no formatter output does.
pub fn export_csv(scenarios: &[Scenario]) -> DealFinanceResult<String> {
    let first = scenarios.first().ok_or_else(|| {
        tracing::warn!("no scenarios to export");
        DealFinanceError::NothingToExport
    })?;
    let headers: Vec<&str> = first.values.keys().collect();

    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(&headers)?;

    for scenario in scenarios {
        let row: Vec<String> = headers
            .iter()
            .map(|key| scenario.values.get(key).map(csv_cell).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| DealFinanceError::Csv(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| DealFinanceError::Csv(e.to_string()))?;
    tracing::debug!(rows = scenarios.len(), columns = headers.len(), "scenarios exported");
    Ok(text)
}

fn csv_cell(value: &CapturedValue) -> String {
    value.text().map(strip_thousands).unwrap_or_default()
}

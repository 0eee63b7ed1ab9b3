//! Medication catalog file (`medicamentos_info.csv`).

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};

use medsub_model::MedicationRecord;

use crate::csv_table::read_csv_table;

pub const COL_NAME: &str = "medicamento";
pub const COL_COMPOSITION: &str = "composicion";
pub const COL_USES: &str = "usos";
pub const COL_SIDE_EFFECTS: &str = "efectos_secundarios";
pub const COL_REVIEW: &str = "review_excelente";
pub const COL_SIDE_EFFECTS_DETAILED: &str = "efectos_secundarios_detallados";
pub const COL_USES_EXTENDED: &str = "usos_clinicos_ext";
pub const COL_CHEMICAL_CLASS: &str = "clase quimica";
pub const COL_THERAPEUTIC_CLASS: &str = "clase terapeutica";

/// Records read from the medication file.
#[derive(Debug, Clone, Default)]
pub struct MedicationLoad {
    pub records: Vec<MedicationRecord>,
    /// Rows skipped for a missing name or composition.
    pub skipped: usize,
}

/// Loads medication records.
///
/// Name and composition columns are required; every other column is
/// optional. A missing or unparsable review reads as 0.
pub fn load_medications(path: &Path) -> Result<MedicationLoad> {
    let table = read_csv_table(path)?;
    let name_idx = table.require_column(COL_NAME)?;
    let composition_idx = table.require_column(COL_COMPOSITION)?;
    let uses_idx = table.column_index(COL_USES);
    let side_effects_idx = table.column_index(COL_SIDE_EFFECTS);
    let review_idx = table.column_index(COL_REVIEW);
    let detailed_idx = table.column_index(COL_SIDE_EFFECTS_DETAILED);
    let extended_idx = table.column_index(COL_USES_EXTENDED);
    let chemical_idx = table.column_index(COL_CHEMICAL_CLASS);
    let therapeutic_idx = table.column_index(COL_THERAPEUTIC_CLASS);

    let mut load = MedicationLoad::default();
    for (row_no, row) in table.rows.iter().enumerate() {
        let (Some(name), Some(composition)) = (
            table.value(row, name_idx),
            table.value(row, composition_idx),
        ) else {
            debug!(row = row_no + 2, "skipping medication row without name or composition");
            load.skipped += 1;
            continue;
        };
        let review = match review_idx.and_then(|idx| table.value(row, idx)) {
            Some(raw) => parse_review(raw).unwrap_or_else(|| {
                warn!(medication = name, value = raw, "invalid review score, using 0");
                0.0
            }),
            None => 0.0,
        };
        load.records.push(MedicationRecord {
            name: name.to_string(),
            composition: composition.to_string(),
            therapeutic_class: table.optional(row, therapeutic_idx),
            chemical_class: table.optional(row, chemical_idx),
            review_excellent: review,
            side_effects: table.optional(row, side_effects_idx),
            side_effects_detailed: table.optional(row, detailed_idx),
            indications: table.optional(row, uses_idx),
            indications_extended: table.optional(row, extended_idx),
        });
    }
    info!(
        path = %path.display(),
        records = load.records.len(),
        skipped = load.skipped,
        "loaded medications"
    );
    Ok(load)
}

/// Parses a review percentage, accepting a trailing `%` and a decimal comma.
fn parse_review(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_end_matches('%').trim().replace(',', ".");
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

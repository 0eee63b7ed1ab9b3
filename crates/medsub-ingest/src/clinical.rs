//! Recorded patient cases (`clinical_data.csv`) used for batch evaluation.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::csv_table::read_csv_table;

const NOTES_COLUMNS: &[&str] = &["notas_clinicas", "notas", "clinical_notes"];
const MEDICATION_COLUMNS: &[&str] = &["medicamentos", "medicamento_actual", "medication"];
const DIAGNOSIS_COLUMNS: &[&str] = &["diagnosticos", "diagnostico", "diagnosis"];

/// One recorded case: what the patient takes and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalCase {
    pub notes: String,
    pub diagnosis: String,
    pub medication: String,
}

/// Loads clinical cases; rows without a medication are skipped.
///
/// Each column may appear under an English or Spanish alias. A missing
/// diagnosis reads as `"unspecified"`.
pub fn load_clinical_cases(path: &Path) -> Result<Vec<ClinicalCase>> {
    let table = read_csv_table(path)?;
    let notes_idx = table.require_column_any(NOTES_COLUMNS)?;
    let medication_idx = table.require_column_any(MEDICATION_COLUMNS)?;
    let diagnosis_idx = table.require_column_any(DIAGNOSIS_COLUMNS)?;

    let mut cases = Vec::with_capacity(table.rows.len());
    for (row_no, row) in table.rows.iter().enumerate() {
        let Some(medication) = table.value(row, medication_idx) else {
            debug!(row = row_no + 2, "skipping clinical case without a medication");
            continue;
        };
        cases.push(ClinicalCase {
            notes: table.value(row, notes_idx).unwrap_or_default().to_string(),
            diagnosis: table
                .value(row, diagnosis_idx)
                .unwrap_or("unspecified")
                .to_string(),
            medication: medication.to_string(),
        });
    }
    info!(path = %path.display(), cases = cases.len(), "loaded clinical cases");
    Ok(cases)
}

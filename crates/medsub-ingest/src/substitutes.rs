//! Substitute table file (`sustitutos_medicamentos.csv`).

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use medsub_model::{MAX_SUBSTITUTES, SubstituteEntry, SubstituteTable};

use crate::csv_table::read_csv_table;

pub const COL_CANONICAL: &str = "medicamento_en";
pub const COL_LOCAL: &str = "medicamento_principal";

/// Loads the substitute table.
///
/// Slot columns `sustituto{N}_en` / `sustituto{N}_es` for N in 1..=5 are all
/// optional; a slot is kept only when both names are present.
pub fn load_substitutes(path: &Path) -> Result<SubstituteTable> {
    let table = read_csv_table(path)?;
    let canonical_idx = table.require_column(COL_CANONICAL)?;
    let local_idx = table.column_index(COL_LOCAL);
    let slot_columns: Vec<(Option<usize>, Option<usize>)> = (1..=MAX_SUBSTITUTES)
        .map(|slot| {
            (
                table.column_index(&format!("sustituto{slot}_es")),
                table.column_index(&format!("sustituto{slot}_en")),
            )
        })
        .collect();

    let mut entries = Vec::with_capacity(table.rows.len());
    let mut skipped = 0usize;
    for (row_no, row) in table.rows.iter().enumerate() {
        let Some(canonical) = table.value(row, canonical_idx) else {
            debug!(row = row_no + 2, "skipping substitute row without a principal name");
            skipped += 1;
            continue;
        };
        let slots = slot_columns
            .iter()
            .map(|&(es, en)| (table.optional(row, es), table.optional(row, en)));
        entries.push(SubstituteEntry::new(
            canonical,
            table.optional(row, local_idx),
            slots,
        ));
    }
    let substitutes = SubstituteTable::new(entries);
    info!(
        path = %path.display(),
        entries = substitutes.len(),
        skipped,
        "loaded substitute table"
    );
    Ok(substitutes)
}

//! Allergen vocabulary file (`posibles_alergenos.csv`).

use std::path::Path;

use anyhow::Result;
use tracing::info;

use medsub_model::AllergenList;

use crate::csv_table::read_csv_table;

pub const COL_ALLERGEN: &str = "posibles_alergenos";

pub fn load_allergens(path: &Path) -> Result<AllergenList> {
    let table = read_csv_table(path)?;
    let idx = table.require_column(COL_ALLERGEN)?;
    let allergens = AllergenList::new(
        table
            .rows
            .iter()
            .filter_map(|row| table.value(row, idx)),
    );
    info!(path = %path.display(), terms = allergens.len(), "loaded allergens");
    Ok(allergens)
}

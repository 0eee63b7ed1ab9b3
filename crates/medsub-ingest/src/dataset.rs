//! Default dataset layout and one-shot loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use medsub_model::{AllergenList, Catalog};

use crate::allergens::load_allergens;
use crate::clinical::{ClinicalCase, load_clinical_cases};
use crate::medications::load_medications;
use crate::substitutes::load_substitutes;

/// Locations of the dataset files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub medications: PathBuf,
    pub substitutes: PathBuf,
    pub allergens: PathBuf,
    pub clinical: PathBuf,
}

impl DatasetPaths {
    /// Standard layout under one data directory.
    pub fn from_data_dir(dir: &Path) -> Self {
        Self {
            medications: dir.join("BaseConocimiento").join("medicamentos_info.csv"),
            substitutes: dir
                .join("BaseConocimiento")
                .join("sustitutos_medicamentos.csv"),
            allergens: dir.join("ReglasClinicas").join("posibles_alergenos.csv"),
            clinical: dir.join("01Hechos").join("clinical_data.csv"),
        }
    }
}

/// Where the allergen vocabulary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllergenSource {
    File,
    /// Derived from catalog compositions because the file was absent.
    Derived,
}

/// Everything the engine needs, loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub catalog: Catalog,
    pub allergens: AllergenList,
    pub allergen_source: AllergenSource,
    /// Recorded cases; `None` when the clinical file is absent.
    pub cases: Option<Vec<ClinicalCase>>,
}

/// Loads the catalog, substitute table, allergens and clinical cases.
///
/// The medication and substitute files are required. A missing allergen
/// file falls back to a vocabulary derived from compositions, and a missing
/// clinical file leaves `cases` empty.
pub fn load_dataset(paths: &DatasetPaths) -> Result<Dataset> {
    for required in [&paths.medications, &paths.substitutes] {
        if !required.is_file() {
            bail!("dataset file not found: {}", required.display());
        }
    }
    let medications = load_medications(&paths.medications)
        .with_context(|| format!("load medications from {}", paths.medications.display()))?;
    let substitutes = load_substitutes(&paths.substitutes)
        .with_context(|| format!("load substitutes from {}", paths.substitutes.display()))?;
    let catalog = Catalog::new(medications.records, substitutes);
    if catalog.duplicate_count() > 0 {
        warn!(
            duplicates = catalog.duplicate_count(),
            "duplicate medication names ignored"
        );
    }

    let (allergens, allergen_source) = if paths.allergens.is_file() {
        let allergens = load_allergens(&paths.allergens)
            .with_context(|| format!("load allergens from {}", paths.allergens.display()))?;
        (allergens, AllergenSource::File)
    } else {
        warn!(
            path = %paths.allergens.display(),
            "allergen file not found, deriving vocabulary from compositions"
        );
        let derived = AllergenList::from_compositions(
            catalog
                .records()
                .iter()
                .map(|record| record.composition.as_str()),
        );
        (derived, AllergenSource::Derived)
    };

    let cases = if paths.clinical.is_file() {
        Some(
            load_clinical_cases(&paths.clinical).with_context(|| {
                format!("load clinical cases from {}", paths.clinical.display())
            })?,
        )
    } else {
        None
    };

    info!(
        medications = catalog.len(),
        substitutes = catalog.substitutes().len(),
        allergens = allergens.len(),
        cases = cases.as_ref().map_or(0, Vec::len),
        "dataset ready"
    );
    Ok(Dataset {
        catalog,
        allergens,
        allergen_source,
        cases,
    })
}

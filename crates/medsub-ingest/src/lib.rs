pub mod allergens;
pub mod clinical;
pub mod csv_table;
pub mod dataset;
pub mod medications;
pub mod substitutes;

pub use allergens::load_allergens;
pub use clinical::{ClinicalCase, load_clinical_cases};
pub use csv_table::{CsvTable, header_key, read_csv_table};
pub use dataset::{AllergenSource, Dataset, DatasetPaths, load_dataset};
pub use medications::{MedicationLoad, load_medications};
pub use substitutes::load_substitutes;

use std::fs;
use std::path::{Path, PathBuf};

use medsub_ingest::{
    AllergenSource, DatasetPaths, load_allergens, load_clinical_cases, load_dataset,
    load_medications, load_substitutes, read_csv_table,
};
use medsub_model::MedsubError;

const MEDICATIONS: &str = "\u{feff}medicamento,composicion,usos,efectos_secundarios,review_excelente,efectos_secundarios_detallados,usos_clinicos_ext,Clase Química,clase_terapeutica
Amoxil 500,Amoxicillin (500mg),Bacterial infections,Nausea,82,Diarrhea,bronchitis pneumonia,Penicillin,Antibiotic
Empty Composition,,x,x,50,x,x,x,x
Azee 500,Azithromycin (500mg),Bacterial infections,n/a,high,-,,Macrolide,Antibiotic
";

const SUBSTITUTES: &str = "medicamento_en,medicamento_principal,sustituto1_en,sustituto1_es,sustituto2_en,sustituto2_es,sustituto3_en,sustituto3_es
Amoxil 500,Amoxil 500 Cápsula,Azee 500,Azee 500 Tableta,Ghost,,Azee 500,Azee Tableta
,Nameless,A,B,,,,
";

fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dir");
    }
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn reads_table_with_padding_and_bom() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(dir.path(), "t.csv", "\u{feff}A , B,C\n\n1,x\n");
    let table = read_csv_table(&path).expect("read csv");
    assert_eq!(table.headers, vec!["A", "B", "C"]);
    assert_eq!(table.rows, vec![vec!["1", "x", ""]]);
    assert_eq!(table.column_index("c"), Some(2));
}

#[test]
fn loads_medications_skipping_rows_without_composition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(dir.path(), "meds.csv", MEDICATIONS);
    let load = load_medications(&path).expect("load medications");
    assert_eq!(load.records.len(), 2);
    assert_eq!(load.skipped, 1);

    let amoxil = &load.records[0];
    assert_eq!(amoxil.review_excellent, 82.0);
    assert_eq!(amoxil.chemical_class.as_deref(), Some("Penicillin"));
    assert_eq!(amoxil.therapeutic_class.as_deref(), Some("Antibiotic"));
    assert_eq!(amoxil.indications_extended.as_deref(), Some("bronchitis pneumonia"));

    let azee = &load.records[1];
    assert_eq!(azee.review_excellent, 0.0);
    assert_eq!(azee.side_effects, None);
    assert_eq!(azee.side_effects_detailed, None);
    assert_eq!(azee.indications_extended, None);
}

#[test]
fn missing_required_column_is_typed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(dir.path(), "meds.csv", "medicamento,usos\nA,B\n");
    let err = load_medications(&path).expect_err("composition missing");
    let typed = err.downcast_ref::<MedsubError>().expect("medsub error");
    assert!(matches!(typed, MedsubError::MissingColumn { column, .. } if column == "composicion"));
}

#[test]
fn loads_substitutes_with_deduplication() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(dir.path(), "subs.csv", SUBSTITUTES);
    let table = load_substitutes(&path).expect("load substitutes");
    assert_eq!(table.len(), 1);
    let pairs = table.pairs_for("Amoxil 500");
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].canonical_name, "Azee 500");
    assert_eq!(pairs[0].local_name, "Azee Tableta");
    assert_eq!(table.canonical_for("Amoxil 500 Capsula"), Some("Amoxil 500"));
}

#[test]
fn loads_allergens_and_cases() {
    let dir = tempfile::tempdir().expect("tempdir");
    let allergens = write(
        dir.path(),
        "a.csv",
        "posibles_alergenos\namoxicilina\nAmoxicilina\nna\ncefalexina\n",
    );
    let list = load_allergens(&allergens).expect("load allergens");
    assert_eq!(list.len(), 2);

    let cases = write(
        dir.path(),
        "c.csv",
        "notas,diagnostico,medication\nallergic to amoxicillin,bronchitis,Amoxil 500\ncough,,Azee 500\nno drug,acne,\n",
    );
    let cases = load_clinical_cases(&cases).expect("load cases");
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0].notes, "allergic to amoxicillin");
    assert_eq!(cases[1].diagnosis, "unspecified");
}

#[test]
fn dataset_derives_allergens_when_file_is_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "BaseConocimiento/medicamentos_info.csv", MEDICATIONS);
    write(dir.path(), "BaseConocimiento/sustitutos_medicamentos.csv", SUBSTITUTES);
    let paths = DatasetPaths::from_data_dir(dir.path());
    let dataset = load_dataset(&paths).expect("load dataset");
    assert_eq!(dataset.catalog.len(), 2);
    assert_eq!(dataset.allergen_source, AllergenSource::Derived);
    let names: Vec<&str> = dataset
        .allergens
        .iter()
        .map(|term| term.normalized.as_str())
        .collect();
    assert_eq!(names, vec!["amoxicillin", "azithromycin"]);
    assert!(dataset.cases.is_none());
}

#[test]
fn dataset_requires_medication_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = DatasetPaths::from_data_dir(dir.path());
    let err = load_dataset(&paths).expect_err("missing files");
    assert!(err.to_string().contains("medicamentos_info.csv"));
}

use medsub_model::{Catalog, MedicationRecord, SubstituteEntry, SubstituteTable};

fn slot(local: &str, canonical: &str) -> (Option<String>, Option<String>) {
    (Some(local.to_string()), Some(canonical.to_string()))
}

fn catalog() -> Catalog {
    let substitutes = SubstituteTable::new(vec![
        SubstituteEntry::new(
            "Amoxil 500",
            Some("Amoxil 500 Cápsula".to_string()),
            vec![slot("Cefalexina 500", "Cephalexin 500"), slot("Mox 500", "Mox 500")],
        ),
        SubstituteEntry::new("amoxil 500", Some("Ignored".to_string()), Vec::new()),
    ]);
    Catalog::new(
        vec![
            MedicationRecord::new("Amoxil 500", "Amoxicillin (500mg)")
                .with_therapeutic_class("Antibiotic"),
            MedicationRecord::new("Cephalexin 500", "Cefalexina (500mg)")
                .with_therapeutic_class("Antibiotic"),
        ],
        substitutes,
    )
}

#[test]
fn substitutes_are_reachable_through_the_catalog() {
    let catalog = catalog();
    let pairs = catalog.substitutes_for("AMOXIL 500");
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].local_name, "Cefalexina 500");
    assert_eq!(catalog.local_name("Amoxil 500"), Some("Amoxil 500 Cápsula"));
    assert_eq!(catalog.substitutes().len(), 1);
}

#[test]
fn local_names_map_back_to_canonical() {
    let catalog = catalog();
    let canonical = catalog
        .substitutes()
        .canonical_for("amoxil 500 capsula")
        .expect("local name resolves");
    assert_eq!(canonical, "Amoxil 500");
    let entry = catalog.get(canonical).expect("catalog record");
    assert_eq!(entry.normalized.principal_component, "amoxicillin");
}

#[test]
fn entries_preserve_catalog_order() {
    let catalog = catalog();
    let names: Vec<&str> = catalog.entries().map(|entry| entry.record.name.as_str()).collect();
    assert_eq!(names, vec!["Amoxil 500", "Cephalexin 500"]);
    assert!(catalog.entry(2).is_none());
}

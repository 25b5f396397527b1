#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::fs;
use std::path::PathBuf;

use paramlist::{ParameterStore, Value};

fn tmp_file_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("paramlist_{}_{name}", std::process::id()))
}

fn populated_store() -> ParameterStore {
    let mut store = ParameterStore::new("Machine");
    store.create_list("Run").unwrap();
    store.add_parameter("Run", "steps", 100).unwrap();
    store.add_parameter("Run", "dt", 0.001).unwrap();
    store.add_parameter("Run", "verbose", false).unwrap();
    store.add_parameter("Run", "label", "baseline").unwrap();

    store.create_list("Grid").unwrap();
    store.add_child("Grid", "extent", "xMin", -1.0).unwrap();
    store.add_child("Grid", "extent", "xMax", 1.0).unwrap();
    store.add_child("Grid", "extent", "panels", 16).unwrap();
    store
}

#[test]
fn string_roundtrip_preserves_values_and_order() {
    let store = populated_store();
    let xml = store.to_xml_string().unwrap();
    let reparsed = ParameterStore::parse(&xml).unwrap();

    assert_eq!(reparsed.root_name(), "Machine");
    assert_eq!(reparsed.list_names(), ["Run", "Grid"]);
    assert_eq!(
        reparsed.names("Run").unwrap(),
        ["steps", "dt", "verbose", "label"]
    );
    assert_eq!(reparsed.value("Run", "steps").unwrap(), Value::Int(100));
    assert_eq!(reparsed.value("Run", "dt").unwrap(), Value::Float(0.001));
    assert_eq!(
        reparsed.value("Run", "verbose").unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        reparsed.value("Run", "label").unwrap(),
        Value::Str("baseline".into())
    );
    assert_eq!(
        reparsed.child_names("Grid", "extent").unwrap(),
        ["xMin", "xMax", "panels"]
    );
    assert_eq!(
        reparsed.child_values("Grid", "extent", "panels").unwrap(),
        [Value::Int(16)]
    );
}

#[test]
fn roundtrip_is_stable_after_one_pass() {
    // A second serialize of the reparsed tree reproduces the first output
    // byte for byte.
    let store = populated_store();
    let first = store.to_xml_string().unwrap();
    let second = ParameterStore::parse(&first)
        .unwrap()
        .to_xml_string()
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn roundtrip_keeps_comments_and_text() {
    let input = r#"<?xml version="1.0" encoding="UTF-8"?>
<Root>
    <!-- configuration for the solver -->
    <Solver>
        <method type="string" value="cg"/>
        <notes>converges slowly above 1e6 unknowns</notes>
    </Solver>
</Root>"#;

    let store = ParameterStore::parse(input).unwrap();
    let xml = store.to_xml_string().unwrap();
    assert!(xml.contains("<!-- configuration for the solver -->"));

    let reparsed = ParameterStore::parse(&xml).unwrap();
    assert_eq!(
        reparsed.text("Solver", "notes").unwrap(),
        "converges slowly above 1e6 unknowns"
    );
    assert_eq!(
        reparsed.value("Solver", "method").unwrap(),
        Value::Str("cg".into())
    );
}

#[test]
fn roundtrip_all_families_through_file() {
    let path = tmp_file_path("roundtrip.xml");
    let store = populated_store();
    store.save(&path).unwrap();

    let loaded = ParameterStore::load(&path).unwrap();
    assert_eq!(loaded, store);

    let _ = fs::remove_file(path);
}

#[test]
fn load_missing_file_is_an_io_error() {
    let result = ParameterStore::load("definitely_not_here.xml");
    assert!(matches!(result, Err(paramlist::Error::Io(_))));
}

#[test]
fn float_precision_survives_roundtrip() {
    let mut store = ParameterStore::new("Root");
    store.create_list("Num").unwrap();
    let third = 1.0 / 3.0;
    store.add_parameter("Num", "third", third).unwrap();
    store.add_parameter("Num", "avogadro", 6.02214076e23).unwrap();
    store.add_parameter("Num", "tiny", -1.5e-12).unwrap();

    let reparsed = ParameterStore::parse(&store.to_xml_string().unwrap()).unwrap();
    assert_eq!(reparsed.value("Num", "third").unwrap(), Value::Float(third));
    assert_eq!(
        reparsed.value("Num", "avogadro").unwrap(),
        Value::Float(6.02214076e23)
    );
    assert_eq!(
        reparsed.value("Num", "tiny").unwrap(),
        Value::Float(-1.5e-12)
    );
}

#[test]
fn declaration_header_present() {
    let store = ParameterStore::new("Root");
    let xml = store.to_xml_string().unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
}

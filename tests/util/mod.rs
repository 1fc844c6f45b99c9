use flexstr::ToSharedStr;
use serde_json::Value;

use combattb::model::*;
use combattb::types::{NodeId, Properties};
use combattb::{canonical_schema, GraphStore, SchemaRegistry};

#[allow(dead_code)]
pub fn props(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        _ => panic!("not an object: {}", value),
    }
}

#[allow(dead_code)]
pub fn get_test_store() -> (SchemaRegistry, GraphStore) {
    let registry = canonical_schema().unwrap();
    let mut store = GraphStore::open_in_memory().unwrap();
    store.init().unwrap();
    (registry, store)
}

#[allow(dead_code)]
pub fn make_test_organism(store: &mut GraphStore, registry: &SchemaRegistry) -> NodeId {
    let mut organism = Organism::new("Mycobacterium", "tuberculosis", "M. tuberculosis");
    organism.strain = Some("H37Rv".to_shared_str());
    store.create_entity(registry, &organism).unwrap()
}

#[allow(dead_code)]
pub fn make_test_chromosome(store: &mut GraphStore, registry: &SchemaRegistry,
                            uniquename: &str, residues: &str) -> NodeId {
    let chromosome = Feature::new(uniquename, FeatureDetails::Chromosome)
        .with_residues(residues);
    store.create_entity(registry, &chromosome).unwrap()
}

#[allow(dead_code)]
pub fn make_test_gene(store: &mut GraphStore, registry: &SchemaRegistry,
                      uniquename: &str, name: Option<&str>) -> NodeId {
    let mut gene = Feature::new(uniquename, FeatureDetails::gene());
    if let Some(name) = name {
        gene = gene.with_name(name);
    }
    store.create_entity(registry, &gene).unwrap()
}

#[allow(dead_code)]
pub fn make_test_location(store: &mut GraphStore, registry: &SchemaRegistry,
                          location_key: &str, start: i64, end: i64, strand: Strand,
                          rank: Option<i64>) -> NodeId {
    let mut location = Location::new(location_key, start, end, strand).unwrap();
    location.rank = rank;
    store.create_entity(registry, &location).unwrap()
}

extern crate combattb;

mod util;

use serde_json::json;

use combattb::constants::*;
use combattb::model::*;
use combattb::schema::{Cardinality, Record};
use combattb::SchemaError;

use util::*;

#[test]
fn test_create_and_read_back() {
    let (registry, mut store) = get_test_store();

    let gene = Feature::new("Rv0001", FeatureDetails::gene()).with_name("dnaA");
    let gene_id = store.create_entity(&registry, &gene).unwrap();

    let node = store.node(gene_id).unwrap();
    assert_eq!(node.record.kind, "Gene");
    assert_eq!(node.record.get_str("name"), Some("dnaA"));

    let stored_gene: Feature = store.entity(gene_id).unwrap();
    assert_eq!(stored_gene, gene);
    assert_eq!(stored_gene.so_id(), "SO:0000704");
}

#[test]
fn test_missing_required_field_creates_nothing() {
    let (registry, mut store) = get_test_store();

    let record = Record::new("Gene", props(json!({"name": "dnaA"})));

    match store.create(&registry, record) {
        Err(SchemaError::ValidationError { field, .. }) => assert_eq!(field, "uniquename"),
        other => panic!("expected ValidationError, got {:?}", other),
    }

    assert!(store.nodes_of_kind(&registry, FEATURE).unwrap().is_empty());
}

#[test]
fn test_uniqueness_across_feature_kinds() {
    let (registry, mut store) = get_test_store();

    make_test_gene(&mut store, &registry, "Rv0001", None);

    let exon = Feature::new("Rv0001", FeatureDetails::Exon);
    match store.create_entity(&registry, &exon) {
        Err(SchemaError::UniquenessViolation { kind, field, value }) => {
            assert_eq!(kind, "Exon");
            assert_eq!(field, "uniquename");
            assert_eq!(value, "Rv0001");
        },
        other => panic!("expected UniquenessViolation, got {:?}", other),
    }

    assert_eq!(store.nodes_of_kind(&registry, FEATURE).unwrap().len(), 1);
    assert!(store.nodes_of_kind(&registry, "Exon").unwrap().is_empty());
}

#[test]
fn test_unique_values() {
    let (registry, mut store) = get_test_store();

    let publication = Publication::new("PMID:9634230", "Deciphering the biology of \
                                        Mycobacterium tuberculosis from the complete \
                                        genome sequence", 1998);
    store.create_entity(&registry, &publication).unwrap();
    assert!(store.create_entity(&registry, &publication).is_err());

    // absent optional unique fields aren't indexed
    store.create_entity(&registry, &GalaxyUser::default()).unwrap();
    store.create_entity(&registry, &GalaxyUser::default()).unwrap();

    let xref = DbXref::new("UniProtKB", "P9WNW3");
    store.create_entity(&registry, &xref).unwrap();
    store.create_entity(&registry, &DbXref::new("RefSeq", "P9WNW3")).unwrap();
    match store.create_entity(&registry, &xref) {
        Err(SchemaError::UniquenessViolation { field, .. }) => assert_eq!(field, "db+accession"),
        other => panic!("expected UniquenessViolation, got {:?}", other),
    }
}

#[test]
fn test_find_by_unique() {
    let (registry, mut store) = get_test_store();

    let gene_id = make_test_gene(&mut store, &registry, "Rv0001", Some("dnaA"));

    assert_eq!(store.find_by_unique(&registry, FEATURE, "uniquename", &json!("Rv0001"))
               .unwrap(), Some(gene_id));
    assert_eq!(store.find_by_unique(&registry, "Gene", "uniquename", &json!("Rv0001"))
               .unwrap(), Some(gene_id));
    // found in the Feature scope but it isn't an Exon
    assert_eq!(store.find_by_unique(&registry, "Exon", "uniquename", &json!("Rv0001"))
               .unwrap(), None);
    assert_eq!(store.find_by_unique(&registry, "Gene", "uniquename", &json!("Rv9999"))
               .unwrap(), None);

    assert!(store.find_by_unique(&registry, "Gene", "name", &json!("dnaA")).is_err());
}

#[test]
fn test_relate_and_neighbours() {
    let (registry, mut store) = get_test_store();

    let organism_id = make_test_organism(&mut store, &registry);
    let gene_id = make_test_gene(&mut store, &registry, "Rv0001", None);
    let transcript = Feature::new("Rv0001.1",
                                  FeatureDetails::transcript(TranscriptBiotype::ProteinCoding));
    let transcript_id = store.create_entity(&registry, &transcript).unwrap();
    let exon_1_id = store.create_entity(&registry, &Feature::new("Rv0001.1:exon:1",
                                                                 FeatureDetails::Exon))
        .unwrap();
    let exon_2_id = store.create_entity(&registry, &Feature::new("Rv0001.1:exon:2",
                                                                 FeatureDetails::Exon))
        .unwrap();

    store.relate(&registry, gene_id, "belongs_to", organism_id).unwrap();
    store.relate(&registry, transcript_id, "part_of", gene_id).unwrap();
    store.relate(&registry, exon_2_id, "part_of", transcript_id).unwrap();
    // declared on the Transcript side, stored as exon -[PART_OF]-> transcript
    store.relate(&registry, transcript_id, "exons", exon_1_id).unwrap();

    let exons = store.neighbours(&registry, transcript_id, "exons").unwrap();
    let exon_ids: Vec<_> = exons.iter().map(|(_, node)| node.id).collect();
    assert_eq!(exon_ids, vec![exon_2_id, exon_1_id]);

    let parents = store.neighbours(&registry, exon_1_id, "part_of").unwrap();
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].1.id, transcript_id);

    // the transcript's PART_OF edge to the gene isn't an exon
    assert_eq!(store.relationship_count(&registry, transcript_id, "exons").unwrap(), 2);
    assert_eq!(store.relationship_count(&registry, gene_id, "transcripts").unwrap(), 1);

    store.validate_relationship_count(&registry, exon_1_id, "part_of").unwrap();
    store.validate_relationship_count(&registry, gene_id, "belongs_to").unwrap();
}

#[test]
fn test_relate_wrong_endpoint() {
    let (registry, mut store) = get_test_store();

    let gene_id = make_test_gene(&mut store, &registry, "Rv0001", None);
    let other_gene_id = make_test_gene(&mut store, &registry, "Rv0002", None);

    match store.relate(&registry, gene_id, "belongs_to", other_gene_id) {
        Err(SchemaError::EndpointMismatch { label, endpoint, kind, expected }) => {
            assert_eq!(label, BELONGS_TO);
            assert_eq!(endpoint, "target");
            assert_eq!(kind, "Gene");
            assert_eq!(expected, ORGANISM);
        },
        other => panic!("expected EndpointMismatch, got {:?}", other),
    }

    match store.relate(&registry, gene_id, "no_such_relationship", other_gene_id) {
        Err(SchemaError::UnknownRelationshipLabel { .. }) => (),
        other => panic!("expected UnknownRelationshipLabel, got {:?}", other),
    }

    // Feature.orthologous_to accepts any Feature
    store.relate(&registry, gene_id, "orthologous_to", other_gene_id).unwrap();
}

#[test]
fn test_relate_past_upper_bound() {
    let (registry, mut store) = get_test_store();

    let organism_id = make_test_organism(&mut store, &registry);
    let other_organism = Organism::new("Mycobacterium", "bovis", "M. bovis");
    let other_organism_id = store.create_entity(&registry, &other_organism).unwrap();
    let gene_id = make_test_gene(&mut store, &registry, "Rv0001", None);

    store.relate(&registry, gene_id, "belongs_to", organism_id).unwrap();

    match store.relate(&registry, gene_id, "belongs_to", other_organism_id) {
        Err(SchemaError::CardinalityViolation { kind, name, label, expected, actual }) => {
            assert_eq!(kind, "Gene");
            assert_eq!(name, "belongs_to");
            assert_eq!(label, BELONGS_TO);
            assert_eq!(expected, Cardinality::One);
            assert_eq!(actual, 2);
        },
        other => panic!("expected CardinalityViolation, got {:?}", other),
    }
    assert_eq!(store.relationship_count(&registry, gene_id, "belongs_to").unwrap(), 1);

    let first_transcript =
        Feature::new("Rv0001.1", FeatureDetails::transcript(TranscriptBiotype::ProteinCoding));
    let first_transcript_id = store.create_entity(&registry, &first_transcript).unwrap();
    let second_transcript =
        Feature::new("Rv0001.2", FeatureDetails::transcript(TranscriptBiotype::ProteinCoding));
    let second_transcript_id = store.create_entity(&registry, &second_transcript).unwrap();
    let cds_id = store.create_entity(&registry, &Feature::new("Rv0001.1:cds", FeatureDetails::Cds))
        .unwrap();

    store.relate(&registry, cds_id, "part_of", first_transcript_id).unwrap();

    assert!(matches!(store.relate(&registry, cds_id, "part_of", second_transcript_id),
                     Err(SchemaError::CardinalityViolation { .. })));

    // the same edge declared from the Transcript end is refused too
    match store.relate(&registry, second_transcript_id, "cds", cds_id) {
        Err(SchemaError::CardinalityViolation { kind, name, actual, .. }) => {
            assert_eq!(kind, "CDS");
            assert_eq!(name, "part_of");
            assert_eq!(actual, 2);
        },
        other => panic!("expected CardinalityViolation, got {:?}", other),
    }

    assert_eq!(store.relationship_count(&registry, cds_id, "part_of").unwrap(), 1);
    assert_eq!(store.relationship_count(&registry, second_transcript_id, "cds").unwrap(), 0);
    store.validate_relationship_count(&registry, cds_id, "part_of").unwrap();
}

#[test]
fn test_publication_needs_authors() {
    let (registry, mut store) = get_test_store();

    let publication = Publication::new("PMID:9634230", "M. tuberculosis genome", 1998);
    let publication_id = store.create_entity(&registry, &publication).unwrap();

    match store.check_cardinalities(&registry, publication_id) {
        Err(SchemaError::CardinalityViolation { kind, name, label, expected, actual }) => {
            assert_eq!(kind, PUBLICATION);
            assert_eq!(name, "author");
            assert_eq!(label, WROTE);
            assert_eq!(expected, Cardinality::OneOrMore);
            assert_eq!(actual, 0);
        },
        other => panic!("expected CardinalityViolation, got {:?}", other),
    }

    let author_id = store.create_entity(&registry, &Author::new("Cole", "S. T.")).unwrap();
    store.relate(&registry, author_id, "wrote", publication_id).unwrap();

    store.check_cardinalities(&registry, publication_id).unwrap();
    store.check_cardinalities(&registry, author_id).unwrap();
}

#[test]
fn test_gene_needs_organism() {
    let (registry, mut store) = get_test_store();

    let gene_id = make_test_gene(&mut store, &registry, "Rv0001", None);

    match store.check_cardinalities(&registry, gene_id) {
        Err(SchemaError::CardinalityViolation { name, expected, .. }) => {
            assert_eq!(name, "belongs_to");
            assert_eq!(expected, Cardinality::One);
        },
        other => panic!("expected CardinalityViolation, got {:?}", other),
    }
}

#[test]
fn test_nodes_of_kind() {
    let (registry, mut store) = get_test_store();

    let gene_id = make_test_gene(&mut store, &registry, "Rv0001", None);
    let trna_id = store.create_entity(&registry, &Feature::new("MTB000019", FeatureDetails::Trna))
        .unwrap();
    let exon_id = store.create_entity(&registry, &Feature::new("Rv0001.1:exon:1",
                                                               FeatureDetails::Exon))
        .unwrap();
    make_test_organism(&mut store, &registry);

    assert_eq!(store.nodes_of_kind(&registry, FEATURE).unwrap(),
               vec![gene_id, trna_id, exon_id]);
    assert_eq!(store.nodes_of_kind(&registry, TRANSCRIBED).unwrap(),
               vec![gene_id, trna_id]);
    assert_eq!(store.nodes_of_kind(&registry, EXTERNALLY_DESCRIBABLE).unwrap().len(), 4);

    match store.nodes_of_kind(&registry, "Plasmid") {
        Err(SchemaError::UnknownEntityKind(kind)) => assert_eq!(kind, "Plasmid"),
        other => panic!("expected UnknownEntityKind, got {:?}", other),
    }
}

#[test]
fn test_variant_graph() {
    let (registry, mut store) = get_test_store();

    let vset = VariantSet::new("tb-outbreak", Some("alice"), Some("h-1"), None);
    let vset_id = store.create_entity(&registry, &vset).unwrap();
    let user_id = store.create_entity(&registry, &GalaxyUser::default()).unwrap();
    let callset_id = store.create_entity(&registry, &CallSet::new("sample1.vcf")).unwrap();
    let site = VariantSite::new("NC_000962.3", "761155", "C", "T", "tb-outbreak:761155");
    let site_id = store.create_entity(&registry, &site).unwrap();
    let drug_id = store.create_entity(&registry, &Drug::new("DB01045", Some("Rifampicin")))
        .unwrap();

    store.relate(&registry, user_id, "owns", vset_id).unwrap();
    store.relate(&registry, callset_id, "has_calls_in", vset_id).unwrap();
    store.relate(&registry, vset_id, "has_variant", site_id).unwrap();
    store.relate(&registry, site_id, "resistant_to", drug_id).unwrap();

    assert_eq!(store.relationship_count(&registry, vset_id, "owned_by").unwrap(), 1);
    assert_eq!(store.relationship_count(&registry, vset_id, "callsets").unwrap(), 1);

    let stored: VariantSet = store.entity(vset_id).unwrap();
    assert_eq!(stored.vset_id, combattb::ids::derive_dns_id("tb-outbreak"));

    // same name, same derived id
    let again = VariantSet::new("tb-outbreak-2", None, None, Some(stored.vset_id));
    match store.create_entity(&registry, &again) {
        Err(SchemaError::UniquenessViolation { field, .. }) => assert_eq!(field, "vset_id"),
        other => panic!("expected UniquenessViolation, got {:?}", other),
    }
}

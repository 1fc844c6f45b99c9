extern crate combattb;

mod util;

use combattb::model::*;
use combattb::SchemaError;

use util::*;

#[test]
fn test_residues_from_chromosome() {
    let (registry, mut store) = get_test_store();

    let chromosome_id = make_test_chromosome(&mut store, &registry, "NC_000962.3", "AACCGGTT");
    let forward_gene_id = make_test_gene(&mut store, &registry, "Rv0001", None);
    let reverse_gene_id = make_test_gene(&mut store, &registry, "Rv0002c", None);

    let forward_loc_id = make_test_location(&mut store, &registry, "Rv0001:loc",
                                            0, 4, Strand::Forward, None);
    let reverse_loc_id = make_test_location(&mut store, &registry, "Rv0002c:loc",
                                            0, 4, Strand::Reverse, None);

    store.relate(&registry, forward_gene_id, "located_on", chromosome_id).unwrap();
    store.relate(&registry, forward_gene_id, "location", forward_loc_id).unwrap();
    store.relate(&registry, reverse_gene_id, "located_on", chromosome_id).unwrap();
    store.relate(&registry, reverse_gene_id, "location", reverse_loc_id).unwrap();

    assert_eq!(store.get_residues(&registry, forward_gene_id, 0, 0).unwrap(), "AACC");
    assert_eq!(store.get_residues(&registry, reverse_gene_id, 0, 0).unwrap(), "GGTT");

    // downstream extends the forward feature to the right
    assert_eq!(store.get_residues(&registry, forward_gene_id, 2, 2).unwrap(), "AACCGG");

    // the chromosome is a top level feature
    assert_eq!(store.get_residues(&registry, chromosome_id, 3, 3).unwrap(), "AACCGGTT");

    assert_eq!(store.relationship_count(&registry, chromosome_id, "features").unwrap(), 2);
}

#[test]
fn test_own_residues() {
    let (registry, mut store) = get_test_store();

    let contig = Feature::new("contig_1", FeatureDetails::Contig).with_residues("ACGTACGT");
    let contig_id = store.create_entity(&registry, &contig).unwrap();

    let stored = store.node(contig_id).unwrap();
    assert_eq!(stored.record.get_str("md5checksum"),
               Some(format!("{:x}", md5::compute("ACGTACGT")).as_str()));
    assert_eq!(stored.record.get("seqlen").and_then(|v| v.as_i64()), Some(8));

    let location_id = make_test_location(&mut store, &registry, "contig_1:loc",
                                         2, 6, Strand::Forward, None);
    store.relate(&registry, contig_id, "location", location_id).unwrap();

    assert_eq!(store.get_residues(&registry, contig_id, 0, 0).unwrap(), "GTAC");
}

#[test]
fn test_no_residues_anywhere() {
    let (registry, mut store) = get_test_store();

    let gene_id = make_test_gene(&mut store, &registry, "Rv0001", None);
    let location_id = make_test_location(&mut store, &registry, "Rv0001:loc",
                                         0, 4, Strand::Forward, None);
    store.relate(&registry, gene_id, "location", location_id).unwrap();

    assert_eq!(store.get_residues(&registry, gene_id, 0, 0).unwrap(), "");
}

#[test]
fn test_lowest_ranked_location_is_used() {
    let (registry, mut store) = get_test_store();

    let chromosome_id = make_test_chromosome(&mut store, &registry, "NC_000962.3", "AACCGGTT");
    let gene_id = make_test_gene(&mut store, &registry, "Rv0001", None);
    store.relate(&registry, gene_id, "located_on", chromosome_id).unwrap();

    let unranked_id = make_test_location(&mut store, &registry, "loc-a",
                                         0, 2, Strand::Forward, None);
    let rank_1_id = make_test_location(&mut store, &registry, "loc-b",
                                       2, 4, Strand::Forward, Some(1));
    let rank_0_id = make_test_location(&mut store, &registry, "loc-c",
                                       4, 6, Strand::Forward, Some(0));

    store.relate(&registry, gene_id, "location", unranked_id).unwrap();
    store.relate(&registry, gene_id, "location", rank_1_id).unwrap();
    assert_eq!(store.get_residues(&registry, gene_id, 0, 0).unwrap(), "CC");

    store.relate(&registry, gene_id, "location", rank_0_id).unwrap();
    assert_eq!(store.get_residues(&registry, gene_id, 0, 0).unwrap(), "GG");
}

#[test]
fn test_large_rank_and_phase() {
    use serde_json::json;

    use combattb::schema::Record;

    let (registry, mut store) = get_test_store();

    let chromosome_id = make_test_chromosome(&mut store, &registry, "NC_000962.3", "AACCGGTT");
    let gene_id = make_test_gene(&mut store, &registry, "Rv0001", None);
    store.relate(&registry, gene_id, "located_on", chromosome_id).unwrap();

    let big = i64::from(i32::MAX) + 1;
    let record = Record::new("Location", props(json!({
        "location_key": "Rv0001:loc", "start": 2, "end": 6, "strand": "1",
        "rank": big, "phase": big, "locgroup": big,
    })));
    let location_id = store.create(&registry, record).unwrap();
    store.relate(&registry, gene_id, "location", location_id).unwrap();

    let location: Location = store.entity(location_id).unwrap();
    assert_eq!(location.rank, Some(big));
    assert_eq!(store.get_residues(&registry, gene_id, 0, 0).unwrap(), "CCGG");
}

#[test]
fn test_residues_of_non_feature() {
    let (registry, mut store) = get_test_store();

    let organism_id = make_test_organism(&mut store, &registry);

    match store.get_residues(&registry, organism_id, 0, 0) {
        Err(SchemaError::ValidationError { kind, .. }) => assert_eq!(kind, "Organism"),
        other => panic!("expected ValidationError, got {:?}", other),
    }
}

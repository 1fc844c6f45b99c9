use serde_json::json;

use crate::constants::*;
use crate::errors::Result;
use crate::model::FeatureKind;

use super::registry::{Cardinality, Constraint, Direction, EntityDef, FieldDef,
                      SchemaRegistry};

use super::registry::Cardinality::*;
use super::registry::Direction::*;

fn feature_kind_def(kind: FeatureKind) -> EntityDef {
    let def = EntityDef::new(kind.name())
        .parent(kind.parent())
        .so_id(kind.so_id());

    match kind {
        FeatureKind::RepeatRegion => def.field(FieldDef::string("description")),
        FeatureKind::PseudoGene =>
            def.field(FieldDef::string("biotype").choices(&PSEUDOGENE_BIOTYPES)
                      .default_value(json!("pseudogene")))
               .field(FieldDef::string("description")),
        FeatureKind::Gene =>
            def.field(FieldDef::string("biotype").choices(&GENE_BIOTYPES)
                      .default_value(json!("protein_coding")))
               .field(FieldDef::string("description")),
        FeatureKind::Transcript =>
            def.field(FieldDef::string("biotype").required()
                      .choices(&TRANSCRIPT_BIOTYPES)),
        FeatureKind::Protein =>
            def.field(FieldDef::string("family"))
               .field(FieldDef::string("function"))
               .field(FieldDef::string("domain"))
               .field(FieldDef::string("three_d"))
               .field(FieldDef::float("mass"))
               .field(FieldDef::string("entry_name"))
               .field(FieldDef::string("pdb_id")),
        FeatureKind::Operon =>
            def.field(FieldDef::string("description"))
               .field(FieldDef::integer("start"))
               .field(FieldDef::integer("end"))
               .field(FieldDef::string("coverage"))
               .field(FieldDef::boolean("experimentally_validated")),
        FeatureKind::Trna | FeatureKind::NCrna | FeatureKind::Rrna |
        FeatureKind::Exon | FeatureKind::Cds | FeatureKind::Chromosome |
        FeatureKind::Contig => def,
    }
}

fn define_core_entities(registry: &mut SchemaRegistry) -> Result<()> {
    registry.define_entity(EntityDef::new(EXTERNALLY_DESCRIBABLE).abstract_kind())?;

    registry.define_entity(
        EntityDef::new(ORGANISM)
            .parent(EXTERNALLY_DESCRIBABLE)
            .field(FieldDef::string("abbreviation"))
            .field(FieldDef::string("genus").required())
            .field(FieldDef::string("species").required())
            .field(FieldDef::string("strain").unique())
            .field(FieldDef::string("common_name").required())
            .field(FieldDef::string("comment")))?;

    registry.define_entity(
        EntityDef::new(PUBLICATION)
            .field(FieldDef::string("pmid").required().unique())
            .field(FieldDef::string("title").required())
            .field(FieldDef::string("volumetitle"))
            .field(FieldDef::string("volume"))
            .field(FieldDef::string("series_name"))
            .field(FieldDef::string("issue"))
            .field(FieldDef::integer("year").required())
            .field(FieldDef::string("pages"))
            .field(FieldDef::string("miniref"))
            .field(FieldDef::string("uniquename"))
            .field(FieldDef::boolean("is_obsolete").default_value(json!(false)))
            .field(FieldDef::string("publisher"))
            .field(FieldDef::string("pubplace")))?;

    registry.define_entity(
        EntityDef::new(AUTHOR)
            .field(FieldDef::string("editor"))
            .field(FieldDef::string("surname").required().indexed())
            .field(FieldDef::string("givennames").required().indexed())
            .field(FieldDef::string("suffix"))
            .field(FieldDef::integer("rank")))?;

    registry.define_entity(
        EntityDef::new(DBXREF)
            .field(FieldDef::string("accession").required().indexed())
            .field(FieldDef::string("version"))
            .field(FieldDef::string("db").required())
            .field(FieldDef::string("description"))
            .field(FieldDef::string("uri"))
            .constraint(Constraint::unique_together(&["db", "accession"])))?;

    registry.define_entity(
        EntityDef::new(LOCATION)
            .field(FieldDef::string("location_key").required().unique())
            .field(FieldDef::integer("start").required())
            .field(FieldDef::integer("end").required())
            .field(FieldDef::string("strand").required().choices(&STRAND_CHOICES))
            .field(FieldDef::boolean("is_fmin_partial"))
            .field(FieldDef::boolean("is_fmax_partial"))
            .field(FieldDef::integer("phase"))
            .field(FieldDef::string("residue_info"))
            .field(FieldDef::integer("locgroup"))
            .field(FieldDef::integer("rank"))
            .constraint(Constraint::start_not_after_end("start", "end")))?;

    Ok(())
}

fn define_feature_entities(registry: &mut SchemaRegistry) -> Result<()> {
    registry.define_entity(
        EntityDef::new(FEATURE)
            .parent(EXTERNALLY_DESCRIBABLE)
            .abstract_kind()
            .field(FieldDef::string("name"))
            .field(FieldDef::string("uniquename").required().unique())
            .field(FieldDef::string("residues"))
            .field(FieldDef::integer("seqlen"))
            .field(FieldDef::string("md5checksum"))
            .field(FieldDef::boolean("is_analysis").default_value(json!(false)))
            .field(FieldDef::boolean("is_obsolete").default_value(json!(false)))
            .field(FieldDef::datetime("timeaccessioned"))
            .field(FieldDef::datetime("timelastmodified"))
            .field(FieldDef::string("ontology_id")))?;

    registry.define_entity(EntityDef::new(TRANSCRIBED).parent(FEATURE).abstract_kind())?;

    for kind in FeatureKind::ALL {
        registry.define_entity(feature_kind_def(kind))?;
    }

    Ok(())
}

fn define_term_entities(registry: &mut SchemaRegistry) -> Result<()> {
    registry.define_entity(
        EntityDef::new(GO_TERM)
            .field(FieldDef::string("name").required().unique())
            .field(FieldDef::string("accession").unique())
            .field(FieldDef::string("definition"))
            .field(FieldDef::boolean("is_obsolete").default_value(json!(false)))
            .field(FieldDef::string("namespace").choices(&GO_NAMESPACES)))?;

    registry.define_entity(
        EntityDef::new(INTERPRO_TERM)
            .field(FieldDef::string("name").required().unique())
            .field(FieldDef::string("accession").unique())
            .field(FieldDef::string("definition")))?;

    registry.define_entity(
        EntityDef::new(PATHWAY)
            .field(FieldDef::string("accession").required().unique())
            .field(FieldDef::string("source").required().indexed()
                   .choices(&PATHWAY_SOURCES))
            .field(FieldDef::string("type"))
            .field(FieldDef::string("species"))
            .field(FieldDef::string("class"))
            .field(FieldDef::string("name"))
            .field(FieldDef::string("compartment"))
            .field(FieldDef::string("summation")))?;

    registry.define_entity(
        EntityDef::new(DRUG)
            .field(FieldDef::string("accession").required().unique())
            .field(FieldDef::string("name"))
            .field(FieldDef::string("abbrev"))
            .field(FieldDef::string("synonyms"))
            .field(FieldDef::string("definition"))
            .field(FieldDef::string("class"))
            .field(FieldDef::string("toxicity"))
            .field(FieldDef::string("cost")))?;

    Ok(())
}

fn define_variant_entities(registry: &mut SchemaRegistry) -> Result<()> {
    registry.define_entity(
        EntityDef::new(VARIANT_SET)
            .field(FieldDef::string("name").required().unique())
            .field(FieldDef::string("owner"))
            .field(FieldDef::string("history_id").indexed())
            .field(FieldDef::string("vset_id").unique()))?;

    registry.define_entity(
        EntityDef::new(CALL_SET)
            .field(FieldDef::string("name").required().unique())
            .field(FieldDef::string("vset"))
            .field(FieldDef::string("identifier")))?;

    let mut variant_site = EntityDef::new(VARIANT_SITE)
        .field(FieldDef::string("pk").unique());
    for name in ["pos", "loc_in_seq", "feature_id", "biotype", "chrom", "ref_allele",
                 "alt_allele", "quality", "depth", "consequence", "gene", "gene_id",
                 "known", "novel", "promoter", "impact", "drug", "sources"] {
        variant_site = variant_site.field(FieldDef::string(name));
    }
    registry.define_entity(variant_site)?;

    let mut call = EntityDef::new(CALL).field(FieldDef::string("pk").unique());
    for name in ["genotype", "ref_allele", "alt_allele", "gene", "pos", "impact"] {
        call = call.field(FieldDef::string(name));
    }
    registry.define_entity(call)?;

    registry.define_entity(
        EntityDef::new(FAST_TREE)
            .field(FieldDef::string("name").required().unique())
            .field(FieldDef::string("data").required())
            .field(FieldDef::string("history_id").indexed()))?;

    registry.define_entity(
        EntityDef::new(GALAXY_USER)
            .field(FieldDef::string("user_key").unique())
            .field(FieldDef::string("username"))
            .field(FieldDef::string("email")))?;

    Ok(())
}

// (owner, name, label, other, cardinality, direction)
type RelSpec = (&'static str, &'static str, &'static str, &'static str,
                Cardinality, Direction);

const RELATIONSHIPS: &[RelSpec] = &[
    (EXTERNALLY_DESCRIBABLE, "dbxref", XREF, DBXREF, ZeroOrMore, Outgoing),
    (DBXREF, "refers_to", XREF, EXTERNALLY_DESCRIBABLE, OneOrMore, Incoming),
    (DBXREF, "target", TARGET, "Protein", ZeroOrMore, Outgoing),

    (FEATURE, LOCATION_REL_NAME, LOCATED_AT, LOCATION, ZeroOrMore, Outgoing),
    (FEATURE, "belongs_to", BELONGS_TO, ORGANISM, One, Outgoing),
    (FEATURE, "published_in", PUBLISHED_IN, PUBLICATION, ZeroOrMore, Outgoing),
    (FEATURE, "go_terms", ASSOC_WITH, GO_TERM, ZeroOrMore, Outgoing),
    (FEATURE, "orthologous_to", ORTHOLOGOUS_TO, FEATURE, ZeroOrMore, Outgoing),
    (FEATURE, LOCATED_ON_REL_NAME, LOCATED_ON, FEATURE, ZeroOrMore, Outgoing),

    (TRANSCRIBED, "transcripts", PART_OF, "Transcript", ZeroOrMore, Incoming),
    (TRANSCRIBED, "regulated_by", REGULATES, TRANSCRIBED, ZeroOrMore, Incoming),
    ("Trna", "regulates_gene", REGULATES, "Gene", ZeroOrMore, Outgoing),
    ("NCrna", "regulates_gene", REGULATES, "Gene", ZeroOrMore, Outgoing),
    ("Rrna", "regulates_gene", REGULATES, "Gene", ZeroOrMore, Outgoing),

    ("Gene", "encodes", ENCODES, "Protein", ZeroOrMore, Outgoing),
    ("Gene", "co_regulated", CO_REGULATED, "Gene", ZeroOrMore, Incoming),
    ("Gene", "member_of", MEMBER_OF, "Operon", ZeroOrMore, Incoming),
    ("PseudoGene", "encodes", ENCODES, "Protein", ZeroOrMore, Outgoing),
    ("Operon", "genes", MEMBER_OF, "Gene", ZeroOrMore, Outgoing),

    ("Transcript", "part_of", PART_OF, TRANSCRIBED, ZeroOrMore, Outgoing),
    ("Transcript", "exons", PART_OF, "Exon", ZeroOrMore, Incoming),
    ("Transcript", "cds", PART_OF, "CDS", ZeroOrMore, Incoming),
    ("Exon", "part_of", PART_OF, "Transcript", One, Outgoing),
    ("CDS", "part_of", PART_OF, "Transcript", One, Outgoing),
    ("CDS", "proteins", DERIVES_FROM, "Protein", ZeroOrMore, Incoming),

    ("Protein", "derives_from", DERIVES_FROM, "CDS", One, Outgoing),
    ("Protein", "interacts_with", INTERACTS_WITH, "Protein", ZeroOrMore, Outgoing),
    ("Protein", "interpro_terms", ASSOC_WITH, INTERPRO_TERM, ZeroOrMore, Outgoing),
    ("Protein", "pathways", INVOLVED_IN, PATHWAY, ZeroOrMore, Outgoing),
    ("Protein", "drugs", TARGET, DRUG, ZeroOrMore, Incoming),
    ("Protein", "encoded_by", ENCODES, TRANSCRIBED, ZeroOrMore, Incoming),

    ("Chromosome", "features", LOCATED_ON, FEATURE, ZeroOrMore, Incoming),
    ("Contig", "features", LOCATED_ON, FEATURE, ZeroOrMore, Incoming),

    (GO_TERM, "is_a", IS_A, GO_TERM, ZeroOrMore, Outgoing),
    (GO_TERM, "part_of", PART_OF, GO_TERM, ZeroOrMore, Outgoing),
    (GO_TERM, "regulates", REGULATES, GO_TERM, ZeroOrMore, Outgoing),
    (GO_TERM, "capable_of", CAPABLE_OF, GO_TERM, ZeroOrMore, Outgoing),
    (GO_TERM, "features", ASSOC_WITH, FEATURE, OneOrMore, Incoming),
    (INTERPRO_TERM, "proteins", ASSOC_WITH, "Protein", OneOrMore, Incoming),
    (PATHWAY, "proteins", INVOLVED_IN, "Protein", OneOrMore, Incoming),
    (DRUG, "targets", TARGET, "Protein", ZeroOrMore, Outgoing),

    (PUBLICATION, "author", WROTE, AUTHOR, OneOrMore, Incoming),
    (AUTHOR, "wrote", WROTE, PUBLICATION, ZeroOrMore, Outgoing),

    (VARIANT_SET, "has_variant", HAS_VARIANT, VARIANT_SITE, ZeroOrMore, Outgoing),
    (VARIANT_SET, "has_call", HAS_CALL, CALL, ZeroOrMore, Outgoing),
    (VARIANT_SET, "owned_by", OWNS_SET, GALAXY_USER, ZeroOrMore, Incoming),
    (VARIANT_SET, "forms_tree", FROM_VARIANT_SET, FAST_TREE, ZeroOrMore, Outgoing),
    (VARIANT_SET, "callsets", HAS_CALLS_IN, CALL_SET, ZeroOrMore, Incoming),
    (VARIANT_SITE, "occurs_in", OCCURS_IN, "Gene", ZeroOrMore, Outgoing),
    (VARIANT_SITE, LOCATION_REL_NAME, LOCATED_AT, LOCATION, ZeroOrMore, Outgoing),
    (VARIANT_SITE, "has_call", HAS_CALL, CALL, ZeroOrMore, Outgoing),
    (VARIANT_SITE, "belongs_to_vset", BELONGS_TO_VSET, VARIANT_SET, ZeroOrMore, Outgoing),
    (VARIANT_SITE, "resistant_to", RESISTANT_TO, DRUG, ZeroOrMore, Outgoing),
    (CALL_SET, "has_call", HAS_CALL, CALL, ZeroOrMore, Outgoing),
    (CALL_SET, "has_calls_in", HAS_CALLS_IN, VARIANT_SET, ZeroOrMore, Outgoing),
    (CALL, "associated_with", ASSOC_WITH_VARIANT, VARIANT_SITE, ZeroOrMore, Outgoing),
    (CALL, "belongs_to_cset", BELONGS_TO_CSET, CALL_SET, ZeroOrMore, Outgoing),
    (FAST_TREE, "from_variant_set", FROM_VARIANT_SET, VARIANT_SET, ZeroOrMore, Incoming),
    (GALAXY_USER, "owns", OWNS_SET, VARIANT_SET, ZeroOrMore, Outgoing),
];

/// Build the registry holding every entity kind and relationship of the
/// genome annotation graph.
pub fn canonical_schema() -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();

    define_core_entities(&mut registry)?;
    define_feature_entities(&mut registry)?;
    define_term_entities(&mut registry)?;
    define_variant_entities(&mut registry)?;

    for (owner, name, label, other, cardinality, direction) in RELATIONSHIPS {
        registry.define_relationship(owner, name, label, other, *cardinality, *direction)?;
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_schema_builds() {
        let registry = canonical_schema().unwrap();

        assert!(registry.entity("Gene").is_ok());
        assert!(registry.is_a("Gene", TRANSCRIBED));
        assert!(registry.is_a("Gene", FEATURE));
        assert!(registry.is_a("Gene", EXTERNALLY_DESCRIBABLE));
        assert!(!registry.is_a("Exon", TRANSCRIBED));
        assert_eq!(registry.entity("Gene").unwrap().so_id.as_deref(), Some("SO:0000704"));

        // rebuilding is harmless
        let mut again = canonical_schema().unwrap();
        define_core_entities(&mut again).unwrap();
    }

    #[test]
    fn test_every_feature_kind_has_so_id() {
        let registry = canonical_schema().unwrap();
        for kind in FeatureKind::ALL {
            let def = registry.entity(kind.name()).unwrap();
            assert_eq!(def.so_id.as_deref(), Some(kind.so_id()));
        }
    }
}

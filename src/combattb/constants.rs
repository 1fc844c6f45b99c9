pub const STORE_TABLE_NAMES: &[&str; 3] = &["nodes", "unique_values", "edges"];

// used to derive the id of the reference VariantSet collection
pub const REFERENCE_COLLECTION_NAME: &str = "www.internationalgenome.org";

// entity kinds that aren't feature variants
pub const EXTERNALLY_DESCRIBABLE: &str = "ExternallyDescribable";
pub const ORGANISM: &str = "Organism";
pub const PUBLICATION: &str = "Publication";
pub const AUTHOR: &str = "Author";
pub const DBXREF: &str = "DbXref";
pub const LOCATION: &str = "Location";
pub const FEATURE: &str = "Feature";
pub const TRANSCRIBED: &str = "Transcribed";
pub const GO_TERM: &str = "GoTerm";
pub const INTERPRO_TERM: &str = "InterProTerm";
pub const PATHWAY: &str = "Pathway";
pub const DRUG: &str = "Drug";
pub const VARIANT_SET: &str = "VariantSet";
pub const CALL_SET: &str = "CallSet";
pub const VARIANT_SITE: &str = "VariantSite";
pub const CALL: &str = "Call";
pub const FAST_TREE: &str = "FastTree";
pub const GALAXY_USER: &str = "GalaxyUser";

// edge labels
pub const XREF: &str = "XREF";
pub const LOCATED_AT: &str = "LOCATED_AT";
pub const LOCATED_ON: &str = "LOCATED_ON";
pub const BELONGS_TO: &str = "BELONGS_TO";
pub const PUBLISHED_IN: &str = "PUBLISHED_IN";
pub const ASSOC_WITH: &str = "ASSOC_WITH";
pub const ORTHOLOGOUS_TO: &str = "ORTHOLOGOUS_TO";
pub const PART_OF: &str = "PART_OF";
pub const REGULATES: &str = "REGULATES";
pub const ENCODES: &str = "ENCODES";
pub const CO_REGULATED: &str = "CO_REGULATED";
pub const MEMBER_OF: &str = "MEMBER_OF";
pub const DERIVES_FROM: &str = "DERIVES_FROM";
pub const INTERACTS_WITH: &str = "INTERACTS_WITH";
pub const INVOLVED_IN: &str = "INVOLVED_IN";
pub const TARGET: &str = "TARGET";
pub const IS_A: &str = "IS_A";
pub const CAPABLE_OF: &str = "CAPABLE_OF";
pub const WROTE: &str = "WROTE";
pub const HAS_VARIANT: &str = "HAS_VARIANT";
pub const HAS_CALL: &str = "HAS_CALL";
pub const OWNS_SET: &str = "OWNS_SET";
pub const FROM_VARIANT_SET: &str = "FROM_VARIANT_SET";
pub const HAS_CALLS_IN: &str = "HAS_CALLS_IN";
pub const OCCURS_IN: &str = "OCCURS_IN";
pub const BELONGS_TO_VSET: &str = "BELONGS_TO_VSET";
pub const RESISTANT_TO: &str = "RESISTANT_TO";
pub const ASSOC_WITH_VARIANT: &str = "ASSOC_WITH_VARIANT";
pub const BELONGS_TO_CSET: &str = "BELONGS_TO_CSET";

// the relationship names used by the residue accessor
pub const LOCATION_REL_NAME: &str = "location";
pub const LOCATED_ON_REL_NAME: &str = "located_on";

// choice sets
pub const STRAND_CHOICES: [&str; 2] = ["1", "-1"];
pub const GENE_BIOTYPES: [&str; 1] = ["protein_coding"];
pub const PSEUDOGENE_BIOTYPES: [&str; 1] = ["pseudogene"];
pub const TRANSCRIPT_BIOTYPES: [&str; 5] =
    ["protein_coding", "ncRNA", "tRNA", "rRNA", "pseudogene"];
pub const GO_NAMESPACES: [&str; 3] =
    ["biological_process", "cellular_component", "molecular_function"];
pub const PATHWAY_SOURCES: [&str; 2] = ["kegg", "reactome"];

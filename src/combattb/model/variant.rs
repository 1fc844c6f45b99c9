use flexstr::{SharedStr as FlexStr, ToSharedStr};
use uuid::Uuid;

use crate::constants::*;
use crate::ids::derive_dns_id;
use crate::types::{CallSetName, HistoryId, VariantPk, VariantSetName};

use super::Entity;

// A collection of call sets, eg. the VCF files of one analysis
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VariantSet {
    pub name: VariantSetName,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub owner: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub history_id: Option<HistoryId>,
    pub vset_id: Uuid,
}

impl VariantSet {
    // when vset_id is None it's derived from the name
    pub fn new(name: &str, owner: Option<&str>, history_id: Option<&str>,
               vset_id: Option<Uuid>) -> VariantSet {
        VariantSet {
            name: name.to_shared_str(),
            owner: owner.map(|s| s.to_shared_str()),
            history_id: history_id.map(|s| s.to_shared_str()),
            vset_id: vset_id.unwrap_or_else(|| derive_dns_id(name)),
        }
    }
}

impl Entity for VariantSet {
    const KIND: &'static str = VARIANT_SET;
}

// one VCF file
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CallSet {
    pub name: CallSetName,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub vset: Option<VariantSetName>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub identifier: Option<FlexStr>,
}

impl CallSet {
    pub fn new(name: &str) -> CallSet {
        CallSet {
            name: name.to_shared_str(),
            vset: None,
            identifier: None,
        }
    }
}

impl Entity for CallSet {
    const KIND: &'static str = CALL_SET;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct VariantSite {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub pk: Option<VariantPk>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub pos: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub loc_in_seq: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub feature_id: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub biotype: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub chrom: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub ref_allele: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub alt_allele: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub quality: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub depth: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub consequence: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub gene: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub gene_id: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub known: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub novel: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub promoter: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub impact: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub drug: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub sources: Option<FlexStr>,
}

impl VariantSite {
    pub fn new(chrom: &str, pos: &str, ref_allele: &str, alt_allele: &str, pk: &str)
               -> VariantSite
    {
        VariantSite {
            pk: Some(pk.to_shared_str()),
            pos: Some(pos.to_shared_str()),
            chrom: Some(chrom.to_shared_str()),
            ref_allele: Some(ref_allele.to_shared_str()),
            alt_allele: Some(alt_allele.to_shared_str()),
            ..VariantSite::default()
        }
    }
}

impl Entity for VariantSite {
    const KIND: &'static str = VARIANT_SITE;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Call {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub pk: Option<VariantPk>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub genotype: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub ref_allele: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub alt_allele: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub gene: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub pos: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub impact: Option<FlexStr>,
}

impl Entity for Call {
    const KIND: &'static str = CALL;
}

// a phylogenetic tree in Newick format
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FastTree {
    pub name: FlexStr,
    pub data: String,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub history_id: Option<HistoryId>,
}

impl FastTree {
    pub fn new(name: &str, data: &str, history_id: Option<&str>) -> FastTree {
        FastTree {
            name: name.to_shared_str(),
            data: data.into(),
            history_id: history_id.map(|s| s.to_shared_str()),
        }
    }
}

impl Entity for FastTree {
    const KIND: &'static str = FAST_TREE;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct GalaxyUser {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub user_key: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub username: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub email: Option<FlexStr>,
}

impl Entity for GalaxyUser {
    const KIND: &'static str = GALAXY_USER;
}

#[test]
fn test_variant_set_id() {
    let derived = VariantSet::new("tb-outbreak-2017", Some("alice"), None, None);
    assert_eq!(derived.vset_id, derive_dns_id("tb-outbreak-2017"));

    let again = VariantSet::new("tb-outbreak-2017", None, Some("h1"), None);
    assert_eq!(derived.vset_id, again.vset_id);

    let explicit_id = derive_dns_id("something else");
    let explicit = VariantSet::new("tb-outbreak-2017", None, None, Some(explicit_id));
    assert_eq!(explicit.vset_id, explicit_id);
}

#[test]
fn test_variant_site_record() {
    let site = VariantSite::new("NC_000962.3", "761155", "C", "T", "vs1:761155");
    let record = site.to_record().unwrap();
    assert_eq!(&*record.kind, VARIANT_SITE);
    assert_eq!(record.get_str("pk"), Some("vs1:761155"));
    assert!(record.get("gene").is_none());
    assert_eq!(VariantSite::from_record(&record).unwrap(), site);
}

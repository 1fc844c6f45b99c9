use std::fmt;

use chrono::{DateTime, Utc};
use flexstr::{SharedStr as FlexStr, ToSharedStr};

use crate::constants::{FEATURE, TRANSCRIBED};
use crate::errors::{Result, SchemaError};
use crate::schema::Record;
use crate::types::{FeatureUniquename, SoId};

use super::Entity;

// the concrete Feature variants, each tagged with its Sequence Ontology term
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    RepeatRegion,
    Trna,
    NCrna,
    Rrna,
    PseudoGene,
    Gene,
    Transcript,
    Exon,
    #[serde(rename = "CDS")]
    Cds,
    Protein,
    Chromosome,
    Contig,
    Operon,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 13] = [
        FeatureKind::RepeatRegion, FeatureKind::Trna, FeatureKind::NCrna,
        FeatureKind::Rrna, FeatureKind::PseudoGene, FeatureKind::Gene,
        FeatureKind::Transcript, FeatureKind::Exon, FeatureKind::Cds,
        FeatureKind::Protein, FeatureKind::Chromosome, FeatureKind::Contig,
        FeatureKind::Operon,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FeatureKind::RepeatRegion => "RepeatRegion",
            FeatureKind::Trna => "Trna",
            FeatureKind::NCrna => "NCrna",
            FeatureKind::Rrna => "Rrna",
            FeatureKind::PseudoGene => "PseudoGene",
            FeatureKind::Gene => "Gene",
            FeatureKind::Transcript => "Transcript",
            FeatureKind::Exon => "Exon",
            FeatureKind::Cds => "CDS",
            FeatureKind::Protein => "Protein",
            FeatureKind::Chromosome => "Chromosome",
            FeatureKind::Contig => "Contig",
            FeatureKind::Operon => "Operon",
        }
    }

    pub fn so_id(&self) -> SoId {
        match self {
            FeatureKind::RepeatRegion => "SO:0000657",
            FeatureKind::Trna => "SO:0000253",
            FeatureKind::NCrna => "SO:0000655",
            FeatureKind::Rrna => "SO:0000252",
            FeatureKind::PseudoGene => "SO:0000336",
            FeatureKind::Gene => "SO:0000704",
            FeatureKind::Transcript => "SO:0000673",
            FeatureKind::Exon => "SO:0000147",
            FeatureKind::Cds => "SO:0000316",
            FeatureKind::Protein => "SO:0000104",
            FeatureKind::Chromosome => "SO:0000340",
            FeatureKind::Contig => "SO:0000149",
            FeatureKind::Operon => "SO:0000178",
        }
    }

    pub fn parent(&self) -> &'static str {
        match self {
            FeatureKind::Trna | FeatureKind::NCrna | FeatureKind::Rrna |
            FeatureKind::PseudoGene | FeatureKind::Gene => TRANSCRIBED,
            _ => FEATURE,
        }
    }

    pub fn from_name(name: &str) -> Option<FeatureKind> {
        FeatureKind::ALL.iter().find(|kind| kind.name() == name).copied()
    }

    // features whose residues other features are located on
    pub fn is_assembly(&self) -> bool {
        matches!(self, FeatureKind::Chromosome | FeatureKind::Contig)
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GeneBiotype {
    #[default]
    #[serde(rename = "protein_coding")]
    ProteinCoding,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PseudoGeneBiotype {
    #[default]
    #[serde(rename = "pseudogene")]
    Pseudogene,
}

// In Ensembl GFF3 the transcript biotype is inherited from the parent feature
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranscriptBiotype {
    #[serde(rename = "protein_coding")]
    ProteinCoding,
    #[serde(rename = "ncRNA")]
    NcRna,
    #[serde(rename = "tRNA")]
    TRna,
    #[serde(rename = "rRNA")]
    RRna,
    #[serde(rename = "pseudogene")]
    Pseudogene,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ProteinDetails {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub family: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub function: Option<FlexStr>,
    // proteins can have several domains along their length
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub domain: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub three_d: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub mass: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub entry_name: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub pdb_id: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct OperonDetails {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub description: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub start: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub end: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub coverage: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub experimentally_validated: Option<bool>,
}

// the variant-specific part of a Feature; the tag is the entity kind name
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "feature_kind")]
pub enum FeatureDetails {
    RepeatRegion {
        #[serde(skip_serializing_if="Option::is_none", default)]
        description: Option<FlexStr>,
    },
    Trna,
    NCrna,
    Rrna,
    PseudoGene {
        #[serde(default)]
        biotype: PseudoGeneBiotype,
        #[serde(skip_serializing_if="Option::is_none", default)]
        description: Option<FlexStr>,
    },
    Gene {
        #[serde(default)]
        biotype: GeneBiotype,
        #[serde(skip_serializing_if="Option::is_none", default)]
        description: Option<FlexStr>,
    },
    Transcript {
        biotype: TranscriptBiotype,
    },
    Exon,
    #[serde(rename = "CDS")]
    Cds,
    Protein(ProteinDetails),
    Chromosome,
    Contig,
    Operon(OperonDetails),
}

const FEATURE_KIND_TAG: &str = "feature_kind";

impl FeatureDetails {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureDetails::RepeatRegion { .. } => FeatureKind::RepeatRegion,
            FeatureDetails::Trna => FeatureKind::Trna,
            FeatureDetails::NCrna => FeatureKind::NCrna,
            FeatureDetails::Rrna => FeatureKind::Rrna,
            FeatureDetails::PseudoGene { .. } => FeatureKind::PseudoGene,
            FeatureDetails::Gene { .. } => FeatureKind::Gene,
            FeatureDetails::Transcript { .. } => FeatureKind::Transcript,
            FeatureDetails::Exon => FeatureKind::Exon,
            FeatureDetails::Cds => FeatureKind::Cds,
            FeatureDetails::Protein(_) => FeatureKind::Protein,
            FeatureDetails::Chromosome => FeatureKind::Chromosome,
            FeatureDetails::Contig => FeatureKind::Contig,
            FeatureDetails::Operon(_) => FeatureKind::Operon,
        }
    }

    pub fn gene() -> FeatureDetails {
        FeatureDetails::Gene {
            biotype: GeneBiotype::ProteinCoding,
            description: None,
        }
    }

    pub fn transcript(biotype: TranscriptBiotype) -> FeatureDetails {
        FeatureDetails::Transcript { biotype }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Feature {
    pub uniquename: FeatureUniquename,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub name: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    residues: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    seqlen: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    md5checksum: Option<String>,
    #[serde(default)]
    pub is_analysis: bool,
    #[serde(default)]
    pub is_obsolete: bool,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub timeaccessioned: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub timelastmodified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub ontology_id: Option<FlexStr>,
    #[serde(flatten)]
    pub details: FeatureDetails,
}

impl Feature {
    pub fn new(uniquename: &str, details: FeatureDetails) -> Feature {
        Feature {
            uniquename: uniquename.to_shared_str(),
            name: None,
            residues: None,
            seqlen: None,
            md5checksum: None,
            is_analysis: false,
            is_obsolete: false,
            timeaccessioned: None,
            timelastmodified: None,
            ontology_id: None,
            details,
        }
    }

    pub fn with_name(mut self, name: &str) -> Feature {
        self.name = Some(name.to_shared_str());
        self
    }

    // seqlen and md5checksum always describe the stored residues
    pub fn with_residues(mut self, residues: &str) -> Feature {
        self.seqlen = Some(residues.chars().count() as i64);
        self.md5checksum = Some(format!("{:x}", md5::compute(residues.as_bytes())));
        self.residues = Some(residues.to_owned());
        self
    }

    pub fn residues(&self) -> Option<&str> {
        self.residues.as_deref()
    }

    pub fn seqlen(&self) -> Option<i64> {
        self.seqlen
    }

    pub fn md5checksum(&self) -> Option<&str> {
        self.md5checksum.as_deref()
    }

    pub fn feature_kind(&self) -> FeatureKind {
        self.details.kind()
    }

    pub fn so_id(&self) -> SoId {
        self.feature_kind().so_id()
    }
}

impl Entity for Feature {
    const KIND: &'static str = FEATURE;

    fn kind(&self) -> FlexStr {
        self.feature_kind().name().to_shared_str()
    }

    fn to_record(&self) -> Result<Record> {
        let mut record = super::record_of(self.feature_kind().name(), self)?;
        record.properties.remove(FEATURE_KIND_TAG);
        Ok(record)
    }

    fn from_record(record: &Record) -> Result<Feature> {
        if FeatureKind::from_name(&record.kind).is_none() {
            return Err(SchemaError::invalid(&record.kind, FEATURE_KIND_TAG,
                                            "not a concrete Feature kind"));
        }
        let mut properties = record.properties.clone();
        properties.insert(FEATURE_KIND_TAG.to_owned(), record.kind.to_string().into());
        Ok(serde_json::from_value(properties.into())?)
    }
}

#[test]
fn test_feature_kind_names() {
    for kind in FeatureKind::ALL.iter() {
        assert_eq!(FeatureKind::from_name(kind.name()), Some(*kind));
        assert!(kind.so_id().starts_with("SO:"));
    }
    assert_eq!(FeatureKind::Cds.name(), "CDS");
    assert_eq!(FeatureKind::Gene.parent(), TRANSCRIBED);
    assert_eq!(FeatureKind::Exon.parent(), FEATURE);
}

#[test]
fn test_with_residues() {
    let feature = Feature::new("chr1", FeatureDetails::Chromosome)
        .with_residues("ACGT");
    assert_eq!(feature.seqlen(), Some(4));
    assert_eq!(feature.md5checksum(), Some("f1f8f4bf413b16ad135722aa4591043e"));
    assert_eq!(feature.so_id(), "SO:0000340");
}

#[test]
fn test_feature_record_round_trip() {
    let gene = Feature::new("Rv0001", FeatureDetails::gene()).with_name("dnaA");
    let record = gene.to_record().unwrap();
    assert_eq!(record.kind, "Gene");
    assert!(record.get(FEATURE_KIND_TAG).is_none());
    assert_eq!(record.get_str("biotype"), Some("protein_coding"));
    assert_eq!(Feature::from_record(&record).unwrap(), gene);
}

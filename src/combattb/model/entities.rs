use std::fmt;

use flexstr::{SharedStr as FlexStr, ToSharedStr};

use crate::constants::*;
use crate::errors::{Result, SchemaError};
use crate::types::{Accession, LocationKey, Pmid, TermName};

use super::Entity;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Organism {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub abbreviation: Option<FlexStr>,
    pub genus: FlexStr,
    pub species: FlexStr,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub strain: Option<FlexStr>,
    pub common_name: FlexStr,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub comment: Option<FlexStr>,
}

impl Organism {
    pub fn new(genus: &str, species: &str, common_name: &str) -> Organism {
        Organism {
            abbreviation: None,
            genus: genus.to_shared_str(),
            species: species.to_shared_str(),
            strain: None,
            common_name: common_name.to_shared_str(),
            comment: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.genus, self.species)
    }
}

impl Entity for Organism {
    const KIND: &'static str = ORGANISM;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Publication {
    pub pmid: Pmid,
    pub title: FlexStr,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub volumetitle: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub volume: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub series_name: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub issue: Option<FlexStr>,
    pub year: i64,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub pages: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub miniref: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub uniquename: Option<FlexStr>,
    #[serde(default)]
    pub is_obsolete: bool,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub publisher: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub pubplace: Option<FlexStr>,
}

impl Publication {
    pub fn new(pmid: &str, title: &str, year: i64) -> Publication {
        Publication {
            pmid: pmid.to_shared_str(),
            title: title.to_shared_str(),
            volumetitle: None,
            volume: None,
            series_name: None,
            issue: None,
            year,
            pages: None,
            miniref: None,
            uniquename: None,
            is_obsolete: false,
            publisher: None,
            pubplace: None,
        }
    }
}

impl Entity for Publication {
    const KIND: &'static str = PUBLICATION;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Author {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub editor: Option<FlexStr>,
    pub surname: FlexStr,
    pub givennames: FlexStr,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub suffix: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub rank: Option<i64>,
}

impl Author {
    pub fn new(surname: &str, givennames: &str) -> Author {
        Author {
            editor: None,
            surname: surname.to_shared_str(),
            givennames: givennames.to_shared_str(),
            suffix: None,
            rank: None,
        }
    }
}

impl Entity for Author {
    const KIND: &'static str = AUTHOR;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DbXref {
    pub db: FlexStr,
    pub accession: Accession,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub version: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub description: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub uri: Option<FlexStr>,
}

impl DbXref {
    pub fn new(db: &str, accession: &str) -> DbXref {
        DbXref {
            db: db.to_shared_str(),
            accession: accession.to_shared_str(),
            version: None,
            description: None,
            uri: None,
        }
    }

    // eg. "UniProtKB:P9WNW3"
    pub fn identifier(&self) -> String {
        format!("{}:{}", self.db, self.accession)
    }
}

impl Entity for DbXref {
    const KIND: &'static str = DBXREF;
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strand {
    #[serde(rename = "1")]
    Forward,
    #[serde(rename = "-1")]
    Reverse,
}

impl Strand {
    pub fn from_i64(strand: i64) -> Option<Strand> {
        match strand {
            1 => Some(Strand::Forward),
            -1 => Some(Strand::Reverse),
            _ => None,
        }
    }

    pub fn to_gff_str(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.to_gff_str())
    }
}

// A feature location using Chado's zero-based, half-open fmin/fmax
// convention: http://gmod.org/wiki/Chado_Sequence_Module#Feature_Locations
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "LocationFields")]
pub struct Location {
    pub location_key: LocationKey,
    start: i64,
    end: i64,
    pub strand: Strand,
    #[serde(skip_serializing_if="Option::is_none")]
    pub is_fmin_partial: Option<bool>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub is_fmax_partial: Option<bool>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub phase: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub residue_info: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub locgroup: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub rank: Option<i64>,
}

#[derive(Deserialize)]
struct LocationFields {
    location_key: LocationKey,
    start: i64,
    end: i64,
    strand: Strand,
    #[serde(default)]
    is_fmin_partial: Option<bool>,
    #[serde(default)]
    is_fmax_partial: Option<bool>,
    #[serde(default)]
    phase: Option<i64>,
    #[serde(default)]
    residue_info: Option<FlexStr>,
    #[serde(default)]
    locgroup: Option<i64>,
    #[serde(default)]
    rank: Option<i64>,
}

impl TryFrom<LocationFields> for Location {
    type Error = SchemaError;

    fn try_from(fields: LocationFields) -> Result<Location> {
        let mut location = Location::new(&fields.location_key, fields.start,
                                         fields.end, fields.strand)?;
        location.is_fmin_partial = fields.is_fmin_partial;
        location.is_fmax_partial = fields.is_fmax_partial;
        location.phase = fields.phase;
        location.residue_info = fields.residue_info;
        location.locgroup = fields.locgroup;
        location.rank = fields.rank;
        Ok(location)
    }
}

impl Location {
    pub fn new(location_key: &str, start: i64, end: i64, strand: Strand) -> Result<Location> {
        if start > end {
            return Err(SchemaError::MalformedLocation { start, end });
        }

        Ok(Location {
            location_key: location_key.to_shared_str(),
            start,
            end,
            strand,
            is_fmin_partial: None,
            is_fmax_partial: None,
            phase: None,
            residue_info: None,
            locgroup: None,
            rank: None,
        })
    }

    pub fn with_rank(mut self, rank: i64) -> Location {
        self.rank = Some(rank);
        self
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Entity for Location {
    const KIND: &'static str = LOCATION;
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoNamespace {
    BiologicalProcess,
    CellularComponent,
    MolecularFunction,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GoTerm {
    pub name: TermName,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub accession: Option<Accession>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub definition: Option<FlexStr>,
    #[serde(default)]
    pub is_obsolete: bool,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub namespace: Option<GoNamespace>,
}

impl GoTerm {
    pub fn new(name: &str, namespace: Option<GoNamespace>) -> GoTerm {
        GoTerm {
            name: name.to_shared_str(),
            accession: None,
            definition: None,
            is_obsolete: false,
            namespace,
        }
    }
}

impl Entity for GoTerm {
    const KIND: &'static str = GO_TERM;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InterProTerm {
    pub name: TermName,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub accession: Option<Accession>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub definition: Option<FlexStr>,
}

impl Entity for InterProTerm {
    const KIND: &'static str = INTERPRO_TERM;
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PathwaySource {
    Kegg,
    Reactome,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Pathway {
    pub accession: Accession,
    pub source: PathwaySource,
    #[serde(rename = "type", skip_serializing_if="Option::is_none", default)]
    pub pathway_type: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub species: Option<FlexStr>,
    #[serde(rename = "class", skip_serializing_if="Option::is_none", default)]
    pub pathway_class: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub name: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub compartment: Option<FlexStr>,
    // the pathway description
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub summation: Option<FlexStr>,
}

impl Pathway {
    pub fn new(accession: &str, source: PathwaySource) -> Pathway {
        Pathway {
            accession: accession.to_shared_str(),
            source,
            pathway_type: None,
            species: None,
            pathway_class: None,
            name: None,
            compartment: None,
            summation: None,
        }
    }
}

impl Entity for Pathway {
    const KIND: &'static str = PATHWAY;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Drug {
    pub accession: Accession,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub name: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub abbrev: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub synonyms: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub definition: Option<FlexStr>,
    // from TBDTDB
    #[serde(rename = "class", skip_serializing_if="Option::is_none", default)]
    pub drug_class: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub toxicity: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub cost: Option<FlexStr>,
}

impl Drug {
    pub fn new(accession: &str, name: Option<&str>) -> Drug {
        Drug {
            accession: accession.to_shared_str(),
            name: name.map(|s| s.to_shared_str()),
            abbrev: None,
            synonyms: None,
            definition: None,
            drug_class: None,
            toxicity: None,
            cost: None,
        }
    }
}

impl Entity for Drug {
    const KIND: &'static str = DRUG;
}

#[test]
fn test_location_bounds() {
    assert!(Location::new("loc1", 10, 20, Strand::Forward).is_ok());
    assert!(Location::new("loc2", 10, 10, Strand::Reverse).is_ok());
    match Location::new("loc3", 21, 20, Strand::Forward) {
        Err(SchemaError::MalformedLocation { start, end }) => {
            assert_eq!(start, 21);
            assert_eq!(end, 20);
        },
        other => panic!("expected MalformedLocation, got {:?}", other),
    }
}

#[test]
fn test_location_deserialize_checks_bounds() {
    let ok: serde_json::Result<Location> = serde_json::from_str(
        r#"{"location_key": "l1", "start": 1, "end": 5, "strand": "-1", "rank": 0}"#);
    let loc = ok.unwrap();
    assert_eq!(loc.strand, Strand::Reverse);
    assert_eq!(loc.rank, Some(0));
    assert_eq!(loc.len(), 4);

    let bad: serde_json::Result<Location> = serde_json::from_str(
        r#"{"location_key": "l2", "start": 6, "end": 5, "strand": "1"}"#);
    assert!(bad.is_err());
}

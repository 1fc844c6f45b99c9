use std::fs::File;
use std::io::BufReader;

use flexstr::SharedStr as FlexStr;

use crate::errors::Result;
use crate::model::Organism;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ConfigOrganism {
    pub genus: FlexStr,
    pub species: FlexStr,
    pub common_name: FlexStr,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub strain: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub abbreviation: Option<FlexStr>,
}

impl ConfigOrganism {
    pub fn full_name(&self) -> String {
        self.genus.to_string() + "_" + &*self.species
    }

    pub fn to_organism(&self) -> Organism {
        let mut organism = Organism::new(&self.genus, &self.species, &self.common_name);
        organism.strain = self.strain.clone();
        organism.abbreviation = self.abbreviation.clone();
        organism
    }
}

fn default_fasta_line_width() -> usize {
    60
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoadConfig {
    // check the relationship counts of every node after loading a batch
    #[serde(default)]
    pub check_cardinalities: bool,
    #[serde(default="default_fasta_line_width")]
    pub fasta_line_width: usize,
}

impl Default for LoadConfig {
    fn default() -> LoadConfig {
        LoadConfig {
            check_cardinalities: false,
            fasta_line_width: default_fasta_line_width(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub database_file: Option<String>,
    // organisms created by "init"
    #[serde(default)]
    pub organisms: Vec<ConfigOrganism>,
    #[serde(default)]
    pub load: LoadConfig,
}

impl Config {
    pub fn read(config_file_name: &str) -> Result<Config> {
        let file = File::open(config_file_name)?;
        let reader = BufReader::new(file);

        Ok(serde_json::from_reader(reader)?)
    }

    pub fn organism_by_name(&self, genus: &str, species: &str) -> Option<&ConfigOrganism> {
        self.organisms.iter()
            .find(|org| org.genus == genus && org.species == species)
    }

    pub fn database_file_or(&self, default: &str) -> String {
        self.database_file.as_deref().unwrap_or(default).to_owned()
    }
}

#[test]
fn test_config_defaults() {
    let config: Config = serde_json::from_str(r#"{
        "organisms": [
            {"genus": "Mycobacterium", "species": "tuberculosis",
             "common_name": "M. tuberculosis", "strain": "H37Rv"}
        ]
    }"#).unwrap();

    assert_eq!(config.database_file, None);
    assert!(!config.load.check_cardinalities);
    assert_eq!(config.load.fasta_line_width, 60);
    assert_eq!(config.database_file_or("combat_tb.sqlite3"),
               "combat_tb.sqlite3");

    let org = config.organism_by_name("Mycobacterium", "tuberculosis").unwrap();
    assert_eq!(org.full_name(), "Mycobacterium_tuberculosis");
    assert_eq!(org.to_organism().strain.as_deref(), Some("H37Rv"));
    assert!(config.organism_by_name("Mycobacterium", "bovis").is_none());
}

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info};

use crate::config::ConfigOrganism;
use crate::constants::ORGANISM;
use crate::errors::{Result, SchemaError};
use crate::model::Entity;
use crate::schema::{Record, SchemaRegistry, ValidatedRecord};
use crate::store::GraphStore;
use crate::types::{KindName, NodeId, Properties, RelName};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BatchNode {
    // a name for the node that is only meaningful inside the batch
    #[serde(rename = "ref")]
    pub node_ref: String,
    pub kind: KindName,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BatchEdge {
    pub source: String,
    pub name: RelName,
    pub target: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct RecordBatch {
    #[serde(default)]
    pub nodes: Vec<BatchNode>,
    #[serde(default)]
    pub edges: Vec<BatchEdge>,
}

pub fn read_batch(path: &Path) -> Result<RecordBatch> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    Ok(serde_json::from_reader(reader)?)
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LoadSummary {
    pub nodes: usize,
    pub edges: usize,
}

pub struct Loader<'a> {
    store: &'a mut GraphStore,
    registry: &'a SchemaRegistry,
    check_cardinalities: bool,
}

impl<'a> Loader<'a> {
    pub fn new(store: &'a mut GraphStore, registry: &'a SchemaRegistry) -> Loader<'a> {
        Loader {
            store,
            registry,
            check_cardinalities: false,
        }
    }

    pub fn with_cardinality_check(mut self, check_cardinalities: bool) -> Loader<'a> {
        self.check_cardinalities = check_cardinalities;
        self
    }

    // Node records, unique keys within the batch, edge refs and edge
    // endpoint kinds are all checked before anything is written.
    fn validate_batch(&self, batch: &RecordBatch) -> Result<Vec<ValidatedRecord>> {
        let mut ref_kinds: HashMap<&str, &str> = HashMap::new();
        let mut seen_keys = HashSet::new();
        let mut validated = vec![];

        for node in &batch.nodes {
            if ref_kinds.insert(node.node_ref.as_str(), &*node.kind).is_some() {
                return Err(SchemaError::DuplicateDefinition(node.node_ref.clone()));
            }

            let record = Record::new(&node.kind, node.properties.clone());
            let validated_record = self.registry.validate(record)?;

            for key in validated_record.unique_keys() {
                if !seen_keys.insert(key.clone()) {
                    return Err(SchemaError::UniquenessViolation {
                        kind: node.kind.clone(),
                        field: key.field.clone(),
                        value: key.value.clone(),
                    });
                }
            }

            validated.push(validated_record);
        }

        for edge in &batch.edges {
            let kind_of = |node_ref: &String| {
                ref_kinds.get(node_ref.as_str())
                    .copied()
                    .ok_or_else(|| SchemaError::UnknownNode(node_ref.clone()))
            };

            let source_kind = kind_of(&edge.source)?;
            let target_kind = kind_of(&edge.target)?;

            self.registry.relationship_between(source_kind, &edge.name, target_kind)?;
        }

        Ok(validated)
    }

    // The batch is written in one transaction so a failure at any step,
    // including the cardinality check, leaves the store as it was.
    pub fn load_batch(&mut self, batch: &RecordBatch) -> Result<LoadSummary> {
        let validated = self.validate_batch(batch)?;

        let mut tx = self.store.transaction()?;

        let mut node_ids: HashMap<&str, NodeId> = HashMap::new();

        for (node, validated_record) in batch.nodes.iter().zip(&validated) {
            let node_id = tx.persist(validated_record)?;
            node_ids.insert(node.node_ref.as_str(), node_id);
        }

        for edge in &batch.edges {
            let source_id = node_ids[edge.source.as_str()];
            let target_id = node_ids[edge.target.as_str()];
            tx.relate(self.registry, source_id, &edge.name, target_id)?;
        }

        if self.check_cardinalities {
            for node in &batch.nodes {
                tx.check_cardinalities(self.registry, node_ids[node.node_ref.as_str()])?;
            }
            debug!("relationship counts of {} nodes are valid", batch.nodes.len());
        }

        tx.commit()?;

        let summary = LoadSummary {
            nodes: batch.nodes.len(),
            edges: batch.edges.len(),
        };

        info!("loaded {} nodes and {} edges", summary.nodes, summary.edges);

        Ok(summary)
    }

    // Create the configured organisms, skipping any that are already stored
    pub fn load_organisms(&mut self, organisms: &[ConfigOrganism]) -> Result<Vec<NodeId>> {
        let mut ret = vec![];

        let existing_ids = self.store.nodes_of_kind(self.registry, ORGANISM)?;
        let mut existing = vec![];
        for node_id in existing_ids {
            existing.push((node_id, self.store.node(node_id)?.record));
        }

        for config_organism in organisms {
            let record = config_organism.to_organism().to_record()?;
            let validated = self.registry.validate(record)?;

            let maybe_existing_id =
                existing.iter()
                .find(|(_, stored)| *stored == *validated.record())
                .map(|(node_id, _)| *node_id);

            let node_id =
                match maybe_existing_id {
                    Some(node_id) => node_id,
                    None => {
                        info!("creating organism {}", config_organism.full_name());
                        self.store.persist(validated)?
                    },
                };

            ret.push(node_id);
        }

        Ok(ret)
    }
}

use std::path::Path;

use flexstr::ToSharedStr;
use rusqlite::{Connection, OptionalExtension, Transaction};
use serde_json::Value;
use tracing::debug;

use crate::bio::residues::{choose_location, residues_window};
use crate::constants::{FEATURE, LOCATED_ON_REL_NAME, LOCATION_REL_NAME};
use crate::errors::{Result, SchemaError};
use crate::model::{Entity, FeatureKind, Location};
use crate::schema::{unique_key_value, Direction, Record, RelationshipDef,
                    SchemaRegistry, UniqueKey, ValidatedRecord};
use crate::types::{EdgeId, EdgeLabel, NodeId, Properties, Residues};
use crate::utils::make_store_tables;

#[derive(Clone, Debug, PartialEq)]
pub struct StoredNode {
    pub id: NodeId,
    pub record: Record,
}

/// A property graph kept in SQLite.  Nodes hold validated records as JSON,
/// `unique_values` is the uniqueness index and `edges` holds labelled,
/// directed relationships.  Each write is a single transaction, or part of
/// a `StoreTransaction` when several writes must succeed or fail together.
pub struct GraphStore {
    conn: Connection,
}

/// Writes that are committed together.  Dropping it without calling
/// `commit()` rolls everything back.
pub struct StoreTransaction<'a> {
    tx: Transaction<'a>,
}

fn check_unique_keys(conn: &Connection, kind: &str, keys: &[UniqueKey]) -> Result<()> {
    for key in keys {
        let existing: Option<NodeId> =
            conn.query_row("SELECT node_id FROM unique_values \
                            WHERE scope = ?1 AND field = ?2 AND value = ?3",
                           (&*key.scope, &*key.field, &key.value),
                           |row| row.get(0))
            .optional()?;

        if existing.is_some() {
            return Err(SchemaError::UniquenessViolation {
                kind: kind.to_shared_str(),
                field: key.field.clone(),
                value: key.value.clone(),
            });
        }
    }

    Ok(())
}

fn insert_unique_keys(conn: &Connection, node_id: NodeId, keys: &[UniqueKey]) -> Result<()> {
    for key in keys {
        conn.execute("INSERT INTO unique_values (scope, field, value, node_id) \
                      VALUES (?1, ?2, ?3, ?4)",
                     (&*key.scope, &*key.field, &key.value, node_id))?;
    }
    Ok(())
}

// Nothing is written if any of the unique keys is taken.
fn insert_node(conn: &Connection, validated: &ValidatedRecord) -> Result<NodeId> {
    check_unique_keys(conn, validated.kind(), validated.unique_keys())?;

    let record = validated.record();
    let data = Value::Object(record.properties.clone());

    conn.execute("INSERT INTO nodes (kind, data) VALUES (?1, ?2)",
                 (&*record.kind, &data))?;
    let node_id = conn.last_insert_rowid();

    insert_unique_keys(conn, node_id, validated.unique_keys())?;

    debug!("created {} node {}", validated.kind(), node_id);

    Ok(node_id)
}

fn load_node(conn: &Connection, node_id: NodeId) -> Result<StoredNode> {
    let maybe_node =
        conn.query_row("SELECT kind, data FROM nodes WHERE id = ?1", (node_id,),
                       |row| {
                           let kind: String = row.get(0)?;
                           let data: Value = row.get(1)?;
                           Ok((kind, data))
                       })
        .optional()?;

    match maybe_node {
        Some((kind, Value::Object(properties))) => Ok(StoredNode {
            id: node_id,
            record: Record::new(&kind, properties),
        }),
        Some((kind, _)) =>
            Err(SchemaError::invalid(&kind, "data", "stored properties aren't an object")),
        None => Err(SchemaError::UnknownNode(node_id.to_string())),
    }
}

fn related(conn: &Connection, registry: &SchemaRegistry, node_id: NodeId,
           rel: &RelationshipDef) -> Result<Vec<(EdgeId, StoredNode)>>
{
    let sql =
        match rel.direction {
            Direction::Outgoing =>
                "SELECT e.id, n.id, n.kind, n.data FROM edges e \
                 JOIN nodes n ON n.id = e.target \
                 WHERE e.source = ?1 AND e.label = ?2 ORDER BY e.id",
            Direction::Incoming =>
                "SELECT e.id, n.id, n.kind, n.data FROM edges e \
                 JOIN nodes n ON n.id = e.source \
                 WHERE e.target = ?1 AND e.label = ?2 ORDER BY e.id",
        };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map((node_id, &*rel.label), |row| {
        let edge_id: EdgeId = row.get(0)?;
        let other_id: NodeId = row.get(1)?;
        let kind: String = row.get(2)?;
        let data: Value = row.get(3)?;
        Ok((edge_id, other_id, kind, data))
    })?;

    let mut ret = vec![];

    for row in rows {
        let (edge_id, other_id, kind, data) = row?;

        if !registry.is_a(&kind, &rel.other) {
            continue;
        }

        match data {
            Value::Object(properties) => {
                ret.push((edge_id, StoredNode {
                    id: other_id,
                    record: Record::new(&kind, properties),
                }));
            },
            _ => return Err(SchemaError::invalid(&kind, "data",
                                                 "stored properties aren't an object")),
        }
    }

    Ok(ret)
}

// A new source -[label]-> target edge counts towards the relationships
// declared on both ends.  It's refused if either already has as many
// edges as its cardinality allows.
fn check_upper_bounds(conn: &Connection, registry: &SchemaRegistry, source: &StoredNode,
                      label: &EdgeLabel, target: &StoredNode) -> Result<()> {
    let ends = [(source, Direction::Outgoing, target),
                (target, Direction::Incoming, source)];

    for (node, direction, other) in ends {
        for rel in registry.relationships(&node.record.kind)? {
            if rel.label != *label || rel.direction != direction ||
                !registry.is_a(&other.record.kind, &rel.other) {
                continue;
            }

            let Some(max) = rel.cardinality.upper_bound() else {
                continue;
            };

            let count = related(conn, registry, node.id, rel)?.len();

            if count >= max {
                return Err(SchemaError::CardinalityViolation {
                    kind: node.record.kind.clone(),
                    name: rel.name.clone(),
                    label: rel.label.clone(),
                    expected: rel.cardinality,
                    actual: count + 1,
                });
            }
        }
    }

    Ok(())
}

// "owner" is the node whose kind declares the relationship.  For an
// incoming relationship the stored edge points from "other" to "owner".
fn insert_edge(conn: &Connection, registry: &SchemaRegistry, owner: NodeId, name: &str,
               other: NodeId) -> Result<EdgeId> {
    let owner_node = load_node(conn, owner)?;
    let other_node = load_node(conn, other)?;

    let rel = registry.relationship_between(&owner_node.record.kind, name,
                                            &other_node.record.kind)?;

    let (source, target) =
        match rel.direction {
            Direction::Outgoing => (&owner_node, &other_node),
            Direction::Incoming => (&other_node, &owner_node),
        };

    check_upper_bounds(conn, registry, source, &rel.label, target)?;

    conn.execute("INSERT INTO edges (source, label, target) VALUES (?1, ?2, ?3)",
                 (source.id, &*rel.label, target.id))?;
    let edge_id = conn.last_insert_rowid();

    debug!("{} -[{}]-> {}", source.id, rel.label, target.id);

    Ok(edge_id)
}

// check every relationship the node's kind declares or inherits
fn node_cardinalities(conn: &Connection, registry: &SchemaRegistry, node_id: NodeId)
                      -> Result<()>
{
    let node = load_node(conn, node_id)?;

    for rel in registry.relationships(&node.record.kind)? {
        let count = related(conn, registry, node_id, rel)?.len();
        if !rel.cardinality.allows(count) {
            return Err(SchemaError::CardinalityViolation {
                kind: node.record.kind.clone(),
                name: rel.name.clone(),
                label: rel.label.clone(),
                expected: rel.cardinality,
                actual: count,
            });
        }
    }

    Ok(())
}

impl<'a> StoreTransaction<'a> {
    pub fn persist(&mut self, validated: &ValidatedRecord) -> Result<NodeId> {
        insert_node(&self.tx, validated)
    }

    pub fn relate(&mut self, registry: &SchemaRegistry, owner: NodeId, name: &str,
                  other: NodeId) -> Result<EdgeId> {
        insert_edge(&self.tx, registry, owner, name, other)
    }

    pub fn check_cardinalities(&self, registry: &SchemaRegistry, node_id: NodeId) -> Result<()> {
        node_cardinalities(&self.tx, registry, node_id)
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

impl GraphStore {
    pub fn open(path: &Path) -> Result<GraphStore> {
        Ok(GraphStore {
            conn: Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<GraphStore> {
        Ok(GraphStore {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn from_connection(conn: Connection) -> GraphStore {
        GraphStore { conn }
    }

    pub fn init(&mut self) -> Result<()> {
        make_store_tables(&mut self.conn)?;
        Ok(())
    }

    pub fn transaction(&mut self) -> Result<StoreTransaction<'_>> {
        Ok(StoreTransaction {
            tx: self.conn.transaction()?,
        })
    }

    // Store a record that has already been validated
    pub fn persist(&mut self, validated: ValidatedRecord) -> Result<NodeId> {
        let mut tx = self.transaction()?;
        let node_id = tx.persist(&validated)?;
        tx.commit()?;
        Ok(node_id)
    }

    pub fn create(&mut self, registry: &SchemaRegistry, record: Record) -> Result<NodeId> {
        let validated = registry.validate(record)?;
        self.persist(validated)
    }

    pub fn create_entity<T: Entity>(&mut self, registry: &SchemaRegistry, entity: &T)
                                    -> Result<NodeId>
    {
        self.create(registry, entity.to_record()?)
    }

    // Merge changes into the stored properties.  A null value removes the
    // property.  The merged record is validated again before anything is
    // written.
    pub fn update(&mut self, registry: &SchemaRegistry, node_id: NodeId,
                  changes: Properties) -> Result<()> {
        let mut node = self.node(node_id)?;

        for (name, value) in changes {
            node.record.properties.insert(name, value);
        }

        let validated = registry.validate(node.record)?;

        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM unique_values WHERE node_id = ?1", (node_id,))?;
        check_unique_keys(&tx, validated.kind(), validated.unique_keys())?;
        insert_unique_keys(&tx, node_id, validated.unique_keys())?;

        let data = Value::Object(validated.record().properties.clone());
        tx.execute("UPDATE nodes SET data = ?1 WHERE id = ?2", (&data, node_id))?;

        tx.commit()?;

        debug!("updated {} node {}", validated.kind(), node_id);

        Ok(())
    }

    // Fails without writing if the kinds don't match the relationship or if
    // the new edge would exceed the cardinality of either end.  Lower bounds
    // are checked by check_cardinalities() once the graph is complete.
    pub fn relate(&mut self, registry: &SchemaRegistry, owner: NodeId, name: &str,
                  other: NodeId) -> Result<EdgeId> {
        let mut tx = self.transaction()?;
        let edge_id = tx.relate(registry, owner, name, other)?;
        tx.commit()?;
        Ok(edge_id)
    }

    pub fn node(&self, node_id: NodeId) -> Result<StoredNode> {
        load_node(&self.conn, node_id)
    }

    pub fn entity<T: Entity>(&self, node_id: NodeId) -> Result<T> {
        T::from_record(&self.node(node_id)?.record)
    }

    pub fn find_by_unique(&self, registry: &SchemaRegistry, kind: &str, field_name: &str,
                          value: &Value) -> Result<Option<NodeId>> {
        let (scope, field) = registry.field(kind, field_name)?;

        if !field.unique {
            return Err(SchemaError::invalid(kind, field_name, "not a unique field"));
        }

        let maybe_node_id: Option<NodeId> =
            self.conn.query_row("SELECT node_id FROM unique_values \
                                 WHERE scope = ?1 AND field = ?2 AND value = ?3",
                                (&**scope, field_name, unique_key_value(value)),
                                |row| row.get(0))
            .optional()?;

        match maybe_node_id {
            Some(node_id) => {
                let node = self.node(node_id)?;
                if registry.is_a(&node.record.kind, kind) {
                    Ok(Some(node_id))
                } else {
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    // nodes of the kind and of all kinds that inherit from it, oldest first
    pub fn nodes_of_kind(&self, registry: &SchemaRegistry, kind: &str) -> Result<Vec<NodeId>> {
        registry.entity(kind)?;

        let mut stmt = self.conn.prepare("SELECT id, kind FROM nodes ORDER BY id")?;
        let rows = stmt.query_map((), |row| {
            let id: NodeId = row.get(0)?;
            let node_kind: String = row.get(1)?;
            Ok((id, node_kind))
        })?;

        let mut ret = vec![];
        for row in rows {
            let (id, node_kind) = row?;
            if registry.is_a(&node_kind, kind) {
                ret.push(id);
            }
        }

        Ok(ret)
    }

    // the nodes at the other end of a relationship, in edge creation order
    pub fn neighbours(&self, registry: &SchemaRegistry, node_id: NodeId, name: &str)
                      -> Result<Vec<(EdgeId, StoredNode)>>
    {
        let node = self.node(node_id)?;
        let rel = registry.relationship(&node.record.kind, name)?;
        related(&self.conn, registry, node_id, rel)
    }

    pub fn relationship_count(&self, registry: &SchemaRegistry, node_id: NodeId, name: &str)
                              -> Result<usize>
    {
        Ok(self.neighbours(registry, node_id, name)?.len())
    }

    pub fn validate_relationship_count(&self, registry: &SchemaRegistry, node_id: NodeId,
                                       name: &str) -> Result<()> {
        let node = self.node(node_id)?;
        let rel = registry.relationship(&node.record.kind, name)?;
        let count = related(&self.conn, registry, node_id, rel)?.len();
        registry.validate_relationship_count(&node.record.kind, &rel.name, count)
    }

    pub fn check_cardinalities(&self, registry: &SchemaRegistry, node_id: NodeId) -> Result<()> {
        node_cardinalities(&self.conn, registry, node_id)
    }

    // The residues of a feature: its own if it has any, otherwise those of
    // the Chromosome or Contig it's located on, cut down to its location.
    pub fn get_residues(&self, registry: &SchemaRegistry, feature_id: NodeId,
                        upstream_offset: i64, downstream_offset: i64) -> Result<Residues> {
        let feature = self.node(feature_id)?;

        if !registry.is_a(&feature.record.kind, FEATURE) {
            return Err(SchemaError::invalid(&feature.record.kind, "kind", "not a Feature"));
        }

        let own_residues =
            feature.record.get_str("residues")
            .filter(|residues| !residues.is_empty())
            .map(|residues| residues.to_owned());

        let candidate =
            match own_residues {
                Some(residues) => residues,
                None => {
                    let located_on = self.neighbours(registry, feature_id, LOCATED_ON_REL_NAME)?;
                    let maybe_residues =
                        located_on.iter()
                        .filter(|(_, node)| {
                            FeatureKind::from_name(&node.record.kind)
                                .map(|kind| kind.is_assembly())
                                .unwrap_or(false)
                        })
                        .find_map(|(_, node)| node.record.get_str("residues"));

                    match maybe_residues {
                        Some(residues) => residues.to_owned(),
                        None => {
                            debug!("no residues for feature node {}", feature_id);
                            return Ok(String::new());
                        },
                    }
                },
            };

        let mut locations = vec![];
        for (edge_id, node) in self.neighbours(registry, feature_id, LOCATION_REL_NAME)? {
            locations.push((edge_id, Location::from_record(&node.record)?));
        }

        Ok(residues_window(&candidate, choose_location(&locations),
                           upstream_offset, downstream_offset))
    }
}

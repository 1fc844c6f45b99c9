use std::fmt;

use flexstr::{SharedStr as FlexStr, ToSharedStr};
use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::{Result, SchemaError};
use crate::types::{KindName, FieldName, RelName, EdgeLabel, Properties};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
}

impl FieldType {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Float => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::DateTime =>
                value.as_str()
                    .map(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok())
                    .unwrap_or(false),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::DateTime => "datetime",
        })
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub name: FieldName,
    pub field_type: FieldType,
    pub required: bool,
    pub unique: bool,
    pub indexed: bool,
    #[serde(skip_serializing_if="Vec::is_empty")]
    pub choices: Vec<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub default: Option<Value>,
}

impl FieldDef {
    pub fn new(name: &str, field_type: FieldType) -> FieldDef {
        FieldDef {
            name: name.to_shared_str(),
            field_type,
            required: false,
            unique: false,
            indexed: false,
            choices: vec![],
            default: None,
        }
    }

    pub fn string(name: &str) -> FieldDef {
        FieldDef::new(name, FieldType::String)
    }

    pub fn integer(name: &str) -> FieldDef {
        FieldDef::new(name, FieldType::Integer)
    }

    pub fn float(name: &str) -> FieldDef {
        FieldDef::new(name, FieldType::Float)
    }

    pub fn boolean(name: &str) -> FieldDef {
        FieldDef::new(name, FieldType::Boolean)
    }

    pub fn datetime(name: &str) -> FieldDef {
        FieldDef::new(name, FieldType::DateTime)
    }

    pub fn required(self) -> FieldDef {
        FieldDef { required: true, ..self }
    }

    // a unique field is always indexed
    pub fn unique(self) -> FieldDef {
        FieldDef { unique: true, indexed: true, ..self }
    }

    pub fn indexed(self) -> FieldDef {
        FieldDef { indexed: true, ..self }
    }

    pub fn choices(self, choices: &[&str]) -> FieldDef {
        FieldDef {
            choices: choices.iter().map(|c| c.to_shared_str()).collect(),
            ..self
        }
    }

    pub fn default_value(self, default: Value) -> FieldDef {
        FieldDef { default: Some(default), ..self }
    }

    fn check_value(&self, kind: &str, value: &Value) -> Result<()> {
        if !self.field_type.accepts(value) {
            return Err(SchemaError::invalid(kind, &self.name,
                                            format!("expected a {} value, got {}",
                                                    self.field_type, value)));
        }

        if !self.choices.is_empty() {
            let in_choices = value.as_str()
                .map(|s| self.choices.iter().any(|c| *c == s))
                .unwrap_or(false);
            if !in_choices {
                let choices = itertools::join(self.choices.iter(), ", ");
                return Err(SchemaError::invalid(kind, &self.name,
                                                format!("{} is not one of: {}", value, choices)));
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    // values of these fields, taken together, are unique for the kind
    UniqueTogether(Vec<FieldName>),
    // Chado fmin/fmax ordering
    StartNotAfterEnd { start: FieldName, end: FieldName },
}

impl Constraint {
    pub fn unique_together(fields: &[&str]) -> Constraint {
        Constraint::UniqueTogether(fields.iter().map(|f| f.to_shared_str()).collect())
    }

    pub fn start_not_after_end(start: &str, end: &str) -> Constraint {
        Constraint::StartNotAfterEnd {
            start: start.to_shared_str(),
            end: end.to_shared_str(),
        }
    }

    fn fields(&self) -> Vec<&FieldName> {
        match self {
            Constraint::UniqueTogether(fields) => fields.iter().collect(),
            Constraint::StartNotAfterEnd { start, end } => vec![start, end],
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EntityDef {
    pub name: KindName,
    #[serde(skip_serializing_if="Option::is_none")]
    pub parent: Option<KindName>,
    pub is_abstract: bool,
    #[serde(skip_serializing_if="Option::is_none")]
    pub so_id: Option<FlexStr>,
    pub fields: IndexMap<FieldName, FieldDef>,
    #[serde(skip_serializing_if="Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl EntityDef {
    pub fn new(name: &str) -> EntityDef {
        EntityDef {
            name: name.to_shared_str(),
            parent: None,
            is_abstract: false,
            so_id: None,
            fields: IndexMap::new(),
            constraints: vec![],
        }
    }

    pub fn parent(mut self, parent: &str) -> EntityDef {
        self.parent = Some(parent.to_shared_str());
        self
    }

    pub fn abstract_kind(mut self) -> EntityDef {
        self.is_abstract = true;
        self
    }

    pub fn so_id(mut self, so_id: &str) -> EntityDef {
        self.so_id = Some(so_id.to_shared_str());
        self
    }

    pub fn field(mut self, field: FieldDef) -> EntityDef {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> EntityDef {
        self.constraints.push(constraint);
        self
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    One,
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
}

impl Cardinality {
    pub fn allows(&self, count: usize) -> bool {
        match self {
            Cardinality::One => count == 1,
            Cardinality::ZeroOrOne => count <= 1,
            Cardinality::ZeroOrMore => true,
            Cardinality::OneOrMore => count >= 1,
        }
    }

    pub fn upper_bound(&self) -> Option<usize> {
        match self {
            Cardinality::One | Cardinality::ZeroOrOne => Some(1),
            Cardinality::ZeroOrMore | Cardinality::OneOrMore => None,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Cardinality::One => "exactly one",
            Cardinality::ZeroOrOne => "zero or one",
            Cardinality::ZeroOrMore => "zero or more",
            Cardinality::OneOrMore => "one or more",
        })
    }
}

// Outgoing: the owner is the source of the edge
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outgoing,
    Incoming,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RelationshipDef {
    pub owner: KindName,
    pub name: RelName,
    pub label: EdgeLabel,
    pub other: KindName,
    pub direction: Direction,
    pub cardinality: Cardinality,
}

impl RelationshipDef {
    pub fn source_kind(&self) -> &KindName {
        match self.direction {
            Direction::Outgoing => &self.owner,
            Direction::Incoming => &self.other,
        }
    }

    pub fn target_kind(&self) -> &KindName {
        match self.direction {
            Direction::Outgoing => &self.other,
            Direction::Incoming => &self.owner,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Record {
    pub kind: KindName,
    pub properties: Properties,
}

impl Record {
    pub fn new(kind: &str, properties: Properties) -> Record {
        Record {
            kind: kind.to_shared_str(),
            properties,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.properties.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }
}

// One entry in the uniqueness index.  "scope" is the kind that declares the
// field so that eg. Gene and Exon uniquenames share the Feature scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UniqueKey {
    pub scope: KindName,
    pub field: FieldName,
    pub value: String,
}

// A Record that has passed validation, with defaults filled in.  Only
// SchemaRegistry::validate() makes these.
#[derive(Clone, Debug)]
pub struct ValidatedRecord {
    record: Record,
    unique_keys: Vec<UniqueKey>,
}

impl ValidatedRecord {
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn kind(&self) -> &KindName {
        &self.record.kind
    }

    pub fn unique_keys(&self) -> &[UniqueKey] {
        &self.unique_keys
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

// the text form of a value as stored in the uniqueness index
pub fn unique_key_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Serialize, Clone, Debug, Default)]
pub struct SchemaRegistry {
    entities: IndexMap<KindName, EntityDef>,
    relationships: IndexMap<KindName, Vec<RelationshipDef>>,
}

impl SchemaRegistry {
    pub fn new() -> SchemaRegistry {
        SchemaRegistry::default()
    }

    pub fn define_entity(&mut self, def: EntityDef) -> Result<()> {
        if let Some(existing) = self.entities.get(&def.name) {
            if *existing == def {
                return Ok(());
            }
            return Err(SchemaError::DuplicateDefinition(def.name.to_string()));
        }

        if let Some(ref parent) = def.parent {
            if !self.entities.contains_key(parent) {
                return Err(SchemaError::UnknownEntityKind(parent.clone()));
            }
        }

        for constraint in &def.constraints {
            for field_name in constraint.fields() {
                if !def.fields.contains_key(field_name) {
                    return Err(SchemaError::invalid(&def.name, field_name,
                                                    "constraint refers to an undeclared field"));
                }
            }
        }

        self.relationships.entry(def.name.clone()).or_default();
        self.entities.insert(def.name.clone(), def);

        Ok(())
    }

    pub fn define_relationship(&mut self, owner: &str, name: &str, label: &str,
                               other: &str, cardinality: Cardinality,
                               direction: Direction) -> Result<()> {
        for kind in [owner, other] {
            if !self.entities.contains_key(kind) {
                return Err(SchemaError::UnknownEntityKind(kind.to_shared_str()));
            }
        }

        let def = RelationshipDef {
            owner: owner.to_shared_str(),
            name: name.to_shared_str(),
            label: label.to_shared_str(),
            other: other.to_shared_str(),
            direction,
            cardinality,
        };

        let owner_rels = self.relationships.entry(def.owner.clone()).or_default();

        if let Some(existing) = owner_rels.iter().find(|r| r.name == name) {
            if *existing == def {
                return Ok(());
            }
            return Err(SchemaError::DuplicateDefinition(format!("{}.{}", owner, name)));
        }

        owner_rels.push(def);

        Ok(())
    }

    pub fn entity(&self, kind: &str) -> Result<&EntityDef> {
        self.entities.get(kind)
            .ok_or_else(|| SchemaError::UnknownEntityKind(kind.to_shared_str()))
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.values()
    }

    // the kind itself first, then its parent, up to the root
    pub fn ancestry(&self, kind: &str) -> Result<Vec<&EntityDef>> {
        let mut ret = vec![];
        let mut current = Some(self.entity(kind)?);

        while let Some(def) = current {
            ret.push(def);
            current = match def.parent {
                Some(ref parent) => Some(self.entity(parent)?),
                None => None,
            };
        }

        Ok(ret)
    }

    pub fn is_a(&self, kind: &str, ancestor: &str) -> bool {
        match self.ancestry(kind) {
            Ok(ancestry) => ancestry.iter().any(|def| def.name == ancestor),
            Err(_) => false,
        }
    }

    // all kinds that are, or inherit from, the given kind
    pub fn sub_kinds(&self, kind: &str) -> Vec<&KindName> {
        self.entities.keys()
            .filter(|name| self.is_a(name, kind))
            .collect()
    }

    // inherited fields first, in declaration order
    pub fn fields(&self, kind: &str) -> Result<Vec<(&KindName, &FieldDef)>> {
        let mut ret = vec![];
        for def in self.ancestry(kind)?.into_iter().rev() {
            for field in def.fields.values() {
                ret.push((&def.name, field));
            }
        }
        Ok(ret)
    }

    pub fn field(&self, kind: &str, field_name: &str) -> Result<(&KindName, &FieldDef)> {
        self.fields(kind)?
            .into_iter()
            .find(|(_, field)| field.name == field_name)
            .ok_or_else(|| SchemaError::invalid(kind, field_name, "no such field"))
    }

    pub fn relationships(&self, kind: &str) -> Result<Vec<&RelationshipDef>> {
        let mut ret = vec![];
        for def in self.ancestry(kind)?.into_iter().rev() {
            if let Some(rels) = self.relationships.get(&def.name) {
                ret.extend(rels.iter());
            }
        }
        Ok(ret)
    }

    // look up by relationship name, falling back to the edge label when
    // only one relationship of the kind uses it
    pub fn relationship(&self, kind: &str, name_or_label: &str) -> Result<&RelationshipDef> {
        let rels = self.relationships(kind)?;

        if let Some(rel) = rels.iter().find(|r| r.name == name_or_label) {
            return Ok(*rel);
        }

        let mut by_label = rels.iter().filter(|r| r.label == name_or_label);

        match (by_label.next(), by_label.next()) {
            (Some(rel), None) => Ok(*rel),
            _ => Err(SchemaError::UnknownRelationshipLabel {
                kind: kind.to_shared_str(),
                name: name_or_label.to_shared_str(),
            }),
        }
    }

    // the relationship an owner of owner_kind would use to reach a node of
    // other_kind, if other_kind is allowed at that end
    pub fn relationship_between(&self, owner_kind: &str, name_or_label: &str,
                                other_kind: &str) -> Result<&RelationshipDef> {
        let rel = self.relationship(owner_kind, name_or_label)?;

        if self.is_a(other_kind, &rel.other) {
            Ok(rel)
        } else {
            let endpoint =
                match rel.direction {
                    Direction::Outgoing => "target",
                    Direction::Incoming => "source",
                };
            Err(SchemaError::EndpointMismatch {
                label: rel.label.clone(),
                endpoint,
                kind: other_kind.to_shared_str(),
                expected: rel.other.clone(),
            })
        }
    }

    pub fn validate(&self, mut record: Record) -> Result<ValidatedRecord> {
        let kind = record.kind.clone();
        let ancestry = self.ancestry(&kind)?;

        if ancestry[0].is_abstract {
            return Err(SchemaError::invalid(&kind, "kind",
                                            "abstract kinds can't be instantiated"));
        }

        let fields = self.fields(&kind)?;

        for (prop_name, value) in &record.properties {
            if !fields.iter().any(|(_, field)| field.name == prop_name.as_str())
                && !value.is_null() {
                return Err(SchemaError::invalid(&kind, prop_name, "unknown field"));
            }
        }

        record.properties.retain(|_, value| !value.is_null());

        let mut unique_keys = vec![];

        for (scope, field) in &fields {
            match record.properties.get(&*field.name) {
                Some(value) => {
                    field.check_value(&kind, value)?;
                    if field.unique {
                        unique_keys.push(UniqueKey {
                            scope: (*scope).clone(),
                            field: field.name.clone(),
                            value: unique_key_value(value),
                        });
                    }
                },
                None => {
                    if let Some(ref default) = field.default {
                        record.properties.insert(field.name.to_string(), default.clone());
                    } else if field.required {
                        return Err(SchemaError::invalid(&kind, &field.name,
                                                        "required field is missing"));
                    }
                },
            }
        }

        for def in &ancestry {
            for constraint in &def.constraints {
                match constraint {
                    Constraint::UniqueTogether(group) => {
                        let mut values = vec![];
                        for field_name in group {
                            match record.properties.get(&**field_name) {
                                Some(value) => values.push(unique_key_value(value)),
                                None => return Err(SchemaError::invalid(&kind, field_name,
                                                   "part of a unique key so can't be null")),
                            }
                        }
                        unique_keys.push(UniqueKey {
                            scope: def.name.clone(),
                            field: itertools::join(group.iter(), "+").to_shared_str(),
                            value: serde_json::to_string(&values)?,
                        });
                    },
                    Constraint::StartNotAfterEnd { start, end } => {
                        let start_val = record.properties.get(&**start).and_then(Value::as_i64);
                        let end_val = record.properties.get(&**end).and_then(Value::as_i64);
                        if let (Some(start), Some(end)) = (start_val, end_val) {
                            if start > end {
                                return Err(SchemaError::MalformedLocation { start, end });
                            }
                        }
                    },
                }
            }
        }

        Ok(ValidatedRecord {
            record,
            unique_keys,
        })
    }

    pub fn validate_relationship_count(&self, kind: &str, name: &str, actual: usize)
                                       -> Result<()>
    {
        let rel = self.relationship(kind, name)?;

        if rel.cardinality.allows(actual) {
            Ok(())
        } else {
            Err(SchemaError::CardinalityViolation {
                kind: kind.to_shared_str(),
                name: rel.name.clone(),
                label: rel.label.clone(),
                expected: rel.cardinality,
                actual,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object: {}", value),
        }
    }

    fn small_registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.define_entity(
            EntityDef::new("Thing").abstract_kind()
                .field(FieldDef::string("key").required().unique())
                .field(FieldDef::boolean("flag").default_value(json!(false)))).unwrap();
        registry.define_entity(
            EntityDef::new("Widget").parent("Thing")
                .field(FieldDef::string("colour").choices(&["red", "blue"]))
                .field(FieldDef::integer("lo"))
                .field(FieldDef::integer("hi"))
                .constraint(Constraint::start_not_after_end("lo", "hi"))).unwrap();
        registry.define_relationship("Widget", "parts", "PART_OF", "Thing",
                                     Cardinality::OneOrMore, Direction::Incoming).unwrap();
        registry
    }

    #[test]
    fn test_define_entity_twice() {
        let mut registry = small_registry();
        let same = EntityDef::new("Thing").abstract_kind()
            .field(FieldDef::string("key").required().unique())
            .field(FieldDef::boolean("flag").default_value(json!(false)));
        assert!(registry.define_entity(same).is_ok());

        let different = EntityDef::new("Thing").field(FieldDef::string("key"));
        assert!(matches!(registry.define_entity(different),
                         Err(SchemaError::DuplicateDefinition(_))));
    }

    #[test]
    fn test_define_relationship_unknown_kind() {
        let mut registry = small_registry();
        let res = registry.define_relationship("Widget", "gadgets", "HAS", "Gadget",
                                               Cardinality::ZeroOrMore, Direction::Outgoing);
        assert!(matches!(res, Err(SchemaError::UnknownEntityKind(ref k)) if *k == "Gadget"));
    }

    #[test]
    fn test_validate_defaults_and_choices() {
        let registry = small_registry();

        let validated = registry.validate(
            Record::new("Widget", props(json!({"key": "w1", "colour": "red"})))).unwrap();
        assert_eq!(validated.record().get("flag"), Some(&json!(false)));
        assert_eq!(validated.unique_keys().len(), 1);
        assert_eq!(validated.unique_keys()[0].scope, "Thing");

        let res = registry.validate(
            Record::new("Widget", props(json!({"key": "w2", "colour": "green"}))));
        assert!(matches!(res, Err(SchemaError::ValidationError { ref field, .. })
                         if *field == "colour"));
    }

    #[test]
    fn test_validate_missing_and_unknown() {
        let registry = small_registry();

        let res = registry.validate(Record::new("Widget", props(json!({"colour": "red"}))));
        assert!(matches!(res, Err(SchemaError::ValidationError { ref field, .. })
                         if *field == "key"));

        let res = registry.validate(Record::new("Widget", props(json!({"key": "w", "size": 3}))));
        assert!(matches!(res, Err(SchemaError::ValidationError { ref field, .. })
                         if *field == "size"));

        let res = registry.validate(Record::new("Thing", props(json!({"key": "t"}))));
        assert!(res.is_err());
    }

    #[test]
    fn test_validate_ordering_constraint() {
        let registry = small_registry();

        let res = registry.validate(
            Record::new("Widget", props(json!({"key": "w", "lo": 5, "hi": 4}))));
        assert!(matches!(res, Err(SchemaError::MalformedLocation { start: 5, end: 4 })));

        assert!(registry.validate(
            Record::new("Widget", props(json!({"key": "w", "lo": 4, "hi": 4})))).is_ok());
    }

    #[test]
    fn test_relationship_count() {
        let registry = small_registry();

        assert!(registry.validate_relationship_count("Widget", "parts", 2).is_ok());
        assert!(registry.validate_relationship_count("Widget", "PART_OF", 1).is_ok());

        match registry.validate_relationship_count("Widget", "parts", 0) {
            Err(SchemaError::CardinalityViolation { label, expected, actual, .. }) => {
                assert_eq!(label, "PART_OF");
                assert_eq!(expected, Cardinality::OneOrMore);
                assert_eq!(actual, 0);
            },
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(matches!(registry.validate_relationship_count("Widget", "nope", 0),
                         Err(SchemaError::UnknownRelationshipLabel { .. })));
    }

    #[test]
    fn test_cardinality_allows() {
        assert!(Cardinality::One.allows(1));
        assert!(!Cardinality::One.allows(0));
        assert!(!Cardinality::One.allows(2));
        assert!(Cardinality::ZeroOrOne.allows(0));
        assert!(!Cardinality::ZeroOrOne.allows(2));
        assert!(Cardinality::ZeroOrMore.allows(0));
        assert!(!Cardinality::OneOrMore.allows(0));

        assert_eq!(Cardinality::One.upper_bound(), Some(1));
        assert_eq!(Cardinality::ZeroOrOne.upper_bound(), Some(1));
        assert_eq!(Cardinality::OneOrMore.upper_bound(), None);
    }
}

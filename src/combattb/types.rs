use flexstr::SharedStr as FlexStr;

pub type KindName = FlexStr;
pub type FieldName = FlexStr;
pub type RelName = FlexStr;
pub type EdgeLabel = FlexStr;

pub type FeatureUniquename = FlexStr;
pub type LocationKey = FlexStr;
pub type Pmid = FlexStr;
pub type TermName = FlexStr;
pub type TermId = FlexStr;
pub type Accession = FlexStr;
pub type SoId = &'static str;

pub type VariantSetName = FlexStr;
pub type CallSetName = FlexStr;
pub type VariantPk = FlexStr;
pub type HistoryId = FlexStr;

pub type NodeId = i64;
pub type EdgeId = i64;

pub type Residues = String;
pub type Properties = serde_json::Map<String, serde_json::Value>;

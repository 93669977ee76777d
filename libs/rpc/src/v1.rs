//! Message types for `vexdb.v1`

/// Full RPC paths for unary dispatch through the raw codec
pub mod paths {
    pub const SEARCH: &str = "/vexdb.v1.VectorService/Search";
    pub const BATCH_OBJECTS: &str = "/vexdb.v1.VectorService/BatchObjects";
    pub const BATCH_DELETE: &str = "/vexdb.v1.VectorService/BatchDelete";
}

// ===== Batch =====

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchObjectsRequest {
    #[prost(string, tag = "1")]
    pub collection: String,
    #[prost(message, repeated, tag = "2")]
    pub objects: Vec<BatchObject>,
    #[prost(string, tag = "3")]
    pub tenant: String,
    #[prost(enumeration = "ConsistencyLevel", tag = "4")]
    pub consistency_level: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchObject {
    #[prost(string, tag = "1")]
    pub uuid: String,
    #[prost(message, optional, tag = "2")]
    pub properties: Option<::prost_types::Struct>,
    #[prost(float, repeated, tag = "3")]
    pub vector: Vec<f32>,
    #[prost(message, repeated, tag = "4")]
    pub references: Vec<BatchReference>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchReference {
    /// Reference property on the source object
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub target_collection: String,
    #[prost(string, tag = "3")]
    pub target_uuid: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchObjectsReply {
    #[prost(float, tag = "1")]
    pub took: f32,
    /// Item-level failures; indices refer to the request's objects list
    #[prost(message, repeated, tag = "2")]
    pub errors: Vec<BatchObjectsError>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchObjectsError {
    #[prost(int32, tag = "1")]
    pub index: i32,
    #[prost(string, tag = "2")]
    pub error: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchDeleteRequest {
    #[prost(string, tag = "1")]
    pub collection: String,
    #[prost(message, optional, tag = "2")]
    pub filters: Option<Filters>,
    #[prost(bool, tag = "3")]
    pub verbose: bool,
    #[prost(bool, tag = "4")]
    pub dry_run: bool,
    #[prost(string, tag = "5")]
    pub tenant: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchDeleteReply {
    #[prost(float, tag = "1")]
    pub took: f32,
    #[prost(int64, tag = "2")]
    pub matches: i64,
    #[prost(int64, tag = "3")]
    pub successful: i64,
    #[prost(int64, tag = "4")]
    pub failed: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ConsistencyLevel {
    Unspecified = 0,
    One = 1,
    Quorum = 2,
    All = 3,
}

// ===== Search =====

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchRequest {
    #[prost(string, tag = "1")]
    pub collection: String,
    #[prost(string, tag = "2")]
    pub tenant: String,
    #[prost(uint32, tag = "3")]
    pub limit: u32,
    #[prost(uint32, tag = "4")]
    pub offset: u32,
    #[prost(message, optional, tag = "5")]
    pub near_vector: Option<NearVector>,
    #[prost(message, optional, tag = "6")]
    pub bm25: Option<Bm25>,
    #[prost(message, optional, tag = "7")]
    pub filters: Option<Filters>,
    #[prost(message, optional, tag = "8")]
    pub metadata: Option<MetadataRequest>,
    #[prost(message, optional, tag = "9")]
    pub properties: Option<PropertiesRequest>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NearVector {
    #[prost(float, repeated, tag = "1")]
    pub vector: Vec<f32>,
    #[prost(double, optional, tag = "2")]
    pub certainty: Option<f64>,
    #[prost(double, optional, tag = "3")]
    pub distance: Option<f64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Bm25 {
    #[prost(string, tag = "1")]
    pub query: String,
    /// Properties to search; empty means all text properties
    #[prost(string, repeated, tag = "2")]
    pub properties: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MetadataRequest {
    #[prost(bool, tag = "1")]
    pub uuid: bool,
    #[prost(bool, tag = "2")]
    pub vector: bool,
    #[prost(bool, tag = "3")]
    pub distance: bool,
    #[prost(bool, tag = "4")]
    pub certainty: bool,
    #[prost(bool, tag = "5")]
    pub score: bool,
    #[prost(bool, tag = "6")]
    pub creation_time_unix: bool,
    #[prost(bool, tag = "7")]
    pub last_update_time_unix: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PropertiesRequest {
    /// Empty means all properties
    #[prost(string, repeated, tag = "1")]
    pub names: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchReply {
    #[prost(float, tag = "1")]
    pub took: f32,
    #[prost(message, repeated, tag = "2")]
    pub results: Vec<SearchResult>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchResult {
    #[prost(message, optional, tag = "1")]
    pub properties: Option<::prost_types::Struct>,
    #[prost(message, optional, tag = "2")]
    pub metadata: Option<MetadataResult>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MetadataResult {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(float, repeated, tag = "2")]
    pub vector: Vec<f32>,
    #[prost(float, optional, tag = "3")]
    pub distance: Option<f32>,
    #[prost(float, optional, tag = "4")]
    pub certainty: Option<f32>,
    #[prost(float, optional, tag = "5")]
    pub score: Option<f32>,
    #[prost(int64, tag = "6")]
    pub creation_time_unix: i64,
    #[prost(int64, tag = "7")]
    pub last_update_time_unix: i64,
}

// ===== Filters =====

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Filters {
    #[prost(enumeration = "filters::Operator", tag = "1")]
    pub operator: i32,
    /// Property path the test applies to; empty for And/Or nodes
    #[prost(string, repeated, tag = "2")]
    pub on: Vec<String>,
    /// Child clauses for And/Or nodes
    #[prost(message, repeated, tag = "3")]
    pub filters: Vec<Filters>,
    #[prost(oneof = "filters::TestValue", tags = "4, 5, 6, 7, 8")]
    pub test_value: Option<filters::TestValue>,
}

pub mod filters {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Operator {
        Unspecified = 0,
        Equal = 1,
        NotEqual = 2,
        GreaterThan = 3,
        GreaterThanEqual = 4,
        LessThan = 5,
        LessThanEqual = 6,
        Like = 7,
        ContainsAny = 8,
        And = 9,
        Or = 10,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum TestValue {
        #[prost(string, tag = "4")]
        Text(String),
        #[prost(int64, tag = "5")]
        Int(i64),
        #[prost(double, tag = "6")]
        Number(f64),
        #[prost(bool, tag = "7")]
        Boolean(bool),
        #[prost(message, tag = "8")]
        TextArray(super::TextArray),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TextArray {
    #[prost(string, repeated, tag = "1")]
    pub values: Vec<String>,
}

//! Typed domain objects exchanged with the VexDB API
//!
//! REST-facing types carry serde mappings for the server's JSON shapes;
//! gRPC-facing inputs are converted to `vexdb-rpc` messages by the facades.
//! Unknown JSON fields from newer servers are ignored on deserialization.

use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{VexdbError, VexdbResult};
use crate::filter::Filter;

// ===== Server meta =====

/// Server build information reported by `/v1/meta`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub version: String,
    #[serde(default)]
    pub git_hash: Option<String>,
    #[serde(default)]
    pub modules: serde_json::Value,
}

/// Parsed server version, ordered for capability checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ServerVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse `"1.32.0"` style versions; pre-release suffixes are ignored
    pub fn parse(raw: &str) -> VexdbResult<Self> {
        let base = raw.split(['-', '+']).next().unwrap_or(raw);
        let mut parts = base.split('.');

        let mut next = |what: &str| -> VexdbResult<u32> {
            parts
                .next()
                .and_then(|p| p.parse::<u32>().ok())
                .ok_or_else(|| {
                    VexdbError::Decode(format!("bad server version '{}': missing {}", raw, what))
                })
        };

        let major = next("major")?;
        let minor = next("minor")?;
        let patch = parts.next().and_then(|p| p.parse::<u32>().ok()).unwrap_or(0);

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl PartialOrd for ServerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// ===== Collections =====

/// Distance metric used by a collection's vector index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Dot,
    L2,
    Hamming,
}

/// HNSW index parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HnswConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ef_construction: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ef: Option<i32>,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            max_connections: Some(32),
            ef_construction: Some(128),
            ef: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorIndexConfig {
    pub distance: DistanceMetric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hnsw: Option<HnswConfig>,
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            distance: DistanceMetric::Cosine,
            hnsw: None,
        }
    }
}

/// Property data types supported by the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Bool,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "uuid")]
    Uuid,
    #[serde(rename = "text[]")]
    TextArray,
    #[serde(rename = "int[]")]
    IntArray,
    #[serde(rename = "number[]")]
    NumberArray,
    #[serde(rename = "object")]
    Object,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_filterable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_searchable: Option<bool>,
}

impl Property {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: None,
            index_filterable: None,
            index_searchable: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiTenancyConfig {
    pub enabled: bool,
    #[serde(default)]
    pub auto_tenant_creation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationConfig {
    pub factor: u32,
    #[serde(default)]
    pub async_enabled: bool,
}

/// Collection definition as accepted and returned by `/v1/schema`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub vector_index: VectorIndexConfig,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_tenancy: Option<MultiTenancyConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication: Option<ReplicationConfig>,
}

impl CollectionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            vector_index: VectorIndexConfig::default(),
            properties: Vec::new(),
            multi_tenancy: None,
            replication: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_distance(mut self, distance: DistanceMetric) -> Self {
        self.vector_index.distance = distance;
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_multi_tenancy(mut self, config: MultiTenancyConfig) -> Self {
        self.multi_tenancy = Some(config);
        self
    }
}

// ===== Data objects =====

/// Cross-reference from one object to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Reference property on the source object
    pub property: String,
    pub target_collection: String,
    pub target_id: Uuid,
}

/// Object payload for insert and batch operations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataObject {
    /// Explicit identifier; the server assigns one when absent
    pub id: Option<Uuid>,
    /// Named properties; must be a JSON object
    pub properties: serde_json::Value,
    pub vector: Option<Vec<f32>>,
    pub references: Vec<Reference>,
}

impl DataObject {
    pub fn new(properties: serde_json::Value) -> Self {
        Self {
            id: None,
            properties,
            vector: None,
            references: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = Some(vector);
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }
}

/// Object as stored by the server, returned by the REST object endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub id: Uuid,
    pub collection: String,
    #[serde(default)]
    pub properties: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time_unix: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time_unix: Option<i64>,
}

// ===== Batch =====

/// Write consistency for batch operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyLevel {
    One,
    Quorum,
    All,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub tenant: Option<String>,
    pub consistency_level: Option<ConsistencyLevel>,
    pub timeout: Option<Duration>,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn with_consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.consistency_level = Some(level);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Item-level failure inside an otherwise successful batch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItemError {
    /// Index into the caller's input sequence
    pub index: usize,
    pub message: String,
}

/// Aggregate outcome of a batch insert
///
/// `ids` is index-aligned with the input: `Some` holds the identifier the
/// item was stored under, `None` marks an item that failed (its error is in
/// `errors` under the same index). A failed item never aborts its siblings.
#[derive(Debug, Clone, Default)]
pub struct BatchInsertResult {
    pub ids: Vec<Option<Uuid>>,
    pub errors: Vec<BatchItemError>,
    /// Server-reported processing time across all partitions
    pub took: f32,
}

impl BatchInsertResult {
    pub fn successes(&self) -> usize {
        self.ids.iter().filter(|id| id.is_some()).count()
    }

    pub fn failures(&self) -> usize {
        self.errors.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_at(&self, index: usize) -> Option<&BatchItemError> {
        self.errors.iter().find(|e| e.index == index)
    }
}

/// Outcome of a filter-driven batch delete
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    pub matches: i64,
    pub successful: i64,
    pub failed: i64,
    pub took: f32,
}

// ===== Query =====

/// Options shared by all query operations
///
/// One options object instead of per-flag method overloads; the result shape
/// follows what was requested (`vector` is None unless `include_vector`).
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub filter: Option<Filter>,
    pub include_vector: bool,
    /// Subset of properties to return; None means all
    pub return_properties: Option<Vec<String>>,
    pub return_metadata: bool,
    pub tenant: Option<String>,
    /// Max distance for near_vector queries; ignored elsewhere
    pub distance: Option<f64>,
    /// Min certainty for near_vector queries; ignored elsewhere
    pub certainty: Option<f64>,
    pub timeout: Option<Duration>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn include_vector(mut self) -> Self {
        self.include_vector = true;
        self
    }

    pub fn with_return_properties(mut self, names: Vec<String>) -> Self {
        self.return_properties = Some(names);
        self
    }

    pub fn return_metadata(mut self) -> Self {
        self.return_metadata = true;
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_certainty(mut self, certainty: f64) -> Self {
        self.certainty = Some(certainty);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryMetadata {
    pub distance: Option<f32>,
    pub certainty: Option<f32>,
    pub score: Option<f32>,
    pub creation_time_unix: Option<i64>,
    pub last_update_time_unix: Option<i64>,
}

/// One result from a query operation
#[derive(Debug, Clone, PartialEq)]
pub struct QueryObject {
    pub id: Uuid,
    pub properties: serde_json::Value,
    pub vector: Option<Vec<f32>>,
    pub metadata: QueryMetadata,
}

// ===== Tenants =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantActivityStatus {
    #[default]
    Active,
    Inactive,
    Offloaded,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub name: String,
    #[serde(default)]
    pub activity_status: TenantActivityStatus,
}

impl Tenant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            activity_status: TenantActivityStatus::Active,
        }
    }
}

// ===== Backup =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupBackend {
    Filesystem,
    S3,
    Gcs,
}

impl BackupBackend {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            BackupBackend::Filesystem => "filesystem",
            BackupBackend::S3 => "s3",
            BackupBackend::Gcs => "gcs",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl BackupRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    pub fn include(mut self, collection: impl Into<String>) -> Self {
        self.include.push(collection.into());
        self
    }

    pub fn exclude(mut self, collection: impl Into<String>) -> Self {
        self.exclude.push(collection.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackupStatusKind {
    Started,
    Transferring,
    Transferred,
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupStatus {
    pub id: String,
    pub status: BackupStatusKind,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ===== Roles and users =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Action identifier, e.g. `read_collections`
    pub action: String,
    /// Collection name pattern the action applies to; `*` for all
    #[serde(default)]
    pub collection: Option<String>,
}

impl Permission {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            collection: None,
        }
    }

    pub fn on_collection(mut self, pattern: impl Into<String>) -> Self {
        self.collection = Some(pattern.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub active: bool,
}

// ===== Cluster =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardStatus {
    pub name: String,
    pub collection: String,
    #[serde(default)]
    pub object_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub git_hash: Option<String>,
    #[serde(default)]
    pub shards: Vec<ShardStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatistics {
    pub synchronized: bool,
    #[serde(default)]
    pub statistics: serde_json::Value,
}

// ===== Replication =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationType {
    Copy,
    Move,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicateRequest {
    pub collection: String,
    pub shard: String,
    pub source_node: String,
    pub target_node: String,
    #[serde(rename = "type")]
    pub kind: ReplicationType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationState {
    Registered,
    Hydrating,
    Finalizing,
    Ready,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationOperation {
    pub id: Uuid,
    pub collection: String,
    pub shard: String,
    pub source_node: String,
    pub target_node: String,
    #[serde(rename = "type")]
    pub kind: ReplicationType,
    pub status: ReplicationState,
}

// ===== Debug =====

/// Vector index introspection for one shard; a best-effort surface whose
/// fields may vary between server builds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardDebugInfo {
    pub shard: String,
    #[serde(default)]
    pub vector_indexing_status: Option<String>,
    #[serde(default)]
    pub vector_queue_length: Option<u64>,
    #[serde(default)]
    pub compressed: Option<bool>,
    #[serde(default)]
    pub object_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_version_parse_and_order() {
        let old = ServerVersion::parse("1.27.5").unwrap();
        let new = ServerVersion::parse("1.32.0-rc.1").unwrap();
        assert!(new > old);
        assert_eq!(new, ServerVersion::new(1, 32, 0));
        assert_eq!(ServerVersion::parse("1.30").unwrap().patch, 0);
    }

    #[test]
    fn test_version_parse_rejects_garbage() {
        assert!(ServerVersion::parse("not-a-version").is_err());
        assert!(ServerVersion::parse("").is_err());
    }

    #[test]
    fn test_collection_config_wire_shape() {
        let config = CollectionConfig::new("Books")
            .with_distance(DistanceMetric::Dot)
            .with_property(Property::new("title", DataType::Text));

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["name"], "Books");
        assert_eq!(value["vectorIndex"]["distance"], "dot");
        assert_eq!(value["properties"][0]["dataType"], "text");
    }

    #[test]
    fn test_collection_config_tolerates_unknown_fields() {
        let value = json!({
            "name": "Books",
            "vectorIndex": {"distance": "cosine"},
            "someFutureField": {"a": 1},
        });
        let config: CollectionConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.name, "Books");
    }

    #[test]
    fn test_batch_result_accounting() {
        let id = Uuid::new_v4();
        let result = BatchInsertResult {
            ids: vec![Some(id), None, Some(Uuid::new_v4())],
            errors: vec![BatchItemError {
                index: 1,
                message: "bad properties".to_string(),
            }],
            took: 0.01,
        };
        assert_eq!(result.successes(), 2);
        assert_eq!(result.failures(), 1);
        assert!(!result.is_complete_success());
        assert_eq!(result.error_at(1).unwrap().message, "bad properties");
        assert!(result.error_at(0).is_none());
    }

    #[test]
    fn test_tenant_status_tolerates_new_variants() {
        let tenant: Tenant =
            serde_json::from_value(json!({"name": "acme", "activityStatus": "FROZEN"})).unwrap();
        assert_eq!(tenant.activity_status, TenantActivityStatus::Unknown);
    }
}

//! Bulk writes over the gRPC batch endpoints
//!
//! Large inputs are partitioned client-side and sent as consecutive unary
//! calls. Item failures reported by the server stay item failures here, with
//! indices remapped back into the caller's original sequence.

use uuid::Uuid;

use crate::error::{VexdbError, VexdbResult};
use crate::executor::{Executor, decode_grpc};
use crate::filter::Filter;
use crate::models::{
    BatchDeleteResult, BatchInsertResult, BatchItemError, BatchOptions, ConsistencyLevel,
    DataObject,
};
use crate::transport::WireRequest;
use crate::validate;
use vexdb_rpc::json_to_struct;
use vexdb_rpc::v1;

/// Max objects per partition
pub const MAX_BATCH_OBJECTS: usize = 1000;
/// Max encoded payload bytes per partition
pub const MAX_BATCH_BYTES: usize = 8 * 1024 * 1024; // 8MiB

#[derive(Clone)]
pub struct Batch {
    executor: Executor,
}

/// One encoded item, carrying its position in the caller's input
struct EncodedObject {
    index: usize,
    id: Uuid,
    proto: v1::BatchObject,
    encoded_len: usize,
}

impl Batch {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Insert many objects, preserving input order in the result
    ///
    /// Objects without an explicit id get a client-generated one, so the
    /// returned `ids` vector is complete for every item that was accepted.
    /// An item that fails validation or is rejected by the server becomes a
    /// per-item error at its input index; it never aborts its siblings. An
    /// empty input returns an empty result without any network traffic.
    pub async fn insert_objects(
        &self,
        collection: &str,
        objects: &[DataObject],
        options: &BatchOptions,
    ) -> VexdbResult<BatchInsertResult> {
        validate::collection_name(collection)?;

        let mut result = BatchInsertResult {
            ids: vec![None; objects.len()],
            errors: Vec::new(),
            took: 0.0,
        };
        if objects.is_empty() {
            return Ok(result);
        }

        let mut pending = Vec::with_capacity(objects.len());
        for (index, object) in objects.iter().enumerate() {
            match Self::encode_object(object) {
                Ok(encoded) => {
                    if encoded.encoded_len > MAX_BATCH_BYTES {
                        result.errors.push(BatchItemError {
                            index,
                            message: format!(
                                "object exceeds the {} byte batch limit",
                                MAX_BATCH_BYTES
                            ),
                        });
                    } else {
                        pending.push(EncodedObject { index, ..encoded });
                    }
                }
                Err(err) => {
                    result.errors.push(BatchItemError {
                        index,
                        message: err.to_string(),
                    });
                }
            }
        }

        for partition in Self::partition(&pending) {
            let request = v1::BatchObjectsRequest {
                collection: collection.to_string(),
                objects: partition.iter().map(|item| item.proto.clone()).collect(),
                tenant: options.tenant.clone().unwrap_or_default(),
                consistency_level: Self::consistency(options.consistency_level),
            };
            let mut wire = WireRequest::grpc(v1::paths::BATCH_OBJECTS, &request);
            if let Some(timeout) = options.timeout {
                wire = wire.with_timeout(timeout);
            }

            let reply: v1::BatchObjectsReply = decode_grpc(self.executor.send(wire).await?)?;
            result.took += reply.took;

            let mut failed = vec![false; partition.len()];
            for error in reply.errors {
                let local = error.index as usize;
                if let Some(item) = partition.get(local) {
                    failed[local] = true;
                    result.errors.push(BatchItemError {
                        index: item.index,
                        message: error.error,
                    });
                }
            }
            for (local, item) in partition.iter().enumerate() {
                if !failed[local] {
                    result.ids[item.index] = Some(item.id);
                }
            }
        }

        result.errors.sort_by_key(|e| e.index);
        Ok(result)
    }

    /// Delete every object matching the filter
    pub async fn delete_objects(
        &self,
        collection: &str,
        filter: &Filter,
        options: &BatchOptions,
    ) -> VexdbResult<BatchDeleteResult> {
        validate::collection_name(collection)?;
        let request = v1::BatchDeleteRequest {
            collection: collection.to_string(),
            filters: Some(filter.to_proto()?),
            verbose: false,
            dry_run: false,
            tenant: options.tenant.clone().unwrap_or_default(),
        };
        let mut wire = WireRequest::grpc(v1::paths::BATCH_DELETE, &request);
        if let Some(timeout) = options.timeout {
            wire = wire.with_timeout(timeout);
        }
        let reply: v1::BatchDeleteReply = decode_grpc(self.executor.send(wire).await?)?;
        Ok(BatchDeleteResult {
            matches: reply.matches,
            successful: reply.successful,
            failed: reply.failed,
            took: reply.took,
        })
    }

    fn encode_object(object: &DataObject) -> VexdbResult<EncodedObject> {
        validate::object_properties(&object.properties)?;
        let properties = match &object.properties {
            serde_json::Value::Null => None,
            value => json_to_struct(value),
        };
        if !object.properties.is_null() && properties.is_none() {
            return Err(VexdbError::Validation(
                "object properties must be a JSON object".to_string(),
            ));
        }

        let id = object.id.unwrap_or_else(Uuid::new_v4);
        let proto = v1::BatchObject {
            uuid: id.to_string(),
            properties,
            vector: object.vector.clone().unwrap_or_default(),
            references: object
                .references
                .iter()
                .map(|r| v1::BatchReference {
                    name: r.property.clone(),
                    target_collection: r.target_collection.clone(),
                    target_uuid: r.target_id.to_string(),
                })
                .collect(),
        };
        let encoded_len = prost::Message::encoded_len(&proto);
        Ok(EncodedObject {
            index: 0,
            id,
            proto,
            encoded_len,
        })
    }

    /// Split into runs that respect both the object count and byte limits
    fn partition(items: &[EncodedObject]) -> Vec<&[EncodedObject]> {
        let mut partitions = Vec::new();
        let mut start = 0;
        let mut bytes = 0;
        for (i, item) in items.iter().enumerate() {
            let count = i - start;
            if count > 0 && (count >= MAX_BATCH_OBJECTS || bytes + item.encoded_len > MAX_BATCH_BYTES)
            {
                partitions.push(&items[start..i]);
                start = i;
                bytes = 0;
            }
            bytes += item.encoded_len;
        }
        if start < items.len() {
            partitions.push(&items[start..]);
        }
        partitions
    }

    fn consistency(level: Option<ConsistencyLevel>) -> i32 {
        match level {
            None => v1::ConsistencyLevel::Unspecified as i32,
            Some(ConsistencyLevel::One) => v1::ConsistencyLevel::One as i32,
            Some(ConsistencyLevel::Quorum) => v1::ConsistencyLevel::Quorum as i32,
            Some(ConsistencyLevel::All) => v1::ConsistencyLevel::All as i32,
        }
    }
}

//! Wire types for the `vexdb.v1.VectorService` gRPC surface
//!
//! Hand-maintained prost mappings of the server's protobuf schema, kept in
//! lockstep with the proto definitions shipped by VexDB. Search and batch
//! traffic goes over gRPC; everything else in the client speaks REST/JSON.
//!
//! Unknown fields added by newer servers are ignored by prost decoding, so
//! additive schema evolution does not break this crate.

pub mod conversions;
pub mod v1;

pub use conversions::{json_to_struct, json_to_value, struct_to_json, value_to_json};

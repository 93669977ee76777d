//! # VexDB gRPC transport layer
//!
//! Channel creation with HTTP/2 tuning, authentication interceptors, and the
//! raw unary codec used by the client's transport to dispatch
//! `vexdb.v1.VectorService` calls without a per-RPC generated client.
//!
//! ## Quick Start
//! ```ignore
//! use vexdb_grpc::{create_channel_lazy, HeadersInterceptor};
//!
//! let channel = create_channel_lazy("http://localhost:50051")?;
//! let auth = HeadersInterceptor::bearer("my-api-key");
//! ```

pub mod channel;
pub mod codec;
pub mod error;
pub mod interceptors;

pub use channel::{
  ChannelConfig, create_channel, create_channel_lazy, create_channel_lazy_with_config,
  create_channel_with_config,
};
pub use codec::RawCodec;
pub use error::{GrpcError, GrpcResult};
pub use interceptors::HeadersInterceptor;

//! Resource facades grouping related operations
//!
//! Each facade borrows the shared [`Executor`](crate::executor::Executor)
//! and is cheap to clone. The async facades here hold the only copy of each
//! operation body; the blocking surface wraps them one to one.

pub mod backup;
pub mod batch;
pub mod cluster;
pub mod collections;
pub mod data;
pub mod debug;
pub mod query;
pub mod rbac;
pub mod replication;
pub mod tenants;

pub use backup::Backup;
pub use batch::Batch;
pub use cluster::Cluster;
pub use collections::Collections;
pub use data::Data;
pub use debug::Debug;
pub use query::Query;
pub use rbac::Rbac;
pub use replication::Replication;
pub use tenants::Tenants;

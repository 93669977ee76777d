//! Backup creation and restore over `/v1/backups`
//!
//! Backups run server-side; `create` and `restore` return as soon as the
//! server accepts the job, and the status endpoints report progress.

use http::Method;

use crate::error::VexdbResult;
use crate::executor::{Executor, expect_rest};
use crate::models::{BackupBackend, BackupRequest, BackupStatus};
use crate::transport::WireRequest;
use crate::validate;

#[derive(Clone)]
pub struct Backup {
    executor: Executor,
}

impl Backup {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Start a backup job on the given backend
    pub async fn create(
        &self,
        backend: BackupBackend,
        request: &BackupRequest,
    ) -> VexdbResult<BackupStatus> {
        validate::backup_id(&request.id)?;
        let body = serde_json::to_value(request)?;
        let path = format!("/v1/backups/{}", backend.as_str());
        let wire = WireRequest::rest(Method::POST, path, Some(body));
        let body = expect_rest(self.executor.send(wire).await?, &[200, 202])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn status(&self, backend: BackupBackend, id: &str) -> VexdbResult<BackupStatus> {
        validate::backup_id(id)?;
        let path = format!("/v1/backups/{}/{}", backend.as_str(), id);
        let wire = WireRequest::rest(Method::GET, path, None);
        let body = expect_rest(self.executor.send(wire).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    /// Start restoring a previously completed backup
    pub async fn restore(&self, backend: BackupBackend, id: &str) -> VexdbResult<BackupStatus> {
        validate::backup_id(id)?;
        let path = format!("/v1/backups/{}/{}/restore", backend.as_str(), id);
        let wire = WireRequest::rest(Method::POST, path, None);
        let body = expect_rest(self.executor.send(wire).await?, &[200, 202])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn restore_status(
        &self,
        backend: BackupBackend,
        id: &str,
    ) -> VexdbResult<BackupStatus> {
        validate::backup_id(id)?;
        let path = format!("/v1/backups/{}/{}/restore", backend.as_str(), id);
        let wire = WireRequest::rest(Method::GET, path, None);
        let body = expect_rest(self.executor.send(wire).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    /// Cancel a backup that has not completed yet
    pub async fn cancel(&self, backend: BackupBackend, id: &str) -> VexdbResult<()> {
        validate::backup_id(id)?;
        let path = format!("/v1/backups/{}/{}", backend.as_str(), id);
        let wire = WireRequest::rest(Method::DELETE, path, None);
        expect_rest(self.executor.send(wire).await?, &[204])?;
        Ok(())
    }
}

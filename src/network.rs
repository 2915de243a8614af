//! Network (remote federation) endpoints.
//!
//! Thin pass-through calls over the executor for `/network/self` and
//! `/network/remotes`. The remote schema is still moving on the server side, so
//! reads return raw JSON; writes take typed payloads serialized with camelCase keys.

use serde::{Deserialize, Serialize};

use crate::error::MeilisearchError;
use crate::execution::RequestExecutor;
use crate::types::RequestBody;

/// A remote Meilisearch instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remote {
    pub uid: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_api_key: Option<String>,
}

/// Partial update of a remote. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_api_key: Option<String>,
}

/// Network endpoints bound to an executor.
#[derive(Debug, Clone, Copy)]
pub struct Network<'a> {
    executor: &'a RequestExecutor,
}

impl RequestExecutor {
    /// Network and remote endpoints served by this executor.
    pub fn network(&self) -> Network<'_> {
        Network { executor: self }
    }
}

impl<'a> Network<'a> {
    /// Name of the instance answering the request (`GET /network/self`).
    pub async fn self_name(&self) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.executor.get("/network/self", None).await
    }

    pub async fn update_self(
        &self,
        uid: &str,
    ) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.executor
            .put("/network/self", Some(RequestBody::json(uid)?), None)
            .await
    }

    pub async fn remotes(&self) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.executor.get("/network/remotes", None).await
    }

    pub async fn remote(&self, uid: &str) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.executor
            .get(&format!("/network/remotes/{uid}"), None)
            .await
    }

    pub async fn add_remote(
        &self,
        remote: &Remote,
    ) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.executor
            .post("/network/remotes", Some(RequestBody::json(remote)?), None)
            .await
    }

    pub async fn update_remote(
        &self,
        uid: &str,
        update: &RemoteUpdate,
    ) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.executor
            .patch(
                &format!("/network/remotes/{uid}"),
                Some(RequestBody::json(update)?),
                None,
            )
            .await
    }

    pub async fn delete_remote(
        &self,
        uid: &str,
    ) -> Result<Option<serde_json::Value>, MeilisearchError> {
        self.executor
            .delete(&format!("/network/remotes/{uid}"), None)
            .await
    }
}

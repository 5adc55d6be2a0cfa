// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Remote execution entrypoint

use super::CacheCoordinator;
use crate::error::{CacheError, CacheResult};
use crate::query::{Parameters, Query, Uid};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Lets a remote client ask the server to run a query into the cache.
///
/// Disabled unless `allow_remote_execution` is set. Results reach the client
/// through the transport's subscription to `uid`, not through this call.
#[derive(Clone)]
pub struct RemoteQueryEndpoint {
    coordinator: Arc<CacheCoordinator>,
}

impl RemoteQueryEndpoint {
    pub fn new(coordinator: Arc<CacheCoordinator>) -> Self {
        Self { coordinator }
    }

    pub async fn run_query(
        &self,
        uid: &Uid,
        text: &str,
        parameters: Parameters,
        timestamp: DateTime<Utc>,
    ) -> CacheResult<()> {
        if !self.coordinator.config().allow_remote_execution {
            log::warn!("Rejected remote query {}: remote execution is disabled", uid);
            return Err(CacheError::Unauthorized(format!(
                "remote query execution is not allowed (uid {})",
                uid
            )));
        }

        let query = Query::with_parameters(text, parameters);
        let expected = query.uid();
        if &expected != uid {
            return Err(CacheError::InvalidRequest(format!(
                "uid {} does not match query (expected {})",
                uid, expected
            )));
        }

        log::debug!("Remote run of {} requested at {}", uid, timestamp);
        self.coordinator.submit(uid, &query).await
    }
}

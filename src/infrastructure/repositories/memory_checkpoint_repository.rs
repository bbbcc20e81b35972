// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scan::ScanState;
use crate::domain::repositories::checkpoint_repository::{CheckpointRepository, RepositoryError};
use async_trait::async_trait;
use dashmap::DashMap;

/// 内存检查点仓库（用于测试与一次性扫描）
#[derive(Default)]
pub struct MemoryCheckpointRepository {
    data: DashMap<String, ScanState>,
}

impl MemoryCheckpointRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointRepository for MemoryCheckpointRepository {
    async fn load_checkpoint(&self, origin: &str) -> Result<Option<ScanState>, RepositoryError> {
        Ok(self.data.get(origin).map(|entry| entry.value().clone()))
    }

    async fn save_checkpoint(&self, origin: &str, state: &ScanState) -> Result<(), RepositoryError> {
        self.data.insert(origin.to_string(), state.clone());
        Ok(())
    }

    async fn clear_checkpoint(&self, origin: &str) -> Result<(), RepositoryError> {
        self.data.remove(origin);
        Ok(())
    }
}

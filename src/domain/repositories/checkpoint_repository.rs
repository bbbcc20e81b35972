// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scan::ScanState;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 检查点仓库特质
///
/// 定义扫描状态的持久化接口，按起点 URL 索引。
/// 加载不到检查点不算错误，返回 `Ok(None)`。
#[async_trait]
pub trait CheckpointRepository: Send + Sync {
    /// 加载指定起点的检查点
    async fn load_checkpoint(&self, origin: &str) -> Result<Option<ScanState>, RepositoryError>;
    /// 保存指定起点的检查点
    async fn save_checkpoint(&self, origin: &str, state: &ScanState)
        -> Result<(), RepositoryError>;
    /// 清除指定起点的检查点
    async fn clear_checkpoint(&self, origin: &str) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<T: CheckpointRepository + ?Sized> CheckpointRepository for Arc<T> {
    async fn load_checkpoint(&self, origin: &str) -> Result<Option<ScanState>, RepositoryError> {
        (**self).load_checkpoint(origin).await
    }

    async fn save_checkpoint(
        &self,
        origin: &str,
        state: &ScanState,
    ) -> Result<(), RepositoryError> {
        (**self).save_checkpoint(origin, state).await
    }

    async fn clear_checkpoint(&self, origin: &str) -> Result<(), RepositoryError> {
        (**self).clear_checkpoint(origin).await
    }
}

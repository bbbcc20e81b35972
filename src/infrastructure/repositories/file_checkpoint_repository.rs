// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scan::ScanState;
use crate::domain::repositories::checkpoint_repository::{CheckpointRepository, RepositoryError};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// 基于本地文件的检查点仓库
///
/// 每个扫描源站对应一个 JSON 文件。写入先落临时文件再
/// 原子改名，进程中途退出不会留下半截检查点。
pub struct FileCheckpointRepository {
    base_dir: PathBuf,
}

impl FileCheckpointRepository {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 源站地址映射为检查点文件路径
    ///
    /// 文件名保留可读前缀，追加哈希后缀区分清洗后同名的源站。
    fn checkpoint_path(&self, origin: &str) -> PathBuf {
        let readable: String = origin
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .take(64)
            .collect();
        let mut hasher = DefaultHasher::new();
        origin.hash(&mut hasher);
        self.base_dir
            .join(format!("{}-{:016x}.json", readable, hasher.finish()))
    }
}

#[async_trait]
impl CheckpointRepository for FileCheckpointRepository {
    async fn load_checkpoint(&self, origin: &str) -> Result<Option<ScanState>, RepositoryError> {
        let path = self.checkpoint_path(origin);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }

    async fn save_checkpoint(&self, origin: &str, state: &ScanState) -> Result<(), RepositoryError> {
        let path = self.checkpoint_path(origin);

        // 确保目录存在
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec_pretty(state)?;
        let tmp_path = tmp_path_for(&path);
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        drop(file);

        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    async fn clear_checkpoint(&self, origin: &str) -> Result<(), RepositoryError> {
        let path = self.checkpoint_path(origin);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut os_string = path.as_os_str().to_os_string();
    os_string.push(".tmp");
    PathBuf::from(os_string)
}

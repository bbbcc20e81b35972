// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{scan_service, StubEngine};
use async_trait::async_trait;
use scanrs::domain::models::artifact::{ArtifactCategory, ExtractionResultSet};
use scanrs::domain::models::scan::{ScanState, ScanStatus};
use scanrs::domain::repositories::checkpoint_repository::{CheckpointRepository, RepositoryError};
use scanrs::infrastructure::repositories::file_checkpoint_repository::FileCheckpointRepository;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

fn pages() -> HashMap<String, String> {
    HashMap::from([
        (
            "http://stub.local/".to_string(),
            r#"<html><body><a href="/inner">内页</a></body></html>"#.to_string(),
        ),
        (
            "http://stub.local/inner".to_string(),
            "<html><body><p>客服电话 13812345678</p></body></html>".to_string(),
        ),
    ])
}

/// 写盘失败的仓库，用来验证检查点故障只降级
struct FailingRepo;

#[async_trait]
impl CheckpointRepository for FailingRepo {
    async fn load_checkpoint(&self, _origin: &str) -> Result<Option<ScanState>, RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::other("disk gone")))
    }

    async fn save_checkpoint(&self, _origin: &str, _state: &ScanState) -> Result<(), RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::other("disk gone")))
    }

    async fn clear_checkpoint(&self, _origin: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::other("disk gone")))
    }
}

/// 停止后的状态落成磁盘文件，恢复完成后同一文件记录最终状态
#[tokio::test]
async fn test_file_checkpoint_survives_stop_and_records_completion() {
    let dir = tempfile::tempdir().unwrap();
    let origin = Url::parse("http://stub.local/").unwrap();

    // 1. 第一次运行在第一层之后停止
    {
        let engine = Arc::new(StubEngine::gated(pages()));
        let repo: Arc<dyn CheckpointRepository> =
            Arc::new(FileCheckpointRepository::new(dir.path()));
        let service = scan_service(engine.clone(), repo, 2, 2);
        let handle = service.handle();

        let scan_origin = origin.clone();
        let scan = tokio::spawn(async move {
            service
                .run_deep_scan(&scan_origin, &ExtractionResultSet::new())
                .await
        });
        engine.wait_for_started(1).await;
        handle.stop();
        engine.release(1);
        let report = timeout(Duration::from_secs(10), scan)
            .await
            .expect("scan timed out")
            .expect("scan task panicked");
        assert_eq!(report.status, ScanStatus::Stopped);
    }

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1, "stop should leave exactly one checkpoint file");

    // 2. 恢复运行直至完成，检查点带着最终聚合留在磁盘上
    let engine = Arc::new(StubEngine::new(pages()));
    let repo = Arc::new(FileCheckpointRepository::new(dir.path()));
    let service = scan_service(engine.clone(), repo.clone(), 2, 2);
    let report = service
        .run_deep_scan(&origin, &ExtractionResultSet::new())
        .await;

    assert_eq!(report.status, ScanStatus::Completed);
    assert_eq!(engine.count("http://stub.local/"), 0);
    assert_eq!(engine.count("http://stub.local/inner"), 1);

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    let saved = repo
        .load_checkpoint(origin.as_str())
        .await
        .unwrap()
        .expect("completed state should stay on disk");
    assert_eq!(saved.status, ScanStatus::Completed);
    assert_eq!(saved.visited.len(), 2);
    assert!(saved
        .aggregate
        .get(&ArtifactCategory::Phone)
        .is_some_and(|values| values.contains("13812345678")));
}

/// 已完成的检查点不触发续扫，下一次运行从零开始并覆盖它
#[tokio::test]
async fn test_completed_checkpoint_starts_fresh_run() {
    let dir = tempfile::tempdir().unwrap();
    let origin = Url::parse("http://stub.local/").unwrap();
    let repo: Arc<dyn CheckpointRepository> = Arc::new(FileCheckpointRepository::new(dir.path()));

    let first_run_id = {
        let engine = Arc::new(StubEngine::new(pages()));
        let service = scan_service(engine.clone(), repo.clone(), 2, 2);
        let report = service
            .run_deep_scan(&origin, &ExtractionResultSet::new())
            .await;
        assert_eq!(report.status, ScanStatus::Completed);
        assert_eq!(engine.count("http://stub.local/"), 1);
        report.run_id
    };

    // 第二次运行不把上一轮的 visited 当成自己的
    let engine = Arc::new(StubEngine::new(pages()));
    let service = scan_service(engine.clone(), repo, 2, 2);
    let report = service
        .run_deep_scan(&origin, &ExtractionResultSet::new())
        .await;

    assert_eq!(report.status, ScanStatus::Completed);
    assert_ne!(report.run_id, first_run_id);
    assert_eq!(report.visited_count, 2);
    assert_eq!(engine.count("http://stub.local/"), 1);
    assert_eq!(engine.count("http://stub.local/inner"), 1);
}

/// 检查点仓库整体故障时扫描仍然走完并给出报告
#[tokio::test]
async fn test_checkpoint_failures_degrade_gracefully() {
    let origin = Url::parse("http://stub.local/").unwrap();
    let engine = Arc::new(StubEngine::new(pages()));
    let repo: Arc<dyn CheckpointRepository> = Arc::new(FailingRepo);
    let service = scan_service(engine.clone(), repo, 2, 2);

    let report = service
        .run_deep_scan(&origin, &ExtractionResultSet::new())
        .await;

    assert_eq!(report.status, ScanStatus::Completed);
    assert_eq!(report.visited_count, 2);
    assert!(report
        .aggregate
        .get(&ArtifactCategory::Phone)
        .is_some_and(|values| values.contains("13812345678")));
}

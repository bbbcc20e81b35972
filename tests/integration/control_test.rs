// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{scan_service, StubEngine};
use scanrs::domain::models::artifact::ExtractionResultSet;
use scanrs::domain::models::scan::{ScanEvent, ScanStatus};
use scanrs::domain::repositories::checkpoint_repository::CheckpointRepository;
use scanrs::infrastructure::repositories::memory_checkpoint_repository::MemoryCheckpointRepository;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use url::Url;

fn site_pages() -> HashMap<String, String> {
    HashMap::from([
        (
            "http://stub.local/".to_string(),
            r#"<html><body><a href="/next">下一页</a></body></html>"#.to_string(),
        ),
        (
            "http://stub.local/next".to_string(),
            r#"<html><body><a href="/far">更远</a></body></html>"#.to_string(),
        ),
        (
            "http://stub.local/far".to_string(),
            "<html><body><p>末端</p></body></html>".to_string(),
        ),
    ])
}

async fn wait_for_status(rx: &mut mpsc::UnboundedReceiver<ScanEvent>, want: ScanStatus) {
    timeout(Duration::from_secs(5), async {
        while let Some(event) = rx.recv().await {
            if matches!(event, ScanEvent::StatusChanged { status } if status == want) {
                return;
            }
        }
        panic!("event channel closed before status {:?}", want);
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for status {:?}", want));
}

/// 停止命令生效后：在途抓取完成、前沿保存进检查点、后续层不再派发
#[tokio::test]
async fn test_stop_preserves_frontier_checkpoint() {
    let origin = Url::parse("http://stub.local/").unwrap();
    let engine = Arc::new(StubEngine::gated(site_pages()));
    let memory = Arc::new(MemoryCheckpointRepository::new());
    let repo: Arc<dyn CheckpointRepository> = memory.clone();
    let service = scan_service(engine.clone(), repo, 3, 2);
    let handle = service.handle();

    let scan_origin = origin.clone();
    let scan = tokio::spawn(async move {
        service
            .run_deep_scan(&scan_origin, &ExtractionResultSet::new())
            .await
    });

    // 1. 等第一层抓取进入在途，再下达停止
    engine.wait_for_started(1).await;
    handle.stop();
    engine.release(1);

    let report = timeout(Duration::from_secs(10), scan)
        .await
        .expect("scan timed out")
        .expect("scan task panicked");

    assert_eq!(report.status, ScanStatus::Stopped);
    assert_eq!(report.visited_count, 1);
    assert_eq!(engine.count("http://stub.local/next"), 0);

    // 2. 检查点应包含已访问集合与未扫描的前沿
    let saved = memory
        .load_checkpoint(origin.as_str())
        .await
        .unwrap()
        .expect("stop should leave a checkpoint");
    assert_eq!(saved.status, ScanStatus::Stopped);
    assert!(saved.visited.contains("http://stub.local/"));
    assert!(saved.pending.contains("http://stub.local/next"));
}

/// 从停止检查点恢复：已访问页面不再抓取，完成状态覆盖停止检查点
#[tokio::test]
async fn test_resume_continues_from_checkpoint() {
    let origin = Url::parse("http://stub.local/").unwrap();
    let memory = Arc::new(MemoryCheckpointRepository::new());

    // 1. 第一次运行在第一层之后停止
    {
        let engine = Arc::new(StubEngine::gated(site_pages()));
        let repo: Arc<dyn CheckpointRepository> = memory.clone();
        let service = scan_service(engine.clone(), repo, 3, 2);
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

    // 2. 换一个引擎恢复，起点页不应被重新抓取
    let engine = Arc::new(StubEngine::new(site_pages()));
    let repo: Arc<dyn CheckpointRepository> = memory.clone();
    let service = scan_service(engine.clone(), repo, 3, 2);
    let report = service
        .run_deep_scan(&origin, &ExtractionResultSet::new())
        .await;

    assert_eq!(report.status, ScanStatus::Completed);
    assert_eq!(engine.count("http://stub.local/"), 0);
    assert_eq!(engine.count("http://stub.local/next"), 1);
    assert_eq!(engine.count("http://stub.local/far"), 1);
    assert_eq!(report.visited_count, 3);
    let saved = memory
        .load_checkpoint(origin.as_str())
        .await
        .unwrap()
        .expect("completion should overwrite the stop checkpoint");
    assert_eq!(saved.status, ScanStatus::Completed);
    assert_eq!(saved.visited.len(), 3);
}

/// 暂停挂起层间推进并发出状态事件，恢复后扫描正常完成
#[tokio::test]
async fn test_pause_and_resume_emit_status_events() {
    let origin = Url::parse("http://stub.local/").unwrap();
    let engine = Arc::new(StubEngine::gated(site_pages()));
    let repo: Arc<dyn CheckpointRepository> = Arc::new(MemoryCheckpointRepository::new());
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let service = scan_service(engine.clone(), repo, 2, 2).with_events(events_tx);
    let handle = service.handle();

    let scan_origin = origin.clone();
    let scan = tokio::spawn(async move {
        service
            .run_deep_scan(&scan_origin, &ExtractionResultSet::new())
            .await
    });

    // 1. 第一层在途时请求暂停，层收尾后应进入 Paused
    engine.wait_for_started(1).await;
    handle.pause();
    engine.release(1);
    wait_for_status(&mut events_rx, ScanStatus::Paused).await;

    // 2. 恢复后继续推进剩余层
    handle.resume();
    wait_for_status(&mut events_rx, ScanStatus::Running).await;
    engine.release(8);

    let report = timeout(Duration::from_secs(10), scan)
        .await
        .expect("scan timed out")
        .expect("scan task panicked");

    assert_eq!(report.status, ScanStatus::Completed);
    assert_eq!(report.visited_count, 2);
    assert_eq!(engine.count("http://stub.local/far"), 0);
}

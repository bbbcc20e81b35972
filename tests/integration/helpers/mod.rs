// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use dashmap::DashMap;
use scanrs::domain::models::artifact::ExtractionResultSet;
use scanrs::domain::models::scan::DeepScanConfig;
use scanrs::domain::patterns::pattern_set::PatternSet;
use scanrs::domain::repositories::checkpoint_repository::CheckpointRepository;
use scanrs::domain::services::deep_scan_service::DeepScanService;
use scanrs::domain::services::extraction_service::ExtractionService;
use scanrs::engines::traits::{EngineError, FetchEngine, FetchRequest, FetchResponse};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// 可编排的测试引擎
///
/// 页面内容来自内存表；开启门控后每次抓取都要先从
/// 信号量拿到一枚许可，测试侧借此精确控制抓取时序。
pub struct StubEngine {
    pages: HashMap<String, String>,
    counts: DashMap<String, usize>,
    started: AtomicUsize,
    release: Semaphore,
    gated: bool,
}

impl StubEngine {
    pub fn new(pages: HashMap<String, String>) -> Self {
        Self {
            pages,
            counts: DashMap::new(),
            started: AtomicUsize::new(0),
            release: Semaphore::new(0),
            gated: false,
        }
    }

    /// 门控模式：抓取在获得许可前挂起
    pub fn gated(pages: HashMap<String, String>) -> Self {
        let mut engine = Self::new(pages);
        engine.gated = true;
        engine
    }

    /// 放行 n 次抓取
    pub fn release(&self, n: usize) {
        self.release.add_permits(n);
    }

    /// 已进入抓取的次数（含挂起中的）
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// 指定 URL 被实际抓取的次数
    pub fn count(&self, url: &str) -> usize {
        self.counts.get(url).map(|entry| *entry.value()).unwrap_or(0)
    }

    /// 等待至少 n 次抓取开始
    pub async fn wait_for_started(&self, n: usize) {
        for _ in 0..200 {
            if self.started() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {} fetches to start", n);
    }
}

#[async_trait]
impl FetchEngine for StubEngine {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        if self.gated {
            let permit = self
                .release
                .acquire()
                .await
                .map_err(|_| EngineError::Other("gate closed".to_string()))?;
            permit.forget();
        }
        *self.counts.entry(request.url.clone()).or_insert(0) += 1;
        match self.pages.get(&request.url) {
            Some(body) => Ok(FetchResponse {
                status_code: 200,
                content: body.clone(),
                content_type: "text/html".to_string(),
                headers: HashMap::new(),
                response_time_ms: 1,
            }),
            None => Err(EngineError::Other("page not mapped".to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// 编译一份默认模式集
pub fn test_patterns() -> Arc<PatternSet> {
    Arc::new(PatternSet::default())
}

/// 从一段 HTML 构造种子提取结果
pub fn seed_from(html: &str, patterns: &PatternSet) -> ExtractionResultSet {
    ExtractionService::extract(html, patterns)
}

/// 构造指定深度与并发的扫描服务
pub fn scan_service<E>(
    engine: Arc<E>,
    checkpoints: Arc<dyn CheckpointRepository>,
    max_depth: u32,
    concurrency: usize,
) -> DeepScanService<E>
where
    E: FetchEngine + 'static,
{
    let config = DeepScanConfig {
        max_depth,
        concurrency,
        fetch_timeout_secs: 5,
        ..DeepScanConfig::default()
    };
    DeepScanService::new(engine, test_patterns(), checkpoints, config)
}

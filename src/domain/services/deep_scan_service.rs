// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::artifact::{ArtifactCategory, ExtractionResultSet};
use crate::domain::models::scan::{
    DeepScanConfig, ScanEvent, ScanReport, ScanState, ScanStatus, ScanTarget,
};
use crate::domain::patterns::pattern_set::PatternSet;
use crate::domain::repositories::checkpoint_repository::CheckpointRepository;
use crate::domain::services::extraction_service::ExtractionService;
use crate::engines::traits::{FetchEngine, FetchRequest};
use crate::utils::url_utils;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// 扫描控制命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlCommand {
    Run,
    Pause,
    Stop,
}

/// 扫描控制句柄
///
/// 暂停与停止都是协作式的：已在途的抓取会自然完成，
/// 控制命令在下一次派发前生效。
#[derive(Clone)]
pub struct ScanHandle {
    control: Arc<watch::Sender<ControlCommand>>,
}

impl ScanHandle {
    /// 暂停派发新的抓取
    pub fn pause(&self) {
        self.control.send_replace(ControlCommand::Pause);
    }

    /// 恢复派发
    pub fn resume(&self) {
        self.control.send_replace(ControlCommand::Run);
    }

    /// 停止本次扫描并保留检查点
    pub fn stop(&self) {
        self.control.send_replace(ControlCommand::Stop);
    }
}

/// 单个 URL 的扫描产出
struct UrlOutcome {
    url: String,
    new_artifacts: usize,
    discovered: BTreeSet<String>,
    failure: Option<String>,
}

/// 缓存的页面内容
struct CachedPage {
    body: String,
    content_type: String,
}

/// 派发给抓取任务的共享上下文
struct UrlTask<E> {
    url: String,
    origin: Url,
    engine: Arc<E>,
    patterns: Arc<PatternSet>,
    cache: Arc<DashMap<String, Arc<CachedPage>>>,
    aggregate: Arc<Mutex<ExtractionResultSet>>,
    semaphore: Arc<Semaphore>,
    timeout: Duration,
    proxy: Option<String>,
    skip_tls_verification: bool,
    allow_subdomains: bool,
    allow_all_domains: bool,
    domestic_phone_only: bool,
}

/// 深度扫描服务
///
/// 以层为单位推进的并发扫描编排：同一层内的 URL 并发
/// 抓取，层与层之间严格顺序推进。抓取失败按"无内容"
/// 处理，不会中断运行。
pub struct DeepScanService<E>
where
    E: FetchEngine + 'static,
{
    engine: Arc<E>,
    patterns: Arc<PatternSet>,
    checkpoints: Arc<dyn CheckpointRepository>,
    config: DeepScanConfig,
    events: Option<mpsc::UnboundedSender<ScanEvent>>,
    control: Arc<watch::Sender<ControlCommand>>,
}

impl<E> DeepScanService<E>
where
    E: FetchEngine + 'static,
{
    /// 创建新的深度扫描服务实例
    pub fn new(
        engine: Arc<E>,
        patterns: Arc<PatternSet>,
        checkpoints: Arc<dyn CheckpointRepository>,
        config: DeepScanConfig,
    ) -> Self {
        let (control, _) = watch::channel(ControlCommand::Run);
        Self {
            engine,
            patterns,
            checkpoints,
            config,
            events: None,
            control: Arc::new(control),
        }
    }

    /// 挂接进度事件通道
    pub fn with_events(mut self, events: mpsc::UnboundedSender<ScanEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// 取得本服务的控制句柄
    pub fn handle(&self) -> ScanHandle {
        ScanHandle {
            control: self.control.clone(),
        }
    }

    /// 执行深度扫描
    ///
    /// `seed_results` 是起点页面的提取结果，扫描从其中的
    /// 脚本、页面与 API 目标开始逐层展开。总是返回报告，
    /// 单个 URL 的失败与检查点故障只降级记录。
    #[instrument(skip(self, seed_results), fields(origin = %origin))]
    pub async fn run_deep_scan(&self, origin: &Url, seed_results: &ExtractionResultSet) -> ScanReport {
        // 新一轮运行从 Running 起步，覆盖上一轮遗留的控制命令
        self.control.send_replace(ControlCommand::Run);
        let mut control_rx = self.control.subscribe();

        let mut state = self.load_or_new(origin).await;
        let resumed = !state.visited.is_empty() || !state.pending.is_empty();

        // 种子结果并入聚合，相对 API 先对源站解析
        let mut seed = seed_results.clone();
        seed.resolve_relative_apis(origin);
        state.aggregate.merge(&seed);

        let mut pending: BTreeSet<String> = if resumed {
            std::mem::take(&mut state.pending)
        } else {
            // 起点页面自身也进入第一层，链接只能从抓取到的
            // 页面里收集，种子结果覆盖不到超链接
            let mut targets = collect_targets(
                origin,
                origin,
                &seed,
                self.config.allow_subdomains,
                self.config.allow_all_domains,
            );
            targets.insert(origin.to_string());
            targets
        };
        pending.retain(|url| !state.visited.contains(url));

        let cache: Arc<DashMap<String, Arc<CachedPage>>> = Arc::new(DashMap::new());
        let aggregate = Arc::new(Mutex::new(std::mem::replace(
            &mut state.aggregate,
            ExtractionResultSet::new(),
        )));
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));

        info!(
            "Deep scan started: origin={}, max_depth={}, concurrency={}, resumed={}",
            origin, state.max_depth, state.concurrency_limit, resumed
        );
        self.transition(&mut state, ScanStatus::Running);

        let mut depth = state.current_depth.max(1);
        let mut deepest = state.current_depth.saturating_sub(1);
        let mut stopped = false;

        while depth <= state.max_depth && !pending.is_empty() {
            if !self.gate(&mut control_rx, &mut state).await {
                stopped = true;
                break;
            }

            let mut queue: VecDeque<ScanTarget> = std::mem::take(&mut pending)
                .into_iter()
                .map(|url| ScanTarget::new(url, depth, origin.as_str()))
                .collect();

            info!("Deep scan layer {} started with {} urls", depth, queue.len());
            self.emit(ScanEvent::LayerStarted {
                depth,
                urls: queue.len(),
            });

            let mut join_set: JoinSet<UrlOutcome> = JoinSet::new();
            while let Some(target) = queue.pop_front() {
                if !self.gate(&mut control_rx, &mut state).await {
                    stopped = true;
                    break;
                }
                // 出队即登记，保证同一 URL 至多派发一次
                if !state.visited.insert(target.url.clone()) {
                    continue;
                }
                join_set.spawn(scan_one(UrlTask {
                    url: target.url,
                    origin: origin.clone(),
                    engine: self.engine.clone(),
                    patterns: self.patterns.clone(),
                    cache: cache.clone(),
                    aggregate: aggregate.clone(),
                    semaphore: semaphore.clone(),
                    timeout: self.config.fetch_timeout(),
                    proxy: self.config.proxy.clone(),
                    skip_tls_verification: self.config.skip_tls_verification,
                    allow_subdomains: self.config.allow_subdomains,
                    allow_all_domains: self.config.allow_all_domains,
                    domestic_phone_only: self.config.domestic_phone_only,
                }));
            }

            let mut scanned = 0usize;
            let mut discovered: BTreeSet<String> = BTreeSet::new();
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok(outcome) => {
                        if let Some(reason) = outcome.failure {
                            warn!("Failed to fetch {}: {}", outcome.url, reason);
                            self.emit(ScanEvent::UrlFailed {
                                url: outcome.url,
                                reason,
                            });
                        } else {
                            scanned += 1;
                            self.emit(ScanEvent::UrlScanned {
                                url: outcome.url,
                                depth,
                                new_artifacts: outcome.new_artifacts,
                            });
                            discovered.extend(outcome.discovered);
                        }
                    }
                    Err(join_error) => warn!("Scan task aborted: {}", join_error),
                }
            }

            deepest = depth;
            pending = discovered
                .into_iter()
                .filter(|url| !state.visited.contains(url))
                .collect();
            // 停止时未派发的目标放回前沿，随检查点一起保存
            pending.extend(queue.drain(..).map(|target| target.url));

            info!(
                "Deep scan layer {} completed: scanned={}, discovered={}",
                depth,
                scanned,
                pending.len()
            );
            self.emit(ScanEvent::LayerCompleted {
                depth,
                scanned,
                discovered: pending.len(),
            });

            state.current_depth = if stopped { depth } else { depth + 1 };
            state.pending = pending.clone();
            state.aggregate = aggregate.lock().clone();
            self.save_checkpoint(origin, &mut state).await;

            if stopped {
                break;
            }
            depth += 1;
        }

        let mut final_aggregate = aggregate.lock().clone();
        final_aggregate.resolve_relative_apis(origin);
        state.aggregate = final_aggregate;

        if stopped {
            state.pending = pending;
            self.transition(&mut state, ScanStatus::Stopped);
            self.save_checkpoint(origin, &mut state).await;
            info!("Deep scan stopped: visited={}", state.visited.len());
        } else {
            self.transition(&mut state, ScanStatus::Completed);
            // 完成状态连同最终聚合一起落盘，之后只能由外部显式清除
            self.save_checkpoint(origin, &mut state).await;
            info!(
                "Deep scan completed: visited={}, artifacts={}",
                state.visited.len(),
                state.aggregate.total()
            );
        }
        self.emit(ScanEvent::Completed {
            total_scanned: state.visited.len(),
        });

        ScanReport {
            run_id: state.run_id,
            origin: origin.to_string(),
            status: state.status,
            depth_reached: deepest,
            visited_count: state.visited.len(),
            aggregate: state.aggregate,
            started_at: state.started_at,
            finished_at: Utc::now(),
        }
    }

    /// 加载检查点，失败或缺失时从全新状态开始
    ///
    /// 已完成的检查点不参与续扫，同一源站的下一次运行
    /// 从零开始并在首个层边界覆盖它。
    async fn load_or_new(&self, origin: &Url) -> ScanState {
        match self.checkpoints.load_checkpoint(origin.as_str()).await {
            Ok(Some(saved)) if saved.status == ScanStatus::Completed => {
                info!("Previous scan for {} completed, starting fresh", origin);
                ScanState::new(&self.config)
            }
            Ok(Some(mut saved)) => {
                info!(
                    "Resuming scan for {} from checkpoint: visited={}, pending={}",
                    origin,
                    saved.visited.len(),
                    saved.pending.len()
                );
                // 深度与并发以本次运行的配置为准
                saved.status = ScanStatus::Idle;
                saved.max_depth = self.config.max_depth;
                saved.concurrency_limit = self.config.concurrency;
                saved
            }
            Ok(None) => ScanState::new(&self.config),
            Err(error) => {
                warn!("Failed to load checkpoint for {}: {}", origin, error);
                ScanState::new(&self.config)
            }
        }
    }

    /// 保存检查点，失败只告警不中断
    async fn save_checkpoint(&self, origin: &Url, state: &mut ScanState) {
        state.checkpointed_at = Utc::now();
        if let Err(error) = self.checkpoints.save_checkpoint(origin.as_str(), state).await {
            warn!("Failed to save checkpoint for {}: {}", origin, error);
        }
    }

    /// 等待暂停解除；返回 false 表示收到停止命令
    async fn gate(
        &self,
        control_rx: &mut watch::Receiver<ControlCommand>,
        state: &mut ScanState,
    ) -> bool {
        loop {
            let command = *control_rx.borrow();
            match command {
                ControlCommand::Run => {
                    if state.status == ScanStatus::Paused {
                        info!("Deep scan resumed");
                        self.transition(state, ScanStatus::Running);
                    }
                    return true;
                }
                ControlCommand::Stop => return false,
                ControlCommand::Pause => {
                    if state.status != ScanStatus::Paused {
                        info!("Deep scan paused");
                        self.transition(state, ScanStatus::Paused);
                    }
                    if control_rx.changed().await.is_err() {
                        return true;
                    }
                }
            }
        }
    }

    /// 记录状态转换并发布事件
    fn transition(&self, state: &mut ScanState, status: ScanStatus) {
        if state.status != status {
            state.status = status;
            self.emit(ScanEvent::StatusChanged { status });
        }
    }

    fn emit(&self, event: ScanEvent) {
        if let Some(sender) = &self.events {
            let _ = sender.send(event);
        }
    }
}

/// 抓取并提取单个 URL
///
/// 并发额度在任务内部获取；失败以产出形式返回，
/// 不向上抛出。
async fn scan_one<E>(task: UrlTask<E>) -> UrlOutcome
where
    E: FetchEngine + 'static,
{
    let failure = |url: String, reason: String| UrlOutcome {
        url,
        new_artifacts: 0,
        discovered: BTreeSet::new(),
        failure: Some(reason),
    };

    let _permit = match task.semaphore.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => return failure(task.url, "concurrency pool closed".to_string()),
    };

    let base = match Url::parse(&task.url) {
        Ok(url) => url,
        Err(error) => return failure(task.url, format!("invalid url: {error}")),
    };

    // 同一轮内相同 URL 只抓取一次
    let page: Arc<CachedPage> = if let Some(cached) = task.cache.get(&task.url) {
        cached.clone()
    } else {
        let request = FetchRequest {
            url: task.url.clone(),
            headers: HashMap::new(),
            timeout: task.timeout,
            proxy: task.proxy.clone(),
            skip_tls_verification: task.skip_tls_verification,
        };
        match task.engine.fetch(&request).await {
            Ok(response) if response.is_binary() => {
                debug!(
                    "Skipping binary content at {}: {}",
                    task.url, response.content_type
                );
                return UrlOutcome {
                    url: task.url,
                    new_artifacts: 0,
                    discovered: BTreeSet::new(),
                    failure: None,
                };
            }
            Ok(response) => {
                let page = Arc::new(CachedPage {
                    body: response.content,
                    content_type: response.content_type,
                });
                task.cache.insert(task.url.clone(), page.clone());
                page
            }
            Err(error) => return failure(task.url, error.to_string()),
        }
    };

    let mut results =
        ExtractionService::extract_with(&page.body, &task.patterns, task.domestic_phone_only);

    let mut discovered = collect_targets(
        &task.origin,
        &base,
        &results,
        task.allow_subdomains,
        task.allow_all_domains,
    );
    if page.content_type.to_lowercase().contains("text/html") {
        discovered.extend(collect_anchors(
            &task.origin,
            &base,
            &page.body,
            task.allow_subdomains,
            task.allow_all_domains,
        ));
    }

    results.resolve_relative_apis(&base);
    let new_artifacts = task.aggregate.lock().merge(&results);

    UrlOutcome {
        url: task.url,
        new_artifacts,
        discovered,
        failure: None,
    }
}

/// 从一份提取结果中收集后续抓取目标
///
/// 作用域相对扫描源站判断，解析基准是产生该结果的页面。
/// 页面类候选排除静态资源，脚本与 API 类候选原样保留。
fn collect_targets(
    origin: &Url,
    base: &Url,
    results: &ExtractionResultSet,
    allow_subdomains: bool,
    allow_all_domains: bool,
) -> BTreeSet<String> {
    let mut targets = BTreeSet::new();
    let categories = [
        ArtifactCategory::JsFile,
        ArtifactCategory::Url,
        ArtifactCategory::AbsoluteApi,
        ArtifactCategory::RelativeApi,
    ];
    for category in categories {
        if let Some(values) = results.get(&category) {
            for value in values {
                let mut resolved = match url_utils::resolve_url(base, value) {
                    Ok(url) => url,
                    Err(_) => continue,
                };
                // 锚点片段不参与去重
                resolved.set_fragment(None);
                if !url_utils::in_scope(origin, &resolved, allow_subdomains, allow_all_domains) {
                    continue;
                }
                if category == ArtifactCategory::Url && !url_utils::looks_like_page(&resolved) {
                    continue;
                }
                targets.insert(resolved.to_string());
            }
        }
    }
    targets
}

/// 从 HTML 中收集作用域内的超链接目标
fn collect_anchors(
    origin: &Url,
    base: &Url,
    body: &str,
    allow_subdomains: bool,
    allow_all_domains: bool,
) -> BTreeSet<String> {
    let mut targets = BTreeSet::new();
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return targets,
    };
    let document = Html::parse_document(body);
    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Ok(mut resolved) = url_utils::resolve_url(base, href) {
                resolved.set_fragment(None);
                if url_utils::in_scope(origin, &resolved, allow_subdomains, allow_all_domains)
                    && url_utils::looks_like_page(&resolved)
                {
                    targets.insert(resolved.to_string());
                }
            }
        }
    }
    targets
}

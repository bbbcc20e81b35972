// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use scanrs::config::settings::Settings;
use scanrs::domain::models::artifact::ExtractionResultSet;
use scanrs::domain::models::scan::ScanEvent;
use scanrs::domain::patterns::pattern_set::PatternSet;
use scanrs::domain::repositories::checkpoint_repository::CheckpointRepository;
use scanrs::domain::services::deep_scan_service::DeepScanService;
use scanrs::domain::services::extraction_service::ExtractionService;
use scanrs::engines::reqwest_engine::ReqwestEngine;
use scanrs::engines::traits::{FetchEngine, FetchRequest};
use scanrs::infrastructure::repositories::file_checkpoint_repository::FileCheckpointRepository;
use scanrs::utils::telemetry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use url::Url;

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "scanrs", version, about = "网页敏感信息与接口深度扫描器")]
struct Cli {
    /// 扫描起点 URL
    url: String,

    /// 最大扫描深度
    #[arg(short = 'd', long)]
    depth: Option<u32>,

    /// 同层并发上限
    #[arg(short = 'c', long)]
    concurrency: Option<usize>,

    /// 允许进入子域名
    #[arg(long)]
    allow_subdomains: bool,

    /// 允许跨域扫描
    #[arg(long)]
    allow_all_domains: bool,

    /// 保留国际手机号（默认只保留国内号段）
    #[arg(long)]
    international_phones: bool,

    /// 模式覆盖文件（JSON 或 YAML，类别名 -> 正则）
    #[arg(long, value_name = "FILE")]
    patterns: Option<PathBuf>,

    /// 检查点目录
    #[arg(long, value_name = "DIR")]
    checkpoint_dir: Option<PathBuf>,

    /// 清除该源站已保存的扫描状态后退出
    #[arg(long)]
    clear: bool,

    /// 报告输出文件，缺省打印到标准输出
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// 输出更详细的日志
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并执行一次深度扫描
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    telemetry::init_telemetry(cli.verbose);
    info!("Starting scanrs...");

    // 2. Load configuration
    let settings = Settings::new()?;
    let mut config = settings.deep_scan_config();
    if let Some(depth) = cli.depth {
        config.max_depth = depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency.max(1);
    }
    if cli.allow_subdomains {
        config.allow_subdomains = true;
    }
    if cli.allow_all_domains {
        config.allow_all_domains = true;
    }
    if cli.international_phones {
        config.domestic_phone_only = false;
    }
    info!("Configuration loaded");

    // 3. Compile extraction patterns
    let mut overrides = settings.patterns.clone();
    if let Some(path) = &cli.patterns {
        let raw = tokio::fs::read_to_string(path).await?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        let file_overrides: HashMap<String, String> = if is_yaml {
            serde_yaml::from_str(&raw)?
        } else {
            serde_json::from_str(&raw)?
        };
        overrides.extend(file_overrides);
    }
    let patterns = Arc::new(PatternSet::with_overrides(&overrides));

    // 4. Initialize components
    let origin = Url::parse(&cli.url)?;
    let engine = Arc::new(ReqwestEngine);
    let checkpoint_dir = cli
        .checkpoint_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.checkpoint.dir));
    let checkpoints = Arc::new(FileCheckpointRepository::new(checkpoint_dir));

    if cli.clear {
        checkpoints.clear_checkpoint(origin.as_str()).await?;
        info!("Cleared stored scan state for {}", origin);
        return Ok(());
    }

    // 5. Scan the seed page
    let request = FetchRequest {
        url: origin.to_string(),
        headers: HashMap::new(),
        timeout: config.fetch_timeout(),
        proxy: config.proxy.clone(),
        skip_tls_verification: config.skip_tls_verification,
    };
    let seed_results = match engine.fetch(&request).await {
        Ok(response) if response.is_binary() => {
            warn!(
                "Seed page {} returned binary content: {}",
                origin, response.content_type
            );
            ExtractionResultSet::new()
        }
        Ok(response) => {
            ExtractionService::extract_with(&response.content, &patterns, config.domestic_phone_only)
        }
        Err(error) => {
            warn!("Failed to fetch seed page {}: {}", origin, error);
            ExtractionResultSet::new()
        }
    };
    info!("Seed page extracted: {} artifacts", seed_results.total());

    // 6. Run deep scan
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let service = DeepScanService::new(engine, patterns, checkpoints, config).with_events(events_tx);

    let handle = service.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after in-flight fetches");
            handle.stop();
        }
    });

    let progress = tokio::spawn(async move {
        let mut failures = 0usize;
        while let Some(event) = events_rx.recv().await {
            match event {
                ScanEvent::UrlScanned {
                    url, new_artifacts, ..
                } if new_artifacts > 0 => {
                    info!("Found {} new artifacts at {}", new_artifacts, url);
                }
                ScanEvent::UrlFailed { .. } => failures += 1,
                _ => {}
            }
        }
        failures
    });

    let report = service.run_deep_scan(&origin, &seed_results).await;
    drop(service);
    let failures = progress.await.unwrap_or(0);

    // 7. Emit the report
    let json = serde_json::to_string_pretty(&report)?;
    match &cli.output {
        Some(path) => {
            tokio::fs::write(path, &json).await?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    info!(
        "Scan finished: status={}, visited={}, artifacts={}, failures={}",
        report.status,
        report.visited_count,
        report.aggregate.total(),
        failures
    );

    Ok(())
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::artifact::ExtractionResultSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// 扫描状态枚举
///
/// 表示深度扫描在其生命周期中的不同状态。
/// 状态转换遵循以下流程：
/// Idle → Running ⇄ Paused → Stopped，以及 Running → Completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// 空闲
    #[default]
    Idle,
    /// 运行中
    Running,
    /// 已暂停
    Paused,
    /// 已停止
    Stopped,
    /// 已完成
    Completed,
}

impl ScanStatus {
    /// 是否为终止状态（本次运行不可再恢复）
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Stopped | ScanStatus::Completed)
    }
}

/// 将扫描状态格式化为字符串表示
impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanStatus::Idle => write!(f, "idle"),
            ScanStatus::Running => write!(f, "running"),
            ScanStatus::Paused => write!(f, "paused"),
            ScanStatus::Stopped => write!(f, "stopped"),
            ScanStatus::Completed => write!(f, "completed"),
        }
    }
}

/// 从字符串解析扫描状态
impl FromStr for ScanStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(ScanStatus::Idle),
            "running" => Ok(ScanStatus::Running),
            "paused" => Ok(ScanStatus::Paused),
            "stopped" => Ok(ScanStatus::Stopped),
            "completed" => Ok(ScanStatus::Completed),
            _ => Err(()),
        }
    }
}

/// 扫描目标
///
/// 表示前沿队列中一个待抓取的 URL。链接被发现时创建，
/// 出队处理或发现已访问后即被丢弃。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTarget {
    /// 绝对 URL
    pub url: String,
    /// 发现该链接时所处的扫描深度（≥ 1）
    pub depth: u32,
    /// 所属源站标识
    pub origin: String,
}

impl ScanTarget {
    pub fn new(url: impl Into<String>, depth: u32, origin: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth,
            origin: origin.into(),
        }
    }
}

/// 深度扫描配置
///
/// 控制一次扫描运行的深度、并发与作用域。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepScanConfig {
    /// 最大扫描深度
    pub max_depth: u32,
    /// 并发抓取上限
    pub concurrency: usize,
    /// 单次抓取超时（秒）
    pub fetch_timeout_secs: u64,
    /// 是否允许子域名进入扫描范围
    pub allow_subdomains: bool,
    /// 是否允许任意域名进入扫描范围（隐含允许子域名）
    pub allow_all_domains: bool,
    /// 手机号校验是否仅保留国内号段
    pub domestic_phone_only: bool,
    /// 抓取代理地址
    pub proxy: Option<String>,
    /// 是否跳过 TLS 证书校验
    pub skip_tls_verification: bool,
}

impl Default for DeepScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            concurrency: 8,
            fetch_timeout_secs: 5,
            allow_subdomains: false,
            allow_all_domains: false,
            domestic_phone_only: true,
            proxy: None,
            skip_tls_verification: false,
        }
    }
}

impl DeepScanConfig {
    /// 单次抓取超时
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// 扫描状态快照
///
/// 一次扫描运行的完整状态，由爬取服务独占持有，
/// 在层边界、停止与完成时序列化为检查点。
/// 不变量：`current_depth ≤ max_depth`；`visited` 只增不减；
/// 已访问的 URL 不会再次入队。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanState {
    /// 本次运行的唯一标识符
    pub run_id: Uuid,
    /// 扫描状态
    pub status: ScanStatus,
    /// 当前扫描深度
    pub current_depth: u32,
    /// 最大扫描深度
    pub max_depth: u32,
    /// 并发上限
    pub concurrency_limit: usize,
    /// 已访问 URL 集合
    pub visited: BTreeSet<String>,
    /// 待抓取 URL 集合（下一层前沿）
    pub pending: BTreeSet<String>,
    /// 运行聚合结果
    pub aggregate: ExtractionResultSet,
    /// 扫描开始时间
    pub started_at: DateTime<Utc>,
    /// 最近一次检查点时间
    pub checkpointed_at: DateTime<Utc>,
}

impl ScanState {
    /// 以给定配置创建空闲状态
    pub fn new(config: &DeepScanConfig) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            status: ScanStatus::Idle,
            current_depth: 0,
            max_depth: config.max_depth,
            concurrency_limit: config.concurrency,
            visited: BTreeSet::new(),
            pending: BTreeSet::new(),
            aggregate: ExtractionResultSet::new(),
            started_at: now,
            checkpointed_at: now,
        }
    }
}

/// 扫描进度事件
///
/// 通过可选的无界通道对外发布；接收端缺失或关闭
/// 不阻塞也不影响扫描本身。
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// 状态发生转换
    StatusChanged { status: ScanStatus },
    /// 一层扫描开始
    LayerStarted { depth: u32, urls: usize },
    /// 单个 URL 扫描完成
    UrlScanned {
        url: String,
        depth: u32,
        new_artifacts: usize,
    },
    /// 单个 URL 抓取失败（按"无内容"处理）
    UrlFailed { url: String, reason: String },
    /// 一层扫描结束
    LayerCompleted {
        depth: u32,
        scanned: usize,
        discovered: usize,
    },
    /// 扫描结束
    Completed { total_scanned: usize },
}

/// 扫描运行报告
///
/// `run_deep_scan` 的最终返回值。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// 本次运行的唯一标识符
    pub run_id: Uuid,
    /// 扫描源站
    pub origin: String,
    /// 终止状态（Stopped 或 Completed）
    pub status: ScanStatus,
    /// 实际到达的最大深度
    pub depth_reached: u32,
    /// 已访问 URL 数量
    pub visited_count: usize,
    /// 最终合并后的聚合结果
    pub aggregate: ExtractionResultSet,
    /// 扫描开始时间
    pub started_at: DateTime<Utc>,
    /// 扫描结束时间
    pub finished_at: DateTime<Utc>,
}

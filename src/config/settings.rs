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

use crate::domain::models::scan::DeepScanConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// 应用程序配置设置
///
/// 包含扫描、抓取、检查点与模式覆盖等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 扫描配置
    pub scan: ScanSettings,
    /// 抓取配置
    pub fetch: FetchSettings,
    /// 检查点配置
    pub checkpoint: CheckpointSettings,
    /// 模式覆盖（类别名 -> 正则，支持 /pattern/flags 形式）
    #[serde(default)]
    pub patterns: HashMap<String, String>,
}

/// 扫描配置设置
#[derive(Debug, Deserialize)]
pub struct ScanSettings {
    /// 最大扫描深度
    pub max_depth: u32,
    /// 同层并发上限
    pub concurrency: usize,
    /// 是否允许进入子域名
    pub allow_subdomains: bool,
    /// 是否允许跨域扫描
    pub allow_all_domains: bool,
    /// 手机号是否只保留国内号段
    pub domestic_phone_only: bool,
}

/// 抓取配置设置
#[derive(Debug, Deserialize)]
pub struct FetchSettings {
    /// 单次抓取超时时间（秒）
    pub timeout_secs: u64,
    /// 代理地址（可选）
    pub proxy: Option<String>,
    /// 是否跳过 TLS 证书校验
    pub skip_tls_verification: bool,
}

/// 检查点配置设置
#[derive(Debug, Deserialize)]
pub struct CheckpointSettings {
    /// 检查点文件目录
    pub dir: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default scan settings
            .set_default("scan.max_depth", 2)?
            .set_default("scan.concurrency", 8)?
            .set_default("scan.allow_subdomains", false)?
            .set_default("scan.allow_all_domains", false)?
            .set_default("scan.domestic_phone_only", true)?
            // Default fetch settings
            .set_default("fetch.timeout_secs", 5)?
            .set_default("fetch.skip_tls_verification", false)?
            // Default checkpoint settings
            .set_default("checkpoint.dir", "./checkpoints")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("SCANRS").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 转换为深度扫描运行配置
    pub fn deep_scan_config(&self) -> DeepScanConfig {
        DeepScanConfig {
            max_depth: self.scan.max_depth,
            concurrency: self.scan.concurrency,
            fetch_timeout_secs: self.fetch.timeout_secs,
            allow_subdomains: self.scan.allow_subdomains,
            allow_all_domains: self.scan.allow_all_domains,
            domestic_phone_only: self.scan.domestic_phone_only,
            proxy: self.fetch.proxy.clone(),
            skip_tls_verification: self.fetch.skip_tls_verification,
        }
    }
}

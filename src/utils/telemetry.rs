// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化全局日志订阅器
///
/// 过滤级别优先取 RUST_LOG 环境变量，未设置时按
/// `verbose` 选择内置默认值。
pub fn init_telemetry(verbose: bool) {
    let default_filter = if verbose {
        "debug,scanrs=trace"
    } else {
        "info,scanrs=debug"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

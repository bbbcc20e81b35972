// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::patterns::defaults;
use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 候选 URL 是否在扫描作用域内
///
/// 默认仅限与起点完全同主机；`allow_subdomains` 放宽到
/// 起点主机的子域；`allow_all_domains` 只保留协议约束。
pub fn in_scope(seed: &Url, candidate: &Url, allow_subdomains: bool, allow_all_domains: bool) -> bool {
    if !matches!(candidate.scheme(), "http" | "https") {
        return false;
    }
    if allow_all_domains {
        return true;
    }
    let seed_host = match seed.host_str() {
        Some(host) => host.to_ascii_lowercase(),
        None => return false,
    };
    let candidate_host = match candidate.host_str() {
        Some(host) => host.to_ascii_lowercase(),
        None => return false,
    };
    if candidate_host == seed_host {
        return true;
    }
    allow_subdomains && candidate_host.ends_with(&format!(".{seed_host}"))
}

/// URL 是否像可继续解析的页面或脚本
///
/// 排除图片、字体、音视频等静态资源；脚本文件单独
/// 通过脚本类别进入扫描队列。
pub fn looks_like_page(url: &Url) -> bool {
    !defaults::is_static_file(url.path())
}

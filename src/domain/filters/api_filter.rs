// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::artifact::ArtifactCategory;
use once_cell::sync::Lazy;
use regex::Regex;

/// 路径长度下限与上限
const MIN_PATH_LENGTH: usize = 2;
const MAX_PATH_LENGTH: usize = 500;

/// 排除的路径前缀：浏览器内部协议与伪协议
static EXCLUDED_PREFIXES: &[&str] = &[
    "chrome-extension://",
    "moz-extension://",
    "about:",
    "data:",
    "javascript:",
    "mailto:",
    "tel:",
    "ftp:",
];

/// API 路径关键词
static API_KEYWORDS: &[&str] = &[
    "api", "admin", "manage", "backend", "service", "rest", "graphql", "ajax", "json",
    "xml", "data", "query", "search", "upload", "download", "export", "import",
];

/// 形如 Content-Type 的路径候选，正则误捕产物
static FILTERED_CONTENT_TYPES: &[&str] = &[
    "text/css",
    "text/javascript",
    "application/javascript",
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/svg+xml",
    "font/woff",
    "font/woff2",
    "application/font-woff",
    "audio/mpeg",
    "video/mp4",
    "application/octet-stream",
];

static FONT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(woff|woff2|ttf|eot|otf)(\?.*)?$").expect("valid pattern"));
static IMAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|gif|svg|webp|ico|bmp|tiff)(\?.*)?$").expect("valid pattern")
});
static JS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(js|jsx|ts|tsx|vue|mjs|cjs)(\?.*)?$").expect("valid pattern"));
static CSS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(css|scss|sass|less|styl)(\?.*)?$").expect("valid pattern"));
static DOC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(pdf|doc|docx|xls|xlsx|ppt|pptx|txt|md)(\?.*)?$").expect("valid pattern")
});
static AUDIO_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(mp3|wav|ogg|m4a|aac|flac|wma)(\?.*)?$").expect("valid pattern")
});
static VIDEO_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(mp4|avi|mov|wmv|flv|webm|mkv|m4v)(\?.*)?$").expect("valid pattern")
});

/// 典型后端路由前缀
static API_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/(?:api|admin|manage|backend|service|rest|graphql|v\d+)/").expect("valid pattern")
});
/// 动态脚本后缀
static DYNAMIC_API_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(php|asp|aspx|jsp|do|action)(\?.*)?$").expect("valid pattern")
});
/// 带查询串的路径
static QUERY_API_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?[^#\s]+").expect("valid pattern"));

/// 相对模块引用（./ 或 ../ 开头）
static RELATIVE_MODULE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.{1,2}/").expect("valid pattern"));

/// 前端资源目录前缀，此类路径是打包器内部引用
static STATIC_RESOURCE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(audio|blots|core|ace|icon|css|formats|image|js|modules|text|themes|ui|video|static|attributors|application)",
    )
    .expect("valid pattern")
});

/// 清理路径候选：剥掉首尾引号并做前缀与长度检查
pub fn clean_path(raw: &str) -> Option<String> {
    let cleaned = raw
        .trim_start_matches(['\'', '"', '`'])
        .trim_end_matches(['\'', '"', '`']);
    if EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| cleaned.starts_with(prefix))
    {
        return None;
    }
    if cleaned.len() < MIN_PATH_LENGTH || cleaned.len() > MAX_PATH_LENGTH {
        return None;
    }
    Some(cleaned.to_string())
}

/// 首字符之外含大写、分隔符或易误捕数字的超短路径
fn is_short_junk(path: &str) -> bool {
    if path.chars().count() > 4 {
        return false;
    }
    path.chars()
        .skip(1)
        .any(|c| matches!(c, 'A'..='Z' | '.' | '/' | '#' | '+' | '?' | '2' | '3'))
}

fn is_valid_path(path: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    if is_short_junk(path) {
        return false;
    }
    if STATIC_RESOURCE_PREFIX.is_match(path) {
        return false;
    }
    true
}

/// 按扩展名归类静态文件
fn classify_file_type(path: &str) -> Option<ArtifactCategory> {
    if IMAGE_PATTERN.is_match(path) {
        return Some(ArtifactCategory::ImageFile);
    }
    if JS_PATTERN.is_match(path) {
        return Some(ArtifactCategory::JsFile);
    }
    if CSS_PATTERN.is_match(path) {
        return Some(ArtifactCategory::CssFile);
    }
    if DOC_PATTERN.is_match(path) {
        return Some(ArtifactCategory::DocFile);
    }
    if AUDIO_PATTERN.is_match(path) {
        return Some(ArtifactCategory::AudioFile);
    }
    if VIDEO_PATTERN.is_match(path) {
        return Some(ArtifactCategory::VideoFile);
    }
    None
}

fn is_static_resource(path: &str) -> bool {
    classify_file_type(path).is_some() || FONT_PATTERN.is_match(path)
}

fn is_filtered_content_type(path: &str) -> bool {
    let lower = path.to_lowercase();
    FILTERED_CONTENT_TYPES
        .iter()
        .any(|content_type| lower.contains(content_type))
}

/// 路径是否指向 API
///
/// 静态资源一律不算；命中后端路由前缀或任一关键词
/// （`/kw/`、`kw.`、`kw/` 开头）即算。
pub fn is_api_path(path: &str) -> bool {
    if is_static_resource(path) {
        return false;
    }
    if API_PATH_PATTERN.is_match(path) {
        return true;
    }
    let lower = path.to_lowercase();
    API_KEYWORDS.iter().any(|keyword| {
        lower.contains(&format!("/{keyword}/"))
            || lower.contains(&format!("{keyword}."))
            || lower.starts_with(&format!("{keyword}/"))
    })
}

/// 将路径候选归类到制品类别
///
/// 返回 `(类别, 清理后的路径)`；字体、打包器内部引用与
/// 既非 API 也非静态文件的普通路径返回 `None`。
pub fn classify_path(raw: &str) -> Option<(ArtifactCategory, String)> {
    let path = clean_path(raw)?;
    if !is_valid_path(&path) {
        return None;
    }
    // 字体文件整体丢弃
    if FONT_PATTERN.is_match(&path) {
        return None;
    }
    if let Some(category) = classify_file_type(&path) {
        return Some((category, path));
    }
    if is_filtered_content_type(&path) {
        return None;
    }
    if path.ends_with(".vue") {
        return Some((ArtifactCategory::VueFile, path));
    }
    if RELATIVE_MODULE_PATTERN.is_match(&path) || path.contains("node_modules") {
        return Some((ArtifactCategory::ModuleFile, path));
    }
    if path.starts_with('/') {
        classify_absolute(path)
    } else {
        classify_relative(path)
    }
}

fn classify_absolute(path: String) -> Option<(ArtifactCategory, String)> {
    if is_short_junk(&path) {
        return None;
    }
    if let Some(category) = classify_file_type(&path) {
        return Some((category, path));
    }
    if is_api_path(&path)
        || DYNAMIC_API_PATTERN.is_match(&path)
        || QUERY_API_PATTERN.is_match(&path)
    {
        return Some((ArtifactCategory::AbsoluteApi, path));
    }
    None
}

fn classify_relative(path: String) -> Option<(ArtifactCategory, String)> {
    if path.len() <= 4 {
        return None;
    }
    if STATIC_RESOURCE_PREFIX.is_match(&path) {
        return None;
    }
    if let Some(category) = classify_file_type(&path) {
        return Some((category, path));
    }
    if is_api_path(&path)
        || DYNAMIC_API_PATTERN.is_match(&path)
        || QUERY_API_PATTERN.is_match(&path)
    {
        return Some((ArtifactCategory::RelativeApi, path));
    }
    None
}

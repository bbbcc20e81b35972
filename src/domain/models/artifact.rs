// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use url::Url;

/// 工件类别枚举
///
/// 表示从文档文本中提取出的各种侦察工件的类别，
/// 每个类别拥有独立的模式列表和校验规则。
/// 序列化为 snake_case 字符串，未知名称保留为自定义类别。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ArtifactCategory {
    /// 绝对 API 路径
    AbsoluteApi,
    /// 相对 API 路径（聚合前被解析归并到绝对路径类别）
    RelativeApi,
    /// JS 脚本文件
    JsFile,
    /// CSS 样式文件
    CssFile,
    /// 图片文件
    ImageFile,
    /// 文档文件
    DocFile,
    /// 音频文件
    AudioFile,
    /// 视频文件
    VideoFile,
    /// Vue 组件文件
    VueFile,
    /// 模块路径
    ModuleFile,
    /// 完整 URL
    Url,
    /// 域名
    Domain,
    /// 邮箱地址
    Email,
    /// 手机号码
    Phone,
    /// IP 地址
    IpAddress,
    /// 凭证与密钥赋值
    Credential,
    /// JWT 令牌
    Jwt,
    /// Bearer 令牌
    BearerToken,
    /// Basic 认证串
    BasicAuth,
    /// Authorization 头
    AuthHeader,
    /// 微信 AppID
    WechatAppId,
    /// GitHub 令牌
    GithubToken,
    /// GitLab 令牌
    GitlabToken,
    /// 云厂商访问密钥
    AwsKey,
    /// Google API 密钥
    GoogleApiKey,
    /// Webhook 地址
    WebhookUrl,
    /// 加密函数调用
    CryptoUsage,
    /// GitHub 仓库地址
    GithubUrl,
    /// 公司名称
    Company,
    /// 代码注释
    Comment,
    /// 身份证号
    IdCard,
    /// 用户自定义类别
    Custom(String),
}

impl ArtifactCategory {
    /// 返回类别的字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            ArtifactCategory::AbsoluteApi => "absolute_api",
            ArtifactCategory::RelativeApi => "relative_api",
            ArtifactCategory::JsFile => "js_file",
            ArtifactCategory::CssFile => "css_file",
            ArtifactCategory::ImageFile => "image_file",
            ArtifactCategory::DocFile => "doc_file",
            ArtifactCategory::AudioFile => "audio_file",
            ArtifactCategory::VideoFile => "video_file",
            ArtifactCategory::VueFile => "vue_file",
            ArtifactCategory::ModuleFile => "module_file",
            ArtifactCategory::Url => "url",
            ArtifactCategory::Domain => "domain",
            ArtifactCategory::Email => "email",
            ArtifactCategory::Phone => "phone",
            ArtifactCategory::IpAddress => "ip_address",
            ArtifactCategory::Credential => "credential",
            ArtifactCategory::Jwt => "jwt",
            ArtifactCategory::BearerToken => "bearer_token",
            ArtifactCategory::BasicAuth => "basic_auth",
            ArtifactCategory::AuthHeader => "auth_header",
            ArtifactCategory::WechatAppId => "wechat_app_id",
            ArtifactCategory::GithubToken => "github_token",
            ArtifactCategory::GitlabToken => "gitlab_token",
            ArtifactCategory::AwsKey => "aws_key",
            ArtifactCategory::GoogleApiKey => "google_api_key",
            ArtifactCategory::WebhookUrl => "webhook_url",
            ArtifactCategory::CryptoUsage => "crypto_usage",
            ArtifactCategory::GithubUrl => "github_url",
            ArtifactCategory::Company => "company",
            ArtifactCategory::Comment => "comment",
            ArtifactCategory::IdCard => "id_card",
            ArtifactCategory::Custom(name) => name,
        }
    }
}

/// 将工件类别格式化为字符串表示
impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ArtifactCategory> for String {
    fn from(category: ArtifactCategory) -> Self {
        category.as_str().to_string()
    }
}

/// 从字符串恢复工件类别
///
/// 未知名称不视为错误，保留为自定义类别，
/// 以便带自定义模式的检查点能够无损往返。
impl From<String> for ArtifactCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "absolute_api" => ArtifactCategory::AbsoluteApi,
            "relative_api" => ArtifactCategory::RelativeApi,
            "js_file" => ArtifactCategory::JsFile,
            "css_file" => ArtifactCategory::CssFile,
            "image_file" => ArtifactCategory::ImageFile,
            "doc_file" => ArtifactCategory::DocFile,
            "audio_file" => ArtifactCategory::AudioFile,
            "video_file" => ArtifactCategory::VideoFile,
            "vue_file" => ArtifactCategory::VueFile,
            "module_file" => ArtifactCategory::ModuleFile,
            "url" => ArtifactCategory::Url,
            "domain" => ArtifactCategory::Domain,
            "email" => ArtifactCategory::Email,
            "phone" => ArtifactCategory::Phone,
            "ip_address" => ArtifactCategory::IpAddress,
            "credential" => ArtifactCategory::Credential,
            "jwt" => ArtifactCategory::Jwt,
            "bearer_token" => ArtifactCategory::BearerToken,
            "basic_auth" => ArtifactCategory::BasicAuth,
            "auth_header" => ArtifactCategory::AuthHeader,
            "wechat_app_id" => ArtifactCategory::WechatAppId,
            "github_token" => ArtifactCategory::GithubToken,
            "gitlab_token" => ArtifactCategory::GitlabToken,
            "aws_key" => ArtifactCategory::AwsKey,
            "google_api_key" => ArtifactCategory::GoogleApiKey,
            "webhook_url" => ArtifactCategory::WebhookUrl,
            "crypto_usage" => ArtifactCategory::CryptoUsage,
            "github_url" => ArtifactCategory::GithubUrl,
            "company" => ArtifactCategory::Company,
            "comment" => ArtifactCategory::Comment,
            "id_card" => ArtifactCategory::IdCard,
            _ => ArtifactCategory::Custom(s),
        }
    }
}

/// 提取结果集
///
/// 类别到唯一字符串工件集合的映射。按文档新建，
/// 同时也作为每个源站的运行聚合结果使用。
/// 相等性为大小写敏感的精确字符串匹配，集合内无重复。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResultSet {
    categories: BTreeMap<ArtifactCategory, BTreeSet<String>>,
}

impl ExtractionResultSet {
    /// 创建空结果集
    pub fn new() -> Self {
        Self::default()
    }

    /// 向指定类别插入一个工件
    ///
    /// 空字符串被忽略。返回该值是否为新增。
    pub fn insert(&mut self, category: ArtifactCategory, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        self.categories.entry(category).or_default().insert(value)
    }

    /// 向指定类别批量插入工件
    pub fn extend<I, S>(&mut self, category: ArtifactCategory, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.insert(category.clone(), value);
        }
    }

    /// 获取指定类别的工件集合
    pub fn get(&self, category: &ArtifactCategory) -> Option<&BTreeSet<String>> {
        self.categories.get(category)
    }

    /// 指定类别的工件数量
    pub fn count(&self, category: &ArtifactCategory) -> usize {
        self.categories.get(category).map_or(0, |set| set.len())
    }

    /// 全部类别的工件总数
    pub fn total(&self) -> usize {
        self.categories.values().map(|set| set.len()).sum()
    }

    /// 结果集是否为空
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(|set| set.is_empty())
    }

    /// 遍历非空类别及其集合
    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactCategory, &BTreeSet<String>)> {
        self.categories.iter().filter(|(_, set)| !set.is_empty())
    }

    /// 按值合并另一个结果集
    ///
    /// 对每个类别取集合并集，满足交换律、结合律与幂等性，
    /// 因此最终结果与任务完成顺序无关。返回新增工件数量。
    pub fn merge(&mut self, other: &ExtractionResultSet) -> usize {
        let mut added = 0;
        for (category, values) in &other.categories {
            let target = self.categories.entry(category.clone()).or_default();
            for value in values {
                if target.insert(value.clone()) {
                    added += 1;
                }
            }
        }
        added
    }

    /// 将相对 API 路径解析归并到绝对 API 类别
    ///
    /// 相对路径按扫描基准源站解析后仅保留路径与查询部分，
    /// 归并完成后相对类别始终为空，避免同一端点以两种表示重复出现。
    pub fn resolve_relative_apis(&mut self, base: &Url) {
        let relatives = match self.categories.remove(&ArtifactCategory::RelativeApi) {
            Some(set) if !set.is_empty() => set,
            _ => return,
        };
        for relative in relatives {
            if let Ok(resolved) = base.join(&relative) {
                let path = match resolved.query() {
                    Some(query) => format!("{}?{}", resolved.path(), query),
                    None => resolved.path().to_string(),
                };
                self.insert(ArtifactCategory::AbsoluteApi, path);
            }
        }
    }
}

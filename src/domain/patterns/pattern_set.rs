// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::artifact::ArtifactCategory;
use crate::domain::patterns::defaults;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// 模式层错误
#[derive(Error, Debug)]
pub enum PatternError {
    /// 覆盖模式编译失败，隔离到单个类别
    #[error("类别 {category} 的覆盖模式编译失败")]
    Compile {
        category: String,
        #[source]
        source: regex::Error,
    },
}

/// 单个类别的已编译模式规则
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// 所属类别
    pub category: ArtifactCategory,
    /// 按应用顺序排列的已编译模式
    pub patterns: Vec<Regex>,
}

/// 模式集
///
/// 按类别组织的不可变已编译模式集合。构造后不再变化，
/// 可在多个工作任务间共享；配置重载通过重新构造新值完成，
/// 而不是原地修改。
#[derive(Debug, Clone)]
pub struct PatternSet {
    rules: Vec<PatternRule>,
}

/// `/pattern/flags` 输入形式
static SLASH_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/(.*)/([gimsuy]*)$").expect("slash form pattern is valid"));

impl Default for PatternSet {
    /// 编译内置默认目录
    fn default() -> Self {
        let rules = defaults::default_sources()
            .into_iter()
            .map(|(category, sources)| {
                let patterns = sources
                    .iter()
                    .filter_map(|source| match Regex::new(source) {
                        Ok(regex) => Some(regex),
                        Err(error) => {
                            warn!(category = %category, %error, "默认模式编译失败，已跳过");
                            None
                        }
                    })
                    .collect();
                PatternRule { category, patterns }
            })
            .collect();
        Self { rules }
    }
}

impl PatternSet {
    /// 以默认目录为基础应用用户覆盖
    ///
    /// 每个覆盖独立编译：一个类别的编译失败不影响其他类别，
    /// 失败的类别静默保留默认模式列表，失败本身以非致命
    /// 诊断报告一次。未知类别名作为自定义类别追加。
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut set = Self::default();
        for (name, raw) in overrides {
            let category = ArtifactCategory::from(name.clone());
            match compile_override(&category, raw) {
                Ok(patterns) => set.replace(category, patterns),
                Err(error) => {
                    warn!(%error, "覆盖模式编译失败，保留默认模式");
                }
            }
        }
        set
    }

    /// 重新加载配置，返回新的不可变模式集
    pub fn reload(overrides: &HashMap<String, String>) -> Self {
        Self::with_overrides(overrides)
    }

    /// 遍历全部规则
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// 查找指定类别的规则
    pub fn rule(&self, category: &ArtifactCategory) -> Option<&PatternRule> {
        self.rules.iter().find(|rule| &rule.category == category)
    }

    /// 替换或追加一个类别的模式列表
    fn replace(&mut self, category: ArtifactCategory, patterns: Vec<Regex>) {
        match self.rules.iter_mut().find(|rule| rule.category == category) {
            Some(rule) => rule.patterns = patterns,
            None => self.rules.push(PatternRule { category, patterns }),
        }
    }
}

/// 编译单个覆盖输入
///
/// 接受 `/pattern/flags` 形式或裸模式文本。整体编译失败时
/// 退回按 `|` 拆分独立编译，保留编译成功的片段；全部失败
/// 则返回错误，调用方保留默认模式。
fn compile_override(
    category: &ArtifactCategory,
    raw: &str,
) -> Result<Vec<Regex>, PatternError> {
    let source = parse_regex_input(raw);
    let whole_error = match Regex::new(&source) {
        Ok(regex) => return Ok(vec![regex]),
        Err(error) => error,
    };
    let pieces: Vec<Regex> = source
        .split('|')
        .filter(|piece| !piece.is_empty())
        .filter_map(|piece| Regex::new(piece).ok())
        .collect();
    if !pieces.is_empty() {
        return Ok(pieces);
    }
    Err(PatternError::Compile {
        category: category.to_string(),
        source: whole_error,
    })
}

/// 解析 `/pattern/flags` 输入形式
///
/// `i`/`m`/`s` 标志转为内联标志；`g`/`u`/`y` 在本引擎中
/// 无对应语义，接受并忽略。非该形式的输入原样返回。
fn parse_regex_input(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(captures) = SLASH_FORM.captures(trimmed) {
        let pattern = captures.get(1).map_or("", |m| m.as_str());
        let flags = captures.get(2).map_or("", |m| m.as_str());
        let mut inline = String::new();
        for flag in ['i', 'm', 's'] {
            if flags.contains(flag) {
                inline.push(flag);
            }
        }
        if inline.is_empty() {
            return pattern.to_string();
        }
        return format!("(?{}){}", inline, pattern);
    }
    trimmed.to_string()
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 过滤器模块
///
/// 对模式提取出的原始候选做结构校验与去噪，包括：
/// - 域名与手机号（domain_filter）：TLD 白名单、运营商号段等
/// - 路径（api_filter）：API 识别与静态文件归类
/// - 身份证（id_card_filter）：GB 11643 校验
pub mod api_filter;
pub mod domain_filter;
pub mod id_card_filter;

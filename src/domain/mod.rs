// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：制品类别、结果集与扫描状态
/// - 提取模式（patterns）：内置模式目录及其编译与覆盖
/// - 过滤器（filters）：域名、手机号、邮箱、路径与身份证校验
/// - 服务（services）：文本提取与深度扫描编排
/// - 仓库接口（repositories）：检查点持久化抽象接口
///
/// 领域层是系统的核心，不依赖于任何外部实现，
/// 体现了纯粹的业务逻辑和业务规则。
pub mod filters;
pub mod models;
pub mod patterns;
pub mod repositories;
pub mod services;

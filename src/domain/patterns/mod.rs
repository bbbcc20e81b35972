// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 提取模式模块
///
/// 内置各类敏感信息的提取模式目录，并负责模式的
/// 编译、用户覆盖与失败回退。
pub mod defaults;
pub mod pattern_set;

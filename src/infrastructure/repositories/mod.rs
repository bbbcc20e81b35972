// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供领域仓库接口的具体实现，包括文件检查点仓库
/// 与进程内内存检查点仓库。
pub mod file_checkpoint_repository;
pub mod memory_checkpoint_repository;

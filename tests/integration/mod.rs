// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod helpers;

pub mod checkpoint_test;
pub mod control_test;
pub mod deep_scan_test;

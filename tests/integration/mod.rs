// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 集成测试主模块
///
/// 基于 wiremock 模拟 STAC 目录端点，覆盖检索、集合与条目列表、
/// 计数策略与统计分析的完整调用路径
mod helpers;

mod collections_test;
mod items_test;

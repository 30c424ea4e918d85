// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：STAC条目、集合与时间区间等核心数据结构
/// - 过滤表达式（filter）：CQL2-JSON过滤表达式树及其校验与求值
/// - 检索（search）：事件目录检索接口与请求模型
/// - 服务（services）：跨集合的事件统计服务
///
/// 领域层是系统的核心，不依赖于任何外部实现，
/// 体现了纯粹的业务逻辑和业务规则。
pub mod filter;
pub mod models;
pub mod search;
pub mod services;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// 闭区间时间范围
///
/// 两端均包含。用于条目列表的 `datetime` 查询参数
/// 以及统计分析的时间分箱。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// 构造整年闭区间：`start_year-01-01T00:00:00Z` 至
    /// `end_year-12-31T23:59:59Z`
    pub fn from_years(start_year: i32, end_year: i32) -> Self {
        let start = Utc
            .with_ymd_and_hms(start_year, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let end = Utc
            .with_ymd_and_hms(end_year, 12, 31, 23, 59, 59)
            .single()
            .unwrap_or_else(Utc::now);
        Self { start, end }
    }

    /// `datetime` 查询参数的线格式：`start/end`
    pub fn to_query(&self) -> String {
        format!("{}/{}", format_instant(&self.start), format_instant(&self.end))
    }

    /// 区间两端的RFC 3339表示
    pub fn endpoints(&self) -> (String, String) {
        (format_instant(&self.start), format_instant(&self.end))
    }

    /// 分箱标签，例如 `1800-1849`
    pub fn label(&self) -> String {
        format!("{}-{}", self.start.year(), self.end.year())
    }

    /// 生成从起始年份到当前年份的连续分箱
    ///
    /// 每箱跨度为 `interval_years` 年，最后一箱截断到当前年份。
    pub fn year_bins(start_year: i32, interval_years: i32) -> Vec<TimeRange> {
        let interval_years = interval_years.max(1);
        let end_year_limit = Utc::now().year();
        let mut bins = Vec::new();
        let mut current_year = start_year;

        while current_year <= end_year_limit {
            let bin_end = (current_year + interval_years - 1).min(end_year_limit);
            bins.push(TimeRange::from_years(current_year, bin_end));
            current_year += interval_years;
        }

        bins
    }
}

fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

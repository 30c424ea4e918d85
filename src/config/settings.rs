// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含API端点、HTTP连接池、目录分页和统计分析等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// API配置
    pub api: ApiSettings,
    /// HTTP客户端配置
    pub http: HttpSettings,
    /// 目录分页配置
    pub catalog: CatalogSettings,
    /// 统计分析配置
    pub census: CensusSettings,
}

/// API配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// STAC API根地址
    pub base_url: String,
    /// 承载令牌所在的环境变量名
    pub token_env: String,
}

/// HTTP客户端配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 每个主机的最大空闲连接数
    pub pool_max_idle_per_host: usize,
    /// 空闲连接超时时间（秒）
    pub pool_idle_timeout_secs: u64,
}

/// 目录分页配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// 条目列表的单页大小
    pub page_size: u32,
    /// 集合列表的单页大小
    pub collection_page_size: u32,
}

/// 统计分析配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CensusSettings {
    /// 并发抓取的时间分片数量
    pub max_concurrency: usize,
    /// 传输错误的最大重试次数
    pub max_retries: u32,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("api.base_url", "https://montandon-eoapi-stage.ifrc.org/stac")?
            .set_default("api.token_env", "MONTANDON_API_TOKEN")?
            // Default HTTP client settings (the stage API is slow on deep pages)
            .set_default("http.timeout_secs", 90)?
            .set_default("http.pool_max_idle_per_host", 10)?
            .set_default("http.pool_idle_timeout_secs", 90)?
            // Default paging settings
            .set_default("catalog.page_size", 250)?
            .set_default("catalog.collection_page_size", 100)?
            // Default census settings
            .set_default("census.max_concurrency", 10)?
            .set_default("census.max_retries", 3)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("MONTYRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: "https://montandon-eoapi-stage.ifrc.org/stac".to_string(),
                token_env: "MONTANDON_API_TOKEN".to_string(),
            },
            http: HttpSettings {
                timeout_secs: 90,
                pool_max_idle_per_host: 10,
                pool_idle_timeout_secs: 90,
            },
            catalog: CatalogSettings {
                page_size: 250,
                collection_page_size: 100,
            },
            census: CensusSettings {
                max_concurrency: 10,
                max_retries: 3,
            },
        }
    }
}

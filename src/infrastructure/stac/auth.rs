// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::env;

use thiserror::Error;

use crate::config::settings::ApiSettings;
use crate::domain::search::engine::CatalogError;

/// 凭证解析错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("bearer token not configured: environment variable `{0}` is not set")]
    MissingToken(String),
    #[error("bearer token is empty")]
    EmptyToken,
}

impl From<AuthError> for CatalogError {
    fn from(error: AuthError) -> Self {
        CatalogError::Authentication(error.to_string())
    }
}

/// Credential seam injected into the client.
///
/// The token is read-only configuration with a set-once lifecycle;
/// providers are consulted per call instead of the client capturing a
/// global, so tests and notebooks can swap credentials without
/// touching the process environment.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Result<String, AuthError>;
}

/// 从环境变量读取承载令牌
#[derive(Debug, Clone)]
pub struct EnvToken {
    variable: String,
}

impl EnvToken {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self::new(settings.token_env.clone())
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new("MONTANDON_API_TOKEN")
    }
}

impl TokenProvider for EnvToken {
    fn token(&self) -> Result<String, AuthError> {
        let raw =
            env::var(&self.variable).map_err(|_| AuthError::MissingToken(self.variable.clone()))?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        Ok(trimmed.to_string())
    }
}

/// 固定令牌提供者（测试与交互式会话）
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Result<String, AuthError> {
        if self.token.trim().is_empty() {
            return Err(AuthError::EmptyToken);
        }
        Ok(self.token.clone())
    }
}

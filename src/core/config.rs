//! # Run Configuration Module / 运行配置模块
//!
//! The runner's configuration, loaded from a TOML file. It carries the
//! output language, the optional tag-filter expression and the optional
//! per-unit timeout applied to every hook and test body.
//!
//! 运行器的配置，从 TOML 文件加载。它包含输出语言、
//! 可选的标签过滤表达式以及应用于每个钩子和测试主体的可选单元超时。

use crate::core::condition::Condition;
use crate::core::expression;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for a single run.
/// 单次运行的配置。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// Defaults to "en" if not specified.
    ///
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    /// 如果未指定，则默认为 "en"。
    #[serde(default = "default_language")]
    pub language: String,

    /// An optional tag-filter expression, e.g. `"integration and not slow"`.
    /// Absent means every test matches.
    /// 可选的标签过滤表达式。缺省表示匹配所有测试。
    #[serde(default)]
    pub filter: Option<String>,

    /// An optional timeout in seconds applied to each hook and test body.
    /// A unit that runs longer is marked as a timeout failure and its
    /// bracket is abandoned.
    /// 应用于每个钩子和测试主体的可选超时时间（秒）。
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            language: default_language(),
            filter: None,
            timeout_secs: None,
        }
    }
}

impl RunConfig {
    /// Loads the configuration from a TOML file.
    pub fn load(path: &Path) -> Result<RunConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parses the filter expression into a [`Condition`]. No filter means
    /// the always-pass condition.
    pub fn condition(&self) -> Result<Condition> {
        match &self.filter {
            Some(filter) => expression::parse(filter),
            None => Ok(Condition::EMPTY),
        }
    }

    /// The per-unit timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_language() -> String {
    "en".to_string()
}

//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the spec runner,
//! including the immutable test tree model, the condition engine,
//! run configuration, planning and the execution engine.
//!
//! 此模块包含规格运行器的核心功能，
//! 包括不可变测试树模型、条件引擎、运行配置、计划和执行引擎。

pub mod builder;
pub mod condition;
pub mod config;
pub mod execution;
pub mod expression;
pub mod models;
pub mod options;
pub mod planner;

// Re-exports
pub use condition::Condition;
pub use config::RunConfig;
pub use execution::Runner;
pub use models::{Behaviour, Block, BlockKind, Hook, HookKind, RunSummary, Test, TestFn};
pub use options::{Options, Tags};

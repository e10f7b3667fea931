//! # Spec Runner Library / 规格运行器库
//!
//! This library provides a declarative BDD test definition and execution
//! engine: user code builds an immutable tree of nested test groups, test
//! cases and lifecycle hooks, and a runner walks that tree, computing the
//! correct hook-execution order for every test and driving a reporting
//! collaborator with outcomes.
//!
//! 此库提供声明式 BDD 测试定义和执行引擎：
//! 用户代码构建由嵌套测试分组、测试用例和生命周期钩子组成的不可变树，
//! 运行器遍历该树，为每个测试计算正确的钩子执行顺序，
//! 并通过报告协作者输出结果。
//!
//! ## Modules / 模块
//!
//! - `core` - Test tree model, condition engine, planner and execution engine
//! - `dsl` - The closure-based declaration API producing validated trees
//! - `reporting` - The `Reporter` collaborator and the shipped reporters
//!
//! - `core` - 测试树模型、条件引擎、计划器和执行引擎
//! - `dsl` - 生成经过验证的树的基于闭包的声明 API
//! - `reporting` - `Reporter` 协作者和随附的报告器

pub mod core;
pub mod dsl;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::condition::Condition;
pub use crate::core::config::RunConfig;
pub use crate::core::execution::Runner;
pub use crate::core::models::{
    Behaviour, Block, BlockKind, Hook, HookKind, RunSummary, Test, TestFailure, TestFn,
    TestReport, TestStatus,
};
pub use crate::core::options::{Options, Tags};
pub use dsl::{Context, define_tests};
pub use reporting::{ConsoleReporter, Reporter};

/// Picks the runner's output language from the system locale.
///
/// The detected locale is matched against the bundled translations, first as
/// a full tag (e.g. "zh-CN"), then as its bare language code. English is the
/// final fallback. [`Runner::run`] overrides this with the configured
/// language for the duration of a run.
///
/// 根据系统区域设置选择运行器的输出语言。
pub fn init() {
    let detected = sys_locale::get_locale().unwrap_or_default();
    rust_i18n::set_locale(match_locale(&detected));
}

/// Narrows a detected locale tag to one of the bundled locales.
fn match_locale(detected: &str) -> &str {
    let bundled = rust_i18n::available_locales!();
    if bundled.contains(&detected) {
        return detected;
    }
    detected
        .split('-')
        .next()
        .filter(|code| bundled.contains(code))
        .unwrap_or("en")
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");

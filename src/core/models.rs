//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the spec runner.
//! It includes the immutable test tree (blocks, tests, hooks), the asynchronous
//! test function handle, and the models for test outcomes and run summaries.
//!
//! 此模块定义了整个规格运行器中使用的核心数据结构。
//! 它包括不可变的测试树（块、测试、钩子）、异步测试函数句柄，
//! 以及测试结果和运行摘要的模型。

use crate::core::builder::BlockBuilder;
use crate::core::options::Options;
use anyhow::Result;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// The type of a block in the test tree.
/// 测试树中块的类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// The single root of a test tree. Never has a parent.
    /// 测试树的唯一根。没有父节点。
    Root,
    /// A plain `describe`-style grouping.
    /// 普通的 `describe` 风格分组。
    Group,
    /// A `when`-style conditional grouping.
    /// `when` 风格的条件分组。
    ConditionalGroup,
}

/// Controls how a block or test behaves when the tree is run.
/// 控制运行测试树时块或测试的行为方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behaviour {
    /// Run normally.
    Normal,
    /// Never run; reported as skipped. Inherited by all descendants.
    /// 永不运行；报告为已跳过。由所有后代继承。
    Skip,
    /// If any node in the tree is marked `Only`, every test not under an
    /// `Only` node is skipped for that run.
    /// 如果树中任何节点标记为 `Only`，则该次运行中不在 `Only` 节点下的
    /// 所有测试都会被跳过。
    Only,
    /// Reported as pending; no hooks or body are executed. A test without a
    /// body is always pending regardless of its marker.
    /// 报告为待定；不执行任何钩子或主体。
    Pending,
}

/// The lifecycle phase a hook belongs to.
/// 钩子所属的生命周期阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookKind {
    /// Runs once per block, before the first test under the block.
    BeforeAll,
    /// Runs once per block, after the last test under the block.
    AfterAll,
    /// Runs before every test within the block's scope.
    BeforeEach,
    /// Runs after every test within the block's scope.
    AfterEach,
}

impl HookKind {
    /// Human-readable name used in failure messages.
    pub fn label(&self) -> &'static str {
        match self {
            HookKind::BeforeAll => "before-all",
            HookKind::AfterAll => "after-all",
            HookKind::BeforeEach => "before-each",
            HookKind::AfterEach => "after-each",
        }
    }
}

/// A cloneable handle to an asynchronous unit of work (a test body or a hook
/// body). The runner awaits each unit to completion before scheduling the
/// next one, so unit effects are never interleaved.
///
/// 指向异步工作单元（测试主体或钩子主体）的可克隆句柄。
/// 运行器在调度下一个单元之前等待每个单元完成，因此单元效果永远不会交错。
#[derive(Clone)]
pub struct TestFn(Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>);

impl TestFn {
    /// Wraps an asynchronous, fallible function.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use spec_runner::TestFn;
    /// let f = TestFn::new(|| async { anyhow::ensure!(2 + 2 == 4, "maths is broken"); Ok(()) });
    /// ```
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        TestFn(Arc::new(move || f().boxed()))
    }

    /// Wraps a plain synchronous closure. Failure is signalled by panicking,
    /// which the runner captures and converts into a test failure.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        TestFn(Arc::new(move || {
            let f = Arc::clone(&f);
            async move {
                f();
                Ok(())
            }
            .boxed()
        }))
    }

    /// Produces the future for one invocation of the unit.
    pub fn call(&self) -> BoxFuture<'static, Result<()>> {
        (self.0)()
    }
}

impl fmt::Debug for TestFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TestFn")
    }
}

/// A lifecycle callback owned by a block.
/// 块所拥有的生命周期回调。
#[derive(Debug, Clone)]
pub struct Hook {
    /// The lifecycle phase this hook runs in.
    pub kind: HookKind,
    /// Optional description, used when reporting hook failures.
    pub description: Option<String>,
    /// The hook body.
    pub function: TestFn,
}

impl Hook {
    pub fn new(kind: HookKind, description: Option<String>, function: TestFn) -> Self {
        Hook {
            kind,
            description,
            function,
        }
    }

    /// The name used for this hook in reports: its description if present,
    /// otherwise the phase label.
    pub fn display_name(&self) -> &str {
        self.description.as_deref().unwrap_or(self.kind.label())
    }
}

/// A leaf unit of work in the test tree.
/// 测试树中的叶子工作单元。
#[derive(Debug, Clone)]
pub struct Test {
    /// The description of the test. Used for reporting.
    pub description: String,
    /// Controls whether the test runs.
    pub behaviour: Behaviour,
    /// Metadata attached to the test, including its tag set.
    pub options: Options,
    /// The test body. `None` means the test is pending.
    pub function: Option<TestFn>,
}

impl Test {
    pub fn new(
        description: impl Into<String>,
        behaviour: Behaviour,
        options: Options,
        function: Option<TestFn>,
    ) -> Self {
        Test {
            description: description.into(),
            behaviour,
            options,
            function,
        }
    }

    /// A test with no body is pending regardless of its behaviour marker.
    pub fn is_pending(&self) -> bool {
        self.behaviour == Behaviour::Pending || self.function.is_none()
    }
}

/// A named grouping node in the immutable test tree.
///
/// Blocks form a tree with a single [`BlockKind::Root`] node. Child ordering
/// is declaration order and is the execution order. The `hooks` and `tests`
/// lists hold only the entries owned directly by this block, not those of
/// nested blocks.
///
/// 不可变测试树中的命名分组节点。
/// 块构成一棵树，只有一个 [`BlockKind::Root`] 节点。子节点的顺序是声明
/// 顺序，也是执行顺序。`hooks` 和 `tests` 列表仅包含此块直接拥有的条目。
#[derive(Debug, Clone)]
pub struct Block {
    /// The type of the block.
    pub kind: BlockKind,
    /// Controls how the block and its descendants behave.
    pub behaviour: Behaviour,
    /// Identifies the suite or module the block was defined in.
    /// 标识定义该块的套件或模块。
    pub origin: String,
    /// The description of the block. Used for reporting.
    pub description: String,
    /// Nested blocks, in declaration order.
    pub blocks: Vec<Block>,
    /// Hooks defined directly by this block.
    pub hooks: Vec<Hook>,
    /// Tests defined directly by this block.
    pub tests: Vec<Test>,
    /// Metadata attached to the block, including its tag set.
    pub options: Options,
}

impl Block {
    /// All hooks of the given kind owned by this block, in declaration order.
    pub fn hooks_of_kind(&self, kind: HookKind) -> impl Iterator<Item = &Hook> {
        self.hooks.iter().filter(move |h| h.kind == kind)
    }

    /// Creates a [`BlockBuilder`] seeded with this block's current values,
    /// for deriving a modified copy without mutating the original.
    ///
    /// 创建一个以当前值初始化的 [`BlockBuilder`]，
    /// 用于派生修改后的副本而不改变原始块。
    pub fn to_builder(&self) -> BlockBuilder {
        BlockBuilder::new()
            .kind(self.kind)
            .behaviour(self.behaviour)
            .origin(self.origin.clone())
            .description(self.description.clone())
            .blocks(self.blocks.clone())
            .hooks(self.hooks.clone())
            .tests(self.tests.clone())
            .options(self.options.clone())
    }
}

/// Enumerates the possible sources of a unit failure.
/// 枚举工作单元失败的可能来源。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum FailureReason {
    /// The unit returned an error.
    /// 工作单元返回了错误。
    Error,
    /// The unit panicked, typically from a failed assertion.
    /// 工作单元发生 panic，通常来自失败的断言。
    Panic,
    /// The unit exceeded the configured timeout.
    /// 工作单元超出了配置的超时时间。
    Timeout,
    /// A lifecycle hook in the test's bracket failed, so the test could not
    /// complete normally.
    /// 测试括号中的生命周期钩子失败，导致测试无法正常完成。
    Hook,
}

/// A captured failure from a hook or test body.
/// 从钩子或测试主体捕获的失败。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestFailure {
    /// Human-readable failure detail.
    pub message: String,
    /// The source of the failure.
    pub reason: FailureReason,
}

impl TestFailure {
    pub fn error(err: anyhow::Error) -> Self {
        TestFailure {
            message: format!("{err:#}"),
            reason: FailureReason::Error,
        }
    }

    /// Extracts a message from a panic payload.
    pub fn panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        TestFailure {
            message,
            reason: FailureReason::Panic,
        }
    }

    pub fn timeout(limit: Duration) -> Self {
        TestFailure {
            message: format!("timed out after {:.1}s", limit.as_secs_f64()),
            reason: FailureReason::Timeout,
        }
    }

    /// Wraps a hook failure so it can be attributed to the test whose
    /// bracket the hook belongs to.
    pub fn hook(kind: HookKind, name: &str, inner: &TestFailure) -> Self {
        TestFailure {
            message: format!("{} hook '{}' failed: {}", kind.label(), name, inner.message),
            reason: FailureReason::Hook,
        }
    }
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The final status of a single test.
/// 单个测试的最终状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    Passed,
    Failed(TestFailure),
    Skipped,
    Pending,
}

/// The reported outcome of one test, identified by its full path through the
/// tree (block descriptions joined with " > ").
///
/// 一个测试的报告结果，由其在树中的完整路径标识（块描述以 " > " 连接）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    /// Full path of the test, e.g. `"Calculator > when negative > handles it"`.
    pub description: String,
    /// The final status.
    pub status: TestStatus,
    /// Wall time of the test's bracket. `None` for skipped/pending tests.
    pub duration: Option<Duration>,
}

impl TestReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, TestStatus::Failed(_))
    }

    /// The failure detail, if the test failed.
    pub fn failure(&self) -> Option<&TestFailure> {
        match &self.status {
            TestStatus::Failed(f) => Some(f),
            _ => None,
        }
    }
}

/// Aggregated results of a complete run, in reporter event order.
/// 完整运行的聚合结果，按报告事件顺序排列。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Per-test reports, in execution order.
    pub results: Vec<TestReport>,
    /// Number of hook failures observed during the run.
    pub hook_failures: usize,
    /// Wall time of the whole run.
    pub duration: Duration,
}

impl RunSummary {
    pub fn new(results: Vec<TestReport>, hook_failures: usize, duration: Duration) -> Self {
        RunSummary {
            results,
            hook_failures,
            duration,
        }
    }

    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, TestStatus::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, TestStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, TestStatus::Skipped))
    }

    pub fn pending(&self) -> usize {
        self.count(|s| matches!(s, TestStatus::Pending))
    }

    /// A run succeeds when no test and no hook failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.hook_failures == 0
    }

    fn count(&self, pred: impl Fn(&TestStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }
}

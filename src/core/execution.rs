//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! This module drives a full traversal of a resolved test tree: it walks
//! blocks depth-first in declaration order, schedules the lifecycle hooks
//! that bracket every test, executes the asynchronous bodies one at a time
//! with timeout and panic capture, and emits reporter events for every
//! outcome.
//!
//! 此模块驱动对已解析测试树的完整遍历：按声明顺序深度优先遍历块，
//! 调度包围每个测试的生命周期钩子，逐一执行异步主体（带超时和 panic 捕获），
//! 并为每个结果发出报告事件。

use anyhow::Result;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use crate::core::{
    condition::Condition,
    config::RunConfig,
    models::{
        Behaviour, Block, FailureReason, Hook, HookKind, RunSummary, Test, TestFailure, TestFn,
        TestReport, TestStatus,
    },
    planner,
};
use crate::reporting::Reporter;

/// The single entry point for executing a built test tree.
///
/// A `Runner` owns the run configuration and the tag-filter condition. It
/// never mutates the tree it is given; the behaviour-resolution pass derives
/// a resolved copy before traversal begins.
///
/// 执行已构建测试树的唯一入口点。
/// `Runner` 拥有运行配置和标签过滤条件。它永不改变所给定的树；
/// 行为解析过程会在遍历开始前派生出已解析的副本。
pub struct Runner {
    config: RunConfig,
    condition: Condition,
}

impl Runner {
    /// Creates a runner, parsing the configured filter expression.
    pub fn new(config: RunConfig) -> Result<Self> {
        let condition = config.condition()?;
        Ok(Runner { config, condition })
    }

    /// Creates a runner with a pre-built condition, ignoring any filter
    /// string in the configuration.
    pub fn with_condition(config: RunConfig, condition: Condition) -> Self {
        Runner { config, condition }
    }

    /// Runs the whole tree and reports every outcome.
    ///
    /// Hook and test failures never escape as errors; they are converted
    /// into reporter events and counted in the returned [`RunSummary`].
    /// Only a malformed tree (non-root entry point, failed rebuild) returns
    /// `Err`, before any test executes.
    ///
    /// 运行整棵树并报告每个结果。钩子和测试的失败永远不会作为错误逃逸；
    /// 它们被转换为报告事件并计入返回的 [`RunSummary`]。
    pub async fn run(&self, root: &Block, reporter: &mut dyn Reporter) -> Result<RunSummary> {
        rust_i18n::set_locale(&self.config.language);

        let plan = planner::plan_execution(root, &self.condition)?;
        let started = Instant::now();
        reporter.run_started(&plan.root);

        let mut state = RunState {
            scheduler: Scheduler::new(self.config.timeout()),
            results: Vec::new(),
        };
        self.run_block(&plan.root, Vec::new(), Vec::new(), &mut state, reporter)
            .await;

        let summary = RunSummary::new(
            state.results,
            state.scheduler.hook_failures,
            started.elapsed(),
        );
        reporter.run_finished(&summary);
        Ok(summary)
    }

    fn run_block<'a>(
        &'a self,
        block: &'a Block,
        ancestors: Vec<&'a Block>,
        key: Vec<usize>,
        state: &'a mut RunState,
        reporter: &'a mut dyn Reporter,
    ) -> BoxFuture<'a, ()> {
        async move {
            reporter.block_started(block);

            let mut path = ancestors;
            path.push(block);

            // A block's own tests run before its nested blocks.
            for test in &block.tests {
                self.run_test(test, &path, &key, &mut *state, &mut *reporter)
                    .await;
            }

            for (index, child) in block.blocks.iter().enumerate() {
                let mut child_key = key.clone();
                child_key.push(index);
                self.run_block(child, path.clone(), child_key, &mut *state, &mut *reporter)
                    .await;
            }

            // Leaving the subtree for good: fire after-all if the block was
            // ever activated. Nested blocks have already fired theirs, which
            // yields the inner-to-outer order.
            state.scheduler.leave_block(block, &key, reporter).await;
            reporter.block_finished(block);
        }
        .boxed()
    }

    async fn run_test(
        &self,
        test: &Test,
        path: &[&Block],
        key: &[usize],
        state: &mut RunState,
        reporter: &mut dyn Reporter,
    ) {
        match test.behaviour {
            Behaviour::Skip => {
                reporter.test_skipped(test);
                state.results.push(TestReport {
                    description: full_description(path, test),
                    status: TestStatus::Skipped,
                    duration: None,
                });
            }
            Behaviour::Pending => {
                // Pending tests execute no hooks or body.
                reporter.test_pending(test);
                state.results.push(TestReport {
                    description: full_description(path, test),
                    status: TestStatus::Pending,
                    duration: None,
                });
            }
            Behaviour::Normal | Behaviour::Only => {
                reporter.test_started(test);
                let started = Instant::now();
                let outcome = state
                    .scheduler
                    .run_bracket(path, key, test, reporter)
                    .await;
                let duration = started.elapsed();

                let status = match outcome {
                    Ok(()) => {
                        reporter.test_passed(test);
                        TestStatus::Passed
                    }
                    Err(failure) => {
                        reporter.test_failed(test, &failure);
                        TestStatus::Failed(failure)
                    }
                };
                state.results.push(TestReport {
                    description: full_description(path, test),
                    status,
                    duration: Some(duration),
                });
            }
        }
    }
}

/// Mutable state owned by one run.
struct RunState {
    scheduler: Scheduler,
    results: Vec<TestReport>,
}

/// Computes and executes the hook bracket surrounding every test.
///
/// The `before_all` map, keyed by each block's root-path indices, is the
/// per-run record of which blocks already fired their before-all hooks (and
/// with what outcome). It doubles as the activation set consulted when
/// deciding whether a block's after-all hooks must fire on subtree exit.
///
/// 计算并执行包围每个测试的钩子括号。
/// `before_all` 映射以每个块的根路径索引为键，是本次运行中记录哪些块
/// 已触发 before-all 钩子（及其结果）的数据；它同时充当激活集合。
struct Scheduler {
    timeout: Option<Duration>,
    before_all: HashMap<Vec<usize>, Option<TestFailure>>,
    hook_failures: usize,
}

impl Scheduler {
    fn new(timeout: Option<Duration>) -> Self {
        Scheduler {
            timeout,
            before_all: HashMap::new(),
            hook_failures: 0,
        }
    }

    /// Runs the full bracket for one test reached via `path` (root first,
    /// owning block last): before-all outer to inner (first time only per
    /// block), before-each outer to inner, the body, after-each inner to
    /// outer. A timed-out unit abandons the rest of the bracket outright,
    /// including the after-each phase. Returns the failure that should be
    /// attributed to the test, if any.
    async fn run_bracket(
        &mut self,
        path: &[&Block],
        key: &[usize],
        test: &Test,
        reporter: &mut dyn Reporter,
    ) -> Result<(), TestFailure> {
        // Before-all, outer to inner. A failed before-all poisons its block:
        // every later test under it receives the same failure without the
        // hook re-running.
        for depth in 0..path.len() {
            self.ensure_before_all(path[depth], &key[..depth], reporter)
                .await?;
        }

        // Before-each, outer to inner. On failure the rest of the phase and
        // the body are abandoned; unless the failure was a timeout, every
        // entered scope still gets its after-each turn.
        let mut entered = path.len();
        let mut failure: Option<TestFailure> = None;
        let mut timed_out = false;
        'before: for (depth, block) in path.iter().enumerate() {
            for hook in block.hooks_of_kind(HookKind::BeforeEach) {
                if let Err(inner) = self.run_unit(&hook.function).await {
                    self.report_hook_failure(hook, block, &inner, reporter);
                    timed_out = inner.reason == FailureReason::Timeout;
                    failure = Some(TestFailure::hook(hook.kind, hook.display_name(), &inner));
                    entered = depth + 1;
                    break 'before;
                }
            }
        }

        if failure.is_none() {
            if let Some(function) = &test.function {
                if let Err(body_failure) = self.run_unit(function).await {
                    timed_out = body_failure.reason == FailureReason::Timeout;
                    failure = Some(body_failure);
                }
            }
        }

        // After-each, inner to outer across blocks, declaration order within
        // a block. A failure aborts the remaining after-each phase only. The
        // phase is skipped entirely when the bracket was abandoned by a
        // timeout.
        if !timed_out {
            'after: for block in path.iter().take(entered).rev() {
                for hook in block.hooks_of_kind(HookKind::AfterEach) {
                    if let Err(inner) = self.run_unit(&hook.function).await {
                        self.report_hook_failure(hook, block, &inner, reporter);
                        if failure.is_none() {
                            failure =
                                Some(TestFailure::hook(hook.kind, hook.display_name(), &inner));
                        }
                        break 'after;
                    }
                }
            }
        }

        match failure {
            None => Ok(()),
            Some(failure) => Err(failure),
        }
    }

    /// Fires a block's before-all hooks the first time execution reaches a
    /// runnable test under it. Subsequent calls replay the recorded outcome.
    async fn ensure_before_all(
        &mut self,
        block: &Block,
        key: &[usize],
        reporter: &mut dyn Reporter,
    ) -> Result<(), TestFailure> {
        if let Some(outcome) = self.before_all.get(key) {
            return match outcome {
                None => Ok(()),
                Some(failure) => Err(failure.clone()),
            };
        }

        let mut failure: Option<TestFailure> = None;
        for hook in block.hooks_of_kind(HookKind::BeforeAll) {
            if let Err(inner) = self.run_unit(&hook.function).await {
                self.report_hook_failure(hook, block, &inner, reporter);
                failure = Some(TestFailure::hook(hook.kind, hook.display_name(), &inner));
                break;
            }
        }
        self.before_all.insert(key.to_vec(), failure.clone());
        match failure {
            None => Ok(()),
            Some(failure) => Err(failure),
        }
    }

    /// Fires a block's after-all hooks when traversal leaves its subtree,
    /// but only if the block was activated by at least one runnable test.
    /// Blocks with zero runnable tests never fire before-all or after-all.
    async fn leave_block(&mut self, block: &Block, key: &[usize], reporter: &mut dyn Reporter) {
        if !self.before_all.contains_key(key) {
            return;
        }
        for hook in block.hooks_of_kind(HookKind::AfterAll) {
            if let Err(inner) = self.run_unit(&hook.function).await {
                self.report_hook_failure(hook, block, &inner, reporter);
                break;
            }
        }
    }

    /// Awaits one asynchronous unit (hook or test body) with panic capture
    /// and the configured timeout. The next unit is never started before
    /// this one completes, so unit effects cannot interleave.
    async fn run_unit(&self, function: &TestFn) -> Result<(), TestFailure> {
        let future = AssertUnwindSafe(function.call()).catch_unwind();
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, future).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(TestFailure::timeout(limit)),
            },
            None => future.await,
        };
        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(TestFailure::error(err)),
            Err(payload) => Err(TestFailure::panic(payload)),
        }
    }

    fn report_hook_failure(
        &mut self,
        hook: &Hook,
        block: &Block,
        failure: &TestFailure,
        reporter: &mut dyn Reporter,
    ) {
        self.hook_failures += 1;
        reporter.hook_failed(hook, block, failure);
    }
}

/// The full path of a test: block descriptions (root excluded) joined with
/// " > ", ending with the test's own description.
fn full_description(path: &[&Block], test: &Test) -> String {
    let mut parts: Vec<&str> = path
        .iter()
        .skip(1)
        .map(|block| block.description.as_str())
        .collect();
    parts.push(&test.description);
    parts.join(" > ")
}

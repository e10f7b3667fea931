//! # Execution Planner Module / 执行计划模块
//!
//! The pre-traversal behaviour-resolution pass. It combines explicit
//! skip/only markers with tag filtering and rewrites each test's behaviour
//! marker into its effective value for this run. The original tree is never
//! mutated; the resolved tree is derived through [`Block::to_builder`].
//!
//! 遍历前的行为解析过程。它将显式的 skip/only 标记与标签过滤相结合，
//! 并将每个测试的行为标记重写为本次运行的有效值。
//! 原始树永不被改变；解析后的树通过 [`Block::to_builder`] 派生。

use crate::core::condition::Condition;
use crate::core::models::{Behaviour, Block, BlockKind, Test};
use crate::core::options::Tags;
use anyhow::{Result, ensure};
use std::collections::BTreeSet;

/// The resolved tree plus headline counts for the run.
/// 解析后的树以及本次运行的总体计数。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// The root block with every test's behaviour resolved to
    /// `Normal`, `Skip` or `Pending`.
    pub root: Block,
    /// The number of tests that will actually execute.
    pub runnable: usize,
    /// The number of tests resolved to skipped.
    pub skipped: usize,
    /// The number of tests resolved to pending.
    pub pending: usize,
}

#[derive(Default)]
struct Counts {
    runnable: usize,
    skipped: usize,
    pending: usize,
}

/// Creates an execution plan for the given tree and tag-filter condition.
///
/// A test is resolved to `Skip` when it or any ancestor is marked `Skip`,
/// when any `Only` marker exists anywhere in the tree and the test is not
/// under one, or when the condition evaluates false over the union of the
/// test's tags and all ancestor tags. A surviving test without a body (or
/// marked `Pending`) is resolved to `Pending`. Skip dominates pending.
///
/// 为给定的树和标签过滤条件创建执行计划。
pub fn plan_execution(root: &Block, condition: &Condition) -> Result<ExecutionPlan> {
    ensure!(
        root.kind == BlockKind::Root,
        "execution must start from a Root block, got {:?}",
        root.kind
    );

    let only_anywhere = has_only(root);
    let mut counts = Counts::default();
    let resolved = resolve_block(
        root,
        false,
        false,
        &BTreeSet::new(),
        only_anywhere,
        condition,
        &mut counts,
    )?;

    Ok(ExecutionPlan {
        root: resolved,
        runnable: counts.runnable,
        skipped: counts.skipped,
        pending: counts.pending,
    })
}

/// True when any block or test in the subtree carries an `Only` marker.
/// `Only` is exclusive across the whole tree, not just local siblings.
pub fn has_only(block: &Block) -> bool {
    block.behaviour == Behaviour::Only
        || block.tests.iter().any(|t| t.behaviour == Behaviour::Only)
        || block.blocks.iter().any(has_only)
}

fn resolve_block(
    block: &Block,
    inherited_skip: bool,
    inherited_only: bool,
    inherited_tags: &BTreeSet<String>,
    only_anywhere: bool,
    condition: &Condition,
    counts: &mut Counts,
) -> Result<Block> {
    let skipped = inherited_skip || block.behaviour == Behaviour::Skip;
    let under_only = inherited_only || block.behaviour == Behaviour::Only;
    let tags = merge_tags(inherited_tags, &block.options.get::<Tags>());

    let tests = block
        .tests
        .iter()
        .map(|test| resolve_test(test, skipped, under_only, &tags, only_anywhere, condition, counts))
        .collect();

    let blocks = block
        .blocks
        .iter()
        .map(|child| {
            resolve_block(child, skipped, under_only, &tags, only_anywhere, condition, counts)
        })
        .collect::<Result<Vec<_>>>()?;

    block.to_builder().tests(tests).blocks(blocks).build()
}

fn resolve_test(
    test: &Test,
    skipped: bool,
    under_only: bool,
    block_tags: &BTreeSet<String>,
    only_anywhere: bool,
    condition: &Condition,
    counts: &mut Counts,
) -> Test {
    let merged = merge_tags(block_tags, &test.options.get::<Tags>());
    let test_only = under_only || test.behaviour == Behaviour::Only;

    let effective = if skipped || test.behaviour == Behaviour::Skip {
        Behaviour::Skip
    } else if only_anywhere && !test_only {
        Behaviour::Skip
    } else if !condition.evaluate(&merged) {
        Behaviour::Skip
    } else if test.is_pending() {
        Behaviour::Pending
    } else {
        Behaviour::Normal
    };

    match effective {
        Behaviour::Skip => counts.skipped += 1,
        Behaviour::Pending => counts.pending += 1,
        _ => counts.runnable += 1,
    }

    Test::new(
        test.description.clone(),
        effective,
        test.options.clone(),
        test.function.clone(),
    )
}

fn merge_tags(base: &BTreeSet<String>, own: &Option<&Tags>) -> BTreeSet<String> {
    let mut merged = base.clone();
    if let Some(tags) = own {
        merged.extend(tags.0.iter().cloned());
    }
    merged
}

//! # Block Builder Module / 块构建器模块
//!
//! Accumulates the declared children, hooks and tests of a block under
//! construction and produces an immutable [`Block`]. Every field is
//! mandatory: there is no implicit default tree shape, and `build()` fails
//! with an error enumerating any unset field.
//!
//! 累积正在构建的块所声明的子块、钩子和测试，并生成不可变的 [`Block`]。
//! 每个字段都是必需的：没有隐式的默认树形状，
//! `build()` 失败时会列举所有未设置的字段。

use crate::core::models::{Behaviour, Block, BlockKind, Hook, Test};
use crate::core::options::Options;
use anyhow::{Result, bail};

/// Builder for [`Block`]. Obtain a fresh one with [`BlockBuilder::new`] or a
/// pre-seeded one with [`Block::to_builder`].
#[derive(Debug, Default)]
pub struct BlockBuilder {
    kind: Option<BlockKind>,
    behaviour: Option<Behaviour>,
    origin: Option<String>,
    description: Option<String>,
    blocks: Option<Vec<Block>>,
    hooks: Option<Vec<Hook>>,
    tests: Option<Vec<Test>>,
    options: Option<Options>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        BlockBuilder::default()
    }

    pub fn kind(mut self, kind: BlockKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = Some(behaviour);
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = Some(blocks);
        self
    }

    pub fn hooks(mut self, hooks: Vec<Hook>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn tests(mut self, tests: Vec<Test>) -> Self {
        self.tests = Some(tests);
        self
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Finalizes the block. Fails if any required field was never set; the
    /// error message names every missing field.
    ///
    /// 完成块的构建。如果有任何必需字段未设置则失败；
    /// 错误消息会列出所有缺失的字段。
    pub fn build(self) -> Result<Block> {
        let mut missing = Vec::new();
        if self.kind.is_none() {
            missing.push("kind");
        }
        if self.behaviour.is_none() {
            missing.push("behaviour");
        }
        if self.origin.is_none() {
            missing.push("origin");
        }
        if self.description.is_none() {
            missing.push("description");
        }
        if self.blocks.is_none() {
            missing.push("blocks");
        }
        if self.hooks.is_none() {
            missing.push("hooks");
        }
        if self.tests.is_none() {
            missing.push("tests");
        }
        if self.options.is_none() {
            missing.push("options");
        }
        if !missing.is_empty() {
            bail!("block is missing required fields: {}", missing.join(", "));
        }

        // All unwraps guarded by the check above.
        Ok(Block {
            kind: self.kind.unwrap(),
            behaviour: self.behaviour.unwrap(),
            origin: self.origin.unwrap(),
            description: self.description.unwrap(),
            blocks: self.blocks.unwrap(),
            hooks: self.hooks.unwrap(),
            tests: self.tests.unwrap(),
            options: self.options.unwrap(),
        })
    }
}

//! # Declaration API Module / 声明 API 模块
//!
//! The closure-based API users call to declare nested groups, tests and
//! hooks. A [`Context`] is threaded explicitly through the declaration
//! closures (no ambient global state), so tree construction is referentially
//! transparent and testable in isolation. The output is a fully-built,
//! validated [`Block`] tree ready for the runner.
//!
//! 用户用来声明嵌套分组、测试和钩子的基于闭包的 API。
//! [`Context`] 显式地穿过声明闭包（没有环境全局状态），
//! 因此树的构建是引用透明的，并且可以独立测试。
//!
//! # Example
//! ```rust,no_run
//! use spec_runner::dsl::define_tests;
//!
//! let tree = define_tests("calculator", |ctx| {
//!     ctx.describe("Calculator", |ctx| {
//!         ctx.before_each(|| { /* reset state */ });
//!         ctx.it("adds", || assert_eq!(2 + 3, 5));
//!         ctx.when("input is negative", |ctx| {
//!             ctx.it("negates", || assert_eq!(-(-1), 1));
//!         });
//!     });
//! }).unwrap();
//! ```

use crate::core::builder::BlockBuilder;
use crate::core::models::{Behaviour, Block, BlockKind, Hook, HookKind, Test, TestFn};
use crate::core::options::{Options, Tags};
use anyhow::{Result, anyhow};
use std::future::Future;

/// Builds a validated test tree from a declaration closure.
///
/// `origin` identifies the defining suite and is recorded on every block in
/// the tree.
///
/// 从声明闭包构建经过验证的测试树。
/// `origin` 标识定义套件，并记录在树中的每个块上。
pub fn define_tests(origin: &str, body: impl FnOnce(&mut Context)) -> Result<Block> {
    let mut ctx = Context::new(origin);
    body(&mut ctx);
    ctx.into_root()
}

struct Frame {
    kind: BlockKind,
    behaviour: Behaviour,
    description: String,
    blocks: Vec<Block>,
    hooks: Vec<Hook>,
    tests: Vec<Test>,
    options: Options,
}

impl Frame {
    fn new(kind: BlockKind, behaviour: Behaviour, description: String) -> Self {
        Frame {
            kind,
            behaviour,
            description,
            blocks: Vec::new(),
            hooks: Vec::new(),
            tests: Vec::new(),
            options: Options::empty(),
        }
    }
}

/// The handle threaded through declaration closures.
/// 穿过声明闭包的句柄。
pub struct Context {
    origin: String,
    stack: Vec<Frame>,
    error: Option<anyhow::Error>,
}

impl Context {
    fn new(origin: &str) -> Self {
        Context {
            origin: origin.to_string(),
            stack: vec![Frame::new(BlockKind::Root, Behaviour::Normal, String::new())],
            error: None,
        }
    }

    // ---- Groups --------------------------------------------------------------

    /// Declares a nested group of tests.
    pub fn describe(&mut self, description: &str, body: impl FnOnce(&mut Context)) {
        self.group(BlockKind::Group, Behaviour::Normal, description, body);
    }

    /// Declares a focused group: when any focused node exists, everything
    /// outside the focused nodes is skipped for the run.
    pub fn fdescribe(&mut self, description: &str, body: impl FnOnce(&mut Context)) {
        self.group(BlockKind::Group, Behaviour::Only, description, body);
    }

    /// Declares a skipped group; none of its tests run.
    pub fn xdescribe(&mut self, description: &str, body: impl FnOnce(&mut Context)) {
        self.group(BlockKind::Group, Behaviour::Skip, description, body);
    }

    /// Declares a conditional ("when") group.
    pub fn when(&mut self, description: &str, body: impl FnOnce(&mut Context)) {
        self.group(BlockKind::ConditionalGroup, Behaviour::Normal, description, body);
    }

    pub fn fwhen(&mut self, description: &str, body: impl FnOnce(&mut Context)) {
        self.group(BlockKind::ConditionalGroup, Behaviour::Only, description, body);
    }

    pub fn xwhen(&mut self, description: &str, body: impl FnOnce(&mut Context)) {
        self.group(BlockKind::ConditionalGroup, Behaviour::Skip, description, body);
    }

    fn group(
        &mut self,
        kind: BlockKind,
        behaviour: Behaviour,
        description: &str,
        body: impl FnOnce(&mut Context),
    ) {
        self.stack
            .push(Frame::new(kind, behaviour, description.to_string()));
        body(self);
        let frame = self.stack.pop().expect("unbalanced group declaration");
        match build_block(&self.origin, frame) {
            Ok(block) => self.current().blocks.push(block),
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
            }
        }
    }

    // ---- Tests ---------------------------------------------------------------

    /// Declares a test case with a synchronous body. Failure is signalled by
    /// panicking (e.g. a failed `assert!`).
    pub fn it(&mut self, description: &str, f: impl Fn() + Send + Sync + 'static) {
        self.add_test(description, Behaviour::Normal, Options::empty(), Some(TestFn::sync(f)));
    }

    /// Declares a focused test.
    pub fn fit(&mut self, description: &str, f: impl Fn() + Send + Sync + 'static) {
        self.add_test(description, Behaviour::Only, Options::empty(), Some(TestFn::sync(f)));
    }

    /// Declares a skipped test.
    pub fn xit(&mut self, description: &str, f: impl Fn() + Send + Sync + 'static) {
        self.add_test(description, Behaviour::Skip, Options::empty(), Some(TestFn::sync(f)));
    }

    /// Declares a test with an asynchronous body. The runner awaits the body
    /// to completion before scheduling the next unit.
    pub fn async_it<F, Fut>(&mut self, description: &str, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add_test(description, Behaviour::Normal, Options::empty(), Some(wrap_async(f)));
    }

    /// Declares a test with a tag set, for use with tag-filter expressions.
    pub fn tagged_it(
        &mut self,
        description: &str,
        tags: &[&str],
        f: impl Fn() + Send + Sync + 'static,
    ) {
        let options = Options::empty().set(Tags::new(tags.iter().copied()));
        self.add_test(description, Behaviour::Normal, options, Some(TestFn::sync(f)));
    }

    /// Declares a pending test: it has no body, executes no hooks, and is
    /// reported as pending.
    pub fn pending(&mut self, description: &str) {
        self.add_test(description, Behaviour::Pending, Options::empty(), None);
    }

    fn add_test(
        &mut self,
        description: &str,
        behaviour: Behaviour,
        options: Options,
        function: Option<TestFn>,
    ) {
        let test = Test::new(description, behaviour, options, function);
        self.current().tests.push(test);
    }

    // ---- Hooks ---------------------------------------------------------------

    pub fn before_all(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.add_hook(HookKind::BeforeAll, TestFn::sync(f));
    }

    pub fn before_each(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.add_hook(HookKind::BeforeEach, TestFn::sync(f));
    }

    pub fn after_each(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.add_hook(HookKind::AfterEach, TestFn::sync(f));
    }

    pub fn after_all(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.add_hook(HookKind::AfterAll, TestFn::sync(f));
    }

    pub fn async_before_all<F, Fut>(&mut self, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add_hook(HookKind::BeforeAll, wrap_async(f));
    }

    pub fn async_before_each<F, Fut>(&mut self, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add_hook(HookKind::BeforeEach, wrap_async(f));
    }

    pub fn async_after_each<F, Fut>(&mut self, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add_hook(HookKind::AfterEach, wrap_async(f));
    }

    pub fn async_after_all<F, Fut>(&mut self, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add_hook(HookKind::AfterAll, wrap_async(f));
    }

    fn add_hook(&mut self, kind: HookKind, function: TestFn) {
        self.current().hooks.push(Hook::new(kind, None, function));
    }

    // ---- Options -------------------------------------------------------------

    /// Sets the tag set of the current group, replacing any previous one.
    /// Tags are inherited by every test and nested group in scope.
    ///
    /// 设置当前分组的标签集，替换之前的标签集。
    /// 标签由作用域内的每个测试和嵌套分组继承。
    pub fn tags(&mut self, tags: &[&str]) {
        let frame = self.current();
        frame.options = frame.options.set(Tags::new(tags.iter().copied()));
    }

    // --------------------------------------------------------------------------

    fn current(&mut self) -> &mut Frame {
        self.stack.last_mut().expect("empty declaration stack")
    }

    fn into_root(mut self) -> Result<Block> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.stack.len() != 1 {
            return Err(anyhow!(
                "unbalanced group declaration: {} frames left open",
                self.stack.len() - 1
            ));
        }
        let root = self.stack.pop().expect("empty declaration stack");
        build_block(&self.origin, root)
    }
}

fn build_block(origin: &str, frame: Frame) -> Result<Block> {
    BlockBuilder::new()
        .kind(frame.kind)
        .behaviour(frame.behaviour)
        .origin(origin)
        .description(frame.description)
        .blocks(frame.blocks)
        .hooks(frame.hooks)
        .tests(frame.tests)
        .options(frame.options)
        .build()
}

fn wrap_async<F, Fut>(f: F) -> TestFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    TestFn::new(move || {
        let fut = f();
        async move {
            fut.await;
            Ok(())
        }
    })
}

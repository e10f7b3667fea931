//! # Condition Engine Module / 条件引擎模块
//!
//! A small boolean expression language over tag sets, used to decide whether
//! a block or test is included in a run. Combinators are represented as a
//! single tagged enum with a uniform rebuild-with-new-children operation, so
//! generic tree-rewriting passes (such as an expression parser substituting
//! sub-expressions) work over all combinator kinds without special-casing.
//!
//! 基于标签集的小型布尔表达式语言，用于决定块或测试是否包含在运行中。
//! 组合器表示为带有统一"以新子节点重建"操作的单个带标签枚举，
//! 因此通用的树重写过程无需特殊处理即可作用于所有组合器种类。

use std::collections::BTreeSet;

/// A boolean predicate over a tag set.
/// 基于标签集的布尔谓词。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// True when the candidate tag set contains the tag. An unknown tag
    /// simply evaluates false, never an error.
    Contains(String),
    /// True when all children are true. The empty `And` is true, giving the
    /// canonical always-pass condition.
    And(Vec<Condition>),
    /// True when any child is true. The empty `Or` is false.
    Or(Vec<Condition>),
    /// Negation of the child.
    Not(Box<Condition>),
}

impl Condition {
    /// The always-pass condition: an empty overall filter matches everything.
    /// 恒通过条件：空的整体过滤器匹配所有内容。
    pub const EMPTY: Condition = Condition::And(Vec::new());

    /// Convenience constructor for [`Condition::Contains`].
    pub fn contains(tag: impl Into<String>) -> Condition {
        Condition::Contains(tag.into())
    }

    /// Evaluates the condition against a candidate tag set.
    pub fn evaluate(&self, tags: &BTreeSet<String>) -> bool {
        match self {
            Condition::Contains(tag) => tags.contains(tag),
            Condition::And(children) => children.iter().all(|c| c.evaluate(tags)),
            Condition::Or(children) => children.iter().any(|c| c.evaluate(tags)),
            Condition::Not(child) => !child.evaluate(tags),
        }
    }

    /// The ordered children of a combinator. `Contains` has none.
    pub fn children(&self) -> &[Condition] {
        match self {
            Condition::Contains(_) => &[],
            Condition::And(children) | Condition::Or(children) => children,
            Condition::Not(child) => std::slice::from_ref(child),
        }
    }

    /// Rebuilds this node with a replacement child collection, keeping its
    /// kind. `Not` keeps the first replacement child (or becomes a negated
    /// always-pass if none is given); `Contains` has no children and
    /// rebuilds to itself.
    ///
    /// 以替换的子节点集合重建此节点，保持其种类不变。
    pub fn with_children(&self, children: Vec<Condition>) -> Condition {
        match self {
            Condition::Contains(tag) => Condition::Contains(tag.clone()),
            Condition::And(_) => Condition::And(children),
            Condition::Or(_) => Condition::Or(children),
            Condition::Not(_) => Condition::Not(Box::new(
                children.into_iter().next().unwrap_or(Condition::EMPTY),
            )),
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::EMPTY
    }
}

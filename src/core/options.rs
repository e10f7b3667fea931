//! # Options Module / 选项模块
//!
//! An immutable, type-keyed property bag attached to blocks and tests.
//! Options let the data model be extended with arbitrary metadata; the
//! runner itself only relies on [`Tags`] for filtering.
//!
//! 附加到块和测试的不可变、按类型索引的属性包。
//! 选项允许使用任意元数据扩展数据模型；运行器本身仅依赖 [`Tags`] 进行过滤。

use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// A value that can be stored in an [`Options`] bag, keyed by its type.
///
/// Blanket-implemented for every `'static` type that is `Debug + PartialEq +
/// Send + Sync`, so any plain metadata struct qualifies.
///
/// 可存储在 [`Options`] 包中的值，按其类型索引。
pub trait OptionValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    /// Structural equality across the type-erased boundary.
    fn eq_dyn(&self, other: &dyn OptionValue) -> bool;
}

impl<T> OptionValue for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_dyn(&self, other: &dyn OptionValue) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }
}

/// An immutable set of options. At most one value per type; `set`/`unset`
/// return a new `Options` value and never mutate the receiver.
///
/// 不可变的选项集。每种类型最多一个值；`set`/`unset` 返回新的 `Options`
/// 值，从不改变接收者。
#[derive(Clone, Default)]
pub struct Options {
    entries: HashMap<TypeId, Arc<dyn OptionValue>>,
}

impl Options {
    /// The empty option set.
    pub fn empty() -> Self {
        Options::default()
    }

    /// Gets the option of type `T`, if one has been set.
    pub fn get<T: OptionValue>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|v| v.as_any().downcast_ref::<T>())
    }

    /// Sets an option, overwriting any existing value of the same type.
    /// Returns a new `Options`.
    pub fn set<T: OptionValue>(&self, value: T) -> Options {
        let mut entries = self.entries.clone();
        entries.insert(TypeId::of::<T>(), Arc::new(value));
        Options { entries }
    }

    /// Removes the option of type `T`, if present. Returns a new `Options`.
    pub fn unset<T: OptionValue>(&self) -> Options {
        let mut entries = self.entries.clone();
        entries.remove(&TypeId::of::<T>());
        Options { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl PartialEq for Options {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(key, value)| {
                other
                    .entries
                    .get(key)
                    .is_some_and(|o| value.eq_dyn(o.as_ref()))
            })
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.values()).finish()
    }
}

/// The tag set of a block or test, used by the condition engine to decide
/// run-eligibility.
///
/// 块或测试的标签集，条件引擎使用它来决定是否运行。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tags(pub BTreeSet<String>);

impl Tags {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tags(tags.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }
}

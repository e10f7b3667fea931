//! # Execution Planner Unit Tests / 执行计划单元测试
//!
//! Behaviour-resolution tests: skip inheritance, tree-wide focus
//! exclusivity, tag filtering over inherited tag sets and pending
//! resolution.

use spec_runner::core::condition::Condition;
use spec_runner::core::models::{Behaviour, Block};
use spec_runner::core::planner::{has_only, plan_execution};
use spec_runner::dsl::define_tests;

/// The resolved behaviour of the test named `description`, searched
/// anywhere in the resolved tree.
fn behaviour_of(root: &Block, description: &str) -> Behaviour {
    fn find(block: &Block, description: &str) -> Option<Behaviour> {
        for test in &block.tests {
            if test.description == description {
                return Some(test.behaviour);
            }
        }
        block.blocks.iter().find_map(|b| find(b, description))
    }
    find(root, description).unwrap_or_else(|| panic!("no test named '{description}'"))
}

#[cfg(test)]
mod skip_tests {
    use super::*;

    #[test]
    fn test_skip_marker_on_a_block_is_inherited_by_descendants() {
        let tree = define_tests("planner", |ctx| {
            ctx.xdescribe("skipped group", |ctx| {
                ctx.it("direct child", || {});
                ctx.describe("nested", |ctx| {
                    ctx.it("deep child", || {});
                });
            });
            ctx.it("outside", || {});
        })
        .unwrap();

        let plan = plan_execution(&tree, &Condition::EMPTY).unwrap();

        assert_eq!(behaviour_of(&plan.root, "direct child"), Behaviour::Skip);
        assert_eq!(behaviour_of(&plan.root, "deep child"), Behaviour::Skip);
        assert_eq!(behaviour_of(&plan.root, "outside"), Behaviour::Normal);
        assert_eq!(plan.runnable, 1);
        assert_eq!(plan.skipped, 2);
    }

    #[test]
    fn test_skip_dominates_pending() {
        let tree = define_tests("planner", |ctx| {
            ctx.xdescribe("skipped group", |ctx| {
                ctx.pending("bodyless inside skip");
            });
        })
        .unwrap();

        let plan = plan_execution(&tree, &Condition::EMPTY).unwrap();

        assert_eq!(
            behaviour_of(&plan.root, "bodyless inside skip"),
            Behaviour::Skip
        );
        assert_eq!(plan.pending, 0);
        assert_eq!(plan.skipped, 1);
    }
}

#[cfg(test)]
mod only_tests {
    use super::*;

    #[test]
    fn test_focus_is_exclusive_across_the_whole_tree() {
        let tree = define_tests("planner", |ctx| {
            ctx.describe("left", |ctx| {
                ctx.it("unfocused", || {});
            });
            ctx.describe("right", |ctx| {
                ctx.fit("focused", || {});
                ctx.it("sibling of focused", || {});
            });
        })
        .unwrap();

        assert!(has_only(&tree));
        let plan = plan_execution(&tree, &Condition::EMPTY).unwrap();

        assert_eq!(behaviour_of(&plan.root, "focused"), Behaviour::Normal);
        assert_eq!(behaviour_of(&plan.root, "unfocused"), Behaviour::Skip);
        assert_eq!(
            behaviour_of(&plan.root, "sibling of focused"),
            Behaviour::Skip
        );
        assert_eq!(plan.runnable, 1);
        assert_eq!(plan.skipped, 2);
    }

    #[test]
    fn test_focused_block_runs_all_of_its_tests() {
        let tree = define_tests("planner", |ctx| {
            ctx.fdescribe("focused group", |ctx| {
                ctx.it("first", || {});
                ctx.describe("nested", |ctx| {
                    ctx.it("second", || {});
                });
            });
            ctx.it("outside", || {});
        })
        .unwrap();

        let plan = plan_execution(&tree, &Condition::EMPTY).unwrap();

        assert_eq!(behaviour_of(&plan.root, "first"), Behaviour::Normal);
        assert_eq!(behaviour_of(&plan.root, "second"), Behaviour::Normal);
        assert_eq!(behaviour_of(&plan.root, "outside"), Behaviour::Skip);
    }

    #[test]
    fn test_skip_beats_focus_on_the_same_path() {
        let tree = define_tests("planner", |ctx| {
            ctx.xdescribe("skipped group", |ctx| {
                ctx.fit("focused inside skip", || {});
            });
            ctx.it("outside", || {});
        })
        .unwrap();

        let plan = plan_execution(&tree, &Condition::EMPTY).unwrap();

        assert_eq!(
            behaviour_of(&plan.root, "focused inside skip"),
            Behaviour::Skip
        );
        // The focus marker still suppresses everything outside it.
        assert_eq!(behaviour_of(&plan.root, "outside"), Behaviour::Skip);
    }

    #[test]
    fn test_has_only_is_false_for_an_unfocused_tree() {
        let tree = define_tests("planner", |ctx| {
            ctx.describe("group", |ctx| {
                ctx.it("plain", || {});
            });
        })
        .unwrap();

        assert!(!has_only(&tree));
    }
}

#[cfg(test)]
mod filter_tests {
    use super::*;

    #[test]
    fn test_condition_evaluates_over_inherited_tags() {
        let tree = define_tests("planner", |ctx| {
            ctx.describe("database suite", |ctx| {
                ctx.tags(&["db"]);
                ctx.it("inherits the block tag", || {});
                ctx.tagged_it("also slow", &["slow"], || {});
            });
            ctx.it("untagged", || {});
        })
        .unwrap();

        let plan = plan_execution(&tree, &Condition::contains("db")).unwrap();

        assert_eq!(
            behaviour_of(&plan.root, "inherits the block tag"),
            Behaviour::Normal
        );
        assert_eq!(behaviour_of(&plan.root, "also slow"), Behaviour::Normal);
        assert_eq!(behaviour_of(&plan.root, "untagged"), Behaviour::Skip);
    }

    #[test]
    fn test_negated_condition_skips_matching_tests() {
        let tree = define_tests("planner", |ctx| {
            ctx.describe("suite", |ctx| {
                ctx.tagged_it("slow path", &["slow"], || {});
                ctx.it("fast path", || {});
            });
        })
        .unwrap();

        let condition = Condition::Not(Box::new(Condition::contains("slow")));
        let plan = plan_execution(&tree, &condition).unwrap();

        assert_eq!(behaviour_of(&plan.root, "slow path"), Behaviour::Skip);
        assert_eq!(behaviour_of(&plan.root, "fast path"), Behaviour::Normal);
    }

    #[test]
    fn test_empty_condition_matches_everything() {
        let tree = define_tests("planner", |ctx| {
            ctx.tagged_it("tagged", &["a"], || {});
            ctx.it("untagged", || {});
        })
        .unwrap();

        let plan = plan_execution(&tree, &Condition::EMPTY).unwrap();

        assert_eq!(plan.runnable, 2);
        assert_eq!(plan.skipped, 0);
    }
}

#[cfg(test)]
mod resolution_tests {
    use super::*;

    #[test]
    fn test_pending_tests_are_counted_and_marked() {
        let tree = define_tests("planner", |ctx| {
            ctx.describe("group", |ctx| {
                ctx.pending("write this later");
                ctx.it("already written", || {});
            });
        })
        .unwrap();

        let plan = plan_execution(&tree, &Condition::EMPTY).unwrap();

        assert_eq!(
            behaviour_of(&plan.root, "write this later"),
            Behaviour::Pending
        );
        assert_eq!(plan.pending, 1);
        assert_eq!(plan.runnable, 1);
    }

    #[test]
    fn test_planning_does_not_mutate_the_source_tree() {
        let tree = define_tests("planner", |ctx| {
            ctx.describe("group", |ctx| {
                ctx.tagged_it("slow path", &["slow"], || {});
            });
        })
        .unwrap();

        let condition = Condition::Not(Box::new(Condition::contains("slow")));
        let plan = plan_execution(&tree, &condition).unwrap();

        assert_eq!(behaviour_of(&plan.root, "slow path"), Behaviour::Skip);
        // The source keeps its declared behaviour.
        assert_eq!(behaviour_of(&tree, "slow path"), Behaviour::Normal);
    }

    #[test]
    fn test_planning_rejects_a_non_root_block() {
        let tree = define_tests("planner", |ctx| {
            ctx.describe("group", |ctx| {
                ctx.it("inner", || {});
            });
        })
        .unwrap();

        let err = plan_execution(&tree.blocks[0], &Condition::EMPTY).unwrap_err();
        assert!(err.to_string().contains("Root"));
    }
}

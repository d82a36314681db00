//! Scheme level pre/post actions
//!
//! User supplied execution actions are bucketed by (action, pre/post) and
//! sorted by their explicit order. The planner later puts the generated
//! Bazel support actions in front of them.

use serde::Serialize;
use std::collections::HashMap;

use crate::types::{ActionKind, BuildableReference, ExecutionAction};

const INITIALIZE_BUILD_OUTPUT_GROUPS_FILE_TITLE: &str = "Initialize Bazel Build Output Groups File";
const INITIALIZE_BUILD_OUTPUT_GROUPS_FILE_SCRIPT: &str = r#"mkdir -p "${BAZEL_BUILD_OUTPUT_GROUPS_FILE%/*}"
if [[ -s "$BAZEL_BUILD_OUTPUT_GROUPS_FILE" ]]; then
    rm "$BAZEL_BUILD_OUTPUT_GROUPS_FILE"
fi
"#;

const PREPARE_BAZEL_DEPENDENCIES_TITLE: &str = "Prepare BazelDependencies";
const PREPARE_BAZEL_DEPENDENCIES_SCRIPT: &str = r#"mkdir -p "$PROJECT_DIR"

if [[ "${ENABLE_ADDRESS_SANITIZER:-}" == "YES" || \
      "${ENABLE_THREAD_SANITIZER:-}" == "YES" || \
      "${ENABLE_UNDEFINED_BEHAVIOR_SANITIZER:-}" == "YES" ]]
then
    cd "$INTERNAL_DIR" || exit 1
    ln -shfF "$DEVELOPER_DIR/Toolchains/XcodeDefault.xctoolchain/usr/lib" lib
fi
"#;

const UPDATE_LLDBINIT_TITLE: &str = "Update .lldbinit and copy dSYMs";
const UPDATE_LLDBINIT_SCRIPT: &str = r#""$BAZEL_INTEGRATION_DIR/create_lldbinit.sh"
"$BAZEL_INTEGRATION_DIR/copy_dsyms.sh"
"#;

/// A pre/post action as it appears in a scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemeExecutionAction {
    pub title: String,
    pub script_text: String,
    /// Target whose build settings are used to expand `script_text`
    pub expand_variables_based_on: BuildableReference,
}

impl SchemeExecutionAction {
    pub fn initialize_bazel_build_output_groups_file(reference: &BuildableReference) -> Self {
        Self::generated(
            INITIALIZE_BUILD_OUTPUT_GROUPS_FILE_TITLE,
            INITIALIZE_BUILD_OUTPUT_GROUPS_FILE_SCRIPT,
            reference,
        )
    }

    pub fn prepare_bazel_dependencies(reference: &BuildableReference) -> Self {
        Self::generated(
            PREPARE_BAZEL_DEPENDENCIES_TITLE,
            PREPARE_BAZEL_DEPENDENCIES_SCRIPT,
            reference,
        )
    }

    pub fn update_lldbinit_and_copy_dsyms(reference: &BuildableReference) -> Self {
        Self::generated(UPDATE_LLDBINIT_TITLE, UPDATE_LLDBINIT_SCRIPT, reference)
    }

    fn generated(title: &str, script_text: &str, reference: &BuildableReference) -> Self {
        Self {
            title: title.to_string(),
            script_text: script_text.to_string(),
            expand_variables_based_on: reference.clone(),
        }
    }
}

impl From<&ExecutionAction<'_>> for SchemeExecutionAction {
    fn from(action: &ExecutionAction<'_>) -> Self {
        Self {
            title: action.title.clone(),
            script_text: action.script_text.clone(),
            expand_variables_based_on: action.target.buildable_reference.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrePostActions {
    pub pre_actions: Vec<SchemeExecutionAction>,
    pub post_actions: Vec<SchemeExecutionAction>,
}

/// Sorted actions for each scheme action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedExecutionActions {
    pub build: PrePostActions,
    pub test: PrePostActions,
    pub run: PrePostActions,
    pub profile: PrePostActions,
}

#[derive(Debug, Clone)]
struct Pending {
    order: Option<i64>,
    action: SchemeExecutionAction,
}

/// Accumulates execution actions into their eight buckets
#[derive(Debug, Clone, Default)]
pub struct ExecutionActionBuckets {
    buckets: HashMap<(ActionKind, bool), Vec<Pending>>,
}

impl ExecutionActionBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: &ExecutionAction<'_>) {
        self.buckets
            .entry((action.action, action.is_pre_action))
            .or_default()
            .push(Pending {
                order: action.order,
                action: SchemeExecutionAction::from(action),
            });
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorts each bucket by ascending order. Actions without an order keep
    /// their input order and come after every ordered one.
    pub fn into_sorted(mut self) -> SortedExecutionActions {
        let mut take = |kind: ActionKind| PrePostActions {
            pre_actions: sorted(self.buckets.remove(&(kind, true))),
            post_actions: sorted(self.buckets.remove(&(kind, false))),
        };

        SortedExecutionActions {
            build: take(ActionKind::Build),
            test: take(ActionKind::Test),
            run: take(ActionKind::Run),
            profile: take(ActionKind::Profile),
        }
    }
}

fn sorted(pending: Option<Vec<Pending>>) -> Vec<SchemeExecutionAction> {
    let mut pending = pending.unwrap_or_default();
    pending.sort_by_key(|p| (p.order.is_none(), p.order));
    pending.into_iter().map(|p| p.action).collect()
}

use clap::Args;
use indexmap::IndexMap;

use super::{check_len, parse_flag, parse_optional_order};
use crate::decode::nulls_to_newlines;
use crate::error::{Error, Result};
use crate::types::{ActionKind, ExecutionAction, TargetId, TargetLookup, TargetsById};

const EXECUTION_ACTIONS: &str = "e";

/// Count-encoded execution actions (pre/post scripts) for all schemes
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ExecutionActionsArguments {
    /// Scheme name for all of the execution actions
    #[arg(long = "e", action = clap::ArgAction::Append, allow_hyphen_values = true)]
    pub execution_actions: Vec<String>,

    /// Whether each execution action is a pre-action
    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub execution_action_is_pre_actions: Vec<bool>,

    /// The action ('build', 'test', 'run' or 'profile') of each execution action
    #[arg(long, num_args = 1..)]
    pub execution_action_actions: Vec<ActionKind>,

    /// Target ID used to expand build settings in each execution action
    #[arg(long, num_args = 1..)]
    pub execution_action_targets: Vec<TargetId>,

    /// Order within its action, empty for unspecified
    #[arg(long, num_args = 1.., allow_negative_numbers = true, value_parser = parse_optional_order)]
    pub execution_action_orders: Vec<Option<i64>>,
}

/// Execution actions grouped by the scheme name they belong to
pub type ExecutionActionsByScheme<'a> = IndexMap<String, Vec<ExecutionAction<'a>>>;

impl ExecutionActionsArguments {
    pub fn len(&self) -> usize {
        self.execution_actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.execution_actions.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        let count = self.len();
        check_len(
            "execution-action-is-pre-actions",
            self.execution_action_is_pre_actions.len(),
            EXECUTION_ACTIONS,
            count,
        )?;
        check_len(
            "execution-action-actions",
            self.execution_action_actions.len(),
            EXECUTION_ACTIONS,
            count,
        )?;
        check_len(
            "execution-action-targets",
            self.execution_action_targets.len(),
            EXECUTION_ACTIONS,
            count,
        )?;
        check_len(
            "execution-action-orders",
            self.execution_action_orders.len(),
            EXECUTION_ACTIONS,
            count,
        )
    }

    /// Builds every execution action from the (title, script text) lines.
    ///
    /// Action `i` reads its title from line `2i` and its script from line
    /// `2i + 1`.
    pub fn calculate<'a>(
        &self,
        description: &str,
        titles_and_scripts: &[String],
        targets_by_id: &'a TargetsById,
    ) -> Result<ExecutionActionsByScheme<'a>> {
        let expected = self.len() * 2;
        if titles_and_scripts.len() != expected {
            return Err(Error::Precondition(format!(
                "Number of lines in \"{description}\" ({}) does not match what is specified with <e> ({}). It should equal {expected}.",
                titles_and_scripts.len(),
                self.len(),
            )));
        }

        let mut by_scheme = ExecutionActionsByScheme::new();
        for (index, scheme_name) in self.execution_actions.iter().enumerate() {
            let target = targets_by_id.value(
                &self.execution_action_targets[index],
                "Execution action associated target ID",
            )?;

            by_scheme
                .entry(scheme_name.clone())
                .or_default()
                .push(ExecutionAction {
                    title: nulls_to_newlines(&titles_and_scripts[index * 2]),
                    script_text: nulls_to_newlines(&titles_and_scripts[index * 2 + 1]),
                    action: self.execution_action_actions[index],
                    is_pre_action: self.execution_action_is_pre_actions[index],
                    order: self.execution_action_orders[index],
                    target,
                });
        }

        tracing::debug!(
            "Decoded {} execution actions for {} schemes",
            self.len(),
            by_scheme.len()
        );
        Ok(by_scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BuildableReference, ProductType, Target};

    fn target(id: &str) -> Target {
        Target {
            id: TargetId::from(id),
            label: id.to_string(),
            product_type: ProductType::Application,
            buildable_reference: BuildableReference {
                blueprint_identifier: format!("{id}-bp"),
                buildable_name: format!("{id}.app"),
                blueprint_name: id.to_string(),
                referenced_container: "container:App.xcodeproj".to_string(),
            },
        }
    }

    fn targets() -> TargetsById {
        [("A", target("A"))]
            .into_iter()
            .map(|(id, target)| (TargetId::from(id), target))
            .collect()
    }

    fn two_actions() -> ExecutionActionsArguments {
        ExecutionActionsArguments {
            execution_actions: vec!["Scheme 1".to_string(), "Scheme 2".to_string()],
            execution_action_is_pre_actions: vec![true, false],
            execution_action_actions: vec![ActionKind::Build, ActionKind::Test],
            execution_action_targets: vec![TargetId::from("A"), TargetId::from("A")],
            execution_action_orders: vec![None, Some(2)],
        }
    }

    #[test]
    fn test_actions_are_grouped_by_scheme() {
        let targets = targets();
        let lines = vec![
            "Pre build".to_string(),
            "echo one\0echo two".to_string(),
            "Post test".to_string(),
            "echo done".to_string(),
        ];

        let by_scheme = two_actions().calculate("ea", &lines, &targets).unwrap();

        assert_eq!(by_scheme.len(), 2);
        let first = &by_scheme["Scheme 1"][0];
        assert_eq!(first.title, "Pre build");
        assert_eq!(first.script_text, "echo one\necho two");
        assert!(first.is_pre_action);
        assert_eq!(first.action, ActionKind::Build);

        let second = &by_scheme["Scheme 2"][0];
        assert_eq!(second.order, Some(2));
        assert_eq!(second.target.id, TargetId::from("A"));
    }

    #[test]
    fn test_line_count_mismatch() {
        let targets = targets();
        let lines = vec!["only title".to_string()];

        let err = two_actions().calculate("ea", &lines, &targets).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_unknown_target() {
        let targets = TargetsById::new();
        let lines = vec!["t".to_string(), "s".to_string(), "t".to_string(), "s".to_string()];

        let err = two_actions().calculate("ea", &lines, &targets).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Execution action associated target ID (A) not found in targets"
        );
    }

    #[test]
    fn test_validate_lengths() {
        let mut arguments = two_actions();
        arguments.execution_action_orders.pop();

        let err = arguments.validate().unwrap_err();
        assert!(err.to_string().contains("<execution-action-orders> (1 elements)"));
    }
}

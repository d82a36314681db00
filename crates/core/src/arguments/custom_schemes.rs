use clap::Args;

use super::{
    ExecutionActionsArguments, check_counts_len, check_counts_sum, check_enabled_states,
    args_env_line_count, check_len, parse_flag, parse_optional_string,
    parse_optional_target_id, sum,
};
use crate::error::{Error, Result};
use crate::types::TargetId;

const SCHEMES: &str = "custom-schemes";

/// Count-encoded description of every custom scheme
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CustomSchemesArguments {
    /// Name for all of the custom schemes
    #[arg(long = "s", action = clap::ArgAction::Append, allow_hyphen_values = true)]
    pub custom_schemes: Vec<String>,

    // Test
    /// Number of Test build-only targets per custom scheme
    #[arg(long, num_args = 1..)]
    pub test_build_target_counts: Vec<usize>,

    /// Test action build-only targets for all of the custom schemes
    #[arg(long, num_args = 1..)]
    pub test_build_targets: Vec<TargetId>,

    /// Number of Test action command-line arguments per custom scheme
    #[arg(long, num_args = 1..)]
    pub test_command_line_argument_counts: Vec<usize>,

    /// Enabled state of each Test action command-line argument
    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub test_command_line_argument_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub test_address_sanitizer_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub test_thread_sanitizer_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub test_ub_sanitizer_enabled_states: Vec<bool>,

    /// Number of Test action environment variables per custom scheme
    #[arg(long, num_args = 1..)]
    pub test_environment_variable_counts: Vec<usize>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub test_environment_variable_enabled_states: Vec<bool>,

    /// Whether each scheme's Test environment starts with the default variables
    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub test_environment_variables_include_defaults: Vec<bool>,

    /// Number of test targets per custom scheme
    #[arg(long, num_args = 1..)]
    pub test_target_counts: Vec<usize>,

    #[arg(long, num_args = 1..)]
    pub test_targets: Vec<TargetId>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub test_target_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub test_use_run_args_and_env_enabled_states: Vec<bool>,

    /// Xcode configuration per scheme, empty for the default
    #[arg(long, num_args = 1.., value_parser = parse_optional_string)]
    pub test_xcode_configurations: Vec<Option<String>>,

    // Run
    #[arg(long, num_args = 1..)]
    pub run_build_target_counts: Vec<usize>,

    #[arg(long, num_args = 1..)]
    pub run_build_targets: Vec<TargetId>,

    #[arg(long, num_args = 1..)]
    pub run_command_line_argument_counts: Vec<usize>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub run_command_line_argument_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub run_address_sanitizer_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub run_thread_sanitizer_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub run_ub_sanitizer_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1..)]
    pub run_environment_variable_counts: Vec<usize>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub run_environment_variable_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub run_environment_variables_include_defaults: Vec<bool>,

    /// Extension host per scheme, empty when the launch target isn't hosted
    #[arg(long, num_args = 1.., value_parser = parse_optional_target_id)]
    pub run_launch_extension_hosts: Vec<Option<TargetId>>,

    #[arg(long, num_args = 1.., value_parser = parse_optional_target_id)]
    pub run_launch_targets: Vec<Option<TargetId>>,

    #[arg(long, num_args = 1.., value_parser = parse_optional_string)]
    pub run_working_directories: Vec<Option<String>>,

    #[arg(long, num_args = 1.., value_parser = parse_optional_string)]
    pub run_xcode_configurations: Vec<Option<String>>,

    // Profile
    #[arg(long, num_args = 1..)]
    pub profile_build_target_counts: Vec<usize>,

    #[arg(long, num_args = 1..)]
    pub profile_build_targets: Vec<TargetId>,

    #[arg(long, num_args = 1..)]
    pub profile_command_line_argument_counts: Vec<usize>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub profile_command_line_argument_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1..)]
    pub profile_environment_variable_counts: Vec<usize>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub profile_environment_variable_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub profile_environment_variables_include_defaults: Vec<bool>,

    #[arg(long, num_args = 1.., value_parser = parse_optional_target_id)]
    pub profile_launch_extension_hosts: Vec<Option<TargetId>>,

    #[arg(long, num_args = 1.., value_parser = parse_optional_target_id)]
    pub profile_launch_targets: Vec<Option<TargetId>>,

    #[arg(long, num_args = 1.., value_parser = parse_flag)]
    pub profile_use_run_args_and_env_enabled_states: Vec<bool>,

    #[arg(long, num_args = 1.., value_parser = parse_optional_string)]
    pub profile_working_directories: Vec<Option<String>>,

    #[arg(long, num_args = 1.., value_parser = parse_optional_string)]
    pub profile_xcode_configurations: Vec<Option<String>>,

    #[command(flatten)]
    pub execution_actions: ExecutionActionsArguments,
}

impl CustomSchemesArguments {
    pub fn scheme_count(&self) -> usize {
        self.custom_schemes.len()
    }

    /// Checks every array against the scheme count and its counts array
    pub fn validate(&self) -> Result<()> {
        let schemes = self.scheme_count();

        // Test
        check_counts_sum(
            "test-build-target-counts",
            &self.test_build_target_counts,
            "test-build-targets",
            self.test_build_targets.len(),
        )?;
        check_counts_len(
            "test-build-target-counts",
            &self.test_build_target_counts,
            SCHEMES,
            schemes,
        )?;
        check_counts_len(
            "test-command-line-argument-counts",
            &self.test_command_line_argument_counts,
            SCHEMES,
            schemes,
        )?;
        check_enabled_states(
            "test-command-line-argument-enabled-states",
            self.test_command_line_argument_enabled_states.len(),
            "test-command-line-argument-counts",
            &self.test_command_line_argument_counts,
        )?;
        check_len(
            "test-address-sanitizer-enabled-states",
            self.test_address_sanitizer_enabled_states.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "test-thread-sanitizer-enabled-states",
            self.test_thread_sanitizer_enabled_states.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "test-ub-sanitizer-enabled-states",
            self.test_ub_sanitizer_enabled_states.len(),
            SCHEMES,
            schemes,
        )?;
        check_counts_len(
            "test-environment-variable-counts",
            &self.test_environment_variable_counts,
            SCHEMES,
            schemes,
        )?;
        check_enabled_states(
            "test-environment-variable-enabled-states",
            self.test_environment_variable_enabled_states.len(),
            "test-environment-variable-counts",
            &self.test_environment_variable_counts,
        )?;
        check_len(
            "test-environment-variables-include-defaults",
            self.test_environment_variables_include_defaults.len(),
            SCHEMES,
            schemes,
        )?;
        check_counts_sum(
            "test-target-counts",
            &self.test_target_counts,
            "test-targets",
            self.test_targets.len(),
        )?;
        check_counts_len("test-target-counts", &self.test_target_counts, SCHEMES, schemes)?;
        check_len(
            "test-target-enabled-states",
            self.test_target_enabled_states.len(),
            "test-targets",
            self.test_targets.len(),
        )?;
        check_len(
            "test-use-run-args-and-env-enabled-states",
            self.test_use_run_args_and_env_enabled_states.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "test-xcode-configurations",
            self.test_xcode_configurations.len(),
            SCHEMES,
            schemes,
        )?;

        // Run
        check_counts_sum(
            "run-build-target-counts",
            &self.run_build_target_counts,
            "run-build-targets",
            self.run_build_targets.len(),
        )?;
        check_counts_len(
            "run-build-target-counts",
            &self.run_build_target_counts,
            SCHEMES,
            schemes,
        )?;
        check_counts_len(
            "run-command-line-argument-counts",
            &self.run_command_line_argument_counts,
            SCHEMES,
            schemes,
        )?;
        check_enabled_states(
            "run-command-line-argument-enabled-states",
            self.run_command_line_argument_enabled_states.len(),
            "run-command-line-argument-counts",
            &self.run_command_line_argument_counts,
        )?;
        check_len(
            "run-address-sanitizer-enabled-states",
            self.run_address_sanitizer_enabled_states.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "run-thread-sanitizer-enabled-states",
            self.run_thread_sanitizer_enabled_states.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "run-ub-sanitizer-enabled-states",
            self.run_ub_sanitizer_enabled_states.len(),
            SCHEMES,
            schemes,
        )?;
        check_counts_len(
            "run-environment-variable-counts",
            &self.run_environment_variable_counts,
            SCHEMES,
            schemes,
        )?;
        check_enabled_states(
            "run-environment-variable-enabled-states",
            self.run_environment_variable_enabled_states.len(),
            "run-environment-variable-counts",
            &self.run_environment_variable_counts,
        )?;
        check_len(
            "run-environment-variables-include-defaults",
            self.run_environment_variables_include_defaults.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "run-launch-extension-hosts",
            self.run_launch_extension_hosts.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "run-launch-targets",
            self.run_launch_targets.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "run-working-directories",
            self.run_working_directories.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "run-xcode-configurations",
            self.run_xcode_configurations.len(),
            SCHEMES,
            schemes,
        )?;

        // Profile
        check_counts_sum(
            "profile-build-target-counts",
            &self.profile_build_target_counts,
            "profile-build-targets",
            self.profile_build_targets.len(),
        )?;
        check_counts_len(
            "profile-build-target-counts",
            &self.profile_build_target_counts,
            SCHEMES,
            schemes,
        )?;
        check_counts_len(
            "profile-command-line-argument-counts",
            &self.profile_command_line_argument_counts,
            SCHEMES,
            schemes,
        )?;
        check_enabled_states(
            "profile-command-line-argument-enabled-states",
            self.profile_command_line_argument_enabled_states.len(),
            "profile-command-line-argument-counts",
            &self.profile_command_line_argument_counts,
        )?;
        check_counts_len(
            "profile-environment-variable-counts",
            &self.profile_environment_variable_counts,
            SCHEMES,
            schemes,
        )?;
        check_enabled_states(
            "profile-environment-variable-enabled-states",
            self.profile_environment_variable_enabled_states.len(),
            "profile-environment-variable-counts",
            &self.profile_environment_variable_counts,
        )?;
        check_len(
            "profile-environment-variables-include-defaults",
            self.profile_environment_variables_include_defaults.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "profile-launch-extension-hosts",
            self.profile_launch_extension_hosts.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "profile-launch-targets",
            self.profile_launch_targets.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "profile-use-run-args-and-env-enabled-states",
            self.profile_use_run_args_and_env_enabled_states.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "profile-working-directories",
            self.profile_working_directories.len(),
            SCHEMES,
            schemes,
        )?;
        check_len(
            "profile-xcode-configurations",
            self.profile_xcode_configurations.len(),
            SCHEMES,
            schemes,
        )?;

        self.execution_actions.validate()
    }

    /// Number of lines the args/env file must hold
    pub fn expected_args_env_line_count(&self) -> Result<usize> {
        Ok(self.args_env_counts()?.expected)
    }

    fn args_env_counts(&self) -> Result<ArgsEnvCounts> {
        let sums = [
            sum(
                "test-command-line-argument-counts",
                &self.test_command_line_argument_counts,
            )?,
            sum(
                "test-environment-variable-counts",
                &self.test_environment_variable_counts,
            )?,
            sum(
                "run-command-line-argument-counts",
                &self.run_command_line_argument_counts,
            )?,
            sum(
                "run-environment-variable-counts",
                &self.run_environment_variable_counts,
            )?,
            sum(
                "profile-command-line-argument-counts",
                &self.profile_command_line_argument_counts,
            )?,
            sum(
                "profile-environment-variable-counts",
                &self.profile_environment_variable_counts,
            )?,
        ];
        let mut expected = 0usize;
        for (action, pair) in ["test", "run", "profile"].iter().zip(sums.chunks(2)) {
            let lines = args_env_line_count(
                pair[0],
                pair[1],
                &format!("{action}-environment-variable-counts"),
            )?;
            expected = expected.checked_add(lines).ok_or_else(|| {
                Error::Validation(format!(
                    "The number of lines described by <{action}-command-line-argument-counts> and <{action}-environment-variable-counts> is too large."
                ))
            })?;
        }
        Ok(ArgsEnvCounts { sums, expected })
    }

    /// Fails unless the args/env file matches the declared counts
    pub fn check_args_env_line_count(&self, description: &str, line_count: usize) -> Result<()> {
        let ArgsEnvCounts { sums, expected } = self.args_env_counts()?;
        if expected == line_count {
            return Ok(());
        }
        Err(Error::Precondition(format!(
            "Number of lines in \"{description}\" ({line_count}) does not match what is specified with \
<test-command-line-argument-counts> ({}), <test-environment-variable-counts> ({}), \
<run-command-line-argument-counts> ({}), <run-environment-variable-counts> ({}), \
<profile-command-line-argument-counts> ({}), and <profile-environment-variable-counts> ({}). \
It should equal {expected}.",
            sums[0], sums[1], sums[2], sums[3], sums[4], sums[5],
        )))
    }
}

/// Per-action count sums in test, run, profile order (arguments then
/// environment), plus the line total they describe
struct ArgsEnvCounts {
    sums: [usize; 6],
    expected: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_scheme() -> CustomSchemesArguments {
        CustomSchemesArguments {
            custom_schemes: vec!["App".to_string()],
            test_address_sanitizer_enabled_states: vec![false],
            test_thread_sanitizer_enabled_states: vec![false],
            test_ub_sanitizer_enabled_states: vec![false],
            test_environment_variables_include_defaults: vec![false],
            test_use_run_args_and_env_enabled_states: vec![true],
            test_xcode_configurations: vec![None],
            run_address_sanitizer_enabled_states: vec![false],
            run_thread_sanitizer_enabled_states: vec![false],
            run_ub_sanitizer_enabled_states: vec![false],
            run_environment_variables_include_defaults: vec![false],
            run_launch_extension_hosts: vec![None],
            run_launch_targets: vec![None],
            run_working_directories: vec![None],
            run_xcode_configurations: vec![None],
            profile_environment_variables_include_defaults: vec![false],
            profile_launch_extension_hosts: vec![None],
            profile_launch_targets: vec![None],
            profile_use_run_args_and_env_enabled_states: vec![true],
            profile_working_directories: vec![None],
            profile_xcode_configurations: vec![None],
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_scheme_is_valid() {
        assert!(one_scheme().validate().is_ok());
    }

    #[test]
    fn test_build_target_sum_mismatch() {
        let mut arguments = one_scheme();
        arguments.test_build_target_counts = vec![2];
        arguments.test_build_targets = vec![TargetId::from("a")];

        let err = arguments.validate().unwrap_err();
        assert!(err.to_string().contains("<test-build-target-counts> (2)"));
        assert!(err.to_string().contains("<test-build-targets> elements (1)"));
    }

    #[test]
    fn test_per_scheme_array_length_mismatch() {
        let mut arguments = one_scheme();
        arguments.run_launch_targets = vec![];

        let err = arguments.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: <run-launch-targets> (0 elements) must have exactly as many elements as <custom-schemes> (1 elements)."
        );
    }

    #[test]
    fn test_enabled_states_follow_counts() {
        let mut arguments = one_scheme();
        arguments.run_environment_variable_counts = vec![2];
        arguments.run_environment_variable_enabled_states = vec![true];

        let err = arguments.validate().unwrap_err();
        assert!(
            err.to_string()
                .contains("<run-environment-variable-enabled-states> elements (1)")
        );
    }

    #[test]
    fn test_expected_line_count_doubles_environment() {
        let mut arguments = one_scheme();
        arguments.test_command_line_argument_counts = vec![1];
        arguments.run_environment_variable_counts = vec![2];
        arguments.profile_command_line_argument_counts = vec![3];

        assert_eq!(arguments.expected_args_env_line_count().unwrap(), 8);
        assert!(arguments.check_args_env_line_count("args", 8).is_ok());

        let err = arguments.check_args_env_line_count("args", 7).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(err.to_string().contains("It should equal 8."));
    }

    #[test]
    fn test_overflowing_counts_fail_validation() {
        let mut arguments = one_scheme();
        arguments.custom_schemes.push("Other".to_string());
        arguments.test_build_target_counts = vec![usize::MAX, 2];
        arguments.test_build_targets = vec![TargetId::from("x")];

        let err = arguments.validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("<test-build-target-counts>"));
    }

    #[test]
    fn test_overflowing_line_count_is_rejected() {
        let mut arguments = one_scheme();
        arguments.run_environment_variable_counts = vec![usize::MAX / 2 + 1];

        let err = arguments.check_args_env_line_count("args", 0).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        arguments.run_environment_variable_counts = vec![usize::MAX / 2];
        arguments.profile_command_line_argument_counts = vec![2];
        let err = arguments.expected_args_env_line_count().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}

pub mod args_env;
pub mod scheme_info;
pub mod target;

// Re-export commonly used types
pub use args_env::{CommandLineArgument, EnvironmentVariable, prepend_default_environment};
pub use scheme_info::{
    ActionKind, ExecutionAction, LaunchTarget, Profile, Run, SchemeInfo, Test, TestTarget,
};
pub use target::{BuildableReference, ProductType, Target, TargetId, TargetLookup, TargetsById};

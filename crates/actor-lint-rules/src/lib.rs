//! # actor-lint-rules
//!
//! Built-in safety-convention rules for actor-lint.
//!
//! | Identifier | Triggers | Checks |
//! |---|---|---|
//! | `actor_private_functions` | class, extension | instance functions in actors are private |
//! | `remote_actor_private_functions` | class, extension | remote-actor access levels and `unsafeSend` forwarding |
//! | `actor_private_state` | class, extension | actor state is private |
//! | `protected_function_access` | call | `protected_` functions called through `self` only |
//! | `protected_state_access` | whole file | `protected_` state accessed through `self` only |
//! | `behavior_naming` | class, extension | behavior entries carry the `be` prefix |
//! | `behavior_params_documented` | class, extension | behaviors document parameters; indexed access in range |
//! | `behavior_call_arguments` | whole file | call-site argument count and literal types match |
//!
//! Every rule declares non-triggering and triggering example sources;
//! the test suite runs them all through the single-file harness.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod actor_private_functions;
mod actor_private_state;
mod behavior_call_arguments;
mod behavior_naming;
mod behavior_params_documented;
mod protected_function_access;
mod protected_state_access;
mod registry;
mod remote_actor_private_functions;

pub use actor_private_functions::ActorPrivateFunctions;
pub use actor_private_state::ActorPrivateState;
pub use behavior_call_arguments::BehaviorCallArguments;
pub use behavior_naming::BehaviorNaming;
pub use behavior_params_documented::BehaviorParamsDocumented;
pub use protected_function_access::ProtectedFunctionAccess;
pub use protected_state_access::ProtectedStateAccess;
pub use registry::default_rules;
pub use remote_actor_private_functions::RemoteActorPrivateFunctions;

/// Re-export of the core rule types for convenience.
pub use actor_lint_core::{Rule, RuleDescription, RuleRef};

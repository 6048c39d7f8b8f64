//! Naming conventions of the actor library being linted.
//!
//! The linted language has no `actor` keyword; the library layers its
//! concurrency model on ordinary classes and a handful of naming
//! conventions. Every rule in the default set keys off one or more of
//! these.

/// Marker base type for actors.
pub const ACTOR_TYPE: &str = "Actor";

/// Marker base type for remote (cross-process) actors.
pub const REMOTE_ACTOR_TYPE: &str = "RemoteActor";

/// Prefix for message entry points (`beRender`, `beAppend`, ...).
pub const BEHAVIOR_PREFIX: &str = "be";

/// Prefix for the private implementation backing a message entry point.
pub const BEHAVIOR_IMPL_PREFIX: &str = "_be";

/// Functions prefixed with this may keep a non-private access level;
/// they are safe to call from subclasses.
pub const SAFE_PREFIX: &str = "safe";

/// Functions prefixed with this opt out of the access-level rules
/// entirely; the author takes responsibility.
pub const UNSAFE_PREFIX: &str = "unsafe";

/// Members prefixed with this may only be touched through `self`.
pub const PROTECTED_PREFIX: &str = "protected_";

/// Call made by a remote-actor entry point to forward its message.
pub const UNSAFE_SEND: &str = "unsafeSend";

/// Callee names that construct a message send when they trail a member
/// variable declaration.
pub const MESSAGE_CONSTRUCTORS: &[&str] = &["Behavior", "ChainableBehavior"];

/// The type of the argument bundle a behavior closure receives.
pub const BEHAVIOR_ARGS_TYPE: &str = "BehaviorArgs";

/// Comment marker introducing a structured annotation, e.g.
/// `// actor-lint: parameter String - the value to append`.
pub const ANNOTATION_MARKER: &str = "actor-lint:";

/// Returns true if `name` is one of the message-constructor callees.
#[must_use]
pub fn is_message_constructor(name: &str) -> bool {
    MESSAGE_CONSTRUCTORS.contains(&name)
}

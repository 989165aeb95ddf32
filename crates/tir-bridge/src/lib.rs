//! Scripting bridge adapter between the core traversal framework and an
//! external host: a name-keyed callback table layered over a visitor,
//! letting a scripted environment override a subset of traversal hooks
//! without reimplementing the rest.

pub mod host_bridge;

pub use host_bridge::{HookArg, HookCallback, HostBridge, HOOK_NAMES};

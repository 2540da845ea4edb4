//! Hook system: named extension points with priority-ordered handlers.

pub mod definitions;
pub mod registry;

pub use definitions::{
    DispatchResult, HandlerOutput, HookArgs, HookBinding, HookContext, HookFailure, HookOutput,
};
pub use registry::{HookHandler, HookRegistration, HookRegistry};

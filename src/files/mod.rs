//! Mapping request targets onto files under the served root.

pub mod resolver;

pub use resolver::{NotFoundReason, PathResolver, Resolution, ResolvedResource, TraversalPolicy};

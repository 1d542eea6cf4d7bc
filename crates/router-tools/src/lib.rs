//! Reference tool implementations for the inference router.
//!
//! Currently a single tool, [`projects`], that demonstrates the `Tool`
//! trait contract: filesystem-backed `list`/`create` over a namespace
//! directory with path-traversal validation.

pub mod projects;

pub use projects::ProjectsTool;

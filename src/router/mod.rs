//! # Router Module
//!
//! Compressed prefix tree (radix tree) routing: one tree per HTTP method,
//! mapping a request path to a registered handler chain and extracting
//! `:name` and `*name` parameters along the way.
//!
//! ## Overview
//!
//! The router is used in two phases:
//!
//! 1. **Registration**: a [`RouterBuilder`] inserts templates such as
//!    `/users/:id/files/*path` into its trees, splitting edges where templates
//!    share a prefix and rejecting conflicting or malformed templates with a
//!    [`RouteError`].
//!
//! 2. **Matching**: [`RouterBuilder::build`] freezes the trees into a
//!    [`Router`]. Lookups walk the tree, preferring static children over
//!    wildcards and backtracking when that preference dead-ends. A miss can
//!    still carry a trailing slash hint, and a case-insensitive walk can
//!    suggest the registered spelling of a near-miss.
//!
//! ## Template syntax
//!
//! - `/static` matches itself only
//! - `/:name` matches one non-empty section, up to the next `/`
//! - `/*name` matches everything that is left, including the leading `/`,
//!   and must end the template
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use routetree::RouterBuilder;
//!
//! let mut builder = RouterBuilder::new();
//! builder.get("/src/*filepath", vec!["serve_file"])?;
//! builder.get("/search/:query", vec!["search"])?;
//! let router = builder.build();
//!
//! let mut params = router.new_params();
//! let mut skipped = router.new_skip_stack();
//! let found = router.lookup(&Method::GET, "/src/a/b.rs", &mut params, &mut skipped);
//! assert!(found.is_found());
//! assert_eq!(params.get("filepath"), Some("/a/b.rs"));
//! # Ok::<(), routetree::RouteError>(())
//! ```
//!
//! ## Performance
//!
//! - Lookup cost depends on path length, not route count
//! - Static children are ordered by how many routes live below them
//! - Parameters live in a `SmallVec`, inline for up to eight per route

mod builder;
mod case_insensitive;
mod core;
mod error;
mod group;
mod insert;
mod lookup;
mod node;
mod params;
mod shared;
#[cfg(test)]
mod tests;

pub use builder::{RouterBuilder, ANY_METHODS};
pub use core::{Resolution, RouteInfo, RouteMatch, Router};
pub use error::{Result, RouteError};
pub use group::RouteGroup;
pub use lookup::{Match, SkipStack};
pub use node::{HandlerChain, NodeKind};
pub use params::{Param, Params, MAX_INLINE_PARAMS};
pub use shared::SharedRouter;

//! # routetree
//!
//! **routetree** is a compressed prefix tree (radix tree) HTTP path router.
//! It maps an HTTP method and a URL path to a previously registered handler
//! chain and extracts named (`:name`) and catch-all (`*name`) parameters on
//! the way.
//!
//! ## Overview
//!
//! The handler type is yours: a chain is an `Arc<[H]>` and the router never
//! calls into it. Routing happens in two phases:
//!
//! 1. **Registration** with a [`RouterBuilder`]: templates are inserted into
//!    one tree per method. Shared prefixes are stored once, children are kept
//!    ordered by how many routes live below them, and conflicting or malformed
//!    templates are rejected with a [`RouteError`].
//! 2. **Lookup** on the frozen [`Router`]: read-only, safe for any number of
//!    concurrent callers, each with its own [`Params`] and [`SkipStack`].
//!
//! ## Architecture
//!
//! - **[`router`]** - Trees, registration, lookup with backtracking, the
//!   case-insensitive resolver and the dispatch decision ([`Resolution`])
//! - **[`config`]** - Redirect and 405 switches ([`RouterConfig`])
//! - **[`manifest`]** - YAML/JSON route tables with named handlers
//! - **[`logging`]** - `tracing` subscriber setup for binaries and tests
//! - **[`cli`]** - The `routetree` command-line tool
//!
//! ## Matching rules
//!
//! - Static children are tried before the wildcard child at every node; when
//!   a static branch dead-ends the walk resumes at the skipped wildcard
//! - A miss reports whether adding or removing one trailing `/` would match
//! - A case-insensitive walk can suggest the registered spelling of a path,
//!   for redirects only
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use routetree::{Resolution, RouterBuilder, RouterConfig};
//!
//! let mut builder = RouterBuilder::new().with_config(RouterConfig {
//!     handle_method_not_allowed: true,
//!     ..RouterConfig::default()
//! });
//! builder.get("/users/:id", vec!["show_user"])?;
//! builder.get("/users/new", vec!["new_user_form"])?;
//! builder.post("/users", vec!["create_user"])?;
//! let router = builder.build();
//!
//! let mut params = router.new_params();
//! let mut skipped = router.new_skip_stack();
//!
//! match router.resolve(&Method::GET, "/users/42", &mut params, &mut skipped) {
//!     Resolution::Found { handlers, .. } => assert_eq!(&handlers[..], &["show_user"]),
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert_eq!(params.get("id"), Some("42"));
//!
//! let resolution = router.resolve(&Method::GET, "/users", &mut params, &mut skipped);
//! assert_eq!(resolution.status(), http::StatusCode::METHOD_NOT_ALLOWED);
//! # Ok::<(), routetree::RouteError>(())
//! ```

pub mod cli;
pub mod config;
pub mod logging;
pub mod manifest;
pub mod router;

pub use config::RouterConfig;
pub use manifest::{load_manifest, RouteManifest};
pub use router::{
    HandlerChain, Match, Param, Params, Resolution, RouteError, RouteGroup, RouteInfo,
    RouteMatch, Router, RouterBuilder, SharedRouter, SkipStack,
};

//! # CLI Module
//!
//! Command-line access to route manifests: validate a table, list it, and
//! resolve sample requests against it.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Build the route table and report the first registration error:
//!
//! ```bash
//! routetree check --routes routes.yaml
//! ```
//!
//! ### `routes`
//!
//! Print every registered route with its handler chain:
//!
//! ```bash
//! routetree routes --routes routes.yaml
//! ```
//!
//! ### `match`
//!
//! Resolve request paths and print the dispatch decision for each:
//!
//! ```bash
//! routetree match --routes routes.yaml --method POST /users /users/42/
//! ```
//!
//! Options:
//! - `--method <METHOD>` - HTTP method of the requests (default: GET)
//! - `--fixed-path` - Suggest case-corrected paths for misses
//! - `--method-not-allowed` - Report 405 with the allowed methods
//!
//! `--routes` may also come from `ROUTETREE_ROUTES`.

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};

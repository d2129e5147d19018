//! Router core module - hot path for request routing.
//!
//! A [`Router`] owns one frozen radix tree per HTTP method. Lookups borrow
//! caller-owned scratch buffers ([`Params`], [`SkipStack`]) so the hot path
//! never allocates beyond parameter values.

// Deny heap allocations in the hot path
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::{Method, StatusCode};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::lookup::{Match, SkipStack};
use super::node::{HandlerChain, Tree};
use super::params::Params;
use crate::config::RouterConfig;

/// One radix tree plus the method it serves.
#[derive(Debug, Clone)]
pub(crate) struct MethodTree<H> {
    pub(crate) method: Method,
    pub(crate) tree: Tree<H>,
}

/// A registered route, kept for introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: Method,
    /// Template as registered, e.g. `/users/:id`
    pub path: String,
    /// Length of the handler chain
    pub handlers: usize,
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Owned result of a successful match
///
/// Returned by [`Router::route`], which allocates its own scratch buffers.
/// Use [`Router::lookup`] on hot paths instead.
#[derive(Debug, Clone)]
pub struct RouteMatch<H> {
    /// Handler chain of the matched route (an `Arc`, cheap to hold)
    pub handlers: HandlerChain<H>,
    /// Template of the matched route, e.g. `/users/:id`
    pub full_path: String,
    /// Path parameters in template order
    pub params: Params,
}

impl<H> RouteMatch<H> {
    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

/// Dispatch decision for one request.
#[derive(Debug)]
pub enum Resolution<'a, H> {
    /// Run this chain. Parameters are in the buffer passed to [`Router::resolve`].
    Found {
        handlers: &'a HandlerChain<H>,
        full_path: &'a str,
    },
    /// Send the client to `location`.
    ///
    /// `301 Moved Permanently` for GET and HEAD, `307 Temporary Redirect`
    /// otherwise so the request body is replayed.
    Redirect { location: String, status: StatusCode },
    /// The path exists, but only under the listed methods.
    MethodNotAllowed { allowed: Vec<Method> },
    /// No route; `handlers` is the no-route chain, if one was registered.
    NotFound {
        handlers: Option<&'a HandlerChain<H>>,
    },
}

impl<H> Resolution<'_, H> {
    /// HTTP status a server would answer with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Resolution::Found { .. } => StatusCode::OK,
            Resolution::Redirect { status, .. } => *status,
            Resolution::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Resolution::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

/// Immutable HTTP path router
///
/// Built by [`super::RouterBuilder::build`]. Safe for unlimited concurrent
/// lookups as long as each caller brings its own scratch buffers.
///
/// # Performance
///
/// - Route matching: O(k) where k is path length
/// - Static children are ordered by route count, so busy branches are scanned first
/// - No allocation in [`Router::lookup`] besides parameter values
#[derive(Debug, Clone)]
pub struct Router<H> {
    pub(crate) trees: Vec<MethodTree<H>>,
    pub(crate) routes: Vec<RouteInfo>,
    pub(crate) no_route: Option<HandlerChain<H>>,
    pub(crate) config: RouterConfig,
    pub(crate) max_params: usize,
    pub(crate) max_sections: usize,
}

impl<H> Router<H> {
    #[inline]
    fn tree(&self, method: &Method) -> Option<&Tree<H>> {
        self.trees
            .iter()
            .find(|t| t.method == *method)
            .map(|t| &t.tree)
    }

    /// Match `path` under `method`.
    ///
    /// `params` and `skipped` are cleared first and hold this request's
    /// parameters afterwards. A method with no routes behaves like a miss.
    #[inline]
    pub fn lookup<'a>(
        &'a self,
        method: &Method,
        path: &str,
        params: &mut Params,
        skipped: &mut SkipStack,
    ) -> Match<'a, H> {
        match self.tree(method) {
            Some(tree) => tree.get_value(path, params, skipped),
            None => {
                params.clear();
                skipped.clear();
                Match::miss()
            }
        }
    }

    /// Match an HTTP request to a route, allocating fresh buffers.
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - If a matching route is found
    /// * `None` - If no route matches (trailing slash hints are dropped)
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch<H>> {
        let mut params = self.new_params();
        let mut skipped = self.new_skip_stack();
        let found = self.lookup(method, path, &mut params, &mut skipped);
        let handlers = found.handlers?;
        Some(RouteMatch {
            handlers: Arc::clone(handlers),
            full_path: found.full_path.unwrap_or_default().to_owned(),
            params,
        })
    }

    /// Registered spelling of `path` under `method`, found by comparing
    /// case-insensitively and allowing one trailing separator to be added or
    /// removed. Only meant for building a redirect; never dispatch on it.
    #[must_use]
    pub fn suggest_canonical_path(&self, method: &Method, path: &str) -> Option<String> {
        self.tree(method)?.find_case_insensitive_path(path, true)
    }

    /// Methods other than `method` under which `path` has handlers.
    #[must_use]
    pub fn allowed_methods(&self, method: &Method, path: &str) -> Vec<Method> {
        let mut params = self.new_params();
        let mut skipped = self.new_skip_stack();
        self.trees
            .iter()
            .filter(|t| t.method != *method)
            .filter(|t| t.tree.get_value(path, &mut params, &mut skipped).is_found())
            .map(|t| t.method.clone())
            .collect()
    }

    /// Decide what a server should do with `method path`.
    ///
    /// Tries, in order: an exact match, a trailing slash redirect, a
    /// case-corrected redirect, 405 with the allowed methods, then 404. The
    /// redirect and 405 steps are switched by [`RouterConfig`].
    pub fn resolve<'a>(
        &'a self,
        method: &Method,
        path: &str,
        params: &mut Params,
        skipped: &mut SkipStack,
    ) -> Resolution<'a, H> {
        let found = self.lookup(method, path, params, skipped);
        if let Some(handlers) = found.handlers {
            let full_path = found.full_path.unwrap_or_default();
            debug!(method = %method, path = %path, route = %full_path, "Route matched");
            return Resolution::Found {
                handlers,
                full_path,
            };
        }

        if *method != Method::CONNECT && path != "/" {
            if found.tsr && self.config.redirect_trailing_slash {
                let location = toggle_trailing_slash(path);
                debug!(
                    method = %method,
                    path = %path,
                    location = %location,
                    "Trailing slash redirect"
                );
                return Resolution::Redirect {
                    location,
                    status: redirect_status(method),
                };
            }

            if self.config.redirect_fixed_path {
                if let Some(tree) = self.tree(method) {
                    let fix = self.config.redirect_trailing_slash;
                    let fixed = tree
                        .find_case_insensitive_path(path, fix)
                        .filter(|location| location != path);
                    if let Some(location) = fixed {
                        debug!(
                            method = %method,
                            path = %path,
                            location = %location,
                            "Fixed path redirect"
                        );
                        return Resolution::Redirect {
                            location,
                            status: redirect_status(method),
                        };
                    }
                }
            }
        }

        if self.config.handle_method_not_allowed {
            let allowed = self.allowed_methods(method, path);
            if !allowed.is_empty() {
                debug!(method = %method, path = %path, allowed = ?allowed, "Method not allowed");
                return Resolution::MethodNotAllowed { allowed };
            }
        }

        debug!(method = %method, path = %path, "No route matched");
        Resolution::NotFound {
            handlers: self.no_route.as_ref(),
        }
    }

    /// Chain registered with [`super::RouterBuilder::no_route`], if any.
    #[must_use]
    pub fn no_route(&self) -> Option<&HandlerChain<H>> {
        self.no_route.as_ref()
    }

    /// Handler chain registered for exactly the template `path` under `method`.
    #[must_use]
    pub fn registered(&self, method: &Method, path: &str) -> Option<&HandlerChain<H>> {
        self.tree(method)?.registered(path)
    }

    /// All registered routes in registration order
    #[must_use]
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// Methods that have at least one route
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.trees.iter().map(|t| &t.method)
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Highest number of parameters in any registered template
    #[must_use]
    pub fn max_params(&self) -> usize {
        self.max_params
    }

    /// A parameter buffer large enough for any route of this router.
    #[must_use]
    pub fn new_params(&self) -> Params {
        Params::with_capacity(self.max_params)
    }

    /// A backtracking buffer large enough for any path of this router.
    #[must_use]
    pub fn new_skip_stack(&self) -> SkipStack {
        SkipStack::with_capacity(self.max_sections)
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for route in &self.routes {
            println!("[route] {route} ({} handlers)", route.handlers);
        }
    }
}

fn redirect_status(method: &Method) -> StatusCode {
    if *method == Method::GET || *method == Method::HEAD {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::TEMPORARY_REDIRECT
    }
}

/// `/a/` becomes `/a` and `/a` becomes `/a/`.
pub(crate) fn toggle_trailing_slash(path: &str) -> String {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_owned(),
        _ => format!("{path}/"),
    }
}

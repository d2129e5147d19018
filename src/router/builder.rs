//! Registration phase.
//!
//! A [`RouterBuilder`] is the only owner of mutable trees. [`RouterBuilder::build`]
//! consumes it, so no route can be added once lookups are possible.

use http::Method;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::core::{MethodTree, RouteInfo, Router};
use super::error::{Result, RouteError};
use super::group::RouteGroup;
use super::insert::validate_template;
use super::node::{HandlerChain, Tree};
use crate::config::RouterConfig;

/// Methods registered by [`RouterBuilder::any`].
pub const ANY_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
    Method::HEAD,
];

/// Collects routes into per-method radix trees.
///
/// ```rust
/// use routetree::RouterBuilder;
///
/// let mut builder = RouterBuilder::new();
/// builder.get("/users/:id", vec!["show_user"])?;
/// builder.post("/users", vec!["create_user"])?;
/// let router = builder.build();
///
/// let found = router.route(&http::Method::GET, "/users/42").unwrap();
/// assert_eq!(found.get_param("id"), Some("42"));
/// # Ok::<(), routetree::RouteError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RouterBuilder<H> {
    trees: Vec<MethodTree<H>>,
    routes: Vec<RouteInfo>,
    middleware: Vec<H>,
    no_route: Option<HandlerChain<H>>,
    config: RouterConfig,
    max_params: usize,
    max_sections: usize,
}

impl<H> Default for RouterBuilder<H> {
    fn default() -> Self {
        Self {
            trees: Vec::new(),
            routes: Vec::new(),
            middleware: Vec::new(),
            no_route: None,
            config: RouterConfig::default(),
            max_params: 0,
            max_sections: 0,
        }
    }
}

impl<H: fmt::Debug + Clone> RouterBuilder<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dispatch configuration used by the built router.
    #[must_use]
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Append `handlers` to the middleware that leads every route
    /// registered from now on, group routes included.
    ///
    /// ```rust
    /// use routetree::RouterBuilder;
    ///
    /// let mut builder = RouterBuilder::new();
    /// builder.get("/health", ["health"])?;
    /// builder.use_handlers(["log"]);
    /// builder.get("/users/:id", ["show_user"])?;
    /// let router = builder.build();
    ///
    /// let found = router.route(&http::Method::GET, "/users/1").unwrap();
    /// assert_eq!(&*found.handlers, &["log", "show_user"]);
    /// let found = router.route(&http::Method::GET, "/health").unwrap();
    /// assert_eq!(&*found.handlers, &["health"]);
    /// # Ok::<(), routetree::RouteError>(())
    /// ```
    pub fn use_handlers(&mut self, handlers: impl IntoIterator<Item = H>) -> &mut Self {
        self.middleware.extend(handlers);
        debug!(middleware = self.middleware.len(), "Middleware extended");
        self
    }

    /// Set the chain returned with [`Resolution::NotFound`](super::Resolution::NotFound).
    /// The middleware registered through [`Self::use_handlers`] runs first,
    /// including middleware added after this call.
    pub fn no_route(&mut self, handlers: impl Into<HandlerChain<H>>) -> &mut Self {
        self.no_route = Some(handlers.into());
        self
    }

    fn with_middleware(&self, handlers: HandlerChain<H>) -> HandlerChain<H> {
        if self.middleware.is_empty() {
            return handlers;
        }
        self.middleware
            .iter()
            .chain(handlers.iter())
            .cloned()
            .collect()
    }

    /// Register `handlers` for `method path`.
    ///
    /// # Errors
    ///
    /// Any [`RouteError`]: a malformed method or template, an empty chain, a
    /// conflict with an earlier route, or a duplicate. Malformed input is
    /// rejected before the tree is touched.
    pub fn handle(
        &mut self,
        method: &str,
        path: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        let handlers = self.with_middleware(handlers.into());
        if let Err(err) = self.add_route(method, path, handlers) {
            warn!(method = %method, path = %path, error = %err, "Route registration failed");
            return Err(err);
        }
        Ok(self)
    }

    fn add_route(&mut self, method: &str, path: &str, handlers: HandlerChain<H>) -> Result<()> {
        if method.is_empty() {
            return Err(RouteError::EmptyMethod);
        }
        let parsed =
            Method::from_bytes(method.as_bytes()).map_err(|_| RouteError::InvalidMethod {
                method: method.to_owned(),
            })?;
        if handlers.is_empty() {
            return Err(RouteError::EmptyHandlers {
                path: path.to_owned(),
            });
        }
        let stats = validate_template(path)?;

        let pos = match self.trees.iter().position(|t| t.method == parsed) {
            Some(pos) => pos,
            None => {
                self.trees.push(MethodTree {
                    method: parsed.clone(),
                    tree: Tree::new(),
                });
                self.trees.len() - 1
            }
        };
        let tree = &mut self.trees[pos].tree;

        if let Some(existing) = tree.registered(path) {
            return Err(RouteError::DuplicateRoute {
                method: method.to_owned(),
                path: path.to_owned(),
                existing: format!("{existing:?}"),
            });
        }

        let count = handlers.len();
        tree.add_route(method, path, handlers)?;

        self.max_params = self.max_params.max(stats.params);
        self.max_sections = self.max_sections.max(stats.sections);
        self.routes.push(RouteInfo {
            method: parsed,
            path: path.to_owned(),
            handlers: count,
        });
        debug!(method = %method, path = %path, handlers = count, "Route registered");
        Ok(())
    }

    pub fn get(&mut self, path: &str, handlers: impl Into<HandlerChain<H>>) -> Result<&mut Self> {
        self.handle(Method::GET.as_str(), path, handlers)
    }

    pub fn post(&mut self, path: &str, handlers: impl Into<HandlerChain<H>>) -> Result<&mut Self> {
        self.handle(Method::POST.as_str(), path, handlers)
    }

    pub fn put(&mut self, path: &str, handlers: impl Into<HandlerChain<H>>) -> Result<&mut Self> {
        self.handle(Method::PUT.as_str(), path, handlers)
    }

    pub fn delete(
        &mut self,
        path: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        self.handle(Method::DELETE.as_str(), path, handlers)
    }

    pub fn patch(&mut self, path: &str, handlers: impl Into<HandlerChain<H>>) -> Result<&mut Self> {
        self.handle(Method::PATCH.as_str(), path, handlers)
    }

    pub fn options(
        &mut self,
        path: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        self.handle(Method::OPTIONS.as_str(), path, handlers)
    }

    pub fn head(&mut self, path: &str, handlers: impl Into<HandlerChain<H>>) -> Result<&mut Self> {
        self.handle(Method::HEAD.as_str(), path, handlers)
    }

    /// Register the same chain under every method in `methods`.
    /// Stops at the first failure; earlier methods stay registered.
    pub fn match_methods(
        &mut self,
        methods: &[&str],
        path: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        let handlers = handlers.into();
        for method in methods {
            self.handle(method, path, Arc::clone(&handlers))?;
        }
        Ok(self)
    }

    /// Register the same chain under every method in [`ANY_METHODS`].
    pub fn any(&mut self, path: &str, handlers: impl Into<HandlerChain<H>>) -> Result<&mut Self> {
        let handlers = handlers.into();
        for method in &ANY_METHODS {
            self.handle(method.as_str(), path, Arc::clone(&handlers))?;
        }
        Ok(self)
    }

    /// Start a group of routes sharing `prefix` and leading `handlers`.
    pub fn group(
        &mut self,
        prefix: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouteGroup<'_, H> {
        RouteGroup::new(self, prefix, handlers.into_iter().collect())
    }

    /// Routes registered so far, in registration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// Freeze the trees into an immutable [`Router`].
    #[must_use]
    pub fn build(self) -> Router<H> {
        let no_route = self
            .no_route
            .as_ref()
            .map(|chain| self.with_middleware(Arc::clone(chain)));
        let methods: Vec<&str> = self.trees.iter().map(|t| t.method.as_str()).collect();
        info!(
            routes_count = self.routes.len(),
            methods = ?methods,
            max_params = self.max_params,
            middleware = self.middleware.len(),
            no_route = no_route.is_some(),
            redirect_trailing_slash = self.config.redirect_trailing_slash,
            redirect_fixed_path = self.config.redirect_fixed_path,
            handle_method_not_allowed = self.config.handle_method_not_allowed,
            "Routing table frozen"
        );
        Router {
            trees: self.trees,
            routes: self.routes,
            no_route,
            config: self.config,
            max_params: self.max_params,
            max_sections: self.max_sections,
        }
    }
}

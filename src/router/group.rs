//! Route groups: a shared path prefix plus handlers that run first.

use std::fmt;

use super::builder::{RouterBuilder, ANY_METHODS};
use super::error::Result;
use super::node::HandlerChain;

/// Registers routes below a common base path.
///
/// Every chain registered through a group is prefixed with the group's own
/// handlers. Groups nest: a child group inherits both the base path and the
/// handlers of its parent.
///
/// ```rust
/// use routetree::RouterBuilder;
///
/// let mut builder = RouterBuilder::new();
/// {
///     let mut api = builder.group("/api", ["auth"]);
///     let mut v1 = api.group("v1", ["v1"]);
///     v1.get("/users/:id", ["show_user"])?;
/// }
/// let router = builder.build();
/// let found = router.route(&http::Method::GET, "/api/v1/users/7").unwrap();
/// assert_eq!(&*found.handlers, &["auth", "v1", "show_user"]);
/// # Ok::<(), routetree::RouteError>(())
/// ```
#[derive(Debug)]
pub struct RouteGroup<'a, H> {
    builder: &'a mut RouterBuilder<H>,
    base_path: String,
    handlers: Vec<H>,
}

impl<'a, H: fmt::Debug + Clone> RouteGroup<'a, H> {
    pub(crate) fn new(
        builder: &'a mut RouterBuilder<H>,
        prefix: &str,
        handlers: Vec<H>,
    ) -> Self {
        Self {
            builder,
            base_path: join_paths("/", prefix),
            handlers,
        }
    }

    /// Absolute base path of this group.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// A nested group below `relative` whose chains start with this group's
    /// handlers followed by `handlers`.
    pub fn group(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouteGroup<'_, H> {
        let mut combined = self.handlers.clone();
        combined.extend(handlers);
        RouteGroup {
            base_path: join_paths(&self.base_path, relative),
            builder: &mut *self.builder,
            handlers: combined,
        }
    }

    /// Append `handlers` to this group's leading handlers. Only routes and
    /// nested groups created afterwards see them.
    pub fn use_handlers(&mut self, handlers: impl IntoIterator<Item = H>) -> &mut Self {
        self.handlers.extend(handlers);
        self
    }

    /// Register `handlers` for `method` at `relative` below the base path.
    ///
    /// # Errors
    ///
    /// Same as [`RouterBuilder::handle`], reported against the joined path.
    pub fn handle(
        &mut self,
        method: &str,
        relative: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        let path = join_paths(&self.base_path, relative);
        let chain = self.combine(handlers.into());
        self.builder.handle(method, &path, chain)?;
        Ok(self)
    }

    fn combine(&self, handlers: HandlerChain<H>) -> HandlerChain<H> {
        if self.handlers.is_empty() {
            return handlers;
        }
        self.handlers
            .iter()
            .chain(handlers.iter())
            .cloned()
            .collect()
    }

    pub fn get(
        &mut self,
        relative: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        self.handle("GET", relative, handlers)
    }

    pub fn post(
        &mut self,
        relative: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        self.handle("POST", relative, handlers)
    }

    pub fn put(
        &mut self,
        relative: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        self.handle("PUT", relative, handlers)
    }

    pub fn delete(
        &mut self,
        relative: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        self.handle("DELETE", relative, handlers)
    }

    pub fn patch(
        &mut self,
        relative: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        self.handle("PATCH", relative, handlers)
    }

    pub fn options(
        &mut self,
        relative: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        self.handle("OPTIONS", relative, handlers)
    }

    pub fn head(
        &mut self,
        relative: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        self.handle("HEAD", relative, handlers)
    }

    /// Register one chain under several methods.
    pub fn match_methods(
        &mut self,
        methods: &[&str],
        relative: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        let path = join_paths(&self.base_path, relative);
        let chain = self.combine(handlers.into());
        self.builder.match_methods(methods, &path, chain)?;
        Ok(self)
    }

    /// Register one chain under every method in [`ANY_METHODS`].
    pub fn any(
        &mut self,
        relative: &str,
        handlers: impl Into<HandlerChain<H>>,
    ) -> Result<&mut Self> {
        let methods: Vec<&str> = ANY_METHODS.iter().map(|m| m.as_str()).collect();
        self.match_methods(&methods, relative, handlers)
    }
}

/// Joins `relative` onto `base` with exactly one separator between them.
/// A trailing separator on `relative` is kept.
pub(crate) fn join_paths(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_owned();
    }
    let mut joined = String::with_capacity(base.len() + relative.len() + 1);
    joined.push_str(base.trim_end_matches('/'));
    joined.push('/');
    joined.push_str(relative.trim_start_matches('/'));
    joined
}

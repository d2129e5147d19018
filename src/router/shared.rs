//! Lock-free replacement of a whole router at runtime.
//!
//! Trees are never mutated after [`super::RouterBuilder::build`]. To change
//! the route table, build a new router and [`SharedRouter::swap`] it in;
//! requests already holding the previous snapshot finish against it.

use arc_swap::{ArcSwap, Guard};
use std::sync::Arc;
use tracing::info;

use super::core::Router;

/// Router holder for hot-path reads with rare wholesale updates.
#[derive(Debug)]
pub struct SharedRouter<H> {
    current: ArcSwap<Router<H>>,
}

impl<H> SharedRouter<H> {
    #[must_use]
    pub fn new(router: Router<H>) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    /// Cheap snapshot for one request. Do not hold it across long waits.
    #[inline]
    #[must_use]
    pub fn load(&self) -> Guard<Arc<Router<H>>> {
        self.current.load()
    }

    /// Owned handle to the current router.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Router<H>> {
        self.current.load_full()
    }

    /// Install `router`, returning the one it replaces.
    pub fn swap(&self, router: Router<H>) -> Arc<Router<H>> {
        let routes_count = router.routes().len();
        let previous = self.current.swap(Arc::new(router));
        info!(
            routes_count,
            previous_routes_count = previous.routes().len(),
            "Router replaced"
        );
        previous
    }
}

impl<H> From<Router<H>> for SharedRouter<H> {
    fn from(router: Router<H>) -> Self {
        Self::new(router)
    }
}

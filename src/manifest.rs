//! # Route Manifest Module
//!
//! Declarative route tables in YAML or JSON. Handlers are referred to by
//! name, so a manifest builds a `Router<String>`: useful for the CLI, for
//! tests, and for services that map names to functions themselves.
//!
//! ```yaml
//! middleware: [log]
//! no_route: [not_found]
//! routes:
//!   - method: GET
//!     path: /health
//!     handlers: [health]
//! groups:
//!   - prefix: /api
//!     handlers: [auth]
//!     routes:
//!       - method: GET
//!         path: /users/:id
//!         handlers: [show_user]
//!     groups:
//!       - prefix: /admin
//!         handlers: [admin_only]
//!         routes:
//!           - { method: DELETE, path: /users/:id, handlers: [remove_user] }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::RouterConfig;
use crate::router::{RouteGroup, Router, RouterBuilder};

/// One route entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub method: String,
    pub path: String,
    pub handlers: Vec<String>,
}

/// A group entry: a prefix and leading handlers shared by nested entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub prefix: String,
    #[serde(default)]
    pub handlers: Vec<String>,
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
}

/// Top-level manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteManifest {
    /// Handlers leading every route and the no-route chain.
    #[serde(default)]
    pub middleware: Vec<String>,
    /// Chain reported when nothing matches.
    #[serde(default)]
    pub no_route: Option<Vec<String>>,
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
}

impl RouteManifest {
    /// Parse a manifest, choosing YAML or JSON by the file extension
    /// (`.yaml`/`.yml` is YAML, anything else JSON).
    ///
    /// # Errors
    ///
    /// Returns an error if the content does not parse as a manifest.
    pub fn parse(content: &str, file_path: &str) -> Result<Self> {
        if file_path.ends_with(".yaml") || file_path.ends_with(".yml") {
            serde_yaml::from_str(content)
                .with_context(|| format!("Failed to parse YAML manifest {file_path}"))
        } else {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON manifest {file_path}"))
        }
    }

    /// Number of route entries, including those inside groups.
    #[must_use]
    pub fn route_count(&self) -> usize {
        fn count(group: &GroupEntry) -> usize {
            group.routes.len() + group.groups.iter().map(count).sum::<usize>()
        }
        self.routes.len() + self.groups.iter().map(count).sum::<usize>()
    }

    /// Register every entry into a new router.
    ///
    /// # Errors
    ///
    /// Fails on the first route that cannot be registered, naming it.
    pub fn into_router(self, config: RouterConfig) -> Result<Router<String>> {
        let mut builder = RouterBuilder::new().with_config(config);
        builder.use_handlers(self.middleware);
        if let Some(handlers) = self.no_route {
            builder.no_route(handlers);
        }
        for route in self.routes {
            builder
                .handle(&route.method, &route.path, route.handlers)
                .with_context(|| format!("Invalid route {} {}", route.method, route.path))?;
        }
        for group in self.groups {
            let mut root = builder.group(&group.prefix, group.handlers);
            register_group(&mut root, group.routes, group.groups)?;
        }
        Ok(builder.build())
    }
}

fn register_group(
    group: &mut RouteGroup<'_, String>,
    routes: Vec<RouteEntry>,
    groups: Vec<GroupEntry>,
) -> Result<()> {
    let base_path = group.base_path().to_owned();
    for route in routes {
        group
            .handle(&route.method, &route.path, route.handlers)
            .with_context(|| {
                format!(
                    "Invalid route {} {} in group {base_path}",
                    route.method, route.path
                )
            })?;
    }
    for nested in groups {
        let mut child = group.group(&nested.prefix, nested.handlers);
        register_group(&mut child, nested.routes, nested.groups)?;
    }
    Ok(())
}

/// Load a manifest file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_manifest(file_path: &str) -> Result<RouteManifest> {
    let content = fs::read_to_string(Path::new(file_path))
        .with_context(|| format!("Failed to read manifest {file_path}"))?;
    let manifest = RouteManifest::parse(&content, file_path)?;
    info!(
        manifest = %file_path,
        routes_count = manifest.route_count(),
        "Route manifest loaded"
    );
    Ok(manifest)
}

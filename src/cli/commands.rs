use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::RouterConfig;
use crate::manifest::load_manifest;
use crate::router::{Resolution, Router};

/// Command-line interface for routetree
///
/// Loads a route manifest, builds the radix trees and reports on them.
#[derive(Parser)]
#[command(name = "routetree")]
#[command(about = "Inspect and exercise radix tree route tables", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build the route table and report the first registration error
    Check {
        /// Route manifest (YAML or JSON)
        #[arg(short, long, env = "ROUTETREE_ROUTES")]
        routes: PathBuf,
    },
    /// Print every registered route with its handler chain
    Routes {
        /// Route manifest (YAML or JSON)
        #[arg(short, long, env = "ROUTETREE_ROUTES")]
        routes: PathBuf,
    },
    /// Resolve request paths against the route table
    Match {
        /// Route manifest (YAML or JSON)
        #[arg(short, long, env = "ROUTETREE_ROUTES")]
        routes: PathBuf,

        /// HTTP method of the simulated requests
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Redirect to the case-corrected path when nothing matches
        #[arg(long, default_value_t = false)]
        fixed_path: bool,

        /// Answer 405 instead of 404 when another method matches
        #[arg(long, default_value_t = false)]
        method_not_allowed: bool,

        /// Request paths to resolve
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

/// Parse arguments from the process and run the selected command, writing
/// to stdout.
///
/// # Errors
///
/// Propagates manifest, registration and I/O failures.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// Run `cli`, writing the command output to `out`.
///
/// # Errors
///
/// Propagates manifest, registration and I/O failures.
pub fn execute(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Commands::Check { routes } => {
            let router = build_router(routes, RouterConfig::from_env())?;
            writeln!(
                out,
                "ok: {} routes across {} methods",
                router.routes().len(),
                router.methods().count()
            )?;
        }
        Commands::Routes { routes } => {
            let router = build_router(routes, RouterConfig::from_env())?;
            for route in router.routes() {
                let handlers = router
                    .registered(&route.method, &route.path)
                    .map(|chain| chain.join(", "))
                    .unwrap_or_default();
                writeln!(out, "{route} -> {handlers}")?;
            }
        }
        Commands::Match {
            routes,
            method,
            fixed_path,
            method_not_allowed,
            paths,
        } => {
            let mut config = RouterConfig::from_env();
            config.redirect_fixed_path |= *fixed_path;
            config.handle_method_not_allowed |= *method_not_allowed;
            let router = build_router(routes, config)?;
            let method = parse_method(method)?;

            let mut params = router.new_params();
            let mut skipped = router.new_skip_stack();
            for path in paths {
                let resolution = router.resolve(&method, path, &mut params, &mut skipped);
                let status = resolution.status().as_u16();
                match resolution {
                    Resolution::Found {
                        handlers,
                        full_path,
                    } => {
                        write!(
                            out,
                            "{status} {method} {path} -> {full_path} [{}]",
                            handlers.join(", ")
                        )?;
                        for param in &params {
                            write!(out, " {}={}", param.key, param.value)?;
                        }
                        writeln!(out)?;
                    }
                    Resolution::Redirect { location, .. } => {
                        writeln!(out, "{status} {method} {path} -> {location}")?;
                    }
                    Resolution::MethodNotAllowed { allowed } => {
                        let allowed: Vec<&str> = allowed.iter().map(Method::as_str).collect();
                        writeln!(out, "{status} {method} {path} -> Allow: {}", allowed.join(", "))?;
                    }
                    Resolution::NotFound {
                        handlers: Some(handlers),
                    } => {
                        writeln!(out, "{status} {method} {path} -> [{}]", handlers.join(", "))?;
                    }
                    Resolution::NotFound { handlers: None } => {
                        writeln!(out, "{status} {method} {path}")?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn build_router(routes: &Path, config: RouterConfig) -> Result<Router<String>> {
    let file_path = routes
        .to_str()
        .with_context(|| format!("Manifest path is not valid UTF-8: {}", routes.display()))?;
    load_manifest(file_path)?.into_router(config)
}

fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method: {method}"))
}

use super::node::{NodeId, NodeKind, Tree, ROOT};
use super::{Params, Resolution, RouteError, Router, RouterBuilder, SkipStack};
use crate::config::RouterConfig;
use http::{Method, StatusCode};
use std::sync::Arc;

/// Builds a GET-only router whose single handler is the template itself.
fn build(routes: &[&'static str]) -> Router<&'static str> {
    let mut builder = RouterBuilder::new();
    for route in routes {
        builder.get(route, [*route]).unwrap();
    }
    builder.build()
}

struct Request {
    path: &'static str,
    /// Expected template, `None` for a miss
    route: Option<&'static str>,
    params: &'static [(&'static str, &'static str)],
}

fn req(path: &'static str, route: Option<&'static str>) -> Request {
    Request {
        path,
        route,
        params: &[],
    }
}

fn req_params(
    path: &'static str,
    route: &'static str,
    params: &'static [(&'static str, &'static str)],
) -> Request {
    Request {
        path,
        route: Some(route),
        params,
    }
}

fn check_requests(router: &Router<&'static str>, requests: &[Request]) {
    let mut params = router.new_params();
    let mut skipped = router.new_skip_stack();
    for request in requests {
        let found = router.lookup(&Method::GET, request.path, &mut params, &mut skipped);
        match request.route {
            None => assert!(
                found.handlers.is_none(),
                "handlers for {} should be nil, got {:?}",
                request.path,
                found.full_path
            ),
            Some(route) => {
                let handlers = found
                    .handlers
                    .unwrap_or_else(|| panic!("handlers for {} should not be nil", request.path));
                assert_eq!(handlers[0], route, "wrong handlers for {}", request.path);
                assert_eq!(found.full_path, Some(route), "wrong template for {}", request.path);
            }
        }

        let got: Vec<(&str, &str)> = params
            .iter()
            .map(|p| (p.key.as_ref(), p.value.as_str()))
            .collect();
        if request.route.is_some() {
            assert_eq!(got, request.params, "wrong params for {}", request.path);
        }
    }
}

/// Asserts that every node's priority equals the number of handlers below it.
fn check_priorities<H>(tree: &Tree<H>, id: NodeId) -> u32 {
    let node = tree.node(id);
    let mut prio = u32::from(node.handlers.is_some());
    for &child in &node.children {
        prio += check_priorities(tree, child);
    }
    assert_eq!(
        node.priority,
        prio,
        "priority mismatch for node {:?}",
        String::from_utf8_lossy(&node.path)
    );
    prio
}

fn check_router_priorities<H>(router: &Router<H>) {
    for method_tree in &router.trees {
        check_priorities(&method_tree.tree, ROOT);
    }
}

/// Asserts the structural child layout: wildcard child last, indices parallel
/// to the static children.
fn check_layout<H>(tree: &Tree<H>, id: NodeId) {
    let node = tree.node(id);
    let statics = if node.wild_child {
        node.children.len() - 1
    } else {
        node.children.len()
    };
    assert_eq!(node.indices.len(), statics);
    for (byte, child) in node.static_children() {
        let child = tree.node(child);
        if !child.path.is_empty() {
            assert_eq!(child.path[0], byte);
        }
    }
    if node.wild_child {
        let last = tree.node(*node.children.last().unwrap());
        assert!(matches!(last.kind, NodeKind::Param | NodeKind::CatchAll));
    }
    for &child in &node.children {
        check_layout(tree, child);
    }
}

#[test]
fn test_static_routes() {
    let router = build(&[
        "/hi",
        "/contact",
        "/co",
        "/c",
        "/a",
        "/ab",
        "/doc/",
        "/doc/go_faq.html",
        "/doc/go1.html",
        "/α",
        "/β",
    ]);

    check_requests(
        &router,
        &[
            req("/a", Some("/a")),
            req("/", None),
            req("/hi", Some("/hi")),
            req("/contact", Some("/contact")),
            req("/co", Some("/co")),
            req("/con", None),
            req("/cona", None),
            req("/no", None),
            req("/ab", Some("/ab")),
            req("/α", Some("/α")),
            req("/β", Some("/β")),
            req("/doc/go1.html", Some("/doc/go1.html")),
        ],
    );
    check_router_priorities(&router);
}

#[test]
fn test_shared_prefix_does_not_corrupt_siblings() {
    let router = build(&["/user/list", "/user/detail"]);
    check_requests(
        &router,
        &[
            req("/user/list", Some("/user/list")),
            req("/user/detail", Some("/user/detail")),
            req("/user/", None),
        ],
    );
    check_router_priorities(&router);
}

#[test]
fn test_wildcard_routes() {
    let router = build(&[
        "/",
        "/cmd/:tool/:sub",
        "/cmd/:tool/",
        "/src/*filepath",
        "/search/",
        "/search/:query",
        "/user_:name",
        "/user_:name/about",
        "/files/:dir/*filepath",
        "/info/:user/public",
        "/info/:user/project/:project",
    ]);

    check_requests(
        &router,
        &[
            req("/", Some("/")),
            req_params("/cmd/test/", "/cmd/:tool/", &[("tool", "test")]),
            req("/cmd/test", None),
            req_params(
                "/cmd/test/3",
                "/cmd/:tool/:sub",
                &[("tool", "test"), ("sub", "3")],
            ),
            req_params("/src/", "/src/*filepath", &[("filepath", "/")]),
            req_params(
                "/src/some/file.png",
                "/src/*filepath",
                &[("filepath", "/some/file.png")],
            ),
            req("/search/", Some("/search/")),
            req_params(
                "/search/someth!ng+in+ünìcodé",
                "/search/:query",
                &[("query", "someth!ng+in+ünìcodé")],
            ),
            req("/search/someth!ng+in+ünìcodé/", None),
            req_params("/user_gopher", "/user_:name", &[("name", "gopher")]),
            req_params("/user_gopher/about", "/user_:name/about", &[("name", "gopher")]),
            req_params(
                "/files/js/inc/framework.js",
                "/files/:dir/*filepath",
                &[("dir", "js"), ("filepath", "/inc/framework.js")],
            ),
            req_params("/info/gordon/public", "/info/:user/public", &[("user", "gordon")]),
            req_params(
                "/info/gordon/project/go",
                "/info/:user/project/:project",
                &[("user", "gordon"), ("project", "go")],
            ),
        ],
    );
    check_router_priorities(&router);
    for method_tree in &router.trees {
        check_layout(&method_tree.tree, ROOT);
    }
}

#[test]
fn test_literal_beats_param() {
    let router = build(&["/search/:query", "/search/static"]);
    check_requests(
        &router,
        &[
            req("/search/static", Some("/search/static")),
            req_params("/search/other", "/search/:query", &[("query", "other")]),
            req_params("/search/stat", "/search/:query", &[("query", "stat")]),
            req_params("/search/statics", "/search/:query", &[("query", "statics")]),
        ],
    );
}

#[test]
fn test_backtracking_to_wildcard() {
    let router = build(&[
        "/get/test/abc/",
        "/get/:param/abc/",
        "/something/:paramname/thirdthing",
        "/something/secondthing/test",
        "/get/abc",
        "/get/:param",
        "/get/abc/123abc",
        "/get/abc/:param",
        "/get/abc/123abc/xxx8",
        "/get/abc/:param/test",
    ]);

    check_requests(
        &router,
        &[
            req("/get/abc", Some("/get/abc")),
            req_params("/get/a", "/get/:param", &[("param", "a")]),
            req_params("/get/abz", "/get/:param", &[("param", "abz")]),
            req_params("/get/abcd", "/get/:param", &[("param", "abcd")]),
            req("/get/abc/123abc", Some("/get/abc/123abc")),
            req_params("/get/abc/123ab", "/get/abc/:param", &[("param", "123ab")]),
            req_params("/get/abc/xyz", "/get/abc/:param", &[("param", "xyz")]),
            req("/get/abc/123abc/xxx8", Some("/get/abc/123abc/xxx8")),
            req_params(
                "/get/abc/123abc/test",
                "/get/abc/:param/test",
                &[("param", "123abc")],
            ),
            req_params("/get/abc/xyz/test", "/get/abc/:param/test", &[("param", "xyz")]),
            req("/get/abc/123abc/x", None),
            req("/get/test/abc/", Some("/get/test/abc/")),
            req_params("/get/te/abc/", "/get/:param/abc/", &[("param", "te")]),
            req("/something/secondthing/test", Some("/something/secondthing/test")),
            req_params(
                "/something/secondthingaaaa/thirdthing",
                "/something/:paramname/thirdthing",
                &[("paramname", "secondthingaaaa")],
            ),
            req_params(
                "/something/abcdad/thirdthing",
                "/something/:paramname/thirdthing",
                &[("paramname", "abcdad")],
            ),
        ],
    );
    check_router_priorities(&router);
}

#[test]
fn test_backtracking_drops_params_of_abandoned_branch() {
    let router = build(&["/a/:x/c/d", "/a/:x/:y/e"]);
    check_requests(
        &router,
        &[
            req_params("/a/1/c/d", "/a/:x/c/d", &[("x", "1")]),
            req_params("/a/1/c/e", "/a/:x/:y/e", &[("x", "1"), ("y", "c")]),
        ],
    );
}

#[test]
fn test_trailing_slash_hints() {
    let router = build(&[
        "/hi",
        "/b/",
        "/search/:query",
        "/cmd/:tool/",
        "/src/*filepath",
        "/x",
        "/x/y",
        "/y/",
        "/y/z",
        "/0/:id",
        "/0/:id/1",
        "/1/:id/",
        "/1/:id/2",
        "/aa",
        "/a/",
        "/doc",
        "/doc/go_faq.html",
        "/doc/go1.html",
        "/no/a",
        "/no/b",
        "/vendor/:x/*y",
    ]);
    check_router_priorities(&router);

    let mut params = Params::new();
    let mut skipped = SkipStack::new();
    for path in [
        "/hi/",
        "/b",
        "/search/gopher/",
        "/cmd/vet",
        "/src",
        "/x/",
        "/y",
        "/0/go/",
        "/1/go",
        "/a",
        "/doc/",
        "/vendor/x",
    ] {
        let found = router.lookup(&Method::GET, path, &mut params, &mut skipped);
        assert!(found.handlers.is_none(), "non-nil handler for TSR route {path}");
        assert!(found.tsr, "expected TSR recommendation for route {path}");
    }

    for path in ["/", "/no", "/no/", "/_", "/_/"] {
        let found = router.lookup(&Method::GET, path, &mut params, &mut skipped);
        assert!(found.handlers.is_none(), "non-nil handler for no-TSR route {path}");
        assert!(!found.tsr, "expected no TSR recommendation for route {path}");
    }
}

#[test]
fn test_root_trailing_slash_only_route() {
    let router = build(&["/:test"]);
    let mut params = Params::new();
    let mut skipped = SkipStack::new();
    let found = router.lookup(&Method::GET, "/", &mut params, &mut skipped);
    assert!(found.handlers.is_none());
    assert!(!found.tsr);
}

#[test]
fn test_exists_with_and_without_slash() {
    let router = build(&["/exists", "/dir/"]);
    let mut params = Params::new();
    let mut skipped = SkipStack::new();

    let found = router.lookup(&Method::GET, "/exists/", &mut params, &mut skipped);
    assert!(!found.is_found());
    assert!(found.tsr);

    let found = router.lookup(&Method::GET, "/dir", &mut params, &mut skipped);
    assert!(!found.is_found());
    assert!(found.tsr);
}

#[test]
fn test_case_insensitive_suggestions() {
    let routes = [
        "/hi",
        "/b/",
        "/ABC/",
        "/search/:query",
        "/cmd/:tool/",
        "/src/*filepath",
        "/x",
        "/x/y",
        "/y/",
        "/y/z",
        "/0/:id",
        "/0/:id/1",
        "/aa",
        "/a/",
        "/doc",
        "/doc/go_faq.html",
        "/doc/go1.html",
        "/doc/go/away",
        "/no/a",
        "/no/b",
        "/Π",
        "/u/apfêl/",
        "/u/äpfêl/",
        "/u/öpfêl",
        "/v/Äpfêl/",
        "/v/Öpfêl",
        "/w/♬",
        "/w/♭/",
        "/w/𠜎",
        "/w/𠜏/",
        "/user/hello",
    ];
    let router = build(&routes);
    let tree = &router.trees[0].tree;

    // every registered spelling resolves to itself, with or without the slash fix
    for route in routes {
        assert_eq!(
            tree.find_case_insensitive_path(route, true).as_deref(),
            Some(route),
            "route {route} not found"
        );
        assert_eq!(
            tree.find_case_insensitive_path(route, false).as_deref(),
            Some(route),
            "route {route} not found"
        );
    }

    let cases = [
        ("/HI", "/hi"),
        ("/B/", "/b/"),
        ("/abc/", "/ABC/"),
        ("/SEARCH/QUERY", "/search/QUERY"),
        ("/CMD/TOOL/", "/cmd/TOOL/"),
        ("/SRC/FILE/PATH", "/src/FILE/PATH"),
        ("/x/Y", "/x/y"),
        ("/X/y", "/x/y"),
        ("/0/ID/1", "/0/ID/1"),
        ("/π", "/Π"),
        ("/U/ÄPFÊL/", "/u/äpfêl/"),
        ("/U/ÖPFÊL", "/u/öpfêl"),
        ("/V/äpfêL/", "/v/Äpfêl/"),
        ("/V/öPFÊL", "/v/Öpfêl"),
        ("/UsEr/Hello", "/user/hello"),
    ];
    for (input, expected) in cases {
        assert_eq!(
            tree.find_case_insensitive_path(input, false).as_deref(),
            Some(expected),
            "wrong result for {input}"
        );
    }

    let slash_cases = [
        ("/HI/", "/hi"),
        ("/B", "/b/"),
        ("/abc", "/ABC/"),
        ("/X/", "/x"),
        ("/Y", "/y/"),
        ("/DOC/", "/doc"),
        ("/w/♭", "/w/♭/"),
        ("/w/♬/", "/w/♬"),
    ];
    for (input, expected) in slash_cases {
        assert_eq!(
            tree.find_case_insensitive_path(input, true).as_deref(),
            Some(expected),
            "wrong result for {input}"
        );
        assert_eq!(tree.find_case_insensitive_path(input, false), None);
    }

    assert_eq!(tree.find_case_insensitive_path("/nope", true), None);
    assert_eq!(tree.find_case_insensitive_path("/NO", true), None);
}

#[test]
fn test_suggest_canonical_path() {
    let router = build(&["/user/hello"]);
    assert_eq!(
        router
            .suggest_canonical_path(&Method::GET, "/UsEr/Hello")
            .as_deref(),
        Some("/user/hello")
    );
    assert_eq!(router.suggest_canonical_path(&Method::POST, "/user/hello"), None);
}

#[test]
fn test_lookup_is_idempotent() {
    let router = build(&["/src/static/index", "/src/:dir/other", "/files/*path"]);
    let mut params = router.new_params();
    let mut skipped = router.new_skip_stack();

    for path in ["/src/static/other", "/files/a/b", "/src/x/index", "/missing"] {
        let first = router.lookup(&Method::GET, path, &mut params, &mut skipped);
        let first = (first.full_path, first.tsr, params.clone());
        for _ in 0..3 {
            let again = router.lookup(&Method::GET, path, &mut params, &mut skipped);
            assert_eq!((again.full_path, again.tsr, params.clone()), first);
        }
    }
}

#[test]
fn test_invalid_templates_are_rejected() {
    let cases: [(&str, fn(&RouteError) -> bool); 7] = [
        ("user", |e| matches!(e, RouteError::MissingLeadingSlash { .. })),
        ("/:foo:bar", |e| matches!(e, RouteError::MultipleWildcards { .. })),
        ("/:", |e| matches!(e, RouteError::UnnamedWildcard { .. })),
        ("/*", |e| matches!(e, RouteError::UnnamedWildcard { .. })),
        ("/files/*path/edit", |e| matches!(e, RouteError::MisplacedCatchAll { .. })),
        ("/src*x", |e| matches!(e, RouteError::MalformedCatchAll { .. })),
        ("/user_:name/:x*y", |e| matches!(e, RouteError::MultipleWildcards { .. })),
    ];

    for (path, expected) in cases {
        let mut builder: RouterBuilder<&str> = RouterBuilder::new();
        let err = builder.get(path, ["h"]).unwrap_err();
        assert!(expected(&err), "unexpected error for {path}: {err}");
        assert!(builder.routes().is_empty());
    }
}

#[test]
fn test_invalid_method_and_handlers() {
    let mut builder: RouterBuilder<&str> = RouterBuilder::new();
    assert_eq!(
        builder.handle("", "/", ["h"]).unwrap_err(),
        RouteError::EmptyMethod
    );
    assert!(matches!(
        builder.handle("GE T", "/", ["h"]).unwrap_err(),
        RouteError::InvalidMethod { .. }
    ));
    assert!(matches!(
        builder.handle("GET", "/", Vec::<&str>::new()).unwrap_err(),
        RouteError::EmptyHandlers { .. }
    ));
}

#[test]
fn test_duplicate_routes() {
    let mut builder: RouterBuilder<&str> = RouterBuilder::new();
    for path in ["/", "/doc/", "/src/*filepath", "/search/:query", "/user_:name"] {
        builder.get(path, [path]).unwrap();
    }

    for path in ["/", "/doc/", "/src/*filepath", "/search/:query", "/user_:name"] {
        let err = builder.get(path, ["again"]).unwrap_err();
        assert!(
            matches!(&err, RouteError::DuplicateRoute { path: p, .. } if p == path),
            "expected duplicate for {path}, got {err}"
        );
        assert!(err.to_string().ends_with(&format!("[{path:?}]")));
    }

    // same path under another method is not a duplicate
    builder.post("/doc/", ["post"]).unwrap();

    let router = builder.build();
    check_router_priorities(&router);
    check_requests(
        &router,
        &[
            req("/", Some("/")),
            req("/doc/", Some("/doc/")),
            req_params("/src/some/file.png", "/src/*filepath", &[("filepath", "/some/file.png")]),
            req_params("/search/someth!ng", "/search/:query", &[("query", "someth!ng")]),
            req_params("/user_gopher", "/user_:name", &[("name", "gopher")]),
        ],
    );
}

#[test]
fn test_duplicate_error_message() {
    let mut builder = RouterBuilder::new();
    builder.get("/doc/", ["first", "second"]).unwrap();
    let err = builder.get("/doc/", ["third"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"route already exists: GET /doc/ with handlers: ["first", "second"]"#
    );
}

#[test]
fn test_wildcard_conflicts() {
    let conflicts: &[(&str, &str, &str)] = &[
        ("/user/:id", "/user/:name", "/user/1"),
        ("/search/:query", "/search/:queryx", "/search/rust"),
        ("/src/*filepath", "/src/*filepathx", "/src/a/b"),
        ("/src/*filepath", "/src/", "/src/a"),
        ("/files/*path", "/files/:name", "/files/x"),
    ];

    for (existing, new, request) in conflicts {
        let mut builder: RouterBuilder<&str> = RouterBuilder::new();
        builder.get(existing, ["existing"]).unwrap();
        let err = builder.get(new, ["new"]).unwrap_err();
        assert!(
            matches!(err, RouteError::WildcardConflict { .. }),
            "{new} after {existing}: {err}"
        );
        // the earlier route still resolves
        let router = builder.build();
        assert!(router.routes().len() == 1);
        assert_eq!(router.routes()[0].path, *existing);
        let found = router.route(&Method::GET, request).unwrap();
        assert_eq!(&*found.handlers, &["existing"], "{request}");
        assert_eq!(found.full_path, *existing);
    }
}

#[test]
fn test_wildcard_conflict_message() {
    let mut builder: RouterBuilder<&str> = RouterBuilder::new();
    builder.get("/user/:id/info", ["info"]).unwrap();
    let err = builder.get("/user/:name", ["name"]).unwrap_err();
    assert_eq!(
        err,
        RouteError::WildcardConflict {
            segment: ":name".to_string(),
            path: "/user/:name".to_string(),
            wildcard: ":id".to_string(),
            prefix: "/user/:id".to_string(),
        }
    );

    let router = builder.build();
    let found = router.route(&Method::GET, "/user/7/info").unwrap();
    assert_eq!(found.get_param("id"), Some("7"));
}

#[test]
fn test_catch_all_conflicts() {
    let mut builder: RouterBuilder<&str> = RouterBuilder::new();
    builder.get("/src1/", ["dir"]).unwrap();
    let err = builder.get("/src1/*filepath", ["files"]).unwrap_err();
    assert!(matches!(err, RouteError::CatchAllConflict { .. }), "{err}");

    let mut builder: RouterBuilder<&str> = RouterBuilder::new();
    builder.get("/con/a", ["a"]).unwrap();
    builder.get("/con/b", ["b"]).unwrap();
    let err = builder.get("/con/*all", ["all"]).unwrap_err();
    assert!(matches!(err, RouteError::CatchAllConflict { .. }), "{err}");
}

#[test]
fn test_static_and_param_siblings_coexist() {
    let router = build(&[
        "/cmd/:tool/:sub",
        "/cmd/vet",
        "/src/*filepath",
        "/src1/",
        "/search/:query",
        "/search/invalid",
        "/user_:name",
        "/user_x",
        "/id:id",
        "/id/:id",
    ]);
    check_router_priorities(&router);
    check_requests(
        &router,
        &[
            req("/cmd/vet", Some("/cmd/vet")),
            req_params("/cmd/go/fmt", "/cmd/:tool/:sub", &[("tool", "go"), ("sub", "fmt")]),
            req("/src1/", Some("/src1/")),
            req_params("/src/x", "/src/*filepath", &[("filepath", "/x")]),
            req("/search/invalid", Some("/search/invalid")),
            req("/user_x", Some("/user_x")),
            req_params("/user_y", "/user_:name", &[("name", "y")]),
            req_params("/id1", "/id:id", &[("id", "1")]),
            req_params("/id/1", "/id/:id", &[("id", "1")]),
        ],
    );
}

#[test]
fn test_priorities_order_children() {
    let router = build(&["/a", "/b/1", "/b/2", "/b/3", "/c/1", "/c/2"]);
    let tree = &router.trees[0].tree;
    let root = tree.node(ROOT);
    assert_eq!(root.indices, b"bca".to_vec());
    check_router_priorities(&router);
}

#[test]
fn test_method_trees_are_independent() {
    let mut builder = RouterBuilder::new();
    builder.get("/users/:id", ["show"]).unwrap();
    builder.put("/users/:id", ["update"]).unwrap();
    builder.delete("/users/:name", ["remove"]).unwrap();
    let router = builder.build();

    assert_eq!(router.methods().count(), 3);
    let found = router.route(&Method::DELETE, "/users/9").unwrap();
    assert_eq!(found.get_param("name"), Some("9"));
    assert_eq!(&*found.handlers, &["remove"]);
    assert!(router.route(&Method::POST, "/users/9").is_none());
}

#[test]
fn test_any_and_match_methods() {
    let mut builder = RouterBuilder::new();
    builder.any("/ping", ["pong"]).unwrap();
    builder
        .match_methods(&["GET", "POST"], "/form", ["form"])
        .unwrap();
    let router = builder.build();

    assert_eq!(router.routes().len(), 9);
    for method in super::ANY_METHODS {
        assert!(router.route(&method, "/ping").is_some(), "{method} /ping");
    }
    assert!(router.route(&Method::POST, "/form").is_some());
    assert!(router.route(&Method::PUT, "/form").is_none());
}

#[test]
fn test_allowed_methods_excludes_requested() {
    let mut builder = RouterBuilder::new();
    builder.get("/users", ["list"]).unwrap();
    builder.post("/users", ["create"]).unwrap();
    builder.delete("/users/:id", ["remove"]).unwrap();
    let router = builder.build();

    assert_eq!(router.allowed_methods(&Method::PUT, "/users"), vec![Method::GET, Method::POST]);
    assert_eq!(router.allowed_methods(&Method::GET, "/users"), vec![Method::POST]);
    assert!(router.allowed_methods(&Method::GET, "/nothing").is_empty());
}

fn resolve_status(
    router: &Router<&'static str>,
    method: Method,
    path: &str,
) -> (StatusCode, Option<String>) {
    let mut params = router.new_params();
    let mut skipped = router.new_skip_stack();
    let resolution = router.resolve(&method, path, &mut params, &mut skipped);
    let status = resolution.status();
    let location = match resolution {
        Resolution::Redirect { location, .. } => Some(location),
        _ => None,
    };
    (status, location)
}

#[test]
fn test_resolve_with_defaults() {
    let mut builder = RouterBuilder::new();
    builder.get("/about", ["about"]).unwrap();
    builder.post("/items/", ["create"]).unwrap();
    let router = builder.build();

    assert_eq!(resolve_status(&router, Method::GET, "/about"), (StatusCode::OK, None));
    assert_eq!(
        resolve_status(&router, Method::GET, "/about/"),
        (StatusCode::MOVED_PERMANENTLY, Some("/about".to_string()))
    );
    assert_eq!(
        resolve_status(&router, Method::POST, "/items"),
        (StatusCode::TEMPORARY_REDIRECT, Some("/items/".to_string()))
    );
    // fixed path and 405 are off by default
    assert_eq!(resolve_status(&router, Method::GET, "/ABOUT"), (StatusCode::NOT_FOUND, None));
    assert_eq!(resolve_status(&router, Method::POST, "/about"), (StatusCode::NOT_FOUND, None));
}

#[test]
fn test_resolve_with_all_features() {
    let config = RouterConfig {
        redirect_trailing_slash: true,
        redirect_fixed_path: true,
        handle_method_not_allowed: true,
    };
    let mut builder = RouterBuilder::new().with_config(config);
    builder.get("/about", ["about"]).unwrap();
    builder.put("/about", ["update"]).unwrap();
    let router = builder.build();

    assert_eq!(
        resolve_status(&router, Method::GET, "/ABOUT/"),
        (StatusCode::MOVED_PERMANENTLY, Some("/about".to_string()))
    );
    let mut params = router.new_params();
    let mut skipped = router.new_skip_stack();
    match router.resolve(&Method::POST, "/about", &mut params, &mut skipped) {
        Resolution::MethodNotAllowed { allowed } => {
            assert_eq!(allowed, vec![Method::GET, Method::PUT]);
        }
        other => panic!("expected 405, got {other:?}"),
    }
    // CONNECT never redirects
    assert_eq!(
        resolve_status(&router, Method::CONNECT, "/about/"),
        (StatusCode::NOT_FOUND, None)
    );
}

#[test]
fn test_resolve_without_trailing_slash_redirect() {
    let config = RouterConfig {
        redirect_trailing_slash: false,
        ..RouterConfig::default()
    };
    let mut builder = RouterBuilder::new().with_config(config);
    builder.get("/about", ["about"]).unwrap();
    let router = builder.build();
    assert_eq!(resolve_status(&router, Method::GET, "/about/"), (StatusCode::NOT_FOUND, None));
}

#[test]
fn test_fixed_path_redirect_needs_a_real_route() {
    let config = RouterConfig {
        redirect_trailing_slash: true,
        redirect_fixed_path: true,
        handle_method_not_allowed: true,
    };
    let mut builder = RouterBuilder::new().with_config(config);
    builder.get("/static/*filepath", ["files"]).unwrap();
    let router = builder.build();

    assert_eq!(router.suggest_canonical_path(&Method::GET, "/staticfoo"), None);
    assert_eq!(
        resolve_status(&router, Method::GET, "/staticfoo"),
        (StatusCode::NOT_FOUND, None)
    );
    assert_eq!(
        resolve_status(&router, Method::GET, "/STATIC/app.css"),
        (StatusCode::MOVED_PERMANENTLY, Some("/static/app.css".to_string()))
    );
}

#[test]
fn test_no_route_chain() {
    let mut builder = RouterBuilder::new();
    builder.use_handlers(["log"]);
    builder.no_route(["not_found"]);
    builder.get("/home", ["home"]).unwrap();
    builder.use_handlers(["metrics"]);
    let router = builder.build();

    assert_eq!(
        &**router.no_route().unwrap(),
        &["log", "metrics", "not_found"]
    );
    let found = router.route(&Method::GET, "/home").unwrap();
    assert_eq!(&*found.handlers, &["log", "home"]);

    let mut params = router.new_params();
    let mut skipped = router.new_skip_stack();
    match router.resolve(&Method::GET, "/missing", &mut params, &mut skipped) {
        Resolution::NotFound { handlers } => {
            assert_eq!(&**handlers.unwrap(), &["log", "metrics", "not_found"]);
        }
        other => panic!("expected 404, got {other:?}"),
    }

    let router = build(&["/home"]);
    assert!(router.no_route().is_none());
    assert!(matches!(
        router.resolve(&Method::GET, "/missing", &mut params, &mut skipped),
        Resolution::NotFound { handlers: None }
    ));
}

#[test]
fn test_scratch_buffer_sizing() {
    let router = build(&["/a/:b/:c/:d", "/x/y/z/w/v"]);
    assert_eq!(router.max_params(), 3);
    assert!(router.new_params().is_empty());
    assert!(router.new_skip_stack().capacity() >= 5);
}

#[test]
fn test_concurrent_lookups() {
    let router = Arc::new(build(&["/users/:id", "/users/:id/posts/:post", "/static/*file"]));

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let router = Arc::clone(&router);
            scope.spawn(move || {
                let mut params = router.new_params();
                let mut skipped = router.new_skip_stack();
                for i in 0..200 {
                    let path = format!("/users/{worker}-{i}/posts/{i}");
                    let found = router.lookup(&Method::GET, &path, &mut params, &mut skipped);
                    assert_eq!(found.full_path, Some("/users/:id/posts/:post"));
                    let id = format!("{worker}-{i}");
                    assert_eq!(params.get("id"), Some(id.as_str()));
                }
            });
        }
    });
}

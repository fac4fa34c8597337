//! End-to-end gate behaviour through an Axum router.

use auth_gate::{add_public_routes, Decision, PublicRoutes};
use axum::{body::to_bytes, http::StatusCode};

mod common;

#[test]
fn test_literal_public_route() {
    let routes = PublicRoutes::new(["/login"]).unwrap();
    assert!(routes.is_public("/login"));
    assert!(!routes.is_public("/login/x"));
}

#[test]
fn test_variable_public_route() {
    let routes = PublicRoutes::new(["/user/{id}/public"]).unwrap();
    assert!(routes.is_public("/user/42/public"));
    assert!(!routes.is_public("/user/42/private"));
}

#[tokio::test]
async fn test_empty_registry_challenges_everything() {
    let app = common::gated_app(common::gate(&[], common::deny_all()));

    for path in ["/", "/login", "/health", "/user/1/public", "/deep/nested/path"] {
        let response = common::send(&app, path).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(response.headers()["x-challenge"], "fixed");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"please sign in");
    }
}

#[tokio::test]
async fn test_public_health_with_deny_all() {
    let app = common::gated_app(common::gate(&["/health"], common::deny_all()));

    let response = common::send(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"handled");

    let response = common::send(&app, "/anything-else").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_precedence_over_any_strategy() {
    for strategy in [common::deny_all(), common::allow_all()] {
        let gate = common::gate(&["/user/{id}/public", "/"], strategy);
        let app = common::gated_app(gate);
        for path in ["/", "/user/7/public", "/user/7/public/"] {
            assert_eq!(common::send(&app, path).await.status(), StatusCode::OK, "{path}");
        }
    }
}

#[tokio::test]
async fn test_allow_all_lets_everything_through() {
    let app = common::gated_app(common::gate(&[], common::allow_all()));
    assert_eq!(common::send(&app, "/private").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_hook_can_veto_authorized_request() {
    let gate = common::gate(&["/health"], common::allow_all());
    gate.strategy()
        .hooks()
        .register(|parts| !parts.uri.path().starts_with("/admin"));
    let app = common::gated_app(gate);

    assert_eq!(common::send(&app, "/reports").await.status(), StatusCode::OK);
    assert_eq!(common::send(&app, "/admin/users").await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::send(&app, "/health").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_registration_after_serving_started() {
    let gate = common::gate(&[], common::deny_all());
    let app = common::gated_app(gate.clone());
    assert_eq!(common::send(&app, "/docs/intro").await.status(), StatusCode::UNAUTHORIZED);

    add_public_routes(&gate, ["/docs/{page}"]).unwrap();
    assert_eq!(common::send(&app, "/docs/intro").await.status(), StatusCode::OK);

    // a bad batch leaves the earlier registration intact
    assert!(add_public_routes(&gate, ["/faq", "faq"]).is_err());
    assert_eq!(common::send(&app, "/faq").await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::send(&app, "/docs/intro").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_failing_strategy_is_a_server_error() {
    let app = common::gated_app(common::gate(&["/health"], common::broken()));

    let response = common::send(&app, "/reports").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Internal Server Error");

    // public routes never consult the strategy
    assert_eq!(common::send(&app, "/health").await.status(), StatusCode::OK);
}

#[test]
fn test_evaluate_reports_decision() {
    let gate = common::gate(&["/health"], common::deny_all());
    let parts = |path: &str| {
        axum::http::Request::builder()
            .uri(path)
            .body(())
            .unwrap()
            .into_parts()
            .0
    };

    assert!(matches!(gate.evaluate(&parts("/health")).unwrap(), Decision::Public));
    let decision = gate.evaluate(&parts("/secret")).unwrap();
    assert!(!decision.is_allowed());
    assert_eq!(decision.as_str(), "challenged");
}

//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::pages::list))
        .route("/404", get(handlers::pages::not_found))
        .route("/assets/{*path}", get(handlers::assets::get_asset))
        .route("/{slug}", get(handlers::pages::detail))
        .fallback(handlers::pages::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use nomad_config::ListingOrder;
    use nomad_content::MockContent;
    use nomad_site::queries::{listing_query, visa_by_slug_query};
    use nomad_site::{SiteOptions, SiteRenderer};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn router(source: MockContent) -> Router {
        create_router(Arc::new(AppState {
            renderer: SiteRenderer::new(Arc::new(source), SiteOptions::default()),
            version: "test".to_owned(),
        }))
    }

    fn listings() -> MockContent {
        MockContent::new().with_result(
            &listing_query(ListingOrder::CountryName),
            json!([{
                "countryName": "France",
                "visaName": "Talent Passport",
                "minMonthlyIncome": 2500,
                "slug": {"current": "france-visa"},
                "latitude": 48.85,
                "longitude": 2.35
            }]),
        )
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_list_page() {
        let response = get(router(listings()), "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=60"
        );
        assert!(response.headers().contains_key(header::ETAG));
        assert!(
            response
                .headers()
                .contains_key("content-security-policy")
        );
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        let body = body_text(response).await;
        assert!(body.contains("<a href=\"/france-visa\">France</a>"));
        assert!(body.contains("€2,500"));
    }

    #[tokio::test]
    async fn test_if_none_match_returns_not_modified() {
        let source = Arc::new(listings());
        let state = Arc::new(AppState {
            renderer: SiteRenderer::new(source, SiteOptions::default()),
            version: "test".to_owned(),
        });

        let first = get(create_router(Arc::clone(&state)), "/").await;
        let etag = first.headers()[header::ETAG].clone();

        let second = create_router(state)
            .oneshot(
                Request::get("/")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_detail_page() {
        let source = listings().with_result(
            &visa_by_slug_query("france-visa"),
            json!({
                "countryName": "France",
                "visaName": "Talent Passport",
                "slug": {"current": "france-visa"},
                "fullEligibility": [{"_type": "block", "children": [{"_type": "span", "text": "Remote income"}]}],
                "applicationProcess": null,
                "visaDuration": "4 years"
            }),
        );

        let response = get(router(source), "/france-visa").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<h1>France</h1>"));
        assert!(body.contains("<p>Remote income</p>"));
    }

    #[tokio::test]
    async fn test_unknown_slug_redirects() {
        let source =
            MockContent::new().with_result(&visa_by_slug_query("atlantis"), Value::Null);

        let response = get(router(source), "/atlantis").await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/404");
    }

    #[tokio::test]
    async fn test_percent_encoded_slug_is_decoded() {
        let source =
            MockContent::new().with_result(&visa_by_slug_query("a b"), Value::Null);

        let response = get(router(source), "/a%20b").await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn test_not_found_page_status() {
        let response = get(router(MockContent::new()), "/404").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page not found"));
    }

    #[tokio::test]
    async fn test_nested_path_falls_back_to_not_found() {
        let response = get(router(MockContent::new()), "/a/b").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_content_failure_renders_error_page() {
        let source = MockContent::new().with_failure(
            &listing_query(ListingOrder::CountryName),
            500,
            "internal secret detail",
        );

        let response = get(router(source), "/").await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_text(response).await;
        assert!(body.contains("Something went wrong"));
        assert!(!body.contains("internal secret detail"));
    }

    #[tokio::test]
    async fn test_asset_served_with_mime() {
        let response = get(router(MockContent::new()), "/assets/styles.css").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    }

    #[tokio::test]
    async fn test_missing_asset() {
        let response = get(router(MockContent::new()), "/assets/missing.js").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

//! HTTP API integration tests
//!
//! Exercise the routes through actix's test harness with a mocked upstream.

#[cfg(test)]
mod tests {
    use crate::common::{ControllerFactory, MockUpstream, wait_for_terminal};
    use actix_web::{http::StatusCode, test, web};
    use balance_batch::server::{AppState, HttpServer};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn test_submit_poll_and_export() {
        let upstream = MockUpstream::start().await;
        upstream.respond("addrB", 500, json!({"error": "boom"})).await;
        upstream.default_balance().await;

        let config = ControllerFactory::config(&upstream.base_url());
        let state = AppState::new(config, ControllerFactory::create(&upstream.base_url()));
        let jobs = state.jobs.clone();
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::post()
            .uri("/v1/jobs")
            .set_json(json!({
                "name": "api",
                "rate_limit": 50,
                "addresses": ["addrA", "addrB", " addrC ", "addrA"]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["total_addresses"], 3);

        wait_for_terminal(&jobs, &id).await;

        let req = test::TestRequest::get()
            .uri(&format!("/v1/jobs/{}", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "completed");
        assert_eq!(body["data"]["processed_addresses"], 3);
        assert_eq!(body["data"]["successful_lookups"], 2);
        assert_eq!(body["data"]["failed_lookups"], 1);

        let req = test::TestRequest::get()
            .uri(&format!("/v1/jobs/{}/results", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2]["address"], "addrC");
        assert_eq!(rows[1]["status"], "failed");

        let req = test::TestRequest::get()
            .uri(&format!("/v1/jobs/{}/export?format=json", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let exported: Value = test::read_body_json(resp).await;
        assert_eq!(exported.as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn test_start_requires_pending_job() {
        let upstream = MockUpstream::start().await;
        upstream.default_balance().await;

        let config = ControllerFactory::config(&upstream.base_url());
        let state = AppState::new(config, ControllerFactory::create(&upstream.base_url()));
        let jobs = state.jobs.clone();
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::post()
            .uri("/v1/jobs")
            .set_json(json!({"rate_limit": 100}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/v1/jobs/{}/start", id))
            .set_json(json!({"addresses": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri(&format!("/v1/jobs/{}/start", id))
            .set_json(json!({"addresses": ["addrA"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);

        wait_for_terminal(&jobs, &id).await;

        let req = test::TestRequest::post()
            .uri(&format!("/v1/jobs/{}/start", id))
            .set_json(json!({"addresses": ["addrB"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}

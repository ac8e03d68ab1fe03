//! Mock tests for the capability platform client
//!
//! These tests use WireMock to simulate the platform's serverless endpoints
//! and verify that the typed client interacts with them correctly, including
//! the candidate fallback behavior.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::services::capability::{
        BulkTask, CapabilityClient, CapabilityRequest, FileCreationConfig, ImageGenerationConfig,
        WebResearchConfig,
    };

    /// Creates a test client configured to sweep the default prefixes on the
    /// mock server
    fn create_test_client(mock_server: &MockServer) -> CapabilityClient {
        CapabilityClient::builder()
            .origin(mock_server.uri())
            .timeout(5)
            .build()
            .expect("Failed to build capability client")
    }

    /// A `/health` body that satisfies both the health-check and the
    /// capability-metadata projections; the platform serves both from the
    /// same endpoint.
    fn health_body() -> serde_json::Value {
        json!({
            "status": "healthy",
            "timestamp": "2025-01-01T00:00:00Z",
            "version": "2.0.0",
            "engine_info": {
                "name": "Capability Engine",
                "version": "2.0.0",
                "model_count": 3,
                "capability_count": 8
            },
            "models": {
                "flash": "model-flash-001",
                "pro": "model-pro-001"
            },
            "capabilities": {
                "image_generation": {
                    "description": "Generate images from prompts",
                    "model": "model-pro-001",
                    "features": ["text-to-image"]
                },
                "web_research": {
                    "description": "Research the web",
                    "model": "model-flash-001",
                    "features": ["search", "summarize"]
                }
            }
        })
    }

    #[tokio::test]
    async fn test_health_via_primary_prefix() {
        let mock_server = MockServer::start().await;

        // Only the primary prefix answers; the lower-priority candidates must
        // never be contacted.
        Mock::given(method("GET"))
            .and(path("/.netlify/functions/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(health_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(health_body()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let health = client.health().await.unwrap();

        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, "2.0.0");
    }

    #[tokio::test]
    async fn test_health_falls_back_when_primary_prefix_breaks() {
        let mock_server = MockServer::start().await;

        // The functions gateway is misrouted; `/api` still answers.
        Mock::given(method("GET"))
            .and(path("/.netlify/functions/api/health"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Internal server error",
                "message": "function crashed"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(health_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let health = client.health().await.unwrap();

        assert_eq!(health.status, "healthy");
    }

    #[tokio::test]
    async fn test_exhaustion_when_no_prefix_answers() {
        let mock_server = MockServer::start().await;
        // Nothing mounted: every candidate 404s.

        let client = create_test_client(&mock_server);
        let err = client.analytics().await.unwrap_err();

        assert!(err.is_exhaustion());
        assert!(err.to_string().contains("/analytics"));
    }

    #[tokio::test]
    async fn test_capabilities_reads_health_endpoint() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/.netlify/functions/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(health_body()))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let info = client.capabilities().await.unwrap();

        assert_eq!(info.engine_info.name, "Capability Engine");
        assert_eq!(info.engine_info.capability_count, 8);
        assert_eq!(info.models["flash"], "model-flash-001");
        assert_eq!(
            info.capabilities["web_research"].model,
            "model-flash-001"
        );
    }

    #[tokio::test]
    async fn test_analytics_snapshot() {
        let mock_server = MockServer::start().await;

        let body = json!({
            "system_status": "operational",
            "total_requests": 1542,
            "error_count": 12,
            "error_rate": 0.78,
            "uptime_seconds": 7200.5,
            "capability_usage": {
                "image_generation": 320,
                "web_research": 641
            },
            "performance_metrics": {
                "average_response_time": 182.4,
                "total_processing_time": 281260.8,
                "requests_per_minute": 12.85
            },
            "models_status": {
                "flash": "available",
                "pro": "available"
            },
            "capabilities_status": {
                "image_generation": true,
                "web_research": true
            },
            "timestamp": "2025-01-01T00:00:00Z"
        });

        Mock::given(method("GET"))
            .and(path("/.netlify/functions/api/analytics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let analytics = client.analytics().await.unwrap();

        assert_eq!(analytics.system_status, "operational");
        assert_eq!(analytics.total_requests, 1542);
        assert_eq!(analytics.error_count, 12);
        assert_eq!(analytics.uptime_seconds, 7200.5);
        assert_eq!(analytics.capability_usage["web_research"], 641);
        assert_eq!(analytics.performance_metrics.average_response_time, 182.4);
        assert_eq!(analytics.models_status["pro"], "available");
        assert!(analytics.capabilities_status["image_generation"]);

        // The typed snapshot reproduces the wire body exactly
        assert_eq!(serde_json::to_value(&analytics).unwrap(), body);
    }

    #[tokio::test]
    async fn test_generate_image_posts_prompt() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/.netlify/functions/api/generate-image"))
            .and(body_json(json!({"prompt": "a lighthouse at dusk"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"image_url": "https://cdn.example.com/img/42.png"},
                "timestamp": "2025-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let response = client
            .generate_image(&ImageGenerationConfig {
                prompt: "a lighthouse at dusk".to_string(),
                config: None,
            })
            .await
            .unwrap();

        assert!(response.success);
        let data = response.into_result().unwrap();
        assert_eq!(data["image_url"], "https://cdn.example.com/img/42.png");
    }

    #[tokio::test]
    async fn test_post_falls_back_across_prefixes() {
        let mock_server = MockServer::start().await;

        // Primary prefix is down; the same POST body must reach the fallback.
        let expected_body = json!({"query": "rust async runtimes", "context": "comparison"});

        Mock::given(method("POST"))
            .and(path("/.netlify/functions/api/research-web"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/research-web"))
            .and(body_json(&expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"summary": "tokio dominates"},
                "timestamp": "2025-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let response = client
            .research_web(&WebResearchConfig {
                query: "rust async runtimes".to_string(),
                context: Some("comparison".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(response.into_result().unwrap()["summary"], "tokio dominates");
    }

    #[tokio::test]
    async fn test_create_file_returns_artifact() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/.netlify/functions/api/create-file"))
            .and(body_json(json!({
                "content": "hello",
                "filename": "greeting.txt",
                "format": "txt"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "file_path": "/files/generated/greeting.txt",
                "download_url": "/api/ultimate-ai/download/greeting.txt",
                "size_bytes": 5,
                "timestamp": "2025-01-01T00:00:00Z"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let artifact = client
            .create_file(&FileCreationConfig {
                content: "hello".to_string(),
                filename: "greeting.txt".to_string(),
                format: "txt".to_string(),
            })
            .await
            .unwrap();

        assert!(artifact.success);
        assert_eq!(artifact.size_bytes, 5);
        assert_eq!(artifact.download_url, "/api/ultimate-ai/download/greeting.txt");
    }

    #[tokio::test]
    async fn test_bulk_workflow_priorities() {
        let mock_server = MockServer::start().await;

        // Positional priority for the first task; an explicit 0 on the third
        // task must survive (it is not "missing").
        let expected_body = json!({
            "workflow_description": "Bulk workflow execution",
            "tasks": [
                {"type": "web_research", "config": {"query": "a", "priority": 0}},
                {"type": "code_execution", "config": {"code": "print(1)", "priority": 5}},
                {"type": "image_generation", "config": {"prompt": "b", "priority": 0}}
            ]
        });

        Mock::given(method("POST"))
            .and(path("/.netlify/functions/api/execute-workflow"))
            .and(body_json(&expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"completed": 3},
                "timestamp": "2025-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let response = client
            .execute_bulk_workflow(vec![
                BulkTask {
                    task_type: "web_research".to_string(),
                    config: json!({"query": "a"}),
                    priority: None,
                },
                BulkTask {
                    task_type: "code_execution".to_string(),
                    config: json!({"code": "print(1)"}),
                    priority: Some(5),
                },
                BulkTask {
                    task_type: "image_generation".to_string(),
                    config: json!({"prompt": "b"}),
                    priority: Some(0),
                },
            ])
            .await
            .unwrap();

        assert!(response.success);
    }

    #[tokio::test]
    async fn test_dispatch_routes_typed_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/.netlify/functions/api/research-web"))
            .and(body_json(json!({"query": "quicksort"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"summary": "divide and conquer"},
                "timestamp": "2025-01-01T00:00:00Z"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let value = client
            .dispatch(CapabilityRequest::WebResearch(WebResearchConfig {
                query: "quicksort".to_string(),
                context: None,
            }))
            .await
            .unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["summary"], "divide and conquer");
    }

    #[tokio::test]
    async fn test_envelope_failure_maps_to_service_error() {
        let mock_server = MockServer::start().await;

        // The platform can answer 200 with success=false; the envelope carries
        // the failure.
        Mock::given(method("POST"))
            .and(path("/.netlify/functions/api/execute-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "sandbox quota exceeded",
                "timestamp": "2025-01-01T00:00:00Z"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let response = client
            .execute_code(&crate::services::capability::CodeExecutionConfig {
                code: "while True: pass".to_string(),
                language: "python".to_string(),
                context: None,
            })
            .await
            .unwrap();

        assert!(!response.success);
        let err = response.into_result().unwrap_err();
        assert!(matches!(err, crate::error::GatewayError::Service(_)));
        assert!(err.to_string().contains("sandbox quota exceeded"));
    }

    #[tokio::test]
    async fn test_metrics_snapshot_is_open_map() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/.netlify/functions/api/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "requests_total": 1542,
                "active_connections": 3,
                "custom_gauge": 0.25
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let snapshot = client.metrics_snapshot().await.unwrap();

        assert_eq!(snapshot.0["requests_total"], 1542);
        assert_eq!(snapshot.0["custom_gauge"], 0.25);
    }
}

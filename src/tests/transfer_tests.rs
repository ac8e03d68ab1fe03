//! Tests for file upload and download
//!
//! These tests verify that transfers target the fixed file base directly and
//! never participate in the candidate sweep.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::error::GatewayError;
    use crate::services::capability::CapabilityClient;

    fn create_test_client(mock_server: &MockServer) -> CapabilityClient {
        CapabilityClient::builder()
            .origin(mock_server.uri())
            .timeout(5)
            .build()
            .expect("Failed to build capability client")
    }

    #[tokio::test]
    async fn test_upload_returns_receipt() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/ultimate-ai/upload-file"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "filename": "1735689600_report.csv",
                "original_filename": "report.csv",
                "size": 11,
                "path": "/uploads/1735689600_report.csv",
                "timestamp": "2025-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let receipt = client
            .upload_file("report.csv", b"a,b\n1,2\n3,4".to_vec())
            .await
            .unwrap();

        assert!(receipt.success);
        assert_eq!(receipt.original_filename, "report.csv");
        assert_eq!(receipt.filename, "1735689600_report.csv");
        assert_eq!(receipt.size, 11);
    }

    #[tokio::test]
    async fn test_download_returns_raw_bytes() {
        let mock_server = MockServer::start().await;

        let payload: Vec<u8> = vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

        Mock::given(method("GET"))
            .and(path("/api/ultimate-ai/download/chart.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let bytes = client.download_file("chart.png").await.unwrap();

        // Raw bytes, no JSON envelope
        assert_eq!(bytes, payload);
    }

    #[tokio::test]
    async fn test_transfers_bypass_the_candidate_sweep() {
        let mock_server = MockServer::start().await;

        // Candidate-prefixed transfer routes must never be contacted even if
        // the fixed base is down.
        Mock::given(method("POST"))
            .and(path("/.netlify/functions/api/upload-file"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/upload-file"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let err = client
            .upload_file("report.csv", b"data".to_vec())
            .await
            .unwrap_err();

        // The fixed base 404s and the call fails without trying candidates
        assert!(matches!(err, GatewayError::Transfer(_)));
    }

    #[tokio::test]
    async fn test_download_missing_file_is_transfer_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/ultimate-ai/download/missing.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let err = client.download_file("missing.txt").await.unwrap_err();

        assert!(matches!(err, GatewayError::Transfer(_)));
        assert!(err.to_string().contains("Download failed"));
    }

    #[tokio::test]
    async fn test_upload_then_download_round_trip() {
        let mock_server = MockServer::start().await;

        let content = b"quarterly figures".to_vec();

        Mock::given(method("POST"))
            .and(path("/api/ultimate-ai/upload-file"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "filename": "stored_figures.txt",
                "original_filename": "figures.txt",
                "size": 17,
                "path": "/uploads/stored_figures.txt",
                "timestamp": "2025-01-01T00:00:00Z"
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/ultimate-ai/download/stored_figures.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);

        let receipt = client
            .upload_file("figures.txt", content.clone())
            .await
            .unwrap();
        let downloaded = client.download_file(&receipt.filename).await.unwrap();

        assert_eq!(downloaded, content);
    }

    #[tokio::test]
    async fn test_custom_file_base() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/storage/download/note.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hi".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CapabilityClient::builder()
            .origin(mock_server.uri())
            .file_base("/storage")
            .timeout(5)
            .build()
            .unwrap();

        let bytes = client.download_file("note.txt").await.unwrap();
        assert_eq!(bytes, b"hi");
    }
}

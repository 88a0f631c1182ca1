//! HTTP-level tests for the bundled backend clients using wiremock.
//!
//! These tests mock the Google endpoints to verify request shape, response
//! parsing and error mapping without hitting the real services.

use autotranslate_core::{
    BatchMode, Error, Lang, PaidApiTranslator, ServiceKind, Settings, TranslatorService,
    create_translator,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERVICE_ACCOUNT_KEY: &str = include_str!("fixtures/service_account_key.pem");

fn cloud_response(items: &[&str]) -> serde_json::Value {
    let translations: Vec<_> = items
        .iter()
        .map(|text| json!({"translatedText": text, "detectedSourceLanguage": "en"}))
        .collect();
    json!({"data": {"translations": translations}})
}

fn api_key_settings(server: &MockServer) -> Settings {
    Settings {
        service: ServiceKind::PaidApi,
        google_translator_service_credentials_json: Some(json!({"api_key": "test-key"})),
        cloud_api_base: server.uri(),
        ..Settings::default()
    }
}

#[cfg(feature = "free-web")]
mod web_tests {
    use super::*;

    fn settings(server: &MockServer) -> Settings {
        Settings {
            service: ServiceKind::FreeWeb,
            web_api_base: server.uri(),
            ..Settings::default()
        }
    }

    async fn mount_word(server: &MockServer, word: &str, translated: &str) {
        let body = format!(r#"[[["{translated}","{word}",null,null,10]],null,"en"]"#);
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("client", "gtx"))
            .and(query_param("sl", "en"))
            .and(query_param("tl", "fr"))
            .and(query_param("dt", "t"))
            .and(query_param("q", word))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    /// Test a single string round trip through the web endpoint.
    #[tokio::test]
    async fn test_web_translate_string() {
        let server = MockServer::start().await;
        mount_word(&server, "hello", "bonjour").await;

        let translator = create_translator(&settings(&server)).unwrap();
        let result = translator
            .translate_string("hello", &Lang::new("fr"), None)
            .await
            .unwrap();

        assert_eq!(result, "bonjour");
    }

    /// Test that optimized batches issue no request until polled.
    #[tokio::test]
    async fn test_web_optimized_batch_is_lazy() {
        let server = MockServer::start().await;
        mount_word(&server, "hello", "bonjour").await;
        mount_word(&server, "world", "monde").await;

        let translator = create_translator(&settings(&server)).unwrap();
        let translations = translator
            .translate_strings(
                vec!["hello".into(), "world".into()],
                &Lang::new("fr"),
                None,
                BatchMode::Optimized,
            )
            .await
            .unwrap();

        assert!(translations.is_lazy());
        assert_eq!(server.received_requests().await.unwrap().len(), 0);

        let result = translations.collect().await.unwrap();
        assert_eq!(result, vec!["bonjour", "monde"]);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    /// Test that eager batches are complete when returned.
    #[tokio::test]
    async fn test_web_eager_batch() {
        let server = MockServer::start().await;
        mount_word(&server, "hello", "bonjour").await;
        mount_word(&server, "world", "monde").await;

        let translator = create_translator(&settings(&server)).unwrap();
        let translations = translator
            .translate_strings(
                vec!["hello".into(), "world".into()],
                &Lang::new("fr"),
                None,
                BatchMode::Eager,
            )
            .await
            .unwrap();

        assert_eq!(server.received_requests().await.unwrap().len(), 2);
        assert_eq!(
            translations.as_slice(),
            Some(&["bonjour".to_string(), "monde".to_string()][..])
        );
    }

    /// Test error handling for HTTP error responses.
    #[tokio::test]
    async fn test_web_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&server)
            .await;

        let translator = create_translator(&settings(&server)).unwrap();
        let result = translator
            .translate_string("hello", &Lang::new("fr"), None)
            .await;

        match result {
            Err(Error::BackendStatus { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "Too Many Requests");
            }
            other => panic!("expected BackendStatus, got {other:?}"),
        }
    }

    /// Test error handling for malformed responses.
    #[tokio::test]
    async fn test_web_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
            .mount(&server)
            .await;

        let translator = create_translator(&settings(&server)).unwrap();
        let result = translator
            .translate_string("hello", &Lang::new("fr"), None)
            .await;

        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }
}

mod cloud_tests {
    use super::*;

    /// Test a single string with API-key credentials.
    #[tokio::test]
    async fn test_cloud_translate_string_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .and(query_param("key", "test-key"))
            .and(body_json(json!({"q": ["hola"], "target": "en", "source": "es", "format": "text"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(cloud_response(&["hello"])))
            .expect(1)
            .mount(&server)
            .await;

        let translator = create_translator(&api_key_settings(&server)).unwrap();
        let target = Lang::new(PaidApiTranslator::STRING_DEFAULT_TARGET);
        let result = translator.translate_string("hola", &target, None).await.unwrap();

        assert_eq!(result, "hello");
        server.verify().await;
    }

    /// Test that large batches are split by `max_segments` and reassembled in order.
    #[tokio::test]
    async fn test_cloud_batch_chunking_preserves_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .and(body_json(json!({"q": ["one", "two"], "target": "fr", "source": "en", "format": "text"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(cloud_response(&["un", "deux"])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .and(body_json(json!({"q": ["three"], "target": "fr", "source": "en", "format": "text"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(cloud_response(&["trois"])))
            .expect(1)
            .mount(&server)
            .await;

        let settings = Settings {
            max_segments: 2,
            accumulate_batches: false,
            ..api_key_settings(&server)
        };
        let translator = create_translator(&settings).unwrap();
        let result = translator
            .translate_strings(
                vec!["one".into(), "two".into(), "three".into()],
                &Lang::new("fr"),
                None,
                BatchMode::Eager,
            )
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();

        assert_eq!(result, vec!["un", "deux", "trois"]);
        server.verify().await;
    }

    /// Test the accumulator over real HTTP round trips.
    #[tokio::test]
    async fn test_cloud_batches_accumulate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .and(body_json(json!({"q": ["hi"], "target": "fr", "source": "en", "format": "text"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(cloud_response(&["bonjour"])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .and(body_json(json!({"q": ["bye"], "target": "fr", "source": "en", "format": "text"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(cloud_response(&["au revoir"])))
            .mount(&server)
            .await;

        let translator = PaidApiTranslator::new(&api_key_settings(&server)).unwrap();
        let fr = Lang::new("fr");
        translator
            .translate_strings(vec!["hi".into()], &fr, None, BatchMode::Optimized)
            .await
            .unwrap();
        let second = translator
            .translate_strings(vec!["bye".into()], &fr, None, BatchMode::Optimized)
            .await
            .unwrap();

        assert_eq!(second.collect().await.unwrap(), vec!["bonjour", "au revoir"]);
    }

    /// Test that backend errors propagate with their status.
    #[tokio::test]
    async fn test_cloud_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .respond_with(ResponseTemplate::new(403).set_body_string(r#"{"error": {"message": "quota"}}"#))
            .mount(&server)
            .await;

        let translator = create_translator(&api_key_settings(&server)).unwrap();
        let result = translator
            .translate_string("hola", &Lang::new("en"), None)
            .await;

        assert!(matches!(result, Err(Error::BackendStatus { status: 403, .. })));
    }

    /// Test that a short response is rejected rather than misaligned.
    #[tokio::test]
    async fn test_cloud_count_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cloud_response(&["un"])))
            .mount(&server)
            .await;

        let translator = create_translator(&api_key_settings(&server)).unwrap();
        let result = translator
            .translate_strings(vec!["one".into(), "two".into()], &Lang::new("fr"), None, BatchMode::Eager)
            .await;

        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }

    /// Test that construction with missing credentials sends nothing.
    #[tokio::test]
    async fn test_missing_credentials_makes_no_request() {
        let server = MockServer::start().await;
        let settings = Settings {
            google_translator_service_credentials_json: None,
            ..api_key_settings(&server)
        };

        assert!(matches!(create_translator(&settings), Err(Error::ConfigMissing(_))));
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }
}

mod service_account_tests {
    use super::*;

    fn settings(server: &MockServer) -> Settings {
        Settings {
            service: ServiceKind::PaidApi,
            google_translator_service_credentials_json: Some(json!({
                "type": "service_account",
                "project_id": "demo",
                "private_key_id": "key-1",
                "private_key": SERVICE_ACCOUNT_KEY,
                "client_email": "translator@demo.iam.gserviceaccount.com",
                "token_uri": format!("{}/token", server.uri()),
            })),
            cloud_api_base: server.uri(),
            ..Settings::default()
        }
    }

    /// Test the JWT bearer exchange and token reuse across calls.
    #[tokio::test]
    async fn test_token_fetched_once_and_reused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
            .and(body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.test-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .and(header("authorization", "Bearer ya29.test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cloud_response(&["bonjour"])))
            .expect(2)
            .mount(&server)
            .await;

        let translator = create_translator(&settings(&server)).unwrap();
        let fr = Lang::new("fr");
        let en = Lang::new("en");

        assert_eq!(translator.translate_string("hello", &fr, Some(&en)).await.unwrap(), "bonjour");
        assert_eq!(translator.translate_string("hello", &fr, Some(&en)).await.unwrap(), "bonjour");

        server.verify().await;
    }

    /// Test that construction does not contact the token endpoint.
    #[tokio::test]
    async fn test_construction_is_offline() {
        let server = MockServer::start().await;
        let _translator = create_translator(&settings(&server)).unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }

    /// Test that token endpoint failures surface as auth errors.
    #[tokio::test]
    async fn test_token_rejection_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
            .mount(&server)
            .await;

        let translator = create_translator(&settings(&server)).unwrap();
        let result = translator
            .translate_string("hello", &Lang::new("fr"), None)
            .await;

        match result {
            Err(Error::Auth(message)) => assert!(message.contains("invalid_grant")),
            other => panic!("expected Auth error, got {other:?}"),
        }
    }
}

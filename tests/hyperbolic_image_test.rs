//! Hyperbolic image generation tests against a mock server

use hyperbolic_provider::prelude::*;
use hyperbolic_provider::providers::hyperbolic::HyperbolicImageMetadata;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

mod support;
use support::provider_for;

fn image_response() -> Value {
    json!({
        "images": [
            {"image": "aW1hZ2UtMQ==", "index": 0, "random_seed": 1234},
            {"image": "aW1hZ2UtMg==", "index": 1, "random_seed": 5678}
        ],
        "inference_time": 1.75
    })
}

#[tokio::test]
async fn image_request_shape_and_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/image/generation"))
        .and(header("authorization", "Bearer test-key"))
        .and(|req: &Request| {
            let Ok(v) = serde_json::from_slice::<Value>(&req.body) else {
                return false;
            };
            v == json!({
                "prompt": "A lighthouse at dusk",
                "height": 1024,
                "width": 1024,
                "cfg_scale": 5.0,
                "model_name": "SDXL1.0-base",
                "steps": 25
            })
        })
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "img-1")
                .set_body_json(image_response()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let model = provider_for(&server).image("SDXL1.0-base", Default::default());
    let mut options = ImageGenerateOptions::new("A lighthouse at dusk")
        .with_size("1024x1024")
        .with_provider_options("hyperbolic", json!({"cfgScale": 5.0, "steps": 25}));
    options.aspect_ratio = Some("1:1".into());

    let result = model.do_generate(options).await.expect("image ok");

    assert_eq!(result.images, vec!["aW1hZ2UtMQ==", "aW1hZ2UtMg=="]);
    assert_eq!(
        result.warnings,
        vec![CallWarning::unsupported_setting_with_details(
            "aspectRatio",
            "This model does not support `aspectRatio`. Use `size` instead."
        )]
    );
    assert_eq!(result.response.model_id, "SDXL1.0-base");
    assert_eq!(
        result.response.headers.get("x-request-id").map(String::as_str),
        Some("img-1")
    );
    let metadata = HyperbolicImageMetadata::from_response(&result.response).unwrap();
    assert_eq!(metadata.inference_time, 1.75);
    assert_eq!(metadata.random_seeds, vec![1234, 5678]);
}

#[tokio::test]
async fn image_invalid_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/image/generation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"images": "nope"})))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .image("SDXL1.0-base", Default::default())
        .do_generate(ImageGenerateOptions::new("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponseData { .. }));
}

#[tokio::test]
async fn image_malformed_size_fails_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response()))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .image("SDXL1.0-base", Default::default())
        .do_generate(ImageGenerateOptions::new("x").with_size("large"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::InvalidParameter(_)));
}

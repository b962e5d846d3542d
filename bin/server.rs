// IBAN Check - Web Server
// REST API over the country specification engine

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use iban_check::{
    available_countries, electronic_format, from_bban, is_valid_bban, print_format, registry,
    to_bban, CountrySpec, IbanError, DEFAULT_SEPARATOR, VERSION,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response()
    }
}

fn api_error(err: IbanError) -> Response {
    let status = match err {
        IbanError::UnknownCountry(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };

    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(err.to_string()),
        }),
    )
        .into_response()
}

// ============================================================================
// Request / Response types
// ============================================================================

/// Predicates take any JSON value: non-strings are simply invalid
#[derive(Deserialize)]
struct ValidateRequest {
    #[serde(default)]
    iban: Value,
}

#[derive(Deserialize)]
struct ValidateBbanRequest {
    #[serde(default)]
    country_code: Value,
    #[serde(default)]
    bban: Value,
}

#[derive(Serialize)]
struct ValidateResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Deserialize)]
struct ToBbanRequest {
    iban: String,
    separator: Option<String>,
}

#[derive(Deserialize)]
struct FromBbanRequest {
    country_code: String,
    bban: String,
}

#[derive(Serialize)]
struct IbanResponse {
    iban: String,
    print: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    ApiResponse::ok(format!("iban-check {}", VERSION))
}

/// GET /api/countries - All country specifications
async fn get_countries() -> impl IntoResponse {
    let specs: Vec<&CountrySpec> = available_countries().values().collect();
    ApiResponse::ok(specs)
}

/// GET /api/countries/:code - One country specification
async fn get_country(Path(code): Path<String>) -> impl IntoResponse {
    match registry().lookup(&code) {
        Ok(spec) => ApiResponse::ok(spec),
        Err(e) => api_error(e),
    }
}

/// POST /api/validate - Validate an IBAN
async fn validate_iban(Json(req): Json<ValidateRequest>) -> impl IntoResponse {
    let Value::String(input) = req.iban else {
        return ApiResponse::ok(ValidateResponse {
            valid: false,
            reason: Some("IBAN must be a string".to_string()),
        });
    };

    let electronic = electronic_format(&input);
    let result = match registry().for_iban(&electronic) {
        Some(spec) => spec.check(&electronic).map_err(IbanError::InvalidIban),
        None => Err(IbanError::UnknownCountry(
            electronic.chars().take(2).collect(),
        )),
    };

    ApiResponse::ok(ValidateResponse {
        valid: result.is_ok(),
        reason: result.err().map(|e| e.to_string()),
    })
}

/// POST /api/validate-bban - Validate a BBAN for a country
async fn validate_bban(Json(req): Json<ValidateBbanRequest>) -> impl IntoResponse {
    let valid = match (&req.country_code, &req.bban) {
        (Value::String(code), Value::String(bban)) => is_valid_bban(code, bban),
        _ => false,
    };

    ApiResponse::ok(ValidateResponse {
        valid,
        reason: None,
    })
}

/// POST /api/bban - Extract the BBAN of an IBAN
async fn extract_bban(Json(req): Json<ToBbanRequest>) -> impl IntoResponse {
    let separator = req.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);

    match to_bban(&req.iban, separator) {
        Ok(bban) => ApiResponse::ok(bban),
        Err(e) => api_error(e),
    }
}

/// POST /api/iban - Build an IBAN from country code + BBAN
async fn build_iban(Json(req): Json<FromBbanRequest>) -> impl IntoResponse {
    match from_bban(&req.country_code, &req.bban) {
        Ok(iban) => ApiResponse::ok(IbanResponse {
            print: print_format(&iban, DEFAULT_SEPARATOR),
            iban,
        }),
        Err(e) => {
            error!("Failed to build IBAN for {}: {}", req.country_code, e);
            api_error(e)
        }
    }
}

/// POST /api/format - Group an IBAN for display
async fn format_iban(Json(req): Json<ToBbanRequest>) -> impl IntoResponse {
    let separator = req.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);
    ApiResponse::ok(print_format(&req.iban, separator))
}

fn router() -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/countries", get(get_countries))
        .route("/countries/:code", get(get_country))
        .route("/validate", post(validate_iban))
        .route("/validate-bban", post(validate_bban))
        .route("/bban", post(extract_bban))
        .route("/iban", post(build_iban))
        .route("/format", post(format_iban));

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Build the registry before accepting traffic
    let count = registry().count();
    info!("Loaded {} country specifications", count);

    let addr = std::env::var("IBAN_SERVER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    info!("Server running on http://{}", addr);
    info!("API: http://{}/api/countries", addr);

    axum::serve(listener, router()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validate_bban_accepts_belgian_bban() {
        let (status, json) = post_json(
            "/api/validate-bban",
            r#"{"country_code":"BE","bban":"539007547034"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["valid"], true);
    }

    #[tokio::test]
    async fn test_validate_bban_non_string_country_is_invalid() {
        let (status, json) = post_json(
            "/api/validate-bban",
            r#"{"country_code":12,"bban":"539007547034"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["valid"], false);
    }

    #[tokio::test]
    async fn test_validate_bban_missing_country_is_invalid() {
        let (status, json) = post_json("/api/validate-bban", r#"{"bban":"539007547034"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["valid"], false);
    }

    #[tokio::test]
    async fn test_validate_non_string_iban_is_invalid() {
        let (status, json) = post_json("/api/validate", r#"{"iban":42}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["valid"], false);
    }

    #[tokio::test]
    async fn test_validate_reports_reason() {
        let (_, ok) = post_json("/api/validate", r#"{"iban":"BE68 5390 0754 7034"}"#).await;
        let (_, bad) = post_json("/api/validate", r#"{"iban":"BE68539007547035"}"#).await;

        assert_eq!(ok["data"]["valid"], true);
        assert!(ok["data"].get("reason").is_none());
        assert_eq!(bad["data"]["valid"], false);
        assert!(bad["data"]["reason"].is_string());
    }

    #[tokio::test]
    async fn test_extract_bban_splits_blocks() {
        let (status, json) = post_json(
            "/api/bban",
            r#"{"iban":"BE68539007547034","separator":"-"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], "539-0075470-34");
    }

    #[tokio::test]
    async fn test_build_iban_unknown_country_is_not_found() {
        let (status, json) = post_json("/api/iban", r#"{"country_code":"QQ","bban":"1"}"#).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }
}

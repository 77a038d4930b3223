/// HTTP endpoint for generating preparedness plans
///
/// Endpoints:
/// - POST /api/analyze   - Survey JSON in, `PreparednessPlan` JSON out
/// - GET  /api/disasters - Static disaster reference dataset
/// - GET  /health        - Service health check
///
/// Requests are handled one at a time on the server loop; the fan-out
/// inside a plan request runs on the planner's thread pool.

use std::io::{Cursor, Read};
use tiny_http::{Header, Method, Response, StatusCode};
use tracing::{error, info, warn};

use crate::disasters::DISASTER_REGISTRY;
use crate::model::{PlanError, SurveyRequest};
use crate::planner::Planner;

/// Survey payloads are small; anything larger is rejected unread.
const MAX_BODY_BYTES: u64 = 64 * 1024;

const ENDPOINTS: [&str; 3] = ["POST /api/analyze", "GET /api/disasters", "GET /health"];

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Routes one request to its handler. Returns the status code and JSON body.
pub fn route(planner: &Planner, method: &Method, url: &str, body: &str) -> (u16, serde_json::Value) {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (Method::Post, "/api/analyze") => handle_analyze(planner, body),
        (Method::Get, "/api/disasters") => handle_disasters(),
        (Method::Get, "/health") => handle_health(planner),
        _ => (
            404,
            serde_json::json!({
                "error": "Not found",
                "available_endpoints": ENDPOINTS,
            }),
        ),
    }
}

fn handle_analyze(planner: &Planner, body: &str) -> (u16, serde_json::Value) {
    let request: SurveyRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejecting malformed survey");
            return (
                400,
                serde_json::json!({ "error": "Invalid request", "details": e.to_string() }),
            );
        }
    };

    match planner.generate_plan(&request) {
        Ok(plan) => match serde_json::to_value(&plan) {
            Ok(json) => (200, json),
            Err(e) => {
                error!(error = %e, "Failed to serialize plan");
                (500, serde_json::json!({ "error": "Failed to generate plan" }))
            }
        },
        Err(PlanError::InvalidRequest(details)) => (
            400,
            serde_json::json!({ "error": "Invalid request", "details": details }),
        ),
        Err(PlanError::LocationNotFound(location)) => (
            422,
            serde_json::json!({ "error": "Invalid location", "location": location }),
        ),
    }
}

fn handle_disasters() -> (u16, serde_json::Value) {
    (200, serde_json::json!({ "disasters": DISASTER_REGISTRY }))
}

fn handle_health(planner: &Planner) -> (u16, serde_json::Value) {
    (
        200,
        serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "riskSource": planner.risk_source_name(),
        }),
    )
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port. Blocks for the life of
/// the server.
pub fn start_endpoint_server(port: u16, planner: Planner) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    info!(port, risk_source = planner.risk_source_name(), "HTTP endpoint listening");
    for endpoint in ENDPOINTS {
        info!("   {}", endpoint);
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let mut body = String::new();
        let (status, json) = match request.as_reader().take(MAX_BODY_BYTES).read_to_string(&mut body) {
            Ok(_) => route(&planner, &method, &url, &body),
            Err(e) => (
                400,
                serde_json::json!({ "error": "Invalid request", "details": e.to_string() }),
            ),
        };

        info!(%method, url = %url, status, "Handled request");
        if let Err(e) = request.respond(create_response(status, &json)) {
            warn!(error = %e, "Failed to send response");
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: &serde_json::Value) -> Response<Cursor<Vec<u8>>> {
    let bytes = serde_json::to_vec_pretty(json).unwrap_or_default();
    let response = Response::from_data(bytes).with_status_code(StatusCode(status_code));

    match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

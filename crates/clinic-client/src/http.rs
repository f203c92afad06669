use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Stateless HTTP access to the clinic backend. The bearer token is an explicit
/// argument of every call; the client never remembers one.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::configuration(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let req = self
            .http
            .request(method, self.url(path))
            .header("Accept", "application/json");
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
        token: Option<&str>,
    ) -> Result<Value> {
        let resp = self
            .request(Method::GET, path, token)
            .query(query)
            .send()
            .await
            .map_err(network_error)?;
        handle_response(resp).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<Value> {
        let resp = self
            .request(method, path, token)
            .json(body)
            .send()
            .await
            .map_err(network_error)?;
        handle_response(resp).await
    }
}

fn network_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Network(format!("request timed out: {err}"))
    } else {
        ClientError::Network(err.to_string())
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        let message = extract_error_message(&body).unwrap_or_else(|| fallback_message(status));
        return Err(ClientError::http(status.as_u16(), message));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Pick the most specific message an error body offers: `message` (a string,
/// or a list of strings as validation pipes produce), then `error`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;

    match json.get("message") {
        Some(Value::String(msg)) if !msg.trim().is_empty() => return Some(msg.clone()),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items.iter().filter_map(|i| i.as_str()).collect();
            if !msgs.is_empty() {
                return Some(msgs.join("; "));
            }
        }
        _ => {}
    }

    json.get("error")
        .and_then(|v| v.as_str())
        .filter(|msg| !msg.trim().is_empty())
        .map(str::to_string)
}

fn fallback_message(status: StatusCode) -> String {
    format!("Request failed with status {status}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_extract_message_field() {
        let body = r#"{"statusCode":400,"message":"Slot already booked","error":"Bad Request"}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Slot already booked")
        );
    }

    #[test]
    fn test_extract_message_list() {
        let body = r#"{"message":["email must be an email","password is too short"]}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("email must be an email; password is too short")
        );
    }

    #[test]
    fn test_extract_error_field_when_no_message() {
        assert_eq!(
            extract_error_message(r#"{"error":"Unauthorized"}"#).as_deref(),
            Some("Unauthorized")
        );
        assert_eq!(extract_error_message("<html>oops</html>"), None);
        assert_eq!(extract_error_message(r#"{"message":""}"#), None);
    }

    #[tokio::test]
    async fn test_get_sends_bearer_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doctor-schedules/available-slots/d1"))
            .and(query_param("date", "2025-06-02"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let value = client(&server)
            .get(
                "doctor-schedules/available-slots/d1",
                &[("date".into(), "2025-06-02".into())],
                Some("tok-1"),
            )
            .await
            .unwrap();
        assert_eq!(value, json!([]));
    }

    #[tokio::test]
    async fn test_send_without_token_has_no_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/patients"))
            .and(body_json(json!({ "name": "Lina" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let value = client(&server)
            .send(Method::POST, "/patients", &json!({ "name": "Lina" }), None)
            .await
            .unwrap();
        assert_eq!(value, json!({ "ok": true }));

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_error_status_uses_body_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "message": "Invalid credentials", "statusCode": 401 })),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .send(Method::POST, "auth/login", &json!({}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 401, ref message } if message == "Invalid credentials"));
    }

    #[tokio::test]
    async fn test_error_status_without_body_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doctors"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).get("doctors", &[], None).await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "Request failed with status 500 Internal Server Error"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = api.get("doctors", &[], None).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }

    #[tokio::test]
    async fn test_empty_success_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prescriptions/a1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let value = client(&server)
            .get("prescriptions/a1", &[], Some("t"))
            .await
            .unwrap();
        assert_eq!(value, Value::Null);
    }
}

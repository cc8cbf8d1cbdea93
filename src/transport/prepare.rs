//! Turns a descriptor into a concrete, validated HTTP request plan.

use crate::auth::AuthCredential;
use crate::route::{Headers, HttpMethod, Parameters, Request};
use crate::transport::config::{TransportConfig, DEFAULT_APP_VERSION_HEADER};
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde_json::Value;
use std::collections::HashMap;

pub const SESSION_ID_HEADER: &str = "x-session-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Everything needed to (re)send one call; built once per dispatch.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub auto_retry: bool,
}

/// Reject empty or malformed paths before any network I/O.
pub fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::invalid_path(path, "path is empty"));
    }
    if path.contains("://") {
        return Err(Error::invalid_path(path, "path must be relative to the base URL"));
    }
    if !path.starts_with('/') {
        return Err(Error::invalid_path(path, "path must start with '/'"));
    }
    if path.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::invalid_path(path, "path contains whitespace or control characters"));
    }
    Ok(())
}

pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Header/query rendering of a JSON value. `None` for null.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

pub fn query_pairs(params: &Parameters) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(k, v)| render_value(v).map(|s| (k.clone(), s)))
        .collect()
}

fn header_error(name: &str, details: String) -> Error {
    Error::validation_with_context(
        format!("invalid request header {:?}", name),
        ErrorContext::new()
            .with_field_path(format!("request.header.{}", name))
            .with_details(details)
            .with_source("header_merge"),
    )
}

fn insert_header(map: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let name_h = HeaderName::from_bytes(name.as_bytes()).map_err(|e| header_error(name, e.to_string()))?;
    let value_h = HeaderValue::from_str(value).map_err(|e| header_error(name, e.to_string()))?;
    map.insert(name_h, value_h);
    Ok(())
}

/// Transport defaults, then descriptor headers, then version and auth headers.
///
/// Descriptor header names that collide once lowercased are rejected.
pub fn merge_headers(
    config: &TransportConfig,
    has_body: bool,
    version: u32,
    descriptor_headers: &Headers,
    credential: Option<&AuthCredential>,
    request_id: &str,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    insert_header(&mut headers, USER_AGENT.as_str(), &config.user_agent)?;
    if let Some(app_version) = &config.app_version {
        insert_header(&mut headers, DEFAULT_APP_VERSION_HEADER, app_version)?;
    }
    insert_header(&mut headers, REQUEST_ID_HEADER, request_id)?;
    if has_body {
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }

    let mut names: Vec<&String> = descriptor_headers.keys().collect();
    names.sort();
    let mut seen: HashMap<HeaderName, &str> = HashMap::with_capacity(names.len());
    for name in names {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| header_error(name, e.to_string()))?;
        if let Some(previous) = seen.insert(header_name, name) {
            return Err(header_error(
                name,
                format!("collides with header {:?}", previous),
            ));
        }
        if let Some(rendered) = render_value(&descriptor_headers[name]) {
            insert_header(&mut headers, name, &rendered)?;
        }
    }

    insert_header(&mut headers, &config.version_header, &version.to_string())?;

    if let Some(credential) = credential {
        insert_header(
            &mut headers,
            AUTHORIZATION.as_str(),
            &format!("Bearer {}", credential.access_token()),
        )?;
        insert_header(&mut headers, SESSION_ID_HEADER, credential.session_id())?;
    }

    Ok(headers)
}

/// Build the request plan. The credential, if any, has already been resolved.
pub fn prepare<R: Request + ?Sized>(
    config: &TransportConfig,
    request: &R,
    credential: Option<&AuthCredential>,
    request_id: &str,
) -> Result<PreparedRequest> {
    let path = request.path();
    validate_path(&path)?;

    let method = request.method();
    let (query, body) = match request.parameters() {
        None => (Vec::new(), None),
        Some(params) if method.has_body() => (Vec::new(), Some(Value::Object(params))),
        Some(params) => (query_pairs(&params), None),
    };

    let headers = merge_headers(
        config,
        body.is_some(),
        request.version(),
        &request.header(),
        credential,
        request_id,
    )?;

    Ok(PreparedRequest {
        method,
        url: join_url(&config.base_url, &path),
        path,
        headers,
        query,
        body,
        auto_retry: request.auto_retry(),
    })
}

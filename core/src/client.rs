//! Stateless HTTP request builder and response parser for the lessons API.
//!
//! # Design
//! `LessonClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The bearer token is passed into each `build_*` call so it is always the
//! caller's current value, never a cached one.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::GatewayError;
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE,
    X_REQUESTED_WITH,
};
use crate::types::{Lesson, LessonId, User};

/// Base path of the lessons API relative to the application origin.
pub const DEFAULT_BASE_PATH: &str = "api-lessons";

/// Synchronous, stateless client for the lessons API.
#[derive(Debug, Clone)]
pub struct LessonClient {
    base_url: String,
}

impl LessonClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_lessons_for_user(&self, user: &User, token: Option<&str>) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/user/{}", user.id), authorized(token), None)
    }

    pub fn build_get_lesson(&self, id: LessonId, token: Option<&str>) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/lesson/{id}"), authorized(token), None)
    }

    /// The create endpoint is called without `Authorization`; it sends
    /// `X-Requested-With` instead.
    pub fn build_create_lesson(&self, lesson: &Lesson) -> Result<HttpRequest, GatewayError> {
        let headers = vec![
            (CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
            (X_REQUESTED_WITH.to_string(), "XMLHttpRequest".to_string()),
        ];
        Ok(self.request(HttpMethod::Post, "/new".to_string(), headers, Some(to_json(lesson)?)))
    }

    pub fn build_update_lesson(
        &self,
        lesson: &Lesson,
        token: Option<&str>,
    ) -> Result<HttpRequest, GatewayError> {
        Ok(self.request(
            HttpMethod::Put,
            "/edit".to_string(),
            authorized(token),
            Some(to_json(lesson)?),
        ))
    }

    pub fn build_delete_lesson(&self, id: LessonId, token: Option<&str>) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/delete/{id}"), authorized(token), None)
    }

    pub fn build_add_attenders(
        &self,
        id: LessonId,
        emails: &[String],
        token: Option<&str>,
    ) -> Result<HttpRequest, GatewayError> {
        Ok(self.request(
            HttpMethod::Put,
            format!("/edit/add-attenders/lesson/{id}"),
            authorized(token),
            Some(to_json(emails)?),
        ))
    }

    pub fn build_remove_attenders(
        &self,
        lesson: &Lesson,
        token: Option<&str>,
    ) -> Result<HttpRequest, GatewayError> {
        Ok(self.request(
            HttpMethod::Put,
            "/edit/delete-attenders".to_string(),
            authorized(token),
            Some(to_json(lesson)?),
        ))
    }

    pub fn parse_list_lessons_for_user(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Lesson>, GatewayError> {
        decode(response)
    }

    pub fn parse_get_lesson(&self, response: HttpResponse) -> Result<Lesson, GatewayError> {
        decode(response)
    }

    pub fn parse_create_lesson(&self, response: HttpResponse) -> Result<Lesson, GatewayError> {
        decode(response)
    }

    pub fn parse_update_lesson(&self, response: HttpResponse) -> Result<Lesson, GatewayError> {
        decode(response)
    }

    pub fn parse_delete_lesson(&self, response: HttpResponse) -> Result<Lesson, GatewayError> {
        decode(response)
    }

    pub fn parse_add_attenders(&self, response: HttpResponse) -> Result<Vec<User>, GatewayError> {
        decode(response)
    }

    pub fn parse_remove_attenders(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<User>, GatewayError> {
        decode(response)
    }

    fn request(
        &self,
        method: HttpMethod,
        path: String,
        headers: Vec<(String, String)>,
        body: Option<String>,
    ) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }
}

/// JSON content type plus the bearer token, when one is available.
fn authorized(token: Option<&str>) -> Vec<(String, String)> {
    let mut headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
    if let Some(token) = token {
        headers.push((AUTHORIZATION.to_string(), format!("Bearer {token}")));
    }
    headers
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, GatewayError> {
    serde_json::to_string(value).map_err(|e| GatewayError::Encode(e.to_string()))
}

/// Map non-2xx statuses to `Remote`, then decode the body.
fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, GatewayError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| GatewayError::Decode(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), GatewayError> {
    if response.is_success() {
        return Ok(());
    }
    Err(GatewayError::Remote {
        status: response.status,
        body: response.body.clone(),
    })
}

//! Async gateway tying `LessonClient` to a `Transport` and a `TokenProvider`.
//!
//! Every remote operation reads the token fresh, builds the request, awaits
//! the transport and parses the response. Transport failures and non-2xx
//! responses go through `handle_error`, which logs them and yields
//! `GatewayError::Remote`; undecodable bodies are logged and returned as
//! `GatewayError::Decode`.
//! The gateway holds no mutable state.

use tracing::{debug, error, warn};

use crate::auth::TokenProvider;
use crate::client::LessonClient;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, TransportError};
use crate::http::{HttpRequest, HttpResponse, CONTENT_TYPE};
use crate::session::SessionContext;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Lesson, LessonId, User};

pub struct LessonGateway<T, P> {
    client: LessonClient,
    transport: T,
    tokens: P,
}

impl<P: TokenProvider> LessonGateway<UreqTransport, P> {
    /// Gateway over real HTTP, configured from `config`.
    pub fn from_config(config: &GatewayConfig, tokens: P) -> Self {
        Self::new(
            LessonClient::new(&config.base_url),
            UreqTransport::new(config.timeout),
            tokens,
        )
    }
}

impl<T: Transport, P: TokenProvider> LessonGateway<T, P> {
    pub fn new(client: LessonClient, transport: T, tokens: P) -> Self {
        Self {
            client,
            transport,
            tokens,
        }
    }

    pub async fn list_lessons_for_user(&self, user: &User) -> Result<Vec<Lesson>, GatewayError> {
        let token = self.token();
        let req = self.client.build_list_lessons_for_user(user, token.as_deref());
        self.call(req, LessonClient::parse_list_lessons_for_user).await
    }

    pub async fn get_lesson(&self, id: LessonId) -> Result<Lesson, GatewayError> {
        let token = self.token();
        let req = self.client.build_get_lesson(id, token.as_deref());
        self.call(req, LessonClient::parse_get_lesson).await
    }

    pub async fn create_lesson(&self, lesson: &Lesson) -> Result<Lesson, GatewayError> {
        let req = self.client.build_create_lesson(lesson)?;
        self.call(req, LessonClient::parse_create_lesson).await
    }

    pub async fn update_lesson(&self, lesson: &Lesson) -> Result<Lesson, GatewayError> {
        let token = self.token();
        let req = self.client.build_update_lesson(lesson, token.as_deref())?;
        self.call(req, LessonClient::parse_update_lesson).await
    }

    pub async fn delete_lesson(&self, id: LessonId) -> Result<Lesson, GatewayError> {
        let token = self.token();
        let req = self.client.build_delete_lesson(id, token.as_deref());
        self.call(req, LessonClient::parse_delete_lesson).await
    }

    /// Emails are expected to be non-empty; this is not enforced.
    pub async fn add_attenders(
        &self,
        id: LessonId,
        emails: &[String],
    ) -> Result<Vec<User>, GatewayError> {
        let token = self.token();
        let req = self.client.build_add_attenders(id, emails, token.as_deref())?;
        self.call(req, LessonClient::parse_add_attenders).await
    }

    /// `lesson.attenders` lists the attenders to remove.
    pub async fn remove_attenders(&self, lesson: &Lesson) -> Result<Vec<User>, GatewayError> {
        let token = self.token();
        let req = self.client.build_remove_attenders(lesson, token.as_deref())?;
        self.call(req, LessonClient::parse_remove_attenders).await
    }

    /// Looks up a lesson in the session's cached list. No network access.
    pub fn find_local_lesson<'s>(
        &self,
        session: &'s SessionContext,
        id: LessonId,
    ) -> Option<&'s Lesson> {
        if session.current_user().is_none() {
            debug!(lesson_id = id, "local lesson lookup without an authenticated user");
        }
        session.find_lesson(id)
    }

    fn token(&self) -> Option<String> {
        let token = self.tokens.bearer_token();
        if token.is_none() {
            warn!("no bearer token available, sending request without Authorization");
        }
        token
    }

    /// Execute `req` and decode the reply with `parse`. Transport failures,
    /// non-2xx responses and undecodable bodies are all logged here.
    async fn call<R>(
        &self,
        req: HttpRequest,
        parse: impl FnOnce(&LessonClient, HttpResponse) -> Result<R, GatewayError>,
    ) -> Result<R, GatewayError> {
        let method = req.method.as_str();
        let path = req.path.clone();
        debug!(method, path = %path, "sending lessons API request");

        let resp = match self.transport.execute(req).await {
            Ok(resp) if resp.is_success() => resp,
            Ok(resp) => return Err(handle_error(method, &path, resp.status, resp.body)),
            Err(TransportError(msg)) => return Err(handle_error(method, &path, 0, msg)),
        };

        let status = resp.status;
        let content_type = resp.header(CONTENT_TYPE).unwrap_or_default().to_string();
        parse(&self.client, resp).inspect_err(|err| {
            error!(
                method,
                path = %path,
                status,
                content_type = %content_type,
                error = %err,
                "lessons API response could not be decoded"
            );
        })
    }
}

fn handle_error(method: &str, path: &str, status: u16, body: String) -> GatewayError {
    error!(method, path, status, body = %body, "lessons API request failed");
    GatewayError::Remote { status, body }
}

//! Typed wrappers over the backend's REST endpoints.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use mymind_core::{
    ChildInfo, Config, Emotion, MoodEntry, Role, RoutineId, RoutineItem, RoutineLog, Session,
    UserId,
};

use crate::error::ApiError;

/// Header carrying the acting account id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Optional `{ "message": ..., "error": ... }` body the backend attaches to
/// most responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ServerMessage {
    /// Lenient parse: non-JSON or empty bodies yield an empty message.
    pub fn parse(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(body).unwrap_or_default()
    }

    /// `error` first, then `message`.
    pub fn text(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

#[derive(Serialize)]
struct ParentLoginBody<'a> {
    account: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChildLoginBody<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoutineLogBody<'a> {
    routine_id: RoutineId,
    user_id: &'a UserId,
    is_completed: bool,
}

/// Blocking API client. One instance acts as one [`Role`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    session: Session,
    role: Role,
}

impl ApiClient {
    /// Build a client acting as [`Role::Parent`].
    pub fn new(config: &Config, session: Session) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            role: Role::Parent,
        }
    }

    /// Switch the acting role for subsequent requests.
    pub fn acting_as(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Account id for the acting role, or [`ApiError::NotAuthenticated`].
    pub fn current_user(&self) -> Result<&UserId, ApiError> {
        self.session
            .user_id(self.role)
            .ok_or(ApiError::NotAuthenticated { role: self.role })
    }

    // -----------------------------------------------------------------------
    // Session endpoints
    // -----------------------------------------------------------------------

    /// `POST /user/login`. The caller stores `account` on success.
    pub fn parent_login(&self, account: &str, password: &str) -> Result<ServerMessage, ApiError> {
        let req = self.anonymous("POST", "/user/login");
        let resp = send_json(req, &ParentLoginBody { account, password })?;
        Ok(ServerMessage::parse(&read_body(resp, &self.url("/user/login"))?))
    }

    /// `POST /user/logout` with the parent header.
    pub fn parent_logout(&self) -> Result<ServerMessage, ApiError> {
        let req = self.authed("POST", "/user/logout")?;
        let url = req.url().to_string();
        let resp = call(req)?;
        Ok(ServerMessage::parse(&read_body(resp, &url)?))
    }

    /// `POST /child/login`. The caller stores `child_id` on success.
    pub fn child_login(&self, child_id: &str) -> Result<ServerMessage, ApiError> {
        let req = self.anonymous("POST", "/child/login");
        let resp = send_json(req, &ChildLoginBody { user_id: child_id })?;
        Ok(ServerMessage::parse(&read_body(resp, &self.url("/child/login"))?))
    }

    // -----------------------------------------------------------------------
    // Children
    // -----------------------------------------------------------------------

    /// `GET /child/parent` lists the children of the logged-in parent.
    pub fn list_children(&self) -> Result<Vec<ChildInfo>, ApiError> {
        self.get_json("/child/parent")
    }

    /// `POST /user/child`.
    pub fn create_child(&self, child: &ChildInfo) -> Result<ServerMessage, ApiError> {
        let req = self.authed("POST", "/user/child")?;
        let url = req.url().to_string();
        let resp = send_json(req, child)?;
        Ok(ServerMessage::parse(&read_body(resp, &url)?))
    }

    /// `PUT /child/{uniqueId}`.
    pub fn update_child(&self, child: &ChildInfo) -> Result<ServerMessage, ApiError> {
        let req = self.authed("PUT", &format!("/child/{}", child.unique_id))?;
        let url = req.url().to_string();
        let resp = send_json(req, child)?;
        Ok(ServerMessage::parse(&read_body(resp, &url)?))
    }

    // -----------------------------------------------------------------------
    // Routines
    // -----------------------------------------------------------------------

    /// `GET /api/routines/user/{owner}` in server order.
    pub fn list_routines(&self, owner: &UserId) -> Result<Vec<RoutineItem>, ApiError> {
        self.get_json(&format!("/api/routines/user/{owner}"))
    }

    /// `POST /api/routines`; returns the stored item, which must carry an id.
    pub fn create_routine(&self, item: &RoutineItem) -> Result<RoutineItem, ApiError> {
        let req = self.authed("POST", "/api/routines")?;
        let url = req.url().to_string();
        let resp = send_json(req, item)?;
        let created: RoutineItem = decode(&read_body(resp, &url)?, &url)?;
        if created.id.is_none() {
            return Err(ApiError::UnexpectedBody {
                url,
                detail: "created routine has no id".to_string(),
            });
        }
        Ok(created)
    }

    /// `PUT /api/routines/{id}`.
    pub fn update_routine(&self, id: RoutineId, item: &RoutineItem) -> Result<(), ApiError> {
        let req = self.authed("PUT", &format!("/api/routines/{id}"))?;
        send_json(req, item)?;
        Ok(())
    }

    /// `DELETE /api/routines/{id}`.
    pub fn delete_routine(&self, id: RoutineId) -> Result<(), ApiError> {
        let req = self.authed("DELETE", &format!("/api/routines/{id}"))?;
        call(req)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Routine logs
    // -----------------------------------------------------------------------

    /// `GET /api/routine-logs/user/{userId}`.
    pub fn list_routine_logs(&self, user: &UserId) -> Result<Vec<RoutineLog>, ApiError> {
        self.get_json(&format!("/api/routine-logs/user/{user}"))
    }

    /// `POST /api/routine-logs` marks a routine done or not done.
    pub fn set_routine_completed(
        &self,
        routine_id: RoutineId,
        user: &UserId,
        is_completed: bool,
    ) -> Result<(), ApiError> {
        let req = self.authed("POST", "/api/routine-logs")?;
        send_json(
            req,
            &RoutineLogBody {
                routine_id,
                user_id: user,
                is_completed,
            },
        )?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Moods
    // -----------------------------------------------------------------------

    /// `POST /api/moods` for the logged-in child.
    pub fn record_mood(&self, emotion: Emotion, reason: &str) -> Result<(), ApiError> {
        let id = self.current_user()?;
        let numeric: i64 = id
            .as_str()
            .trim()
            .parse()
            .map_err(|_| ApiError::InvalidUserId { id: id.to_string() })?;
        let entry = MoodEntry {
            user_id: numeric,
            reason: reason.to_string(),
            mood_type_name: emotion,
        };
        let req = self.authed("POST", "/api/moods")?;
        send_json(req, &entry)?;
        Ok(())
    }

    /// `GET /api/moods/recommend?moodTypeName=X`. An empty body means no
    /// recommendations.
    pub fn recommendations(&self, emotion: Emotion) -> Result<Vec<String>, ApiError> {
        let req = self
            .authed("GET", "/api/moods/recommend")?
            .query("moodTypeName", emotion.wire_name());
        let url = req.url().to_string();
        let body = read_body(call(req)?, &url)?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        decode(&body, &url)
    }

    // -----------------------------------------------------------------------
    // Request plumbing
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn anonymous(&self, method: &str, path: &str) -> ureq::Request {
        let url = self.url(path);
        tracing::debug!(%method, %url, "request");
        self.agent
            .request(method, &url)
            .set("Content-Type", "application/json")
    }

    fn authed(&self, method: &str, path: &str) -> Result<ureq::Request, ApiError> {
        let user = self.current_user()?;
        Ok(self
            .anonymous(method, path)
            .set(USER_ID_HEADER, user.as_str()))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let req = self.authed("GET", path)?;
        let url = req.url().to_string();
        let body = read_body(call(req)?, &url)?;
        decode(&body, &url)
    }
}

fn call(req: ureq::Request) -> Result<ureq::Response, ApiError> {
    let url = req.url().to_string();
    map_result(req.call(), url)
}

fn send_json<B: Serialize>(req: ureq::Request, body: &B) -> Result<ureq::Response, ApiError> {
    let url = req.url().to_string();
    map_result(req.send_json(body), url)
}

fn map_result(
    result: Result<ureq::Response, ureq::Error>,
    url: String,
) -> Result<ureq::Response, ApiError> {
    match result {
        Ok(resp) => Ok(resp),
        Err(ureq::Error::Status(status, resp)) => {
            let status_text = resp.status_text().to_string();
            let body = resp.into_string().unwrap_or_default();
            let message = rejection_message(status, &status_text, &body);
            tracing::warn!(%url, status, %message, "request rejected");
            Err(ApiError::ServerRejected { status, message })
        }
        Err(ureq::Error::Transport(transport)) => {
            tracing::warn!(%url, error = %transport, "transport failure");
            Err(ApiError::Network {
                url,
                message: transport.to_string(),
            })
        }
    }
}

fn read_body(resp: ureq::Response, url: &str) -> Result<String, ApiError> {
    resp.into_string().map_err(|e| ApiError::Network {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(body: &str, url: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Prefer the server's own words, then the raw body, then the status line.
pub(crate) fn rejection_message(status: u16, status_text: &str, body: &str) -> String {
    if let Some(text) = ServerMessage::parse(body).text() {
        return text.to_string();
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') {
        return trimmed.to_string();
    }
    format!("{status} {status_text}").trim().to_string()
}

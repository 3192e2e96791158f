//! Blocking HTTP implementations of the remote services.

use super::payload::{LoginResponse, MessageBody, UserEnvelope};
use super::{
    AttachmentRequest, AuthSession, Credentials, NotePatch, NoteService, Registration,
    RemoteError, RemoteResult, StatusPatch, TagRequest, User, UserId, UserService,
};
use crate::domain::{Note, NoteDraft, NoteId, Tag};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Shared HTTP plumbing: base URL, bearer token and error mapping.
#[derive(Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}{}", self.base_url, path);
        let request = self.agent.request(method, &url);
        match &self.token {
            Some(token) => request.set("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }

    /// Sends a request with an optional JSON body and returns the raw body.
    fn exchange<B: Serialize>(&self, method: &str, path: &str, body: Option<&B>) -> RemoteResult<String> {
        tracing::debug!(method, path, "remote request");
        let request = self.request(method, path);
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                let status = response.status();
                tracing::info!(method, path, status, "remote call succeeded");
                response
                    .into_string()
                    .map_err(|err| RemoteError::Decode(err.to_string()))
            }
            Err(ureq::Error::Status(401, _)) => {
                tracing::info!(method, path, status = 401, "remote call unauthorized");
                Err(RemoteError::Unauthorized)
            }
            Err(ureq::Error::Status(status, response)) => {
                let raw = response.into_string().unwrap_or_default();
                tracing::info!(method, path, status, "remote call failed");
                Err(RemoteError::Status {
                    status,
                    message: MessageBody::describe(&raw),
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                tracing::info!(method, path, error = %transport, "remote call did not complete");
                Err(RemoteError::Network(transport.to_string()))
            }
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> RemoteResult<T> {
        let raw = self.exchange::<()>("GET", path, None)?;
        decode(&raw)
    }

    fn send<B: Serialize, T: DeserializeOwned>(&self, method: &str, path: &str, body: &B) -> RemoteResult<T> {
        let raw = self.exchange(method, path, Some(body))?;
        decode(&raw)
    }

    /// Sends a request whose response body is only a confirmation.
    fn send_unit<B: Serialize>(&self, method: &str, path: &str, body: Option<&B>) -> RemoteResult<()> {
        self.exchange(method, path, body).map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(raw: &str) -> RemoteResult<T> {
    serde_json::from_str(raw).map_err(|err| RemoteError::Decode(err.to_string()))
}

/// Note lists arrive bare or wrapped as `{"notes": [...]}`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum NoteList {
    Bare(Vec<Note>),
    Wrapped { notes: Vec<Note> },
}

impl NoteList {
    fn into_notes(self) -> Vec<Note> {
        match self {
            Self::Bare(notes) | Self::Wrapped { notes } => notes,
        }
    }
}

/// Single notes arrive bare or wrapped as `{"note": {...}}`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum SingleNote {
    Wrapped { note: Note },
    Bare(Note),
}

impl SingleNote {
    fn into_note(self) -> Note {
        match self {
            Self::Wrapped { note } | Self::Bare(note) => note,
        }
    }
}

// ===========================================
// Notes
// ===========================================

/// [`NoteService`] over the `/notes` endpoints.
#[derive(Clone)]
pub struct HttpNoteService {
    client: HttpClient,
}

impl HttpNoteService {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    fn list(&self, path: String) -> RemoteResult<Vec<Note>> {
        self.client.get::<NoteList>(&path).map(NoteList::into_notes)
    }
}

impl NoteService for HttpNoteService {
    fn list_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>> {
        self.list(format!("/notes/user/{user_id}"))
    }

    fn create_note(&self, draft: &NoteDraft) -> RemoteResult<Note> {
        self.client
            .send::<_, SingleNote>("POST", "/notes/create-note", draft)
            .map(SingleNote::into_note)
    }

    fn update_note(&self, id: &NoteId, patch: &NotePatch) -> RemoteResult<Note> {
        self.client
            .send::<_, SingleNote>("PUT", &format!("/notes/update-note/{id}"), patch)
            .map(SingleNote::into_note)
    }

    fn delete_note(&self, id: &NoteId) -> RemoteResult<()> {
        self.client
            .send_unit::<()>("DELETE", &format!("/notes/delete-note/{id}"), None)
    }

    fn update_status(&self, id: &NoteId, patch: &StatusPatch) -> RemoteResult<Note> {
        self.client
            .send::<_, SingleNote>("PUT", &format!("/notes/update-status/{id}"), patch)
            .map(SingleNote::into_note)
    }

    fn create_tag(&self, id: &NoteId, tag: &Tag) -> RemoteResult<()> {
        let body = TagRequest { note_id: id, tag };
        self.client.send_unit("POST", "/notes/create-tag", Some(&body))
    }

    fn delete_tag(&self, id: &NoteId, tag: &Tag) -> RemoteResult<()> {
        let body = TagRequest { note_id: id, tag };
        self.client.send_unit("DELETE", "/notes/delete-tag", Some(&body))
    }

    fn create_attachment(&self, id: &NoteId, attachment: &str) -> RemoteResult<()> {
        let body = AttachmentRequest {
            note_id: id,
            attachment,
        };
        self.client
            .send_unit("POST", "/notes/create-attachment", Some(&body))
    }

    fn delete_attachment(&self, id: &NoteId, attachment: &str) -> RemoteResult<()> {
        let body = AttachmentRequest {
            note_id: id,
            attachment,
        };
        self.client
            .send_unit("DELETE", "/notes/delete-attachment", Some(&body))
    }

    fn favorite_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>> {
        self.list(format!("/notes/user/{user_id}/favorites"))
    }

    fn tagged_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>> {
        self.list(format!("/notes/user/{user_id}/tags"))
    }

    fn untagged_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>> {
        self.list(format!("/notes/user/{user_id}/untagged"))
    }

    fn trashed_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>> {
        self.list(format!("/notes/user/{user_id}/trash"))
    }

    fn all_tags(&self, user_id: &UserId) -> RemoteResult<Vec<Tag>> {
        let raw: Vec<String> = self
            .client
            .get(&format!("/notes/user/{user_id}/all-tags"))?;
        Ok(raw.iter().filter_map(|s| Tag::new(s).ok()).collect())
    }
}

// ===========================================
// Users
// ===========================================

/// [`UserService`] over the `/users` endpoints.
#[derive(Clone)]
pub struct HttpUserService {
    client: HttpClient,
}

impl HttpUserService {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdTokenBody<'a> {
    id_token: &'a str,
}

impl UserService for HttpUserService {
    fn login(&self, credentials: &Credentials) -> RemoteResult<AuthSession> {
        let response: LoginResponse = self.client.send("POST", "/users/login", credentials)?;
        let Some(token) = response.token else {
            return Err(RemoteError::Rejected(
                response.message.unwrap_or_else(|| "login failed".to_string()),
            ));
        };
        let user_id = response
            .id
            .ok_or_else(|| RemoteError::Decode("login response has no user id".to_string()))?;
        Ok(AuthSession::new(token, user_id))
    }

    fn register(&self, registration: &Registration) -> RemoteResult<String> {
        let raw = self
            .client
            .exchange("POST", "/users/register", Some(registration))?;
        Ok(MessageBody::describe(&raw))
    }

    fn forgot_password(&self, email: &str) -> RemoteResult<String> {
        let raw = self
            .client
            .exchange("POST", "/users/forgot-password", Some(&EmailBody { email }))?;
        Ok(MessageBody::describe(&raw))
    }

    fn check_auth(&self, id_token: &str) -> RemoteResult<User> {
        self.client
            .send::<_, UserEnvelope>("POST", "/users/check-auth", &IdTokenBody { id_token })
            .map(UserEnvelope::into_user)
    }

    fn current_user(&self) -> RemoteResult<User> {
        self.client
            .get::<UserEnvelope>("/users/user")
            .map(UserEnvelope::into_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = HttpClient::new("http://localhost:8080/", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn note_list_accepts_both_shapes() {
        let note = r#"{"id": 1, "title": "a", "createdAt": "2024-01-15T10:30:00Z"}"#;
        let bare: NoteList = serde_json::from_str(&format!("[{note}]")).unwrap();
        let wrapped: NoteList =
            serde_json::from_str(&format!(r#"{{"notes": [{note}]}}"#)).unwrap();
        assert_eq!(bare.into_notes(), wrapped.into_notes());
    }

    #[test]
    fn single_note_accepts_both_shapes() {
        let bare: SingleNote = serde_json::from_str(r#"{"id": 2, "title": "b"}"#).unwrap();
        let wrapped: SingleNote =
            serde_json::from_str(r#"{"note": {"id": 2, "title": "b"}}"#).unwrap();
        assert_eq!(bare.into_note().title(), wrapped.into_note().title());
    }

    #[test]
    fn unreachable_host_is_network_error() {
        let client = HttpClient::new("http://127.0.0.1:1", Duration::from_secs(2));
        let service = HttpNoteService::new(client);
        let err = service.list_notes(&UserId::new("1")).unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)), "got {err:?}");
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Comment, Post};

/// Read an integer out of a loosely typed JSON field.
///
/// Accepts numbers (fractions truncate), numeric strings and booleans.
/// Returns `None` for anything else so callers can pick their own default.
pub fn lenient_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn trimmed(field: Option<&str>) -> String {
    field.map(str::trim).unwrap_or_default().to_string()
}

/// A `user_id` of zero, a negative number or garbage means anonymous.
fn author_id(field: Option<&Value>) -> Option<i64> {
    lenient_int(field).filter(|id| *id > 0)
}

// -- Symptoms --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddSymptomRequest {
    pub name: Option<String>,
    pub severity: Option<Value>,
    pub notes: Option<String>,
}

impl AddSymptomRequest {
    pub fn name(&self) -> String {
        trimmed(self.name.as_deref())
    }

    /// Unparseable severities are recorded as 0 rather than rejected.
    pub fn severity(&self) -> i64 {
        lenient_int(self.severity.as_ref()).unwrap_or(0)
    }

    pub fn notes(&self) -> String {
        trimmed(self.notes.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddSymptomResponse {
    pub success: bool,
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    pub limit: Option<Value>,
}

impl AnalyzeRequest {
    pub fn limit(&self) -> Option<i64> {
        lenient_int(self.limit.as_ref())
    }
}

// -- Assistant --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QueryRequest {
    pub text: Option<String>,
}

impl QueryRequest {
    pub fn text(&self) -> String {
        trimmed(self.text.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantReply {
    pub reply: String,
    pub emergency: bool,
}

// -- Auth --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub user_id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user_id: i64,
    pub username: String,
}

/// Trimmed `(username, password)` pair shared by register and login.
pub trait Credentials {
    fn credentials(&self) -> (String, String);
}

impl Credentials for RegisterRequest {
    fn credentials(&self) -> (String, String) {
        (trimmed(self.username.as_deref()), trimmed(self.password.as_deref()))
    }
}

impl Credentials for LoginRequest {
    fn credentials(&self) -> (String, String) {
        (trimmed(self.username.as_deref()), trimmed(self.password.as_deref()))
    }
}

// -- Posts & comments --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub user_id: Option<Value>,
    pub content: Option<String>,
}

impl CreatePostRequest {
    pub fn user_id(&self) -> Option<i64> {
        author_id(self.user_id.as_ref())
    }

    pub fn content(&self) -> String {
        trimmed(self.content.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostResponse {
    pub success: bool,
    pub post: Post,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCommentRequest {
    pub user_id: Option<Value>,
    pub content: Option<String>,
}

impl CreateCommentRequest {
    pub fn user_id(&self) -> Option<i64> {
        author_id(self.user_id.as_ref())
    }

    pub fn content(&self) -> String {
        trimmed(self.content.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentResponse {
    pub success: bool,
    pub comment: Comment,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: Post,
    pub comments: Vec<Comment>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

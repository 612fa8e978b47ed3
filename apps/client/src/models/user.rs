use serde::{Deserialize, Serialize};

/// A user account as returned by `auth/register` and `admin/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Reply body of the bot's POST actions. Older endpoints answer with `msg`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionReply {
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
}

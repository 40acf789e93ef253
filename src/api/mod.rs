//! Account data layer: model types and the backend trait.
//!
//! The screen only ever talks to an [`AccountApi`]; the binary picks
//! [`HttpAccountApi`] or, with `--demo`, [`MemoryAccountApi`].
pub mod http;
pub mod memory;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

pub use http::HttpAccountApi;
pub use memory::{MemoryAccountApi, Operation};

/// Backend identifier of an account. Numeric ids are accepted on the wire.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => AccountId(s),
            Raw::Unsigned(n) => AccountId(n.to_string()),
            Raw::Signed(n) => AccountId(n.to_string()),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    #[serde(other)]
    Other,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    /// Next value when cycling through the choices in the form.
    pub fn toggled(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female | Gender::Other => Gender::Male,
        }
    }
}

/// One user account as returned by the admin API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "userID")]
    pub user_id: AccountId,
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cccd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_blood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
    /// Fields this client does not model; sent back untouched on update.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Account {
    pub fn new(user_id: AccountId, username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            role: role.into(),
            full_name: None,
            email: None,
            phone: None,
            address: None,
            cccd: None,
            type_blood: None,
            gender: None,
            birthdate: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Remote operations the account screen depends on.
///
/// Calls block; the app runs them on worker threads.
pub trait AccountApi: Send + Sync {
    fn fetch_account(&self, id: &AccountId) -> Result<Account, ApiError>;

    /// Replace the stored account with `account` and return what the backend kept.
    fn update_account(&self, id: &AccountId, account: &Account) -> Result<Account, ApiError>;

    fn delete_account(&self, id: &AccountId) -> Result<(), ApiError>;
}

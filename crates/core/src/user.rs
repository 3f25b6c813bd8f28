//! App users.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{Draft, Record, compare_names};
use crate::types::{FullName, Money, Phone, SortKey, UserId};
use crate::validation::{ValidationError, edited_contact};

/// A user as returned by `GET /api/user`.
///
/// `money` and `total_bets` are maintained by the service; only the
/// contact fields are editable from the admin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub money: Money,
    #[serde(default)]
    pub total_bets: u64,
    pub created_at: DateTime<Utc>,
}

/// Field values for `PUT /api/user/{id}` and its response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bets: Option<u64>,
}

/// Update command for one editable user field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserField {
    FullName(String),
    Phone(String),
}

/// Edit draft for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    full_name: String,
    phone: String,
    stored_full_name: String,
    stored_phone: String,
}

impl UserDraft {
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

impl Draft for UserDraft {
    type Field = UserField;
    type Patch = UserPatch;

    fn set(&mut self, field: UserField) {
        match field {
            UserField::FullName(value) => self.full_name = value,
            UserField::Phone(value) => self.phone = value,
        }
    }

    fn to_patch(&self) -> Result<UserPatch, ValidationError> {
        let mut errors = Vec::new();

        let full_name = edited_contact(
            "name",
            &self.full_name,
            &self.stored_full_name,
            |s| FullName::parse(s).map(FullName::into_inner),
            &mut errors,
        );
        let phone = edited_contact(
            "phone",
            &self.phone,
            &self.stored_phone,
            |s| Phone::parse(s).map(Phone::into_inner),
            &mut errors,
        );

        ValidationError::new(errors).into_result(UserPatch {
            full_name,
            phone,
            ..UserPatch::default()
        })
    }
}

impl Record for User {
    type Id = UserId;
    type Patch = UserPatch;
    type Draft = UserDraft;

    const NOUN: &'static str = "user";
    const COLLECTION: &'static str = "user";
    const LIST_FIELD: &'static str = "users";
    const ITEM_FIELD: &'static str = "user";
    const SORT_KEYS: &'static [SortKey] = &[
        SortKey::Name,
        SortKey::Money,
        SortKey::TotalBets,
        SortKey::CreatedAt,
    ];

    fn id(&self) -> &UserId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.full_name.as_str(), self.id.as_str(), self.phone.as_str()]
    }

    fn compare_by(&self, other: &Self, key: SortKey) -> Ordering {
        match key {
            SortKey::Name => compare_names(&self.full_name, &other.full_name),
            SortKey::Money => self.money.cmp(&other.money),
            SortKey::TotalBets => self.total_bets.cmp(&other.total_bets),
            SortKey::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }

    fn apply_patch(&mut self, patch: &UserPatch) {
        if let Some(full_name) = &patch.full_name {
            self.full_name.clone_from(full_name);
        }
        if let Some(phone) = &patch.phone {
            self.phone.clone_from(phone);
        }
        if let Some(money) = patch.money {
            self.money = money;
        }
        if let Some(total_bets) = patch.total_bets {
            self.total_bets = total_bets;
        }
    }

    fn draft(&self) -> UserDraft {
        UserDraft {
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            stored_full_name: self.full_name.clone(),
            stored_phone: self.phone.clone(),
        }
    }
}

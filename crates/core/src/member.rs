//! Club members.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::record::{Draft, Record, compare_names};
use crate::types::{FullName, MemberId, Money, MoneyInput, Phone, SortKey};
use crate::validation::{FieldError, ValidationError, edited_contact};

/// A member as returned by `GET /api/members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: MemberId,
    /// Human-facing member number, distinct from the storage id.
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub money: Money,
    #[serde(default)]
    pub role: String,
}

/// Field values for `PUT /api/members/{id}` and its response.
///
/// `role` is assigned by the service and only ever read from responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Update command for one editable member field, carrying raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberField {
    FullName(String),
    Phone(String),
    Money(String),
}

/// Edit draft for a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDraft {
    full_name: String,
    phone: String,
    money: MoneyInput,
    /// Contact values the draft was opened with.
    stored_full_name: String,
    stored_phone: String,
}

impl MemberDraft {
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    #[must_use]
    pub const fn money(&self) -> &MoneyInput {
        &self.money
    }
}

impl Draft for MemberDraft {
    type Field = MemberField;
    type Patch = MemberPatch;

    fn set(&mut self, field: MemberField) {
        match field {
            MemberField::FullName(value) => self.full_name = value,
            MemberField::Phone(value) => self.phone = value,
            MemberField::Money(raw) => self.money = MoneyInput::parse(raw),
        }
    }

    fn to_patch(&self) -> Result<MemberPatch, ValidationError> {
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
        let money = self
            .money
            .value()
            .map_err(|source| {
                errors.push(FieldError::Money {
                    field: "money",
                    source: source.clone(),
                });
            })
            .ok();

        ValidationError::new(errors).into_result(MemberPatch {
            full_name,
            phone,
            money,
            role: None,
        })
    }
}

impl Record for Member {
    type Id = MemberId;
    type Patch = MemberPatch;
    type Draft = MemberDraft;

    const NOUN: &'static str = "member";
    const COLLECTION: &'static str = "members";
    const LIST_FIELD: &'static str = "members";
    const ITEM_FIELD: &'static str = "member";
    const SORT_KEYS: &'static [SortKey] = &[SortKey::Name, SortKey::Money];

    fn id(&self) -> &MemberId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.full_name.as_str(),
            self.member_id.as_str(),
            self.id.as_str(),
            self.phone.as_str(),
        ]
    }

    fn compare_by(&self, other: &Self, key: SortKey) -> Ordering {
        match key {
            SortKey::Name => compare_names(&self.full_name, &other.full_name),
            SortKey::Money => self.money.cmp(&other.money),
            SortKey::TotalBets | SortKey::CreatedAt => Ordering::Equal,
        }
    }

    fn apply_patch(&mut self, patch: &MemberPatch) {
        if let Some(full_name) = &patch.full_name {
            self.full_name.clone_from(full_name);
        }
        if let Some(phone) = &patch.phone {
            self.phone.clone_from(phone);
        }
        if let Some(money) = patch.money {
            self.money = money;
        }
        if let Some(role) = &patch.role {
            self.role.clone_from(role);
        }
    }

    fn draft(&self) -> MemberDraft {
        MemberDraft {
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            money: MoneyInput::from_value(self.money),
            stored_full_name: self.full_name.clone(),
            stored_phone: self.phone.clone(),
        }
    }
}

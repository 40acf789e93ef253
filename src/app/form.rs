//! Update form shown in the edit modal.
//!
//! A form edits either the account fields or the personal fields of the
//! loaded [`Account`]; submitting overlays the edited values on a copy of the
//! current account, so fields the form does not show are sent back unchanged.

use chrono::NaiveDate;

use crate::api::{Account, Gender};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    Account,
    Personal,
}

impl FormKind {
    pub fn title(self) -> &'static str {
        match self {
            FormKind::Account => "Update account",
            FormKind::Personal => "Update personal info",
        }
    }

    pub fn fields(self) -> &'static [FieldKey] {
        match self {
            FormKind::Account => &[FieldKey::Username, FieldKey::Role],
            FormKind::Personal => &[
                FieldKey::FullName,
                FieldKey::Email,
                FieldKey::Phone,
                FieldKey::Address,
                FieldKey::Cccd,
                FieldKey::TypeBlood,
                FieldKey::Gender,
                FieldKey::Birthdate,
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKey {
    Username,
    Role,
    FullName,
    Email,
    Phone,
    Address,
    Cccd,
    TypeBlood,
    Gender,
    Birthdate,
}

impl FieldKey {
    pub fn label(self) -> &'static str {
        match self {
            FieldKey::Username => "Username",
            FieldKey::Role => "Role",
            FieldKey::FullName => "Full name",
            FieldKey::Email => "Email",
            FieldKey::Phone => "Phone",
            FieldKey::Address => "Address",
            FieldKey::Cccd => "CCCD",
            FieldKey::TypeBlood => "Blood type",
            FieldKey::Gender => "Gender",
            FieldKey::Birthdate => "Birthdate",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Choice(Option<Gender>),
}

impl FieldValue {
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choice(Some(g)) => format!("< {} >", g.label()),
            FieldValue::Choice(None) => "< - >".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormField {
    pub key: FieldKey,
    pub value: FieldValue,
}

#[derive(Clone, Debug)]
pub struct UpdateForm {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub selected: usize,
    pub errors: Vec<String>,
    /// Set while the update request is in flight.
    pub submitting: bool,
}

fn text(v: &Option<String>) -> FieldValue {
    FieldValue::Text(v.clone().unwrap_or_default())
}

impl UpdateForm {
    /// Form for `kind`, pre-filled from `account`.
    pub fn new(kind: FormKind, account: &Account) -> Self {
        let fields = kind
            .fields()
            .iter()
            .map(|&key| {
                let value = match key {
                    FieldKey::Username => FieldValue::Text(account.username.clone()),
                    FieldKey::Role => FieldValue::Text(account.role.clone()),
                    FieldKey::FullName => text(&account.full_name),
                    FieldKey::Email => text(&account.email),
                    FieldKey::Phone => text(&account.phone),
                    FieldKey::Address => text(&account.address),
                    FieldKey::Cccd => text(&account.cccd),
                    FieldKey::TypeBlood => text(&account.type_blood),
                    FieldKey::Gender => FieldValue::Choice(account.gender),
                    FieldKey::Birthdate => FieldValue::Text(
                        account
                            .birthdate
                            .map(|d| d.format(DATE_FORMAT).to_string())
                            .unwrap_or_default(),
                    ),
                };
                FormField { key, value }
            })
            .collect();
        Self {
            kind,
            fields,
            selected: 0,
            errors: Vec::new(),
            submitting: false,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn value(&self, key: FieldKey) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    pub fn select_next(&mut self) {
        if !self.fields.is_empty() {
            self.selected = (self.selected + 1) % self.fields.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.fields.is_empty() {
            self.selected = (self.selected + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Type into the focused field. Space cycles a choice field.
    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.fields.get_mut(self.selected) else {
            return;
        };
        match &mut field.value {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Choice(g) if c == ' ' => *g = Some((*g).map_or(Gender::Male, Gender::toggled)),
            FieldValue::Choice(_) => {}
        }
    }

    pub fn backspace(&mut self) {
        if let Some(FieldValue::Text(s)) = self.fields.get_mut(self.selected).map(|f| &mut f.value) {
            s.pop();
        }
    }

    pub fn toggle(&mut self) {
        if let Some(FieldValue::Choice(g)) = self.fields.get_mut(self.selected).map(|f| &mut f.value) {
            *g = Some((*g).map_or(Gender::Male, Gender::toggled));
        }
    }

    /// Build the update payload from `current`, or the list of validation errors.
    pub fn apply_to(&self, current: &Account) -> Result<Account, Vec<String>> {
        let mut out = current.clone();
        let mut errors = Vec::new();

        for field in &self.fields {
            let raw = match &field.value {
                FieldValue::Text(s) => s.trim(),
                FieldValue::Choice(g) => {
                    out.gender = *g;
                    continue;
                }
            };
            let optional = (!raw.is_empty()).then(|| raw.to_string());
            match field.key {
                FieldKey::Username | FieldKey::Role if raw.is_empty() => {
                    errors.push(format!("{} must not be empty", field.key.label()));
                }
                FieldKey::Username => out.username = raw.to_string(),
                FieldKey::Role => out.role = raw.to_string(),
                FieldKey::FullName => out.full_name = optional,
                FieldKey::Email => {
                    if optional.as_deref().is_some_and(|e| !e.contains('@')) {
                        errors.push("Email must contain '@'".to_string());
                    }
                    out.email = optional;
                }
                FieldKey::Phone => out.phone = optional,
                FieldKey::Address => out.address = optional,
                FieldKey::Cccd => out.cccd = optional,
                FieldKey::TypeBlood => out.type_blood = optional,
                FieldKey::Birthdate => match optional {
                    None => out.birthdate = None,
                    Some(s) => match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
                        Ok(d) => out.birthdate = Some(d),
                        Err(_) => errors.push("Birthdate must be YYYY-MM-DD".to_string()),
                    },
                },
                FieldKey::Gender => {}
            }
        }

        if errors.is_empty() { Ok(out) } else { Err(errors) }
    }
}

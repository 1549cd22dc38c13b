// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Currencies the backend deals in, with one canonical code each.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Currency {
    Usd,
    Fc,
    Other(String),
}

impl Currency {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        match s.to_uppercase().as_str() {
            "$" | "USD" | "US$" => Currency::Usd,
            "FC" | "CDF" => Currency::Fc,
            other => Currency::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Currency::Usd => "USD",
            Currency::Fc => "FC",
            Currency::Other(c) if c.is_empty() => "?",
            Currency::Other(c) => c,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Other(String::new())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Direction of a transaction. Only `Entrees` and `Sorties` carry money.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    Entrees,
    Sorties,
    Other(String),
}

impl Channel {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "entrées" | "entrees" | "entree" | "entrée" => Channel::Entrees,
            "sorties" | "sortie" => Channel::Sorties,
            _ => Channel::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Channel::Entrees => "Entrées",
            Channel::Sorties => "Sorties",
            Channel::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Channel::Other(_))
    }
}

impl Default for Channel {
    fn default() -> Self {
        Channel::Other(String::new())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Pending,
    Approved,
    Declined,
    Unknown(String),
}

impl Status {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "" | "pending" => Status::Pending,
            "approved" => Status::Approved,
            "declined" | "rejected" => Status::Declined,
            _ => Status::Unknown(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Status::Pending => "Pending",
            Status::Approved => "Approved",
            Status::Declined => "Declined",
            Status::Unknown(s) => s,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed set of roles. Every role string from the backend goes through
/// [`Role::parse`], so nothing downstream compares raw strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    User,
    Admin,
    Financier,
    Pasteur,
    VicePresident,
}

impl Role {
    /// Case-insensitive; unrecognised roles fall back to `User`.
    pub fn parse(raw: &str) -> Self {
        let norm: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();
        match norm.as_str() {
            "admin" | "administrator" => Role::Admin,
            "financier" => Role::Financier,
            "pasteur" => Role::Pasteur,
            "vice-president" | "vicepresident" => Role::VicePresident,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Financier => "financier",
            Role::Pasteur => "pasteur",
            Role::VicePresident => "vice-president",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_financier_group(&self) -> bool {
        matches!(self, Role::Financier | Role::Pasteur | Role::VicePresident)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! text_serde {
    ($ty:ty, $to_str:ident) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.$to_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let raw = Option::<String>::deserialize(d)?;
                Ok(<$ty>::parse(raw.as_deref().unwrap_or_default()))
            }
        }
    };
}

text_serde!(Currency, code);
text_serde!(Channel, label);
text_serde!(Status, label);
text_serde!(Role, as_str);

/// Non-numeric, null or missing amounts count as zero.
pub fn lenient_decimal(v: &serde_json::Value) -> Decimal {
    match v {
        serde_json::Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok()))
            .unwrap_or_else(|| {
                tracing::warn!(amount = %n, "amount out of range; counted as zero");
                Decimal::ZERO
            }),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(s))
                .unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
}

fn de_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    let v = serde_json::Value::deserialize(d)?;
    Ok(lenient_decimal(&v))
}

fn id_text(v: serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(id_text(serde_json::Value::deserialize(d)?).unwrap_or_default())
}

fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(id_text(serde_json::Value::deserialize(d)?))
}

fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Accepts `YYYY-MM-DD` as well as ISO date-times; anything else is absent.
pub fn lenient_date(s: &str) -> Option<NaiveDate> {
    let head = s.trim().split(['T', ' ']).next().unwrap_or_default();
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn de_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(Option::<String>::deserialize(d)?
        .as_deref()
        .and_then(lenient_date))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub surname: String,
}

impl UserSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, alias = "Id", deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, alias = "Date", deserialize_with = "de_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, alias = "Amount", deserialize_with = "de_amount")]
    pub amount: Decimal,
    #[serde(default, alias = "Currency")]
    pub currency: Currency,
    #[serde(default, alias = "Channel")]
    pub channel: Channel,
    #[serde(default, alias = "Motif", deserialize_with = "de_text")]
    pub motif: String,
    #[serde(default, alias = "Status")]
    pub status: Status,
    #[serde(
        default,
        alias = "userId",
        alias = "UserId",
        deserialize_with = "de_opt_id"
    )]
    pub user_id: Option<String>,
    #[serde(default, alias = "File", alias = "fileUrl")]
    pub file: Option<String>,
    #[serde(
        default,
        alias = "userDetails",
        alias = "users",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<UserSummary>,
}

impl Transaction {
    pub fn date_label(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Display name of the owner: embedded user details if the backend sent
    /// them, otherwise the raw user id.
    pub fn owner_label(&self) -> String {
        if let Some(u) = &self.user {
            let full = u.full_name();
            if !full.is_empty() {
                return full;
            }
        }
        self.user_id
            .clone()
            .unwrap_or_else(|| "Unknown User".to_string())
    }
}

/// Newest first; undated transactions sink to the bottom.
pub fn sort_newest_first(txs: &mut [Transaction]) {
    txs.sort_by(|a, b| b.date.cmp(&a.date));
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, alias = "Id", deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub surname: String,
    #[serde(default, deserialize_with = "de_text")]
    pub email: String,
    #[serde(default, deserialize_with = "de_text")]
    pub address: String,
    #[serde(default, deserialize_with = "de_date")]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginUser {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    /// Kept raw; normalised when the session is decoded.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<LoginUser>,
    #[serde(default)]
    pub token: Option<String>,
}

/// JSON body for `PATCH /transactions/item/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionUpdate {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: Currency,
    pub channel: Channel,
    pub motif: String,
}

impl TransactionUpdate {
    /// Start from the current record so callers only override what changed.
    pub fn from_existing(tx: &Transaction) -> Option<Self> {
        Some(TransactionUpdate {
            date: tx.date?,
            amount: tx.amount,
            currency: tx.currency.clone(),
            channel: tx.channel.clone(),
            motif: tx.motif.clone(),
        })
    }

    pub fn apply_to(&self, tx: &mut Transaction) {
        tx.date = Some(self.date);
        tx.amount = self.amount;
        tx.currency = self.currency.clone();
        tx.channel = self.channel.clone();
        tx.motif = self.motif.clone();
    }
}

/// JSON body for `PATCH /users/{id}`; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.role.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub dob: Option<NaiveDate>,
    pub address: Option<String>,
    pub photo: Option<PathBuf>,
}

/// A transaction that passed form validation and may be posted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: Currency,
    pub channel: Channel,
    pub motif: String,
    pub file: Option<PathBuf>,
}

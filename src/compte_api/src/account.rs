use core::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

/// Type of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
pub enum AccountType {
    #[default]
    #[serde(rename = "COURANT")]
    Current,
    #[serde(rename = "EPARGNE")]
    Savings,
}

impl AccountType {
    /// Name used by the account service on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            AccountType::Current => "COURANT",
            AccountType::Savings => "EPARGNE",
        }
    }

    /// Lenient decoding: anything the service sends that we don't know is a current account.
    pub fn from_wire(raw: Option<&str>) -> AccountType {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.wire_name())
    }
}

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COURANT" => Ok(AccountType::Current),
            "EPARGNE" => Ok(AccountType::Savings),
            other => Err(UnknownAccountType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown account type: {0}")]
pub struct UnknownAccountType(pub String);

/// A bank account held by the account service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// Server assigned identifier, absent until the account exists server side
    id: Option<i64>,
    balance: f64,
    /// Creation date, without time of day
    creation_date: NaiveDate,
    #[serde(rename = "type")]
    kind: AccountType,
}

impl Account {
    pub fn new(id: Option<i64>, balance: f64, creation_date: NaiveDate, kind: AccountType) -> Self {
        Account {
            id,
            balance,
            creation_date,
            kind,
        }
    }

    /// An account that has not been created yet. The server assigns the id.
    pub fn draft(balance: f64, kind: AccountType) -> Self {
        Account::new(None, balance, chrono::Local::now().date_naive(), kind)
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn creation_date(&self) -> NaiveDate {
        self.creation_date
    }

    pub fn kind(&self) -> AccountType {
        self.kind
    }
}

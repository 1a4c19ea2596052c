use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use fps_common::Rupees;
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------        OrderId        -------------------------------------------------------
/// The order id assigned by the payment gateway when an order is opened, e.g. `order_IluGWxBm9U8zJ8`.
///
/// There is exactly one contribution record per order id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------       PaymentId        ------------------------------------------------------
/// The payment id assigned by the gateway once a payment is attempted, e.g. `pay_29QQoUBi66xm2f`.
///
/// Until the gateway reports one, records carry the `pending` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct PaymentId(pub String);

pub const PENDING_PAYMENT_ID: &str = "pending";

impl PaymentId {
    pub fn pending() -> Self {
        Self(PENDING_PAYMENT_ID.to_string())
    }

    pub fn is_pending(&self) -> bool {
        self.0 == PENDING_PAYMENT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PaymentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for PaymentId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------  ContributionStatus   -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionStatus {
    /// The order has been opened on the gateway; no payment outcome is known yet.
    Created,
    /// The payment was confirmed by a valid gateway signature. Terminal.
    Success,
    /// The gateway reported a failure, or verification never succeeded. Terminal.
    Failed,
}

impl ContributionStatus {
    /// Terminal statuses admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ContributionStatus::Success | ContributionStatus::Failed)
    }
}

impl Display for ContributionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContributionStatus::Created => write!(f, "Created"),
            ContributionStatus::Success => write!(f, "Success"),
            ContributionStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid contribution status: {0}")]
pub struct StatusConversionError(String);

impl FromStr for ContributionStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Success" => Ok(Self::Success),
            "Failed" => Ok(Self::Failed),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

impl From<String> for ContributionStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid contribution status: {value}. But this conversion cannot fail. Defaulting to Created");
            ContributionStatus::Created
        })
    }
}

//--------------------------------------         Ward           ------------------------------------------------------
/// The organizational unit a contribution is credited to, used for the leaderboard-style ward breakdown.
///
/// Eleven wards take part in the drive. Anything else lands in the [`Ward::Other`] fallback, which keeps
/// the label that was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ward {
    Attassery,
    Ambalampadam,
    Thottara,
    Karipamanna,
    Pezhumatta,
    Kulukkiliyad,
    Karimpuzha,
    Pombra,
    Koottilakkadav,
    Kollamkode,
    Vakkadapuram,
    Other(String),
}

impl Ward {
    pub fn as_label(&self) -> &str {
        match self {
            Ward::Attassery => "ATTASSERY",
            Ward::Ambalampadam => "AMBALAMPADAM",
            Ward::Thottara => "THOTTARA",
            Ward::Karipamanna => "KARIPAMANNA",
            Ward::Pezhumatta => "PEZHUMATTA",
            Ward::Kulukkiliyad => "KULUKKILIYAD",
            Ward::Karimpuzha => "KARIMPUZHA",
            Ward::Pombra => "POMBRA",
            Ward::Koottilakkadav => "KOOTTILAKKADAV",
            Ward::Kollamkode => "KOLLAMKODE",
            Ward::Vakkadapuram => "VAKKADAPURAM",
            Ward::Other(label) => label.as_str(),
        }
    }
}

impl Display for Ward {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Ward label must not be empty")]
pub struct WardParseError;

impl FromStr for Ward {
    type Err = WardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if label.is_empty() {
            return Err(WardParseError);
        }
        let ward = match label.to_ascii_uppercase().as_str() {
            "ATTASSERY" => Ward::Attassery,
            "AMBALAMPADAM" => Ward::Ambalampadam,
            "THOTTARA" => Ward::Thottara,
            "KARIPAMANNA" => Ward::Karipamanna,
            "PEZHUMATTA" => Ward::Pezhumatta,
            "KULUKKILIYAD" => Ward::Kulukkiliyad,
            "KARIMPUZHA" => Ward::Karimpuzha,
            "POMBRA" => Ward::Pombra,
            "KOOTTILAKKADAV" => Ward::Koottilakkadav,
            "KOLLAMKODE" => Ward::Kollamkode,
            "VAKKADAPURAM" => Ward::Vakkadapuram,
            _ => Ward::Other(label.to_string()),
        };
        Ok(ward)
    }
}

impl TryFrom<String> for Ward {
    type Error = WardParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Ward {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_label())
    }
}

impl<'de> Deserialize<'de> for Ward {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

//--------------------------------------     Contribution      -------------------------------------------------------
/// One contribution attempt. The central record of the system.
///
/// Records are append-only: a contribution is created in `Created` status and is mutated at most twice
/// (the payment id once known, and exactly one terminal status transition). Nothing is ever deleted.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Contribution {
    pub id: i64,
    pub order_id: OrderId,
    pub payment_id: PaymentId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub ward: Ward,
    pub mobile: String,
    pub amount: Rupees,
    pub quantity: i64,
    pub status: ContributionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    NewContribution    -------------------------------------------------------
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Contributor name must not be empty")]
    EmptyName,
    #[error("Mobile number must be exactly 10 digits, got '{0}'")]
    InvalidMobile(String),
    #[error("Quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),
}

/// A validated contribution that has not been stored yet.
///
/// The amount is fixed here, at creation time, as `unit_price × quantity`. It is never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContribution {
    pub name: String,
    pub ward: Ward,
    pub mobile: String,
    pub amount: Rupees,
    pub quantity: i64,
}

impl NewContribution {
    /// Validates the raw submission and computes the amount.
    ///
    /// Quantity defaults to 1 when absent. All checks run before any gateway call or persistence.
    pub fn try_new(
        name: &str,
        mobile: &str,
        ward: Ward,
        quantity: Option<i64>,
        unit_price: Rupees,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let mobile = mobile.trim();
        if mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidMobile(mobile.to_string()));
        }
        let quantity = quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(ValidationError::InvalidQuantity(quantity));
        }
        Ok(Self {
            name: name.to_string(),
            ward,
            mobile: mobile.to_string(),
            amount: unit_price * quantity,
            quantity,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const UNIT_PRICE: i64 = 350;

    #[test]
    fn amount_is_unit_price_times_quantity() {
        let c = NewContribution::try_new("Asha", "9999999999", Ward::Karimpuzha, Some(2), Rupees::from(UNIT_PRICE))
            .unwrap();
        assert_eq!(c.amount, Rupees::from(700));
        assert_eq!(c.quantity, 2);
    }

    #[test]
    fn quantity_defaults_to_one() {
        let c =
            NewContribution::try_new("Asha", "9999999999", Ward::Pombra, None, Rupees::from(UNIT_PRICE)).unwrap();
        assert_eq!(c.quantity, 1);
        assert_eq!(c.amount, Rupees::from(UNIT_PRICE));
    }

    #[test]
    fn rejects_bad_input() {
        let err = NewContribution::try_new("  ", "9999999999", Ward::Pombra, None, Rupees::from(UNIT_PRICE));
        assert_eq!(err, Err(ValidationError::EmptyName));
        let err = NewContribution::try_new("Asha", "99x9999999", Ward::Pombra, None, Rupees::from(UNIT_PRICE));
        assert!(matches!(err, Err(ValidationError::InvalidMobile(_))));
        let err = NewContribution::try_new("Asha", "12345", Ward::Pombra, None, Rupees::from(UNIT_PRICE));
        assert!(matches!(err, Err(ValidationError::InvalidMobile(_))));
        let err = NewContribution::try_new("Asha", "9999999999", Ward::Pombra, Some(0), Rupees::from(UNIT_PRICE));
        assert_eq!(err, Err(ValidationError::InvalidQuantity(0)));
    }

    #[test]
    fn ward_labels_round_trip() {
        for label in [
            "ATTASSERY",
            "AMBALAMPADAM",
            "THOTTARA",
            "KARIPAMANNA",
            "PEZHUMATTA",
            "KULUKKILIYAD",
            "KARIMPUZHA",
            "POMBRA",
            "KOOTTILAKKADAV",
            "KOLLAMKODE",
            "VAKKADAPURAM",
        ] {
            let ward: Ward = label.parse().unwrap();
            assert!(!matches!(ward, Ward::Other(_)));
            assert_eq!(ward.to_string(), label);
        }
        let ward: Ward = "St. Mary's College".parse().unwrap();
        assert_eq!(ward, Ward::Other("St. Mary's College".to_string()));
        assert!("   ".parse::<Ward>().is_err());
    }

    #[test]
    fn status_terminality() {
        assert!(!ContributionStatus::Created.is_terminal());
        assert!(ContributionStatus::Success.is_terminal());
        assert!(ContributionStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ContributionStatus::Success).unwrap(), r#""success""#);
        assert_eq!(serde_json::to_string(&ContributionStatus::Created).unwrap(), r#""created""#);
    }
}

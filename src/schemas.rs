use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub type PayerId = Uuid;

/// A named participant. The id is the join key everywhere; the name is a
/// display attribute and can change without touching any item.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Payer {
    pub id: PayerId,
    pub name: String,
    /// Bank account reference, used only when matching slips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,
    /// Mobile-payment handle, same story.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promptpay: Option<String>,
}

/// One shared expense. `split_with` keys track the current payer set;
/// payers added later default to unselected.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Item {
    pub name: String,
    pub price: f64,
    pub paid_by: Option<PayerId>,
    pub split_with: HashMap<PayerId, bool>,
}

/// The whole shared bill, persisted as a single document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct BillState {
    pub payers: Vec<Payer>,
    pub items: Vec<Item>,
}

/// A settling payment between two payers, derived fresh from a balance
/// snapshot and never persisted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transfer {
    pub from: PayerId,
    pub to: PayerId,
    pub amount: f64,
}

/// A transfer with the payer names resolved, as shown to users and
/// matched against payment slips.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransferInstruction {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// A structured extraction result handed over by the external slip
/// service. Stored as history, never mutated here.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SlipRecord {
    pub filename: String,
    pub valid: bool,
    pub verified: bool,
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promptpay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

use uuid::Uuid;

use crate::schemas::{Item, Payer, PayerId};

pub fn payer(name: &str) -> Payer {
    Payer {
        id: Uuid::new_v4(),
        name: name.to_string(),
        bank_account: None,
        promptpay: None,
    }
}

pub fn item(name: &str, price: f64, paid_by: Option<PayerId>, split: &[(PayerId, bool)]) -> Item {
    Item {
        name: name.to_string(),
        price,
        paid_by,
        split_with: split.iter().copied().collect(),
    }
}

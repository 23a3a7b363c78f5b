use rust_decimal::Decimal;
use serde::Deserialize;

use super::transfer::TransferId;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandAction {
    Fund,
    Create,
    Approve,
}

/// One row of the batch command stream. Blank cells deserialize to `None`;
/// which fields are required depends on the action and is checked at
/// dispatch time.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub action: CommandAction,
    pub signer: Option<String>,
    pub amount: Option<Decimal>,
    pub to: Option<String>,
    pub id: Option<TransferId>,
}

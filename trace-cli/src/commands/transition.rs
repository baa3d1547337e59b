//! Transition Command
//!
//! Move an entity through its status workflow.

use clap::Args;
use rust_decimal::Decimal;

/// Transition arguments
#[derive(Args, Debug)]
pub struct TransitionArgs {
    /// Entity kind (farm, harvest, batch, lot, consignment)
    pub kind: String,

    /// Entity id
    pub id: String,

    /// Target status
    pub status: String,

    /// Counted bags, for a batch receipt
    #[arg(long)]
    pub bags: Option<u32>,

    /// Confirmed weight in kg, for a batch receipt
    #[arg(long)]
    pub weight: Option<Decimal>,
}

pub mod bracket;
pub mod ledger;
pub mod tournament;

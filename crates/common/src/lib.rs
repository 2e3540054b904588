pub mod account;
pub mod amount;
pub mod consts;
pub mod forex;
pub mod multisig;
pub mod transaction;

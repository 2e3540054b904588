/// Fractional digits of the USDC/EURC token contracts.
pub const TOKEN_DECIMALS: usize = 7;

/// Base fee in stroops attached to every contract call before resource fees.
pub const TRANSACTION_FEE: u32 = 60_000;
/// Seconds a built transaction stays valid.
pub const TRANSACTION_TIMEOUT_SECS: u64 = 120;
/// Seconds between submitting a forex swap and its on-chain deadline.
pub const FOREX_DEADLINE_SECS: u64 = 300;

pub const MULTISIG_PSEUDO_LABEL: &str = "MULTISIG";
pub const DEFAULT_MULTISIG_LABEL: &str = "Treasury Multisig";
pub const DEFAULT_MULTISIG_THRESHOLD: u32 = 3;

pub const FN_BALANCE: &str = "balance";
pub const FN_EXECUTE_TRANSFER: &str = "execute_transfer";
pub const FN_ADMIN_WITHDRAW: &str = "admin_withdraw";
pub const FN_EXECUTE_FOREX_TRANSFER: &str = "execute_forex_transfer";
pub const FN_INITIATE_MULTISIG_WITHDRAW: &str = "initiate_multisig_withdraw";
pub const FN_APPROVE_MULTISIG_WITHDRAW: &str = "approve_multisig_withdraw";
pub const FN_LIST_REQUESTS: &str = "list_requests";
pub const FN_GET_SUMMARY: &str = "get_summary";

/// Field order of a withdrawal snapshot when the contract returns it as a tuple.
pub const SNAPSHOT_FIELDS: [&str; 8] = [
    "id",
    "to",
    "amount",
    "approvals",
    "executed",
    "initiator",
    "created_at",
    "completed_at",
];

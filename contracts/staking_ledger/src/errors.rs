/// Error codes surfaced by every fallible ledger entry point.
///
/// Any of these aborts the whole invocation; the host discards every storage
/// write made before the failure. A reward-payment shortfall during a harvest
/// is not an error.
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    InvalidAddress = 5,
    InsufficientBalance = 6,
    DuplicateRegistration = 7,
    PoolNotFound = 8,
    DivisionByZero = 9,
    ArithmeticOverflow = 10,
    ArithmeticUnderflow = 11,
    Reentrant = 12,
}

impl ContractError {
    /// Returns a human-readable message for this error.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Ledger has not been initialized",
            ContractError::AlreadyInitialized => "Ledger is already initialized",
            ContractError::Unauthorized => "Caller is not the ledger owner",
            ContractError::InvalidInput => "Invalid input parameters provided",
            ContractError::InvalidAddress => "Address cannot be used as an account",
            ContractError::InsufficientBalance => "Amount exceeds the recorded stake",
            ContractError::DuplicateRegistration => "Stake asset already has a pool",
            ContractError::PoolNotFound => "Pool index is out of range",
            ContractError::DivisionByZero => "Total pool weight is zero",
            ContractError::ArithmeticOverflow => "Arithmetic overflow",
            ContractError::ArithmeticUnderflow => "Arithmetic underflow",
            ContractError::Reentrant => "Re-entrant call into the ledger",
        }
    }
}

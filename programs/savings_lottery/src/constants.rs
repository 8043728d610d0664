// Centralized Protocol Constants

// Round Capacity
// ==============

/// Maximum number of distinct participants in a single round.
/// Bounds the `Round` account size: entries and payout records both reserve this many slots.
pub const MAX_ENTRIES: usize = 64;

// Time Logic Constants
// ====================

/// Default time (seconds) a randomness request may stay unanswered before
/// anyone can call `expire_request` and reopen the round.
/// 3600 s = 1 hour. Oracle fulfillment normally lands within a few slots.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 3_600;

// Payout Split
// ============

/// The deposit pool is cut into this many parts.
pub const DEPOSIT_POOL_PARTS: u64 = 4;

/// Parts of the deposit pool paid to the winner (3 of 4).
pub const WINNER_DEPOSIT_PARTS: u64 = 3;

/// The interest pool is halved: one half to the winner, one half shared by every participant.
pub const INTEREST_POOL_PARTS: u64 = 2;

/// Policy used by `initialize_config` unless told otherwise.
pub const DEFAULT_PAYOUT_POLICY: u8 = crate::state::PayoutPolicy::DepositAndInterest as u8;

// Versioning
// ==========

/// Initial version for account structures.
pub const INITIAL_VERSION: u16 = 1;

/// First round id handed out by a new registry.
pub const INITIAL_ROUND_ID: u64 = 1;

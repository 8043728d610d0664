use anchor_lang::prelude::*;

#[event]
pub struct RoundCreated {
    pub round_id: u64,
    pub round: Pubkey,
    pub vault: Pubkey,
    pub min_duration_secs: u64,
    pub created_at: i64,
}

#[event]
pub struct DepositMade {
    pub round_id: u64,
    pub participant: Pubkey,
    pub amount: u64,
    pub participant_total: u64,
    pub round_total: u64,
    pub participant_count: u16,
}

#[event]
pub struct InterestDeposited {
    pub contributor: Pubkey,
    pub amount: u64,
    pub pool_total: u64,
}

/// The outbound half of the oracle protocol: the oracle watches for this
/// event and answers with `fulfill_randomness` carrying the same `request_id`.
#[event]
pub struct RandomnessRequested {
    pub round_id: u64,
    pub request_id: [u8; 32],
    pub requested_at: i64,
}

#[event]
pub struct RequestExpired {
    pub round_id: u64,
    pub request_id: [u8; 32],
    pub expired_at: i64,
}

#[event]
pub struct RoundSettled {
    pub round_id: u64,
    pub request_id: [u8; 32],
    pub random_value: u64,
    pub winner: Pubkey,
    pub winner_payout: u64,
    pub deposit_pool: u64,
    pub interest_distributed: u64,
    pub participant_count: u16,
}

#[event]
pub struct PayoutTransferred {
    pub round_id: u64,
    pub participant: Pubkey,
    pub deposit_share: u64,
    pub interest_share: u64,
}

#[event]
pub struct RoundClosed {
    pub round_id: u64,
    pub swept_remainder: u64,
}

use anchor_lang::prelude::*;

#[error_code]
pub enum LotteryError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Protocol paused")]
    Paused,

    // -----------------
    // Round lifecycle
    // -----------------
    #[msg("Operation not valid in the current round state")]
    InvalidState,
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Minimum round duration has not elapsed")]
    TooEarly,
    #[msg("A randomness request is already pending for this round")]
    RequestAlreadyPending,
    #[msg("Round is full")]
    TooManyEntries,
    #[msg("Randomness request has not expired yet")]
    RequestNotExpired,

    // -----------------
    // Oracle callback
    // -----------------
    #[msg("Unknown or already consumed randomness request")]
    UnknownRequest,
    #[msg("Request does not belong to a round awaiting randomness")]
    RoundMismatch,
    #[msg("Oracle pubkey not set")]
    OracleNotSet,
    #[msg("Missing or invalid ed25519 verify instruction")]
    MissingOrInvalidEd25519Ix,
    #[msg("Ed25519 pubkey mismatch")]
    Ed25519PubkeyMismatch,
    #[msg("Ed25519 message mismatch")]
    Ed25519MessageMismatch,

    // -----------------
    // Selection / payout
    // -----------------
    #[msg("Total entry weight is zero")]
    EmptyPool,
    #[msg("Round has no entries")]
    NoEntries,
    #[msg("Math overflow")]
    ArithmeticOverflow,
    #[msg("Token transfer failed")]
    TransferFailed,
    #[msg("Token account mint or owner mismatch")]
    InvalidTokenAccount,
    #[msg("Invalid payout policy")]
    InvalidPayoutPolicy,
    #[msg("Invalid window")]
    InvalidWindow,
    #[msg("Not a participant of this round")]
    NotAParticipant,
    #[msg("Payout already transferred")]
    AlreadyClaimed,
    #[msg("Round still has untransferred payouts")]
    PayoutsOutstanding,
}

#[cfg(test)]
pub(crate) fn assert_lottery_err<T: std::fmt::Debug>(res: Result<T>, expected: LotteryError) {
    match res {
        Err(anchor_lang::error::Error::AnchorError(e)) => {
            assert_eq!(e.error_code_number, u32::from(expected), "got {}", e.error_name)
        }
        other => panic!("expected {expected:?}, got {other:?}"),
    }
}

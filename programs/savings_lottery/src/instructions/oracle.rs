use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked,
};

use crate::{
    draw::select_winner,
    errors::LotteryError,
    events::RoundSettled,
    payout::{compute_distribution, Distribution},
    state::{InterestPool, PayoutPolicy, Round, RoundRegistry, WinnerRecord},
    utils::{assert_ed25519_ix_matches, expected_fulfill_msg},
    FulfillRandomness, FulfillRandomnessSigned, UpdateConfig,
};

pub fn set_oracle_pubkey(ctx: Context<UpdateConfig>, oracle_pubkey: Pubkey) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    cfg.oracle_pubkey = oracle_pubkey;
    Ok(())
}

/// Oracle callback, signed by the oracle key itself.
pub fn fulfill_randomness(
    ctx: Context<FulfillRandomness>,
    round_id: u64,
    request_id: [u8; 32],
    random_value: u64,
) -> Result<()> {
    let cfg = &ctx.accounts.config;
    cfg.ensure_oracle(&ctx.accounts.oracle.key())?;

    let round = &mut ctx.accounts.round;
    require!(round.round_id == round_id, LotteryError::RoundMismatch);

    let now = Clock::get()?.unix_timestamp;
    let dist = settle_core(
        round,
        &mut ctx.accounts.round_registry,
        &mut ctx.accounts.interest_pool,
        &mut ctx.accounts.winner_record,
        ctx.bumps.winner_record,
        PayoutPolicy::try_from(cfg.payout_policy)?,
        request_id,
        random_value,
        now,
    )?;

    emit_settled(round, &dist, request_id, random_value);
    Ok(())
}

// Tx layout must be: [ ed25519_verify, fulfill_randomness_signed ]
pub fn fulfill_randomness_signed(
    ctx: Context<FulfillRandomnessSigned>,
    round_id: u64,
    request_id: [u8; 32],
    random_value: u64,
) -> Result<()> {
    let cfg = &ctx.accounts.config;
    cfg.ensure_oracle_set()?;

    let round = &mut ctx.accounts.round;
    require!(round.round_id == round_id, LotteryError::RoundMismatch);

    // --- ed25519 introspection ---
    let ix_sys = ctx.accounts.instructions.to_account_info();
    let current_ix = load_current_index_checked(&ix_sys)? as usize;
    require!(current_ix >= 1, LotteryError::MissingOrInvalidEd25519Ix);

    let ed_ix = load_instruction_at_checked(current_ix - 1, &ix_sys)
        .map_err(|_| error!(LotteryError::MissingOrInvalidEd25519Ix))?;

    let expected = expected_fulfill_msg(ctx.program_id, round_id, &request_id, random_value);
    assert_ed25519_ix_matches(&ed_ix, &cfg.oracle_pubkey, expected.as_slice())?;

    let now = Clock::get()?.unix_timestamp;
    let dist = settle_core(
        round,
        &mut ctx.accounts.round_registry,
        &mut ctx.accounts.interest_pool,
        &mut ctx.accounts.winner_record,
        ctx.bumps.winner_record,
        PayoutPolicy::try_from(cfg.payout_policy)?,
        request_id,
        random_value,
        now,
    )?;

    emit_settled(round, &dist, request_id, random_value);
    Ok(())
}

/// Consumes the request, draws the winner and books the payouts. No tokens move here:
/// `transfer_payout` executes the records later, so a failed transfer never re-runs the draw.
#[allow(clippy::too_many_arguments)]
pub fn settle_core(
    round: &mut Round,
    registry: &mut RoundRegistry,
    pool: &mut InterestPool,
    record: &mut WinnerRecord,
    record_bump: u8,
    policy: PayoutPolicy,
    request_id: [u8; 32],
    random_value: u64,
    now: i64,
) -> Result<Distribution> {
    round.take_request(&request_id)?;

    let winner_index = select_winner(&round.entries, random_value)?;
    let dist = compute_distribution(&round.entries, winner_index, pool.total, policy)?;

    round.apply_distribution(&dist, now)?;
    pool.apply_distribution(&dist)?;
    registry.settle_round(round.round_id)?;

    record.round_id = round.round_id;
    record.bump = record_bump;
    record.participant = round.winner;
    record.payout = dist.winner_payout;
    record.interest_payout = dist.winner_interest;
    record.random_value = random_value;
    record.settled_at = now;

    Ok(dist)
}

fn emit_settled(round: &Round, dist: &Distribution, request_id: [u8; 32], random_value: u64) {
    msg!(
        "round {} settled: winner={} payout={}",
        round.round_id,
        round.winner,
        dist.winner_payout
    );
    emit!(RoundSettled {
        round_id: round.round_id,
        request_id,
        random_value,
        winner: round.winner,
        winner_payout: dist.winner_payout,
        deposit_pool: dist.deposit_pool,
        interest_distributed: dist.interest_distributed,
        participant_count: dist.payouts.len() as u16,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::assert_lottery_err;
    use crate::state::RoundState;
    use crate::utils::issue_request;

    const T0: i64 = 1_700_000_000;

    struct Fixture {
        round: Round,
        registry: RoundRegistry,
        pool: InterestPool,
        record: WinnerRecord,
        participants: Vec<Pubkey>,
        request_id: [u8; 32],
    }

    fn fixture(amounts: &[u64], interest: u64) -> Fixture {
        let mut registry = RoundRegistry {
            admin: Pubkey::new_unique(),
            bump: 1,
            next_round_id: 1,
            active_round_id: 0,
            has_active_round: false,
            winner_count: 0,
            version: 1,
        };
        let round_id = registry.open_round().unwrap();

        let mut round = Round::default();
        round.open(round_id, 250, Pubkey::new_unique(), 251, 4, T0);

        let participants: Vec<Pubkey> = amounts.iter().map(|_| Pubkey::new_unique()).collect();
        for (who, amount) in participants.iter().zip(amounts) {
            round.record_deposit(*who, *amount).unwrap();
        }

        let mut pool = InterestPool {
            bump: 1,
            vault: Pubkey::new_unique(),
            vault_bump: 2,
            total: 0,
            reserved: 0,
            version: 1,
        };
        if interest > 0 {
            pool.accrue(interest).unwrap();
        }

        round.ensure_closable(T0 + 5).unwrap();
        let request = issue_request(&Pubkey::new_unique(), round_id, round.request_count, 42, T0 + 5);
        round.await_randomness(request).unwrap();

        Fixture {
            round,
            registry,
            pool,
            record: WinnerRecord {
                round_id: 0,
                bump: 0,
                participant: Pubkey::default(),
                payout: 0,
                interest_payout: 0,
                random_value: 0,
                settled_at: 0,
            },
            participants,
            request_id: request.request_id,
        }
    }

    fn settle(f: &mut Fixture, request_id: [u8; 32], random_value: u64, policy: PayoutPolicy) -> Result<Distribution> {
        settle_core(
            &mut f.round,
            &mut f.registry,
            &mut f.pool,
            &mut f.record,
            9,
            policy,
            request_id,
            random_value,
            T0 + 10,
        )
    }

    #[test]
    fn settles_weighted_winner_with_interest() {
        let mut f = fixture(&[15, 3, 2], 24);
        let request_id = f.request_id;

        let dist = settle(&mut f, request_id, 10, PayoutPolicy::DepositAndInterest).unwrap();

        assert_eq!(dist.winner_index, 0);
        assert_eq!(f.round.state, RoundState::Closed);
        assert_eq!(f.round.winner, f.participants[0]);
        assert!(f.round.entries.is_empty());

        assert_eq!(f.record.round_id, 1);
        assert_eq!(f.record.participant, f.participants[0]);
        assert_eq!(f.record.payout, 15 + 16);
        assert_eq!(f.record.interest_payout, 16);
        assert_eq!(f.record.random_value, 10);
        assert_eq!(f.record.bump, 9);

        assert_eq!(f.pool.total, 0);
        assert_eq!(f.pool.reserved, 24);

        assert!(!f.registry.has_active_round);
        assert_eq!(f.registry.winner_count, 1);
    }

    #[test]
    fn deposit_only_policy_keeps_interest_for_next_round() {
        let mut f = fixture(&[15, 3, 2], 24);
        let request_id = f.request_id;

        let dist = settle(&mut f, request_id, 19, PayoutPolicy::DepositOnly).unwrap();

        assert_eq!(dist.winner_index, 2);
        assert_eq!(f.record.payout, 15);
        assert_eq!(f.pool.total, 24);
        assert_eq!(f.pool.reserved, 0);
        // 5 refund split over 15 + 3 = 18: 4 and 0
        let shares: Vec<u64> = f.round.payouts.iter().map(|p| p.deposit_share).collect();
        assert_eq!(shares, vec![4, 0, 15]);
    }

    #[test]
    fn replayed_callback_is_unknown_and_pays_nothing_twice() {
        let mut f = fixture(&[15, 3, 2], 24);
        let request_id = f.request_id;
        settle(&mut f, request_id, 10, PayoutPolicy::DepositAndInterest).unwrap();

        let payouts_before = f.round.payouts.clone();
        assert_lottery_err(
            settle(&mut f, request_id, 11, PayoutPolicy::DepositAndInterest),
            LotteryError::UnknownRequest,
        );

        assert_eq!(f.round.payouts, payouts_before);
        assert_eq!(f.pool.reserved, 24);
        assert_eq!(f.registry.winner_count, 1);
        assert_eq!(f.record.random_value, 10);
    }

    #[test]
    fn foreign_request_id_is_unknown() {
        let mut f = fixture(&[1, 1], 0);
        assert_lottery_err(
            settle(&mut f, [7u8; 32], 1, PayoutPolicy::DepositAndInterest),
            LotteryError::UnknownRequest,
        );
        assert_eq!(f.round.state, RoundState::AwaitingRandomness);
        assert!(f.round.pending_request.is_some());
        assert!(f.registry.has_active_round);
    }
}

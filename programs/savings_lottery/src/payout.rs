use anchor_lang::prelude::*;

use crate::{
    constants::{DEPOSIT_POOL_PARTS, INTEREST_POOL_PARTS, WINNER_DEPOSIT_PARTS},
    draw::total_weight,
    errors::LotteryError,
    state::{Entry, PayoutPolicy, Payout},
};

/// Result of splitting one round's pools. Nothing here has moved tokens yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distribution {
    pub winner_index: usize,
    /// One record per entry, same order as the entries.
    pub payouts: Vec<Payout>,
    pub deposit_pool: u64,
    pub winner_payout: u64,
    pub winner_interest: u64,
    /// Deposit tokens left in the round vault after every share is paid.
    pub deposit_remainder: u64,
    /// Interest taken out of `InterestPool.total` by this settlement.
    pub interest_consumed: u64,
    pub interest_distributed: u64,
    pub interest_remainder: u64,
}

/// Splits the deposit pool and the interest pool for a drawn winner.
///
/// Deposit pool `D`: the winner gets `D / 4 * 3`, the refund pool `D / 4` goes to
/// the other participants pro rata to their deposits. A lone participant gets the
/// refund pool back as well.
///
/// Interest pool `I` (DepositAndInterest only): the winner gets `I / 2`, then every
/// participant, winner included, gets `I / 2 / n`.
///
/// Every division floors; whatever does not divide evenly stays in its pool.
pub fn compute_distribution(
    entries: &[Entry],
    winner_index: usize,
    interest_total: u64,
    policy: PayoutPolicy,
) -> Result<Distribution> {
    require!(!entries.is_empty(), LotteryError::NoEntries);
    require!(winner_index < entries.len(), LotteryError::InvalidState);

    let deposit_pool = total_weight(entries)?;
    let winner_amount = entries[winner_index].amount;

    let refund_pool = deposit_pool / DEPOSIT_POOL_PARTS;
    let winner_deposit = refund_pool
        .checked_mul(WINNER_DEPOSIT_PARTS)
        .ok_or(LotteryError::ArithmeticOverflow)?;
    let others_weight = deposit_pool
        .checked_sub(winner_amount)
        .ok_or(LotteryError::ArithmeticOverflow)?;

    let participant_count = entries.len() as u64;
    let (interest_consumed, winner_half, per_participant) = match policy {
        PayoutPolicy::DepositOnly => (0, 0, 0),
        PayoutPolicy::DepositAndInterest => {
            let half = interest_total / INTEREST_POOL_PARTS;
            (interest_total, half, half / participant_count)
        }
    };

    let mut payouts = Vec::with_capacity(entries.len());
    let mut deposit_distributed: u64 = 0;
    let mut interest_distributed: u64 = 0;

    for (index, entry) in entries.iter().enumerate() {
        let (deposit_share, interest_share) = if index == winner_index {
            let deposit = if others_weight == 0 {
                winner_deposit
                    .checked_add(refund_pool)
                    .ok_or(LotteryError::ArithmeticOverflow)?
            } else {
                winner_deposit
            };
            let interest = winner_half
                .checked_add(per_participant)
                .ok_or(LotteryError::ArithmeticOverflow)?;
            (deposit, interest)
        } else {
            (pro_rata(refund_pool, entry.amount, others_weight)?, per_participant)
        };

        deposit_distributed = deposit_distributed
            .checked_add(deposit_share)
            .ok_or(LotteryError::ArithmeticOverflow)?;
        interest_distributed = interest_distributed
            .checked_add(interest_share)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        payouts.push(Payout {
            participant: entry.participant,
            deposit_share,
            interest_share,
            claimed: false,
        });
    }

    let winner = &payouts[winner_index];
    let winner_interest = winner.interest_share;
    let winner_payout = winner
        .deposit_share
        .checked_add(winner.interest_share)
        .ok_or(LotteryError::ArithmeticOverflow)?;

    Ok(Distribution {
        winner_index,
        deposit_pool,
        winner_payout,
        winner_interest,
        deposit_remainder: deposit_pool
            .checked_sub(deposit_distributed)
            .ok_or(LotteryError::ArithmeticOverflow)?,
        interest_consumed,
        interest_distributed,
        interest_remainder: interest_consumed
            .checked_sub(interest_distributed)
            .ok_or(LotteryError::ArithmeticOverflow)?,
        payouts,
    })
}

/// `pool * weight / total_weight`, floored. `weight <= total_weight` keeps the result within `pool`.
fn pro_rata(pool: u64, weight: u64, total_weight: u64) -> Result<u64> {
    require!(total_weight > 0, LotteryError::EmptyPool);

    let share = (pool as u128)
        .checked_mul(weight as u128)
        .ok_or(LotteryError::ArithmeticOverflow)?
        / total_weight as u128;

    u64::try_from(share).map_err(|_| error!(LotteryError::ArithmeticOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::assert_lottery_err;

    fn entries(amounts: &[u64]) -> Vec<Entry> {
        amounts
            .iter()
            .map(|&amount| Entry {
                participant: Pubkey::new_unique(),
                amount,
            })
            .collect()
    }

    fn shares(dist: &Distribution) -> Vec<(u64, u64)> {
        dist.payouts
            .iter()
            .map(|p| (p.deposit_share, p.interest_share))
            .collect()
    }

    #[test]
    fn deposit_only_split_refunds_other_depositors() {
        let e = entries(&[15, 3, 2]);
        let dist = compute_distribution(&e, 0, 24, PayoutPolicy::DepositOnly).unwrap();

        assert_eq!(shares(&dist), vec![(15, 0), (3, 0), (2, 0)]);
        assert_eq!(dist.winner_payout, 15);
        assert_eq!(dist.deposit_pool, 20);
        assert_eq!(dist.deposit_remainder, 0);
        assert_eq!(dist.interest_consumed, 0);
        assert_eq!(dist.interest_distributed, 0);
    }

    #[test]
    fn interest_split_layers_equal_share_on_winner_half() {
        let e = entries(&[15, 3, 2]);
        let dist = compute_distribution(&e, 0, 24, PayoutPolicy::DepositAndInterest).unwrap();

        // 24 / 2 + 24 / 2 / 3 = 16 for the winner, 4 for everyone else
        assert_eq!(shares(&dist), vec![(15, 16), (3, 4), (2, 4)]);
        assert_eq!(dist.winner_interest, 16);
        assert_eq!(dist.winner_payout, 31);
        assert_eq!(dist.interest_consumed, 24);
        assert_eq!(dist.interest_distributed, 24);
        assert_eq!(dist.interest_remainder, 0);
    }

    #[test]
    fn payouts_follow_entry_order_and_participants() {
        let e = entries(&[2, 6, 4]);
        let dist = compute_distribution(&e, 1, 0, PayoutPolicy::DepositAndInterest).unwrap();

        let participants: Vec<Pubkey> = dist.payouts.iter().map(|p| p.participant).collect();
        let expected: Vec<Pubkey> = e.iter().map(|x| x.participant).collect();
        assert_eq!(participants, expected);
        assert!(dist.payouts.iter().all(|p| !p.claimed));

        // D = 12: winner 9, refund pool 3 over weight 6 -> 1 and 2
        assert_eq!(shares(&dist), vec![(1, 0), (9, 0), (2, 0)]);
    }

    #[test]
    fn rounding_remainders_stay_in_the_pools() {
        let e = entries(&[10, 7, 6]);
        let dist = compute_distribution(&e, 2, 25, PayoutPolicy::DepositAndInterest).unwrap();

        // D = 23: refund pool 5, winner 15; 5 * 10 / 17 = 2, 5 * 7 / 17 = 2
        // I = 25: half 12, per participant 4
        assert_eq!(shares(&dist), vec![(2, 4), (2, 4), (15, 16)]);
        assert_eq!(dist.deposit_remainder, 23 - 19);
        assert_eq!(dist.interest_distributed, 24);
        assert_eq!(dist.interest_remainder, 1);
    }

    #[test]
    fn lone_participant_keeps_refund_pool() {
        let e = entries(&[10]);
        let dist = compute_distribution(&e, 0, 7, PayoutPolicy::DepositAndInterest).unwrap();

        // 10 / 4 * 3 = 6 plus refund pool 2; interest 3 + 3
        assert_eq!(shares(&dist), vec![(8, 6)]);
        assert_eq!(dist.deposit_remainder, 2);
        assert_eq!(dist.interest_remainder, 1);
    }

    #[test]
    fn large_pools_do_not_overflow_pro_rata() {
        let e = entries(&[u64::MAX / 2, u64::MAX / 2]);
        let dist = compute_distribution(&e, 0, 0, PayoutPolicy::DepositOnly).unwrap();

        let pool = u64::MAX / 2 * 2;
        assert_eq!(dist.payouts[0].deposit_share, pool / 4 * 3);
        assert_eq!(dist.payouts[1].deposit_share, pool / 4);
    }

    #[test]
    fn distributed_never_exceeds_pools() {
        for amounts in [&[1u64, 1, 1][..], &[3, 5, 7, 11], &[100, 1], &[9, 9, 9, 9, 9]] {
            let e = entries(amounts);
            for winner in 0..e.len() {
                for interest in [0u64, 1, 5, 99, 1_000] {
                    let dist =
                        compute_distribution(&e, winner, interest, PayoutPolicy::DepositAndInterest)
                            .unwrap();
                    let deposit_paid: u64 = dist.payouts.iter().map(|p| p.deposit_share).sum();
                    let interest_paid: u64 = dist.payouts.iter().map(|p| p.interest_share).sum();

                    assert_eq!(deposit_paid + dist.deposit_remainder, dist.deposit_pool);
                    assert_eq!(interest_paid + dist.interest_remainder, interest);
                }
            }
        }
    }

    #[test]
    fn rejects_empty_entries_and_bad_winner() {
        assert_lottery_err(
            compute_distribution(&[], 0, 0, PayoutPolicy::DepositOnly),
            LotteryError::NoEntries,
        );
        assert_lottery_err(
            compute_distribution(&entries(&[1, 2]), 2, 0, PayoutPolicy::DepositOnly),
            LotteryError::InvalidState,
        );
    }

    #[test]
    fn rejects_overflowing_deposit_pool() {
        assert_lottery_err(
            compute_distribution(&entries(&[u64::MAX, 1]), 0, 0, PayoutPolicy::DepositOnly),
            LotteryError::ArithmeticOverflow,
        );
    }
}

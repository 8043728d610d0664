use anchor_lang::prelude::*;

use crate::{errors::LotteryError, state::Entry};

pub fn total_weight(entries: &[Entry]) -> Result<u64> {
    entries.iter().try_fold(0u64, |acc, e| {
        acc.checked_add(e.amount)
            .ok_or_else(|| error!(LotteryError::ArithmeticOverflow))
    })
}

/// Weighted draw over the insertion-ordered entries.
///
/// `target = random_value % total_weight` falls into exactly one slice of
/// `[0, total_weight)`, where entry `i` owns the half-open slice
/// `[cumulative(i-1), cumulative(i))`. Entry `i` therefore wins for exactly
/// `entries[i].amount` of the possible targets.
pub fn select_winner(entries: &[Entry], random_value: u64) -> Result<usize> {
    let total = total_weight(entries)?;
    require!(total > 0, LotteryError::EmptyPool);

    let target = random_value % total;

    let mut cumulative: u64 = 0;
    for (index, entry) in entries.iter().enumerate() {
        cumulative += entry.amount; // bounded by total
        if cumulative > target {
            return Ok(index);
        }
    }

    err!(LotteryError::EmptyPool)
}

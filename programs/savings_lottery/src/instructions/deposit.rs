use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::{
    errors::LotteryError,
    events::{DepositMade, InterestDeposited},
    Deposit, DepositInterest,
};

/// Participant adds `amount` to their entry in the open round.
pub fn deposit(ctx: Context<Deposit>, round_id: u64, amount: u64) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);

    let participant = ctx.accounts.participant.key();
    let round = &mut ctx.accounts.round;
    require!(round.round_id == round_id, LotteryError::RoundMismatch);

    // state/amount/capacity checks happen before any tokens move
    let participant_total = round.record_deposit(participant, amount)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.participant_token_account.to_account_info(),
                to: ctx.accounts.round_vault.to_account_info(),
                authority: ctx.accounts.participant.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(DepositMade {
        round_id,
        participant,
        amount,
        participant_total,
        round_total: round.deposit_total,
        participant_count: round.participant_count() as u16,
    });

    Ok(())
}

/// Anyone may top up the interest pool, whatever phase the current round is in.
pub fn deposit_interest(ctx: Context<DepositInterest>, amount: u64) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);

    let pool_total = ctx.accounts.interest_pool.accrue(amount)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.contributor_token_account.to_account_info(),
                to: ctx.accounts.interest_vault.to_account_info(),
                authority: ctx.accounts.contributor.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(InterestDeposited {
        contributor: ctx.accounts.contributor.key(),
        amount,
        pool_total,
    });

    Ok(())
}

use anchor_lang::prelude::*;
use anchor_spl::token::{self, CloseAccount, Transfer};

use crate::{
    errors::LotteryError,
    events::{RandomnessRequested, RequestExpired, RoundClosed},
    utils::issue_request,
    CloseRound, ExpireRequest, RequestClose, ROUND_SEED,
};

/// Permissionless: once the minimum duration has elapsed anyone may ask the oracle for the draw.
pub fn request_close(ctx: Context<RequestClose>, round_id: u64) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);

    let round = &mut ctx.accounts.round;
    require!(round.round_id == round_id, LotteryError::RoundMismatch);

    let clock = Clock::get()?;
    round.ensure_closable(clock.unix_timestamp)?;

    let request = issue_request(
        ctx.program_id,
        round_id,
        round.request_count,
        clock.slot,
        clock.unix_timestamp,
    );
    round.await_randomness(request)?;

    msg!("round {} awaiting randomness ({} entries)", round_id, round.participant_count());
    emit!(RandomnessRequested {
        round_id,
        request_id: request.request_id,
        requested_at: request.requested_at,
    });

    Ok(())
}

/// Drops a request the oracle left unanswered past `request_timeout_secs` and reopens the round.
pub fn expire_request(ctx: Context<ExpireRequest>, round_id: u64) -> Result<()> {
    let cfg = &ctx.accounts.config;

    let round = &mut ctx.accounts.round;
    require!(round.round_id == round_id, LotteryError::RoundMismatch);

    let now = Clock::get()?.unix_timestamp;
    let dropped = round.expire_request(now, cfg.request_timeout_secs)?;

    msg!("round {} reopened after oracle timeout", round_id);
    emit!(RequestExpired {
        round_id,
        request_id: dropped.request_id,
        expired_at: now,
    });

    Ok(())
}

pub fn close_round(ctx: Context<CloseRound>, round_id: u64) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    let round = &mut ctx.accounts.round;
    require!(round.round_id == round_id, LotteryError::RoundMismatch);
    round.finalize()?;

    let round_le = round_id.to_le_bytes();
    let signer_seeds: &[&[&[u8]]] = &[&[ROUND_SEED, &round_le, &[round.bump]]];

    // 1) rounding remainder joins the next interest distribution
    let remainder = ctx.accounts.round_vault.amount;
    if remainder > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.round_vault.to_account_info(),
                    to: ctx.accounts.interest_vault.to_account_info(),
                    authority: ctx.accounts.round.to_account_info(),
                },
                signer_seeds,
            ),
            remainder,
        )?;
        ctx.accounts.interest_pool.carry_over(remainder)?;
    }

    // 2) close the empty vault; the round account stays as a finalized record
    token::close_account(CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        CloseAccount {
            account: ctx.accounts.round_vault.to_account_info(),
            destination: ctx.accounts.admin.to_account_info(),
            authority: ctx.accounts.round.to_account_info(),
        },
        signer_seeds,
    ))?;

    emit!(RoundClosed {
        round_id,
        swept_remainder: remainder,
    });

    Ok(())
}

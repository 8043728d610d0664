use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::{
    errors::LotteryError, events::PayoutTransferred, TransferPayout, INTEREST_POOL_SEED,
    ROUND_SEED,
};

/// Executes one participant's booked payout. Retryable: a failed transfer reverts the
/// `claimed` flag together with everything else in the transaction.
pub fn transfer_payout(ctx: Context<TransferPayout>, round_id: u64) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);

    let participant = ctx.accounts.participant.key();
    let round = &mut ctx.accounts.round;
    require!(round.round_id == round_id, LotteryError::RoundMismatch);

    let payout = round.mark_claimed(&participant)?;

    // 1) deposit share: round vault -> participant (round PDA signs)
    if payout.deposit_share > 0 {
        let round_le = round_id.to_le_bytes();
        let signer_seeds: &[&[&[u8]]] = &[&[ROUND_SEED, &round_le, &[round.bump]]];

        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.round_vault.to_account_info(),
                    to: ctx.accounts.participant_token_account.to_account_info(),
                    authority: round.to_account_info(),
                },
                signer_seeds,
            ),
            payout.deposit_share,
        )
        .map_err(|_| error!(LotteryError::TransferFailed))?;
    }

    // 2) interest share: interest vault -> participant (pool PDA signs)
    if payout.interest_share > 0 {
        let cfg_key = cfg.key();
        let pool_seeds: &[&[&[u8]]] = &[&[
            INTEREST_POOL_SEED,
            cfg_key.as_ref(),
            &[ctx.accounts.interest_pool.bump],
        ]];

        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.interest_vault.to_account_info(),
                    to: ctx.accounts.participant_token_account.to_account_info(),
                    authority: ctx.accounts.interest_pool.to_account_info(),
                },
                pool_seeds,
            ),
            payout.interest_share,
        )
        .map_err(|_| error!(LotteryError::TransferFailed))?;

        ctx.accounts.interest_pool.release(payout.interest_share)?;
    }

    emit!(PayoutTransferred {
        round_id,
        participant,
        deposit_share: payout.deposit_share,
        interest_share: payout.interest_share,
    });

    Ok(())
}

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LotteryError;
use crate::events::RoundCreated;
use crate::state::PayoutPolicy;
use crate::{CreateRound, InitializeConfig, InitializeRoundRegistry, UpdateConfig};

pub fn initialize_config(
    ctx: Context<InitializeConfig>,
    oracle_pubkey: Pubkey,
    request_timeout_secs: Option<u64>,
    payout_policy: Option<u8>,
) -> Result<()> {
    let request_timeout_secs = request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    let payout_policy = payout_policy.unwrap_or(DEFAULT_PAYOUT_POLICY);
    require!(request_timeout_secs > 0, LotteryError::InvalidWindow);
    PayoutPolicy::try_from(payout_policy)?;

    let cfg = &mut ctx.accounts.config;
    cfg.admin = ctx.accounts.admin.key();
    cfg.bump = ctx.bumps.config;
    cfg.deposit_mint = ctx.accounts.deposit_mint.key();

    // Pubkey::default() leaves the oracle unset until set_oracle_pubkey
    cfg.oracle_pubkey = oracle_pubkey;
    cfg.request_timeout_secs = request_timeout_secs;
    cfg.payout_policy = payout_policy;
    cfg.paused = false;
    cfg.version = INITIAL_VERSION;

    let pool = &mut ctx.accounts.interest_pool;
    pool.bump = ctx.bumps.interest_pool;
    pool.vault = ctx.accounts.interest_vault.key();
    pool.vault_bump = ctx.bumps.interest_vault;
    pool.total = 0;
    pool.reserved = 0;
    pool.version = INITIAL_VERSION;

    msg!(
        "config initialized: mint={} policy={} timeout={}s",
        cfg.deposit_mint,
        payout_policy,
        request_timeout_secs
    );
    Ok(())
}

pub fn initialize_round_registry(ctx: Context<InitializeRoundRegistry>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    let rr = &mut ctx.accounts.round_registry;
    rr.admin = cfg.admin;
    rr.bump = ctx.bumps.round_registry;
    rr.next_round_id = INITIAL_ROUND_ID;
    rr.active_round_id = 0;
    rr.has_active_round = false;
    rr.winner_count = 0;
    rr.version = INITIAL_VERSION;

    Ok(())
}

pub fn set_pause(ctx: Context<UpdateConfig>, paused: bool) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);
    cfg.paused = paused;
    Ok(())
}

pub fn set_request_timeout(ctx: Context<UpdateConfig>, request_timeout_secs: u64) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);
    require!(request_timeout_secs > 0, LotteryError::InvalidWindow);

    cfg.request_timeout_secs = request_timeout_secs;
    Ok(())
}

/// Applies from the next settlement on; rounds already settled keep their payout records.
pub fn set_payout_policy(ctx: Context<UpdateConfig>, payout_policy: u8) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);
    PayoutPolicy::try_from(payout_policy)?;

    cfg.payout_policy = payout_policy;
    Ok(())
}

pub fn create_round(ctx: Context<CreateRound>, min_duration_secs: u64) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    let now = Clock::get()?.unix_timestamp;

    let rr = &mut ctx.accounts.round_registry;
    let round_id = rr.open_round()?;

    let round = &mut ctx.accounts.round;
    round.open(
        round_id,
        ctx.bumps.round,
        ctx.accounts.round_vault.key(),
        ctx.bumps.round_vault,
        min_duration_secs,
        now,
    );

    emit!(RoundCreated {
        round_id,
        round: round.key(),
        vault: round.vault,
        min_duration_secs,
        created_at: now,
    });

    Ok(())
}

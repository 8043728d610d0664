use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::errors::LotteryError;
use crate::state::{Config, InterestPool, Round, RoundRegistry, WinnerRecord};

// ----------------------------
// Admin / setup
// ----------------------------
#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [crate::CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, Config>,

    /// Mint every deposit and payout is denominated in (created off-chain).
    pub deposit_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = admin,
        space = 8 + InterestPool::INIT_SPACE,
        seeds = [crate::INTEREST_POOL_SEED, config.key().as_ref()],
        bump
    )]
    pub interest_pool: Account<'info, InterestPool>,

    /// Interest vault = TokenAccount PDA controlled by the interest pool PDA
    #[account(
        init,
        payer = admin,
        seeds = [crate::INTEREST_VAULT_SEED, config.key().as_ref()],
        bump,
        token::mint = deposit_mint,
        token::authority = interest_pool
    )]
    pub interest_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct InitializeRoundRegistry<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = admin,
        space = 8 + RoundRegistry::INIT_SPACE,
        seeds = [crate::ROUND_REGISTRY_SEED, config.key().as_ref()],
        bump
    )]
    pub round_registry: Account<'info, RoundRegistry>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        mut,
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    pub admin: Signer<'info>,
}

// ----------------------------
// Round lifecycle
// ----------------------------
#[derive(Accounts)]
pub struct CreateRound<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(address = config.deposit_mint)]
    pub deposit_mint: Account<'info, Mint>,

    #[account(
        mut,
        seeds = [crate::ROUND_REGISTRY_SEED, config.key().as_ref()],
        bump = round_registry.bump,
    )]
    pub round_registry: Account<'info, RoundRegistry>,

    #[account(
        init,
        payer = admin,
        space = 8 + Round::INIT_SPACE,
        seeds = [crate::ROUND_SEED, round_registry.next_round_id.to_le_bytes().as_ref()],
        bump
    )]
    pub round: Account<'info, Round>,

    #[account(
        init,
        payer = admin,
        seeds = [crate::ROUND_VAULT_SEED, round_registry.next_round_id.to_le_bytes().as_ref()],
        bump,
        token::mint = deposit_mint,
        token::authority = round
    )]
    pub round_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct Deposit<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    #[account(mut, address = round.vault)]
    pub round_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub participant: Signer<'info>,

    #[account(
        mut,
        constraint = participant_token_account.mint == config.deposit_mint @ LotteryError::InvalidTokenAccount,
        constraint = participant_token_account.owner == participant.key() @ LotteryError::InvalidTokenAccount
    )]
    pub participant_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct DepositInterest<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::INTEREST_POOL_SEED, config.key().as_ref()],
        bump = interest_pool.bump
    )]
    pub interest_pool: Account<'info, InterestPool>,

    #[account(mut, address = interest_pool.vault)]
    pub interest_vault: Account<'info, TokenAccount>,

    pub contributor: Signer<'info>,

    #[account(
        mut,
        constraint = contributor_token_account.mint == config.deposit_mint @ LotteryError::InvalidTokenAccount,
        constraint = contributor_token_account.owner == contributor.key() @ LotteryError::InvalidTokenAccount
    )]
    pub contributor_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct RequestClose<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    pub caller: Signer<'info>,
}

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct ExpireRequest<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    pub caller: Signer<'info>,
}

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct CloseRound<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::INTEREST_POOL_SEED, config.key().as_ref()],
        bump = interest_pool.bump
    )]
    pub interest_pool: Account<'info, InterestPool>,

    #[account(mut, address = interest_pool.vault)]
    pub interest_vault: Account<'info, TokenAccount>,

    // Kept after close so late oracle callbacks still load it.
    #[account(
        mut,
        seeds = [crate::ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    // Remainder is swept to the interest vault, then the token account is closed.
    #[account(mut, address = round.vault)]
    pub round_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

// ----------------------------
// Oracle callback
// ----------------------------
#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct FulfillRandomness<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::ROUND_REGISTRY_SEED, config.key().as_ref()],
        bump = round_registry.bump,
    )]
    pub round_registry: Account<'info, RoundRegistry>,

    #[account(
        mut,
        seeds = [crate::INTEREST_POOL_SEED, config.key().as_ref()],
        bump = interest_pool.bump
    )]
    pub interest_pool: Account<'info, InterestPool>,

    #[account(
        mut,
        seeds = [crate::ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    // init_if_needed: a replayed callback must reach the handler and fail as an unknown request
    #[account(
        init_if_needed,
        payer = oracle,
        space = 8 + WinnerRecord::INIT_SPACE,
        seeds = [crate::WINNER_SEED, round_id.to_le_bytes().as_ref()],
        bump
    )]
    pub winner_record: Account<'info, WinnerRecord>,

    #[account(mut)]
    pub oracle: Signer<'info>,

    pub system_program: Program<'info, System>,
}

// Tx layout must be: [ ed25519_verify(oracle), fulfill_randomness_signed ]
#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct FulfillRandomnessSigned<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::ROUND_REGISTRY_SEED, config.key().as_ref()],
        bump = round_registry.bump,
    )]
    pub round_registry: Account<'info, RoundRegistry>,

    #[account(
        mut,
        seeds = [crate::INTEREST_POOL_SEED, config.key().as_ref()],
        bump = interest_pool.bump
    )]
    pub interest_pool: Account<'info, InterestPool>,

    #[account(
        mut,
        seeds = [crate::ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + WinnerRecord::INIT_SPACE,
        seeds = [crate::WINNER_SEED, round_id.to_le_bytes().as_ref()],
        bump
    )]
    pub winner_record: Account<'info, WinnerRecord>,

    /// Relayer submitting the oracle-signed value; pays for the winner record.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: instruction sysvar (for ed25519 introspection). Address enforced.
    #[account(address = anchor_lang::solana_program::sysvar::instructions::ID)]
    pub instructions: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

// ----------------------------
// Payout execution
// ----------------------------
#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct TransferPayout<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::INTEREST_POOL_SEED, config.key().as_ref()],
        bump = interest_pool.bump
    )]
    pub interest_pool: Account<'info, InterestPool>,

    #[account(mut, address = interest_pool.vault)]
    pub interest_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [crate::ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    #[account(mut, address = round.vault)]
    pub round_vault: Account<'info, TokenAccount>,

    /// CHECK: payout owner; only used as the key the payout record and destination must match.
    pub participant: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = participant_token_account.mint == config.deposit_mint @ LotteryError::InvalidTokenAccount,
        constraint = participant_token_account.owner == participant.key() @ LotteryError::InvalidTokenAccount
    )]
    pub participant_token_account: Account<'info, TokenAccount>,

    /// Anyone may crank a payout; funds only ever go to the participant's account.
    pub caller: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

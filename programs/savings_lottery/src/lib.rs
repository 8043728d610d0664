use anchor_lang::prelude::*;

pub mod constants;
pub mod contexts;
pub mod draw;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod payout;
pub mod state;
pub mod utils;

pub use constants::*;
pub use contexts::*;
pub use errors::*;
pub use events::*;
pub use instructions::*;
pub use state::*;
pub use utils::*;

declare_id!("CEJZbbZh8PYyxFTcYpxi1CzZTbV2E9YGoU5itW7kEJLh");

#[program]
pub mod savings_lottery {
    use super::*;
    use crate::instructions::{admin, deposit, lifecycle, oracle, reward};

    pub fn initialize_config(
        ctx: Context<InitializeConfig>,
        oracle_pubkey: Pubkey,
        request_timeout_secs: Option<u64>,
        payout_policy: Option<u8>,
    ) -> Result<()> {
        admin::initialize_config(ctx, oracle_pubkey, request_timeout_secs, payout_policy)
    }

    pub fn initialize_round_registry(ctx: Context<InitializeRoundRegistry>) -> Result<()> {
        admin::initialize_round_registry(ctx)
    }

    pub fn set_pause(ctx: Context<UpdateConfig>, paused: bool) -> Result<()> {
        admin::set_pause(ctx, paused)
    }

    pub fn set_request_timeout(ctx: Context<UpdateConfig>, request_timeout_secs: u64) -> Result<()> {
        admin::set_request_timeout(ctx, request_timeout_secs)
    }

    pub fn set_payout_policy(ctx: Context<UpdateConfig>, payout_policy: u8) -> Result<()> {
        admin::set_payout_policy(ctx, payout_policy)
    }

    pub fn set_oracle_pubkey(ctx: Context<UpdateConfig>, oracle_pubkey: Pubkey) -> Result<()> {
        oracle::set_oracle_pubkey(ctx, oracle_pubkey)
    }

    // ----------------------------
    // Round lifecycle
    // ----------------------------
    pub fn create_round(ctx: Context<CreateRound>, min_duration_secs: u64) -> Result<()> {
        admin::create_round(ctx, min_duration_secs)
    }

    pub fn deposit(ctx: Context<Deposit>, round_id: u64, amount: u64) -> Result<()> {
        deposit::deposit(ctx, round_id, amount)
    }

    pub fn deposit_interest(ctx: Context<DepositInterest>, amount: u64) -> Result<()> {
        deposit::deposit_interest(ctx, amount)
    }

    pub fn request_close(ctx: Context<RequestClose>, round_id: u64) -> Result<()> {
        lifecycle::request_close(ctx, round_id)
    }

    pub fn expire_request(ctx: Context<ExpireRequest>, round_id: u64) -> Result<()> {
        lifecycle::expire_request(ctx, round_id)
    }

    pub fn close_round(ctx: Context<CloseRound>, round_id: u64) -> Result<()> {
        lifecycle::close_round(ctx, round_id)
    }

    // ----------------------------
    // Oracle callback
    // ----------------------------
    pub fn fulfill_randomness(
        ctx: Context<FulfillRandomness>,
        round_id: u64,
        request_id: [u8; 32],
        random_value: u64,
    ) -> Result<()> {
        oracle::fulfill_randomness(ctx, round_id, request_id, random_value)
    }

    pub fn fulfill_randomness_signed(
        ctx: Context<FulfillRandomnessSigned>,
        round_id: u64,
        request_id: [u8; 32],
        random_value: u64,
    ) -> Result<()> {
        oracle::fulfill_randomness_signed(ctx, round_id, request_id, random_value)
    }

    // ----------------------------
    // Payouts
    // ----------------------------
    pub fn transfer_payout(ctx: Context<TransferPayout>, round_id: u64) -> Result<()> {
        reward::transfer_payout(ctx, round_id)
    }
}

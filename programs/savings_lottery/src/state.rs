use anchor_lang::prelude::*;

use crate::{constants::MAX_ENTRIES, errors::LotteryError, payout::Distribution};

#[account]
#[derive(InitSpace)]
pub struct Config {
    pub admin: Pubkey,
    pub bump: u8,

    /// SPL mint every deposit, interest contribution and payout is denominated in.
    pub deposit_mint: Pubkey,

    /// Oracle allowed to fulfill randomness requests, either as signer or via ed25519 introspection.
    /// `Pubkey::default()` means no oracle configured yet.
    pub oracle_pubkey: Pubkey,

    /// How long a randomness request may stay pending before `expire_request` can reopen the round.
    pub request_timeout_secs: u64,

    /// `PayoutPolicy` discriminant.
    pub payout_policy: u8,

    pub paused: bool,
    pub version: u16,
}

// Oracle callbacks are accepted while paused so a pause never strands a round
// in AwaitingRandomness.
impl Config {
    pub fn ensure_oracle_set(&self) -> Result<()> {
        require!(self.oracle_pubkey != Pubkey::default(), LotteryError::OracleNotSet);
        Ok(())
    }

    /// Signer check for `fulfill_randomness`.
    pub fn ensure_oracle(&self, caller: &Pubkey) -> Result<()> {
        self.ensure_oracle_set()?;
        require_keys_eq!(self.oracle_pubkey, *caller, LotteryError::Unauthorized);
        Ok(())
    }
}

#[account]
#[derive(InitSpace)]
pub struct RoundRegistry {
    pub admin: Pubkey,
    pub bump: u8,
    pub next_round_id: u64,

    /// Round currently Open or AwaitingRandomness; only meaningful while `has_active_round`.
    pub active_round_id: u64,
    pub has_active_round: bool,

    /// Number of `WinnerRecord`s written so far.
    pub winner_count: u64,

    pub version: u16,
}

impl RoundRegistry {
    /// Hands out the next round id. Only one round may be live at a time.
    pub fn open_round(&mut self) -> Result<u64> {
        require!(!self.has_active_round, LotteryError::InvalidState);

        let round_id = self.next_round_id;
        self.next_round_id = round_id
            .checked_add(1)
            .ok_or(LotteryError::ArithmeticOverflow)?;
        self.active_round_id = round_id;
        self.has_active_round = true;

        Ok(round_id)
    }

    /// Called once the active round is settled; appends to the winners log count.
    pub fn settle_round(&mut self, round_id: u64) -> Result<()> {
        require!(
            self.has_active_round && self.active_round_id == round_id,
            LotteryError::RoundMismatch
        );

        self.has_active_round = false;
        self.winner_count = self
            .winner_count
            .checked_add(1)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        Ok(())
    }
}

#[account]
#[derive(InitSpace)]
pub struct InterestPool {
    pub bump: u8,

    /// SPL token account PDA holding the pool (authority = this account).
    pub vault: Pubkey,
    pub vault_bump: u8,

    /// Available for the next distribution: contributions plus rounding leftovers carried over.
    pub total: u64,

    /// Already split into payout records, still waiting for `transfer_payout`.
    pub reserved: u64,

    pub version: u16,
}

impl InterestPool {
    pub fn accrue(&mut self, amount: u64) -> Result<u64> {
        require!(amount > 0, LotteryError::InvalidAmount);

        self.total = self
            .total
            .checked_add(amount)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        Ok(self.total)
    }

    /// Moves the distributed share into `reserved`; the rounding remainder stays in `total`.
    pub fn apply_distribution(&mut self, dist: &Distribution) -> Result<()> {
        self.total = self
            .total
            .checked_sub(dist.interest_consumed)
            .and_then(|t| t.checked_add(dist.interest_remainder))
            .ok_or(LotteryError::ArithmeticOverflow)?;
        self.reserved = self
            .reserved
            .checked_add(dist.interest_distributed)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        Ok(())
    }

    pub fn release(&mut self, amount: u64) -> Result<()> {
        self.reserved = self
            .reserved
            .checked_sub(amount)
            .ok_or(LotteryError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Deposit dust swept from a finished round joins the next distribution.
    pub fn carry_over(&mut self, amount: u64) -> Result<()> {
        self.total = self
            .total
            .checked_add(amount)
            .ok_or(LotteryError::ArithmeticOverflow)?;
        Ok(())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub enum RoundState {
    #[default]
    Open,
    AwaitingRandomness,
    Closed,
}

/// How the pools are split at settlement.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayoutPolicy {
    /// Only the deposit pool is split; the interest pool carries over untouched.
    DepositOnly = 0,
    /// Deposit pool split, plus half the interest to the winner and the other half shared evenly.
    DepositAndInterest = 1,
}

impl TryFrom<u8> for PayoutPolicy {
    type Error = anchor_lang::error::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(PayoutPolicy::DepositOnly),
            1 => Ok(PayoutPolicy::DepositAndInterest),
            _ => err!(LotteryError::InvalidPayoutPolicy),
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct Entry {
    pub participant: Pubkey,
    /// Cumulative deposit; also the entry's draw weight.
    pub amount: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct RandomnessRequest {
    pub request_id: [u8; 32],
    pub round_id: u64,
    pub requested_at: i64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct Payout {
    pub participant: Pubkey,
    pub deposit_share: u64,
    pub interest_share: u64,
    pub claimed: bool,
}

#[account]
#[derive(InitSpace, Default)]
pub struct Round {
    pub round_id: u64,
    pub bump: u8,
    pub state: RoundState,

    // SPL token vault holding the deposits (authority = this round PDA)
    pub vault: Pubkey,
    pub vault_bump: u8,

    pub min_duration_secs: u64,
    pub created_at: i64,

    /// Insertion-ordered, one per participant. NOTE: keep max_len in sync with MAX_ENTRIES.
    #[max_len(64)]
    pub entries: Vec<Entry>,
    pub deposit_total: u64,

    pub pending_request: Option<RandomnessRequest>,
    pub request_count: u32,

    // settlement
    pub winner: Pubkey,
    pub winner_payout: u64,
    #[max_len(64)]
    pub payouts: Vec<Payout>,
    pub claimed_count: u32,
    pub settled_at: i64,

    /// Set by `close_round` once the vault is swept and closed. The account itself stays
    /// so late callbacks for this round still resolve to `UnknownRequest`.
    pub finalized: bool,
}

impl Round {
    pub fn open(
        &mut self,
        round_id: u64,
        bump: u8,
        vault: Pubkey,
        vault_bump: u8,
        min_duration_secs: u64,
        now: i64,
    ) {
        self.round_id = round_id;
        self.bump = bump;
        self.state = RoundState::Open;
        self.vault = vault;
        self.vault_bump = vault_bump;
        self.min_duration_secs = min_duration_secs;
        self.created_at = now;

        self.entries = Vec::new();
        self.deposit_total = 0;

        self.pending_request = None;
        self.request_count = 0;

        self.winner = Pubkey::default();
        self.winner_payout = 0;
        self.payouts = Vec::new();
        self.claimed_count = 0;
        self.settled_at = 0;
        self.finalized = false;
    }

    pub fn participant_count(&self) -> usize {
        self.entries.len()
    }

    /// Adds `amount` to the participant's entry, appending a new entry on first deposit.
    /// Returns the participant's cumulative amount.
    pub fn record_deposit(&mut self, participant: Pubkey, amount: u64) -> Result<u64> {
        require!(self.state == RoundState::Open, LotteryError::InvalidState);
        require!(amount > 0, LotteryError::InvalidAmount);

        let deposit_total = self
            .deposit_total
            .checked_add(amount)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        let cumulative = match self.entries.iter_mut().find(|e| e.participant == participant) {
            Some(entry) => {
                entry.amount = entry
                    .amount
                    .checked_add(amount)
                    .ok_or(LotteryError::ArithmeticOverflow)?;
                entry.amount
            }
            None => {
                require!(self.entries.len() < MAX_ENTRIES, LotteryError::TooManyEntries);
                self.entries.push(Entry { participant, amount });
                amount
            }
        };

        self.deposit_total = deposit_total;
        Ok(cumulative)
    }

    /// Guards for `request_close`, in the order callers observe them.
    pub fn ensure_closable(&self, now: i64) -> Result<()> {
        match self.state {
            RoundState::AwaitingRandomness => return err!(LotteryError::RequestAlreadyPending),
            RoundState::Closed => return err!(LotteryError::InvalidState),
            RoundState::Open => {}
        }

        let elapsed = u64::try_from(now.saturating_sub(self.created_at)).unwrap_or(0);
        require!(elapsed >= self.min_duration_secs, LotteryError::TooEarly);
        require!(!self.entries.is_empty(), LotteryError::InvalidState);

        Ok(())
    }

    pub fn await_randomness(&mut self, request: RandomnessRequest) -> Result<()> {
        require!(self.state == RoundState::Open, LotteryError::InvalidState);
        require!(self.pending_request.is_none(), LotteryError::RequestAlreadyPending);
        require!(request.round_id == self.round_id, LotteryError::RoundMismatch);

        self.request_count = self
            .request_count
            .checked_add(1)
            .ok_or(LotteryError::ArithmeticOverflow)?;
        self.pending_request = Some(request);
        self.state = RoundState::AwaitingRandomness;

        Ok(())
    }

    /// Consumes the outstanding request. A consumed or dropped id is unknown from then on.
    /// `pending_request` is only `Some` while AwaitingRandomness, so an open, reopened
    /// or closed round answers every id with `UnknownRequest`.
    pub fn take_request(&mut self, request_id: &[u8; 32]) -> Result<RandomnessRequest> {
        match self.pending_request {
            Some(pending) if pending.request_id == *request_id => {
                self.pending_request = None;
                Ok(pending)
            }
            _ => err!(LotteryError::UnknownRequest),
        }
    }

    /// Drops a request the oracle never answered and reopens the round.
    pub fn expire_request(&mut self, now: i64, timeout_secs: u64) -> Result<RandomnessRequest> {
        require!(
            self.state == RoundState::AwaitingRandomness,
            LotteryError::InvalidState
        );
        let pending = self.pending_request.ok_or(LotteryError::UnknownRequest)?;

        let waited = u64::try_from(now.saturating_sub(pending.requested_at)).unwrap_or(0);
        require!(waited >= timeout_secs, LotteryError::RequestNotExpired);

        self.pending_request = None;
        self.state = RoundState::Open;
        Ok(pending)
    }

    /// Replaces the entries with the computed payout records and closes the round.
    pub fn apply_distribution(&mut self, dist: &Distribution, now: i64) -> Result<()> {
        require!(
            self.state == RoundState::AwaitingRandomness && self.pending_request.is_none(),
            LotteryError::InvalidState
        );
        let winner = self
            .entries
            .get(dist.winner_index)
            .ok_or(LotteryError::NoEntries)?
            .participant;

        self.winner = winner;
        self.winner_payout = dist.winner_payout;
        self.payouts = dist.payouts.clone();
        self.claimed_count = 0;
        self.entries.clear();
        self.state = RoundState::Closed;
        self.settled_at = now;

        Ok(())
    }

    /// Marks one participant's payout as transferred and returns it.
    pub fn mark_claimed(&mut self, participant: &Pubkey) -> Result<Payout> {
        require!(self.state == RoundState::Closed, LotteryError::InvalidState);

        let payout = self
            .payouts
            .iter_mut()
            .find(|p| p.participant == *participant)
            .ok_or(LotteryError::NotAParticipant)?;
        require!(!payout.claimed, LotteryError::AlreadyClaimed);
        payout.claimed = true;
        let claimed = *payout;

        self.claimed_count = self
            .claimed_count
            .checked_add(1)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        Ok(claimed)
    }

    pub fn all_claimed(&self) -> bool {
        self.claimed_count as usize == self.payouts.len()
    }

    pub fn finalize(&mut self) -> Result<()> {
        require!(
            self.state == RoundState::Closed && !self.finalized,
            LotteryError::InvalidState
        );
        require!(self.all_claimed(), LotteryError::PayoutsOutstanding);

        self.finalized = true;
        Ok(())
    }
}

/// One per settled round. Never closed: together they form the winners log.
#[account]
#[derive(InitSpace)]
pub struct WinnerRecord {
    pub round_id: u64,
    pub bump: u8,
    pub participant: Pubkey,
    /// Deposit share plus interest share paid to the winner.
    pub payout: u64,
    pub interest_payout: u64,
    pub random_value: u64,
    pub settled_at: i64,
}

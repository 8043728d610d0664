use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use solana_sha256_hasher::hashv;

use crate::{errors::LotteryError, state::RandomnessRequest};

// Ed25519SigVerify111111111111111111111111111
pub fn ed25519_program_id() -> Pubkey {
    Pubkey::new_from_array([
        3, 125, 70, 214, 124, 147, 251, 190, 18, 249, 66, 143, 131, 141, 64, 255,
        5, 112, 116, 73, 39, 244, 138, 100, 252, 202, 112, 68, 128, 0, 0, 0,
    ])
}

// -----------------
// Seeds
// -----------------
pub const CONFIG_SEED: &[u8] = b"config_v1";
pub const ROUND_REGISTRY_SEED: &[u8] = b"round_registry_v1";
pub const ROUND_SEED: &[u8] = b"round_v1";
pub const ROUND_VAULT_SEED: &[u8] = b"round_vault_v1";
pub const WINNER_SEED: &[u8] = b"winner_v1";

pub const INTEREST_POOL_SEED: &[u8] = b"interest_pool_v1";
pub const INTEREST_VAULT_SEED: &[u8] = b"interest_vault_v1";

const REQUEST_DOMAIN: &[u8] = b"savings-lottery:request_v1";
const FULFILL_DOMAIN: &[u8] = b"savings-lottery:fulfill_v1";

// -------------------------
// Randomness requests
// -------------------------

/// Request ids are unique per (round, attempt) and unpredictable before the slot lands,
/// so an expired request's id is never reissued.
pub fn derive_request_id(
    program_id: &Pubkey,
    round_id: u64,
    request_count: u32,
    slot: u64,
) -> [u8; 32] {
    hashv(&[
        REQUEST_DOMAIN,
        program_id.as_ref(),
        round_id.to_le_bytes().as_ref(),
        request_count.to_le_bytes().as_ref(),
        slot.to_le_bytes().as_ref(),
    ])
    .to_bytes()
}

/// Outbound half of the oracle gateway: builds the request the round will wait on.
/// The oracle learns about it from the `RandomnessRequested` event.
pub fn issue_request(
    program_id: &Pubkey,
    round_id: u64,
    request_count: u32,
    slot: u64,
    now: i64,
) -> RandomnessRequest {
    RandomnessRequest {
        request_id: derive_request_id(program_id, round_id, request_count, slot),
        round_id,
        requested_at: now,
    }
}

// -------------------------
// Oracle fulfillment msg + ed25519 parsing
// -------------------------
pub fn expected_fulfill_msg(
    program_id: &Pubkey,
    round_id: u64,
    request_id: &[u8; 32],
    random_value: u64,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(FULFILL_DOMAIN.len() + 32 + 8 + 32 + 8);
    out.extend_from_slice(FULFILL_DOMAIN);
    out.extend_from_slice(program_id.as_ref());
    out.extend_from_slice(&round_id.to_le_bytes());
    out.extend_from_slice(request_id);
    out.extend_from_slice(&random_value.to_le_bytes());
    out
}

/// Offsets header of a single-signature ed25519 verify instruction.
struct Ed25519Offsets {
    sig_ix: u16,
    pubkey_offset: usize,
    pubkey_ix: u16,
    msg_offset: usize,
    msg_len: usize,
    msg_ix: u16,
}

impl Ed25519Offsets {
    // [num_sigs: u8, padding: u8, then seven u16 fields]
    const HEADER_LEN: usize = 16;

    fn read(data: &[u8]) -> Result<Self> {
        require!(data.len() >= Self::HEADER_LEN, LotteryError::MissingOrInvalidEd25519Ix);
        require!(data[0] == 1, LotteryError::MissingOrInvalidEd25519Ix);

        let field = |i: usize| u16::from_le_bytes([data[2 + 2 * i], data[3 + 2 * i]]);
        Ok(Self {
            sig_ix: field(1),
            pubkey_offset: field(2) as usize,
            pubkey_ix: field(3),
            msg_offset: field(4) as usize,
            msg_len: field(5) as usize,
            msg_ix: field(6),
        })
    }

    /// Every index must be `u16::MAX`, i.e. point into the verify instruction itself.
    fn self_contained(&self) -> bool {
        [self.sig_ix, self.pubkey_ix, self.msg_ix]
            .iter()
            .all(|&ix| ix == u16::MAX)
    }
}

pub fn parse_ed25519_ix_pubkey_and_msg(ix: &Instruction) -> Result<(Pubkey, Vec<u8>)> {
    require_keys_eq!(
        ix.program_id,
        ed25519_program_id(),
        LotteryError::MissingOrInvalidEd25519Ix
    );

    let offsets = Ed25519Offsets::read(&ix.data)?;
    require!(offsets.self_contained(), LotteryError::MissingOrInvalidEd25519Ix);

    let pubkey = ix
        .data
        .get(offsets.pubkey_offset..offsets.pubkey_offset + 32)
        .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok())
        .ok_or(LotteryError::MissingOrInvalidEd25519Ix)?;
    let msg = ix
        .data
        .get(offsets.msg_offset..offsets.msg_offset + offsets.msg_len)
        .ok_or(LotteryError::MissingOrInvalidEd25519Ix)?
        .to_vec();

    Ok((Pubkey::new_from_array(pubkey), msg))
}

pub fn assert_ed25519_ix_matches(
    ix: &Instruction,
    expected_pubkey: &Pubkey,
    expected_msg: &[u8],
) -> Result<()> {
    let (pk, msg) = parse_ed25519_ix_pubkey_and_msg(ix)?;

    require_keys_eq!(pk, *expected_pubkey, LotteryError::Ed25519PubkeyMismatch);
    require!(msg.as_slice() == expected_msg, LotteryError::Ed25519MessageMismatch);

    Ok(())
}

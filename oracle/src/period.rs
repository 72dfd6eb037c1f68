//! Vote period arithmetic.
//!
//! A vote period is `vote_period` consecutive blocks; period `n` covers
//! heights `n * vote_period .. (n + 1) * vote_period`.

use std::num::NonZeroU64;

/// Prevotes are not started this close to the end of a period.
pub const LOCKOUT_BLOCKS: u64 = 4;

pub fn period_of(height: u64, vote_period: NonZeroU64) -> u64 {
    height / vote_period.get()
}

/// First height of the period after `period`.
pub fn cycle_end_height(period: u64, vote_period: NonZeroU64) -> u64 {
    period.saturating_add(1).saturating_mul(vote_period.get())
}

pub fn blocks_until_cycle_end(height: u64, vote_period: NonZeroU64) -> u64 {
    cycle_end_height(period_of(height, vote_period), vote_period) - height
}

/// True in the last [`LOCKOUT_BLOCKS`] heights of a period, where a prevote
/// could not be reliably included before the period turns over.
pub fn in_prevote_lockout(height: u64, vote_period: NonZeroU64) -> bool {
    height.saturating_add(LOCKOUT_BLOCKS) >= cycle_end_height(period_of(height, vote_period), vote_period)
}

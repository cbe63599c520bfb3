// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Role, pause and cooldown checks. Every check is a pure predicate; operations run all of
//! their checks before touching state.

use crate::LedgerError;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Who is invoking an operation, resolved once at the edge of the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Caller {
    /// Any account. Whether it is the owner or a provider is decided against current roles.
    Account(Address),
    /// The authenticated decryption oracle delivering a callback.
    Oracle,
}

impl Caller {
    pub fn account(&self) -> Option<Address> {
        match self {
            Caller::Account(address) => Some(*address),
            Caller::Oracle => None,
        }
    }
}

impl From<Address> for Caller {
    fn from(value: Address) -> Self {
        Caller::Account(value)
    }
}

/// Actions that are rate limited per actor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateLimited {
    Submission,
    DecryptionRequest,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    pub owner: Address,
    /// Explicitly added providers. The owner is a provider whether or not it is listed here.
    pub providers: BTreeSet<Address>,
}

impl Roles {
    pub fn new(owner: Address, providers: impl IntoIterator<Item = Address>) -> Self {
        let providers = providers.into_iter().filter(|p| *p != owner).collect();
        Self { owner, providers }
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.owner == *address
    }

    pub fn is_provider(&self, address: &Address) -> bool {
        self.is_owner(address) || self.providers.contains(address)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyState {
    pub paused: bool,
    pub cooldown_seconds: u64,
    pub last_submission: BTreeMap<Address, u64>,
    pub last_decryption_request: BTreeMap<Address, u64>,
}

impl SafetyState {
    pub fn new(paused: bool, cooldown_seconds: u64) -> Self {
        Self {
            paused,
            cooldown_seconds,
            last_submission: BTreeMap::new(),
            last_decryption_request: BTreeMap::new(),
        }
    }

    pub fn table(&self, action: RateLimited) -> &BTreeMap<Address, u64> {
        match action {
            RateLimited::Submission => &self.last_submission,
            RateLimited::DecryptionRequest => &self.last_decryption_request,
        }
    }

    pub fn record(&mut self, actor: Address, action: RateLimited, now: u64) {
        let table = match action {
            RateLimited::Submission => &mut self.last_submission,
            RateLimited::DecryptionRequest => &mut self.last_decryption_request,
        };
        table.insert(actor, now);
    }

    /// Seconds until `actor` may perform `action` again, 0 when allowed now
    pub fn cooldown_remaining(&self, actor: &Address, action: RateLimited, now: u64) -> u64 {
        remaining(self.table(action), actor, self.cooldown_seconds, now)
    }
}

fn remaining(table: &BTreeMap<Address, u64>, actor: &Address, cooldown: u64, now: u64) -> u64 {
    match table.get(actor) {
        Some(last) => last.saturating_add(cooldown).saturating_sub(now),
        None => 0,
    }
}

pub fn require_owner(roles: &Roles, caller: &Caller) -> Result<Address, LedgerError> {
    match caller {
        Caller::Account(address) if roles.is_owner(address) => Ok(*address),
        Caller::Account(address) => Err(LedgerError::NotOwner(*address)),
        Caller::Oracle => Err(LedgerError::NotOwner(Address::ZERO)),
    }
}

pub fn require_provider(roles: &Roles, caller: &Caller) -> Result<Address, LedgerError> {
    match caller {
        Caller::Account(address) if roles.is_provider(address) => Ok(*address),
        Caller::Account(address) => Err(LedgerError::NotProvider(*address)),
        Caller::Oracle => Err(LedgerError::NotProvider(Address::ZERO)),
    }
}

/// Any account may donate; the oracle capability may not.
pub fn require_account(caller: &Caller) -> Result<Address, LedgerError> {
    caller
        .account()
        .ok_or_else(|| LedgerError::InvalidArgument("oracle cannot act as a donor".to_string()))
}

pub fn require_oracle(caller: &Caller) -> Result<(), LedgerError> {
    match caller {
        Caller::Oracle => Ok(()),
        Caller::Account(_) => Err(LedgerError::NotOracle),
    }
}

pub fn require_not_paused(safety: &SafetyState) -> Result<(), LedgerError> {
    if safety.paused {
        return Err(LedgerError::Paused);
    }
    Ok(())
}

/// Allowed once `now >= last + cooldown_seconds`
pub fn require_cooldown_elapsed(
    actor: &Address,
    table: &BTreeMap<Address, u64>,
    cooldown_seconds: u64,
    now: u64,
) -> Result<(), LedgerError> {
    let remaining = remaining(table, actor, cooldown_seconds, now);
    if remaining > 0 {
        return Err(LedgerError::CooldownActive {
            actor: *actor,
            remaining,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const OWNER: Address = address!("0x00000000000000000000000000000000000000aa");
    const OTHER: Address = address!("0x00000000000000000000000000000000000000bb");

    #[test]
    fn owner_is_always_a_provider() {
        let roles = Roles::new(OWNER, []);
        assert!(roles.is_provider(&OWNER));
        assert_eq!(require_provider(&roles, &Caller::Account(OWNER)), Ok(OWNER));
        assert_eq!(
            require_provider(&roles, &Caller::Account(OTHER)),
            Err(LedgerError::NotProvider(OTHER))
        );
    }

    #[test]
    fn only_the_owner_passes_the_owner_check() {
        let roles = Roles::new(OWNER, [OTHER]);
        assert!(require_owner(&roles, &OWNER.into()).is_ok());
        assert_eq!(
            require_owner(&roles, &OTHER.into()),
            Err(LedgerError::NotOwner(OTHER))
        );
        assert!(require_owner(&roles, &Caller::Oracle).is_err());
    }

    #[test]
    fn oracle_capability_is_distinct_from_accounts() {
        assert!(require_oracle(&Caller::Oracle).is_ok());
        assert_eq!(
            require_oracle(&Caller::Account(OWNER)),
            Err(LedgerError::NotOracle)
        );
        assert!(require_account(&Caller::Oracle).is_err());
    }

    #[test]
    fn cooldown_boundary_is_inclusive() {
        let mut safety = SafetyState::new(false, 60);
        safety.record(OWNER, RateLimited::Submission, 1_000);
        let table = safety.table(RateLimited::Submission);

        assert_eq!(
            require_cooldown_elapsed(&OWNER, table, 60, 1_059),
            Err(LedgerError::CooldownActive {
                actor: OWNER,
                remaining: 1
            })
        );
        assert!(require_cooldown_elapsed(&OWNER, table, 60, 1_060).is_ok());
        // Other actors and other actions are unaffected
        assert!(require_cooldown_elapsed(&OTHER, table, 60, 1_000).is_ok());
        assert_eq!(
            safety.cooldown_remaining(&OWNER, RateLimited::DecryptionRequest, 1_000),
            0
        );
    }

    #[test]
    fn pause_blocks() {
        let mut safety = SafetyState::new(false, 1);
        assert!(require_not_paused(&safety).is_ok());
        safety.paused = true;
        assert_eq!(require_not_paused(&safety), Err(LedgerError::Paused));
    }
}

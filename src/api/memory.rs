use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;

use super::{Account, AccountApi, AccountId, Gender};
use crate::error::ApiError;

/// Kind of call made against a [`MemoryAccountApi`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Update,
    Delete,
}

/// In-process backend used by `--demo` and by tests.
///
/// Records every call and can be told to fail the next call of a given kind.
#[derive(Default)]
pub struct MemoryAccountApi {
    accounts: Mutex<BTreeMap<AccountId, Account>>,
    failures: Mutex<Vec<(Operation, String)>>,
    calls: Mutex<Vec<(Operation, AccountId)>>,
    latency: Duration,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryAccountApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let api = Self::new();
        for account in accounts {
            api.insert(account);
        }
        api
    }

    /// Store pre-filled with one sample account (id `1`).
    pub fn demo() -> Self {
        let mut account = Account::new(AccountId::new("1"), "jdoe", "MEMBER");
        account.full_name = Some("Jane Doe".into());
        account.email = Some("jane.doe@example.com".into());
        account.phone = Some("0901234567".into());
        account.address = Some("12 Nguyen Hue, District 1".into());
        account.cccd = Some("079190000001".into());
        account.type_blood = Some("O+".into());
        account.gender = Some(Gender::Female);
        account.birthdate = NaiveDate::from_ymd_opt(1990, 4, 12);
        Self::with_accounts([account]).with_latency(Duration::from_millis(300))
    }

    /// Sleep this long inside every call, to mimic a remote round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn insert(&self, account: Account) {
        lock(&self.accounts).insert(account.user_id.clone(), account);
    }

    pub fn get(&self, id: &AccountId) -> Option<Account> {
        lock(&self.accounts).get(id).cloned()
    }

    /// Make the next call of kind `op` fail with `message`.
    pub fn fail_next(&self, op: Operation, message: impl Into<String>) {
        lock(&self.failures).push((op, message.into()));
    }

    /// Number of calls of kind `op` seen so far.
    pub fn calls(&self, op: Operation) -> usize {
        lock(&self.calls).iter().filter(|(o, _)| *o == op).count()
    }

    fn enter(&self, op: Operation, id: &AccountId) -> Result<(), ApiError> {
        lock(&self.calls).push((op, id.clone()));
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let mut failures = lock(&self.failures);
        if let Some(pos) = failures.iter().position(|(o, _)| *o == op) {
            let (_, message) = failures.remove(pos);
            return Err(ApiError::Unavailable(message));
        }
        Ok(())
    }
}

impl AccountApi for MemoryAccountApi {
    fn fetch_account(&self, id: &AccountId) -> Result<Account, ApiError> {
        self.enter(Operation::Fetch, id)?;
        self.get(id).ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    fn update_account(&self, id: &AccountId, account: &Account) -> Result<Account, ApiError> {
        self.enter(Operation::Update, id)?;
        let mut accounts = lock(&self.accounts);
        let slot = accounts
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        *slot = account.clone();
        Ok(account.clone())
    }

    fn delete_account(&self, id: &AccountId) -> Result<(), ApiError> {
        self.enter(Operation::Delete, id)?;
        lock(&self.accounts)
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }
}

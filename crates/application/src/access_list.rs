//! Allow/deny list membership over CIDR entries.

use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

use ipnet::IpNet;

use bruteguard_core::{AppError, AppResult};
use bruteguard_domain::AccessList;

use crate::store::CounterStore;

/// Evaluates address membership in the whitelist/blacklist sets.
///
/// Membership is subnet containment, not exact string match, so every check
/// is a linear scan over the full member set.
#[derive(Clone)]
pub struct AccessListEvaluator {
    store: Arc<dyn CounterStore>,
}

impl AccessListEvaluator {
    /// Creates an evaluator over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Returns true if `address` falls within any entry of the named list.
    ///
    /// Entries that fail to parse as CIDR networks are skipped with a
    /// warning; malformed persisted data never aborts the check.
    pub async fn is_member(&self, address: IpAddr, list: AccessList) -> AppResult<bool> {
        let entries = self.store.members(list.set_name()).await?;

        for entry in &entries {
            let network = match IpNet::from_str(entry) {
                Ok(network) => network,
                Err(error) => {
                    tracing::warn!(
                        list = list.set_name(),
                        entry,
                        %error,
                        "skipping malformed access list entry"
                    );
                    continue;
                }
            };

            if network.contains(&address) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Adds a CIDR entry to the named list.
    ///
    /// The entry must be in CIDR form; a bare address needs a `/32` (IPv4)
    /// or `/128` (IPv6) suffix. Invalid input mutates nothing.
    pub async fn add_entry(&self, list: AccessList, entry: &str) -> AppResult<()> {
        Self::validate_cidr(entry)?;
        self.store.add_member(list.set_name(), entry).await?;
        tracing::info!(list = list.set_name(), entry, "access list entry added");
        Ok(())
    }

    /// Removes an entry from the named list by exact string match.
    ///
    /// A semantically equivalent but differently formatted entry (a bare
    /// `/32` form versus the one actually stored) will not match.
    pub async fn remove_entry(&self, list: AccessList, entry: &str) -> AppResult<()> {
        Self::validate_cidr(entry)?;
        self.store.remove_member(list.set_name(), entry).await?;
        tracing::info!(list = list.set_name(), entry, "access list entry removed");
        Ok(())
    }

    fn validate_cidr(entry: &str) -> AppResult<()> {
        IpNet::from_str(entry).map_err(|error| {
            AppError::Validation(format!("'{entry}' is not a valid CIDR network: {error}"))
        })?;
        Ok(())
    }
}

//! Per-wallet verification signatures
//!
//! Ordered by insertion. Addresses are normalized by [`WalletAddress`], so two
//! entries can never differ only in letter case.

use tracing::debug;

use crate::domain::{WalletAddress, WalletWithSignature};
use crate::error::{ClaimError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEntry {
    pub wallet_address: WalletAddress,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    entries: Vec<SignatureEntry>,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a wallet with no signature yet.
    ///
    /// Returns false without changes when there is no active connection or
    /// the wallet is already tracked.
    pub fn add(&mut self, wallet: &WalletAddress, connected: bool) -> bool {
        if !connected || self.contains(wallet) {
            return false;
        }
        debug!("Tracking wallet {} for verification", wallet);
        self.entries.push(SignatureEntry {
            wallet_address: wallet.clone(),
            signature: None,
        });
        true
    }

    pub fn remove(&mut self, wallet: &WalletAddress) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.wallet_address != wallet);
        before != self.entries.len()
    }

    /// Replace the signature of a tracked wallet.
    ///
    /// A wallet removed while its signing prompt was open yields `NotFound`;
    /// callers treat that as a no-op.
    pub fn set_signature(&mut self, wallet: &WalletAddress, signature: String) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| &e.wallet_address == wallet)
            .ok_or_else(|| ClaimError::NotFound(wallet.to_string()))?;
        entry.signature = Some(signature);
        Ok(())
    }

    pub fn clear_signatures(&mut self) {
        for entry in &mut self.entries {
            entry.signature = None;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, wallet: &WalletAddress) -> bool {
        self.entries.iter().any(|e| &e.wallet_address == wallet)
    }

    pub fn get(&self, wallet: &WalletAddress) -> Option<&SignatureEntry> {
        self.entries.iter().find(|e| &e.wallet_address == wallet)
    }

    pub fn signature_of(&self, wallet: &WalletAddress) -> Option<&str> {
        self.get(wallet).and_then(|e| e.signature.as_deref())
    }

    pub fn addresses(&self) -> Vec<WalletAddress> {
        self.entries.iter().map(|e| e.wallet_address.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignatureEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire form, as sent to and received from the reward service
    pub fn to_wallets_with_signature(&self) -> Vec<WalletWithSignature> {
        self.entries
            .iter()
            .map(|e| WalletWithSignature {
                wallet_address: e.wallet_address.to_string(),
                signature: e.signature.clone(),
            })
            .collect()
    }
}

use async_trait::async_trait;
use ethers::signers::{LocalWallet, Signer as EthersSigner};
use tracing::info;
use zeroize::Zeroize;

use crate::domain::WalletAddress;
use crate::error::{ClaimError, Result};
use crate::gateway::WalletSigner;

/// Wallet backed by a local private key, signing EIP-191 personal messages.
///
/// # Security
/// The private key string is zeroized right after the wallet is built and
/// is never kept on the struct.
#[derive(Clone)]
pub struct LocalWalletSigner {
    inner: LocalWallet,
    address: WalletAddress,
}

impl LocalWalletSigner {
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let mut secure_key = private_key.trim().trim_start_matches("0x").to_string();
        let parsed = secure_key.parse::<LocalWallet>();
        secure_key.zeroize();

        let inner = parsed.map_err(|e| ClaimError::Wallet(format!("Invalid private key: {}", e)))?;
        let address = WalletAddress::parse(&format!("{:?}", inner.address()))?;

        info!("Wallet loaded: {} (private key zeroized from memory)", address.short());
        Ok(Self { inner, address })
    }

    /// Load the key from the environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self> {
        let mut private_key = std::env::var(var)
            .map_err(|_| ClaimError::Wallet(format!("{} environment variable not set", var)))?;

        let result = Self::from_private_key(&private_key);
        private_key.zeroize();
        result
    }
}

#[async_trait]
impl WalletSigner for LocalWalletSigner {
    fn address(&self) -> WalletAddress {
        self.address.clone()
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        let signature = self
            .inner
            .sign_message(message)
            .await
            .map_err(|e| ClaimError::Signature(format!("Failed to sign message: {}", e)))?;
        Ok(format!("0x{}", hex::encode(signature.to_vec())))
    }
}

impl std::fmt::Debug for LocalWalletSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWalletSigner")
            .field("address", &self.address)
            .finish()
    }
}

use crate::error::{Error, Result};
use ed25519_dalek::{Signer, SigningKey};
use std::fmt;
use stellar_xdr::curr as xdr;

/// The single signing credential every submission is signed with.
pub struct Keypair {
    signing_key: SigningKey,
    public_key: String,
}

impl Keypair {
    /// Load from a Stellar secret seed (`S...`).
    pub fn from_secret(secret: &str) -> Result<Self> {
        let seed = stellar_strkey::ed25519::PrivateKey::from_string(secret.trim())
            .map_err(|_| Error::InvalidKey("admin secret is not a valid Stellar secret seed".into()))?;
        Ok(Self::from_seed(seed.0))
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let public_key =
            stellar_strkey::ed25519::PublicKey(signing_key.verifying_key().to_bytes()).to_string();
        Keypair {
            signing_key,
            public_key,
        }
    }

    /// Public key as a `G...` strkey.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign a 32-byte transaction hash and wrap it with the key hint.
    pub fn sign_decorated(&self, hash: &[u8; 32]) -> Result<xdr::DecoratedSignature> {
        let public_key = self.public_key_bytes();
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&public_key[28..]);

        let signature = self.signing_key.sign(hash);
        Ok(xdr::DecoratedSignature {
            hint: xdr::SignatureHint(hint),
            signature: xdr::Signature(signature.to_bytes().to_vec().try_into()?),
        })
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

//! Signed credential issuance and validation
//!
//! Three credential kinds, each signed with its own HMAC secret: access,
//! refresh and channel-verification. Subjects and extra claim values are
//! sealed with [`ClaimCipher`](crate::services::cipher::ClaimCipher) before
//! signing, so a decoded-but-not-decrypted credential exposes nothing but
//! roles and timestamps.

mod codec;
mod config;

pub use codec::{CredentialCodec, CredentialKind};
pub use config::CredentialCodecConfig;

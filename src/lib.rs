#![no_std]
#![warn(missing_docs)]

//! # GLOME - Generic Low-Overhead Message Exchange
//!
//! GLOME is a lightweight message authentication protocol based on X25519
//! keys and HMAC-SHA256. See <https://github.com/google/glome> for details on
//! the protocol, usage patterns and implementations in other languages.
//!
//! Two parties, each holding an X25519 key pair, derive a shared secret and
//! exchange short tags over numbered messages. A tag is computed as
//!
//! ```text
//! HMAC-SHA256(shared_secret || recipient_public || sender_public, counter || message)
//! ```
//!
//! and may be truncated by the sender. The receiver accepts any prefix that is
//! at least as long as its configured minimum.
//!
//! The main entry point is [GlomeBuilder], which validates raw key material
//! and produces an immutable [Session]:
//!
//! ```
//! # #[cfg(feature = "dalek")] {
//! use glome::GlomeBuilder;
//! use hex_literal::hex;
//!
//! let alice_private = hex!("fee1deadfee1deadfee1deadfee1deadfee1deadfee1deadfee1deadfee1dead");
//! let alice_public = hex!("872f435bb8b89d0e3ad62aa2e511074ee195e1c39ef6a88001418be656e3c376");
//! let bob_private = hex!("b105f00db105f00db105f00db105f00db105f00db105f00db105f00db105f00d");
//! let bob_public = hex!("d1b6941bba120bcd131f335da15778d9c68dadd398ae61cf8e7d94484ee65647");
//!
//! let alice = GlomeBuilder::new(&bob_public, 8)?
//!     .set_private_key(&alice_private)?
//!     .build()?;
//! let bob = GlomeBuilder::new(&alice_public, 8)?
//!     .set_private_key(&bob_private)?
//!     .build()?;
//!
//! let tag = alice.generate_tag(b"Hello, world!", 0)?;
//! bob.check_tag(&tag[..8], b"Hello, world!", 0)?;
//! assert!(bob.check_tag(&tag[..8], b"kthxbai", 0).is_err());
//! # }
//! # Ok::<(), glome::Error>(())
//! ```
//!
//! The Rust implementation of GLOME works with its own [PrivateKey] and
//! [PublicKey] traits to support more than one backing cryptography crate.
//! It aims to provide implementations for the crates most commonly used, which
//! can be activated with the corresponding crate feature. The default and
//! recommended setting is to use [x25519_dalek]. Implementations should be
//! verified with the test vectors in the `tests` module.

#[cfg(test)]
extern crate std;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

mod auto;
mod builder;
mod counter;
mod error;
mod session;

pub use auto::AutoSession;
pub use builder::GlomeBuilder;
pub use counter::Counter;
pub use error::{Error, WrongTag};
pub use session::Session;

type HmacSha256 = Hmac<Sha256>;

/// Length of an X25519 private key in bytes.
pub const PRIVATE_KEY_LENGTH: usize = 32;
/// Length of an X25519 public key in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// Shortest tag a session can be configured to accept.
pub const MIN_TAG_LENGTH: usize = 1;
/// Length of an untruncated tag.
pub const MAX_TAG_LENGTH: usize = 32;
/// Smallest message counter.
pub const MIN_CNT_VALUE: u8 = 0;
/// Largest message counter.
pub const MAX_CNT_VALUE: u8 = 255;

/// An X25519 public key.
pub trait PublicKey {
    /// from_bytes decodes a public key from its RFC 7748 byte encoding.
    fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self;

    /// to_bytes encodes the public key as a byte array according to RFC 7748.
    fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH];
}

/// An X25519 private key.
pub trait PrivateKey {
    /// PublicKey is the type of public keys corresponding to this type.
    type PublicKey: PublicKey;

    /// from_bytes loads a private key from its raw scalar bytes.
    fn from_bytes(bytes: &[u8; PRIVATE_KEY_LENGTH]) -> Self;

    /// dh corresponds to the x25519 function from RFC 7748, computing a shared secret from a
    /// private key and a peer key.
    ///
    /// Implementations return [Error::KeyExchange] instead of an all-zero
    /// secret, which low-order peer keys produce.
    fn dh(&self, theirs: &Self::PublicKey) -> Result<[u8; 32], Error>;

    /// public_key computes the public key corresponding to this private key.
    fn public_key(&self) -> Self::PublicKey;
}

/// Prepares the HMAC for a message sent from `sender` to `recipient`.
fn keyed_mac(
    shared: &[u8; 32],
    recipient: &[u8; PUBLIC_KEY_LENGTH],
    sender: &[u8; PUBLIC_KEY_LENGTH],
    ctr: u8,
    msg: &[u8],
) -> HmacSha256 {
    let mut key = Zeroizing::new([0u8; 32 + 2 * PUBLIC_KEY_LENGTH]);
    key[..32].copy_from_slice(shared);
    key[32..32 + PUBLIC_KEY_LENGTH].copy_from_slice(recipient);
    key[32 + PUBLIC_KEY_LENGTH..].copy_from_slice(sender);

    HmacSha256::new_from_slice(&key[..])
        .expect("HMAC can take key of any size")
        .chain_update([ctr])
        .chain_update(msg)
}

/// Compute a GLOME tag.
///
/// The message counter argument `ctr` is used to prevent replay attacks in a
/// series of messages. If only a single message is exchanged between two key
/// pairs, it can be set to `0u8`. The counter value is not secret, but needs
/// to be integrity protected. Usually, this is accomplished by both parties
/// counting sent and received messages internally.
///
/// The returned tag can be verified by the
/// other party, using [verify] with its private key, our public key and the
/// counter.
///
/// Fails with [Error::KeyExchange] if `theirs` is a low-order point.
pub fn tag<T: PrivateKey>(
    ours: &T,
    theirs: &T::PublicKey,
    ctr: u8,
    msg: &[u8],
) -> Result<[u8; 32], Error> {
    let shared = Zeroizing::new(ours.dh(theirs)?);
    Ok(keyed_mac(
        &shared,
        &theirs.to_bytes(),
        &ours.public_key().to_bytes(),
        ctr,
        msg,
    )
    .finalize()
    .into_bytes()
    .into())
}

/// Verify a GLOME tag.
///
/// This verifies tags produced by the [tag] function. The `tag` argument can
/// be shorter than the original 32 bytes, in which case the expected tag is
/// shortened to match the length of the given tag. The caller needs to ensure
/// that the tag is long enough to meet the security requirements, i.e. prevent
/// brute-forcing. [Session::check_tag] enforces a minimum length.
///
/// The return value is `true` if and only if the given tag matches the expected tag.
/// Tags are never accepted from a low-order peer key.
pub fn verify<T: PrivateKey>(
    ours: &T,
    theirs: &T::PublicKey,
    ctr: u8,
    msg: &[u8],
    tag: &[u8],
) -> bool {
    let Ok(shared) = ours.dh(theirs).map(Zeroizing::new) else {
        return false;
    };
    keyed_mac(
        &shared,
        &ours.public_key().to_bytes(),
        &theirs.to_bytes(),
        ctr,
        msg,
    )
    .verify_truncated_left(tag)
    .is_ok()
}

#[cfg(feature = "dalek")]
pub mod dalek;

#[cfg(feature = "openssl")]
pub mod openssl;

#[cfg(test)]
pub mod vectors;

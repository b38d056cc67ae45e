//! [PrivateKey] and [PublicKey] implementations for types in [openssl].
//!
//! Loading and encoding 32-byte X25519 keys cannot fail, so the key
//! conversions in this module panic on openssl errors. Key exchange is
//! different: openssl refuses to derive from a low-order peer key, and
//! [PrivateKey::dh] reports that as [Error::KeyExchange].
//!
//! Sessions use this backend through
//! [GlomeBuilder::build_with](crate::GlomeBuilder::build_with):
//!
//! ```
//! use hex_literal::hex;
//! use openssl::pkey;
//! use glome::GlomeBuilder;
//!
//! let alice_private = hex!("fee1deadfee1deadfee1deadfee1deadfee1deadfee1deadfee1deadfee1dead");
//! let alice_public = hex!("872f435bb8b89d0e3ad62aa2e511074ee195e1c39ef6a88001418be656e3c376");
//! let bob_private = hex!("b105f00db105f00db105f00db105f00db105f00db105f00db105f00db105f00d");
//! let bob_public = hex!("d1b6941bba120bcd131f335da15778d9c68dadd398ae61cf8e7d94484ee65647");
//!
//! let alice = GlomeBuilder::new(&bob_public, 16)?
//!     .set_private_key(&alice_private)?
//!     .build_with::<pkey::PKey<pkey::Private>>()?;
//! let bob = GlomeBuilder::new(&alice_public, 16)?
//!     .set_private_key(&bob_private)?
//!     .build_with::<pkey::PKey<pkey::Private>>()?;
//!
//! let msg = b"Hello, world!";
//! let t = alice.generate_tag(msg, 0)?;
//! bob.check_tag(&t, msg, 0)?;
//! assert!(bob.check_tag(&t, b"kthxbai", 0).is_err());
//! # Ok::<(), glome::Error>(())
//! ```

use openssl::{derive, pkey};

use crate::{Error, PrivateKey, PublicKey};

fn raw_public_key<T: pkey::HasPublic>(key: &pkey::PKeyRef<T>) -> [u8; 32] {
    key.raw_public_key()
        .expect("an X25519 key should be convertible to bytes")
        .try_into()
        .expect("raw public key should be 32 bytes long")
}

impl PublicKey for pkey::PKey<pkey::Public> {
    fn from_bytes(bytes: [u8; 32]) -> Self {
        pkey::PKey::public_key_from_raw_bytes(&bytes, pkey::Id::X25519)
            .expect("32 bytes should load as an X25519 public key")
    }

    fn to_bytes(&self) -> [u8; 32] {
        raw_public_key::<pkey::Public>(self)
    }
}

impl PrivateKey for pkey::PKey<pkey::Private> {
    type PublicKey = pkey::PKey<pkey::Public>;

    fn from_bytes(bytes: &[u8; 32]) -> Self {
        pkey::PKey::private_key_from_raw_bytes(bytes, pkey::Id::X25519)
            .expect("32 bytes should load as an X25519 private key")
    }

    fn dh(&self, theirs: &Self::PublicKey) -> Result<[u8; 32], Error> {
        let mut deriver = derive::Deriver::new(self).map_err(|_| Error::KeyExchange)?;
        deriver.set_peer(theirs).map_err(|_| Error::KeyExchange)?;

        let mut secret = [0u8; 32];
        let n = deriver
            .derive(&mut secret)
            .map_err(|_| Error::KeyExchange)?;
        if n != secret.len() || secret == [0u8; 32] {
            return Err(Error::KeyExchange);
        }
        Ok(secret)
    }

    fn public_key(&self) -> Self::PublicKey {
        <Self::PublicKey as PublicKey>::from_bytes(raw_public_key::<pkey::Private>(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{
        run_low_order_peer_keys, run_session_vectors, run_vector_1, run_vector_2,
    };

    fn load_keypair(b: [u8; 32]) -> (pkey::PKey<pkey::Private>, pkey::PKey<pkey::Public>) {
        let secret = <pkey::PKey<pkey::Private> as PrivateKey>::from_bytes(&b);
        let public = secret.public_key();
        (secret, public)
    }

    #[test]
    fn test_vector_1() {
        run_vector_1(&load_keypair);
    }

    #[test]
    fn test_vector_2() {
        run_vector_2(&load_keypair);
    }

    #[test]
    fn test_session_vectors() {
        run_session_vectors::<pkey::PKey<pkey::Private>>();
    }

    #[test]
    fn rejects_low_order_peer_key() {
        run_low_order_peer_keys::<pkey::PKey<pkey::Private>>();
    }
}

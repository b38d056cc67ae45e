//! [PrivateKey] and [PublicKey] implementations for types in [x25519_dalek].
//!
//! This is the backend behind [GlomeBuilder::build](crate::GlomeBuilder::build).
//! The typed keys can also be used directly:
//!
//! ```
//! use hex_literal::hex;
//! use x25519_dalek::{PublicKey, StaticSecret};
//! use glome::{tag, verify, Session};
//!
//! let alice_private_key: StaticSecret = hex!("fee1deadfee1deadfee1deadfee1deadfee1deadfee1deadfee1deadfee1dead").into();
//! let alice_public_key: PublicKey = (&alice_private_key).into();
//!
//! let bob_private_key: StaticSecret = hex!("b105f00db105f00db105f00db105f00db105f00db105f00db105f00db105f00d").into();
//! let bob_public_key: PublicKey = (&bob_private_key).into();
//!
//! let msg = b"Hello, world!";
//! let t = tag(&alice_private_key, &bob_public_key, 0u8, msg)?;
//! assert!(verify(&bob_private_key, &alice_public_key, 0u8, msg, &t));
//! assert!(!verify(&bob_private_key, &alice_public_key, 0u8, b"kthxbai", &t));
//!
//! let bob = Session::new(&bob_private_key, &alice_public_key, 16)?;
//! bob.check_tag(&t[..16], msg, 0)?;
//! # Ok::<(), glome::Error>(())
//! ```

use x25519_dalek::{PublicKey as DalekPublicKey, StaticSecret};

use crate::{Error, PrivateKey, PublicKey};

impl PublicKey for DalekPublicKey {
    fn from_bytes(bytes: [u8; 32]) -> Self {
        bytes.into()
    }

    fn to_bytes(&self) -> [u8; 32] {
        self.to_bytes()
    }
}

impl PrivateKey for StaticSecret {
    type PublicKey = DalekPublicKey;

    fn from_bytes(bytes: &[u8; 32]) -> Self {
        // StaticSecret only loads from an owned array and zeroizes it on drop;
        // this temporary copy is not wiped.
        StaticSecret::from(*bytes)
    }

    fn dh(&self, theirs: &Self::PublicKey) -> Result<[u8; 32], Error> {
        let shared = self.diffie_hellman(theirs);
        if !shared.was_contributory() {
            return Err(Error::KeyExchange);
        }
        Ok(shared.to_bytes())
    }

    fn public_key(&self) -> Self::PublicKey {
        self.into()
    }
}

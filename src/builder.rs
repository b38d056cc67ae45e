use core::fmt;

use zeroize::Zeroizing;

use crate::session::check_min_peer_tag_len;
use crate::{Error, PrivateKey, PublicKey, Session, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH};

/// Builds a [Session] from raw key bytes.
///
/// Inputs are validated as they are supplied: the peer key and minimum tag
/// length in [new](GlomeBuilder::new), the private key in
/// [set_private_key](GlomeBuilder::set_private_key). A private key is
/// required; the builder never generates one.
///
/// Building twice from the same builder yields equivalent sessions.
#[derive(Clone)]
pub struct GlomeBuilder {
    peer_key: [u8; PUBLIC_KEY_LENGTH],
    min_peer_tag_len: usize,
    private_key: Option<Zeroizing<[u8; PRIVATE_KEY_LENGTH]>>,
}

fn key_bytes<const N: usize>(name: &'static str, key: &[u8]) -> Result<[u8; N], Error> {
    key.try_into().map_err(|_| Error::InvalidKeySize {
        name,
        expected: N,
        actual: key.len(),
    })
}

impl GlomeBuilder {
    /// Starts a builder for a session with the peer owning `peer_key`.
    ///
    /// `min_peer_tag_len` is the shortest truncated tag the session will
    /// accept from the peer and must be in `[1..32]`.
    pub fn new(peer_key: &[u8], min_peer_tag_len: usize) -> Result<Self, Error> {
        let peer_key = key_bytes("peer_key", peer_key)?;
        check_min_peer_tag_len(min_peer_tag_len)?;
        Ok(GlomeBuilder {
            peer_key,
            min_peer_tag_len,
            private_key: None,
        })
    }

    /// Sets our private key, replacing any key set before.
    pub fn set_private_key(mut self, private_key: &[u8]) -> Result<Self, Error> {
        self.private_key = Some(Zeroizing::new(key_bytes("private_key", private_key)?));
        Ok(self)
    }

    /// Builds the session with the default [x25519_dalek] backend.
    #[cfg(feature = "dalek")]
    pub fn build(&self) -> Result<Session, Error> {
        self.build_with::<x25519_dalek::StaticSecret>()
    }

    /// Builds the session, computing our public key and the shared secret
    /// with the backend `K`.
    pub fn build_with<K: PrivateKey>(&self) -> Result<Session, Error> {
        let private_key = self.private_key.as_ref().ok_or(Error::InvalidKeySize {
            name: "private_key",
            expected: PRIVATE_KEY_LENGTH,
            actual: 0,
        })?;
        let ours = K::from_bytes(private_key);
        let theirs = K::PublicKey::from_bytes(self.peer_key);
        Session::new(&ours, &theirs, self.min_peer_tag_len)
    }
}

impl fmt::Debug for GlomeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlomeBuilder")
            .field("peer_key", &self.peer_key)
            .field("min_peer_tag_len", &self.min_peer_tag_len)
            .field("has_private_key", &self.private_key.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_TAG_LENGTH, MIN_TAG_LENGTH};
    use hex_literal::hex;

    const A_PRIVATE: [u8; 32] =
        hex!("fee1deadfee1deadfee1deadfee1deadfee1deadfee1deadfee1deadfee1dead");
    const A_PUBLIC: [u8; 32] =
        hex!("872f435bb8b89d0e3ad62aa2e511074ee195e1c39ef6a88001418be656e3c376");
    const B_PUBLIC: [u8; 32] =
        hex!("d1b6941bba120bcd131f335da15778d9c68dadd398ae61cf8e7d94484ee65647");

    #[test]
    fn rejects_short_peer_key() {
        assert_eq!(
            GlomeBuilder::new(&B_PUBLIC[..31], 32).unwrap_err(),
            Error::InvalidKeySize {
                name: "peer_key",
                expected: 32,
                actual: 31
            }
        );
    }

    #[test]
    fn rejects_short_private_key() {
        let builder = GlomeBuilder::new(&B_PUBLIC, 32).unwrap();
        assert_eq!(
            builder.set_private_key(&A_PRIVATE[..31]).unwrap_err(),
            Error::InvalidKeySize {
                name: "private_key",
                expected: 32,
                actual: 31
            }
        );
    }

    #[test]
    fn peer_key_is_checked_before_tag_length() {
        assert!(matches!(
            GlomeBuilder::new(&[0u8; 33], 0),
            Err(Error::InvalidKeySize {
                name: "peer_key",
                ..
            })
        ));
    }

    #[test]
    fn rejects_min_tag_length_out_of_bounds() {
        for len in [MIN_TAG_LENGTH - 1, MAX_TAG_LENGTH + 1] {
            assert_eq!(
                GlomeBuilder::new(&A_PUBLIC, len).unwrap_err(),
                Error::MinPeerTagLengthOutOfBounds(len)
            );
        }
    }

    #[test]
    fn accepts_min_tag_length_in_bounds() {
        for len in MIN_TAG_LENGTH..=MAX_TAG_LENGTH {
            assert!(GlomeBuilder::new(&A_PUBLIC, len).is_ok(), "length {}", len);
        }
    }

    #[cfg(feature = "dalek")]
    #[test]
    fn build_requires_private_key() {
        let builder = GlomeBuilder::new(&B_PUBLIC, 16).unwrap();
        assert_eq!(
            builder.build().unwrap_err(),
            Error::InvalidKeySize {
                name: "private_key",
                expected: 32,
                actual: 0
            }
        );
    }

    #[cfg(feature = "dalek")]
    #[test]
    fn repeated_builds_are_equivalent() {
        let builder = GlomeBuilder::new(&B_PUBLIC, 16)
            .unwrap()
            .set_private_key(&A_PRIVATE)
            .unwrap();
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert_eq!(first.own_public_key(), &A_PUBLIC);
        assert_eq!(first.own_public_key(), second.own_public_key());
        assert_eq!(
            first.generate_tag(b"msg", 3).unwrap(),
            second.generate_tag(b"msg", 3).unwrap()
        );
    }

    #[cfg(feature = "dalek")]
    #[test]
    fn rejects_own_key_as_peer_key() {
        let builder = GlomeBuilder::new(&A_PUBLIC, 16)
            .unwrap()
            .set_private_key(&A_PRIVATE)
            .unwrap();
        assert_eq!(builder.build().unwrap_err(), Error::IdenticalKeys);
    }

    #[test]
    fn debug_output_omits_private_key() {
        let builder = GlomeBuilder::new(&B_PUBLIC, 16)
            .unwrap()
            .set_private_key(&A_PRIVATE)
            .unwrap();
        let out = std::format!("{:?}", builder);
        assert!(out.contains("has_private_key: true"));
        assert!(!out.contains("254"));
    }
}

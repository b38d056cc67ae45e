//! Immutable GLOME sessions between two key pairs.

use core::fmt;

use hmac::Mac;
use zeroize::Zeroizing;

use crate::{
    keyed_mac, Counter, Error, PrivateKey, PublicKey, WrongTag, MAX_TAG_LENGTH, MIN_TAG_LENGTH,
    PUBLIC_KEY_LENGTH,
};

/// A GLOME session between our key pair and a peer's public key.
///
/// The shared secret and our public key are computed once when the session is
/// created. Afterwards the session is read-only: [generate_tag] and
/// [check_tag] take `&self`, so a session can be shared between threads
/// without locking. The shared secret is overwritten when the session is
/// dropped.
///
/// Tags produced by [generate_tag] are only accepted by the peer's session,
/// never by the session that produced them.
///
/// [generate_tag]: Session::generate_tag
/// [check_tag]: Session::check_tag
#[derive(Clone)]
pub struct Session {
    peer_key: [u8; PUBLIC_KEY_LENGTH],
    own_key: [u8; PUBLIC_KEY_LENGTH],
    shared_secret: Zeroizing<[u8; 32]>,
    min_peer_tag_len: usize,
}

pub(crate) fn check_min_peer_tag_len(min_peer_tag_len: usize) -> Result<(), Error> {
    if !(MIN_TAG_LENGTH..=MAX_TAG_LENGTH).contains(&min_peer_tag_len) {
        return Err(Error::MinPeerTagLengthOutOfBounds(min_peer_tag_len));
    }
    Ok(())
}

impl Session {
    /// Creates a session from typed keys.
    ///
    /// Tags shorter than `min_peer_tag_len` bytes are rejected by
    /// [check_tag](Session::check_tag). Use [GlomeBuilder](crate::GlomeBuilder)
    /// to start from raw bytes.
    pub fn new<K: PrivateKey>(
        ours: &K,
        theirs: &K::PublicKey,
        min_peer_tag_len: usize,
    ) -> Result<Self, Error> {
        check_min_peer_tag_len(min_peer_tag_len)?;

        let peer_key = theirs.to_bytes();
        let own_key = ours.public_key().to_bytes();
        if own_key == peer_key {
            return Err(Error::IdenticalKeys);
        }
        let shared_secret = Zeroizing::new(ours.dh(theirs).map_err(|e| {
            tracing::debug!("key exchange with peer key failed");
            e
        })?);

        tracing::debug!(min_peer_tag_len, "built GLOME session");
        Ok(Session {
            peer_key,
            own_key,
            shared_secret,
            min_peer_tag_len,
        })
    }

    /// Our public key, derived from the private key the session was built with.
    pub fn own_public_key(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.own_key
    }

    /// The peer's public key.
    pub fn peer_public_key(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.peer_key
    }

    /// Shortest peer tag that [check_tag](Session::check_tag) accepts.
    pub fn min_peer_tag_len(&self) -> usize {
        self.min_peer_tag_len
    }

    /// Computes the full 32-byte tag for a message sent to the peer.
    ///
    /// The sender may transmit any prefix of the tag that the peer's minimum
    /// tag length allows.
    pub fn generate_tag<C>(&self, msg: &[u8], counter: C) -> Result<[u8; 32], Error>
    where
        C: TryInto<Counter, Error = Error>,
    {
        Ok(self.tag_with(msg, counter.try_into()?))
    }

    /// Checks a tag the peer produced for `msg` with `counter`.
    ///
    /// `tag` may be truncated to any length between the session's minimum
    /// peer tag length and 32 bytes. The comparison takes the same time
    /// wherever the first differing byte is.
    pub fn check_tag<C>(&self, tag: &[u8], msg: &[u8], counter: C) -> Result<(), Error>
    where
        C: TryInto<Counter, Error = Error>,
    {
        let counter = counter.try_into()?;
        self.check_tag_len(tag)?;
        self.check_with(tag, msg, counter)
    }

    pub(crate) fn tag_with(&self, msg: &[u8], counter: Counter) -> [u8; 32] {
        tracing::trace!(counter = counter.value(), len = msg.len(), "generating tag");
        keyed_mac(
            &self.shared_secret,
            &self.peer_key,
            &self.own_key,
            counter.value(),
            msg,
        )
        .finalize()
        .into_bytes()
        .into()
    }

    pub(crate) fn check_tag_len(&self, tag: &[u8]) -> Result<(), Error> {
        if tag.len() < self.min_peer_tag_len || tag.len() > MAX_TAG_LENGTH {
            tracing::debug!(len = tag.len(), "rejected tag with invalid length");
            return Err(WrongTag::Length {
                min: self.min_peer_tag_len,
                max: MAX_TAG_LENGTH,
                got: tag.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Compares `tag` against the peer's expected tag. The length must have
    /// been checked already.
    pub(crate) fn check_with(&self, tag: &[u8], msg: &[u8], counter: Counter) -> Result<(), Error> {
        keyed_mac(
            &self.shared_secret,
            &self.own_key,
            &self.peer_key,
            counter.value(),
            msg,
        )
        .verify_truncated_left(tag)
        .map_err(|_| {
            tracing::debug!(counter = counter.value(), len = tag.len(), "tag mismatch");
            WrongTag::Mismatch.into()
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("peer_key", &self.peer_key)
            .field("own_key", &self.own_key)
            .field("min_peer_tag_len", &self.min_peer_tag_len)
            .finish_non_exhaustive()
    }
}

//! Error types returned by sessions and their builder.

use thiserror::Error;

use crate::{MAX_CNT_VALUE, MAX_TAG_LENGTH, MIN_CNT_VALUE, MIN_TAG_LENGTH};

/// Errors produced while building a [Session](crate::Session) or while
/// generating and checking tags.
///
/// Callers should match on the variant. The messages are stable but meant for
/// humans.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A supplied key does not have the expected length.
    #[error("{name} has invalid size. Expected {expected}, got {actual}.")]
    InvalidKeySize {
        /// Name of the offending parameter.
        name: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// The minimum acceptable peer tag length is outside `[1..32]`.
    #[error(
        "min_peer_tag_len should be in [{min}..{max}] range. Got {0}.",
        min = MIN_TAG_LENGTH,
        max = MAX_TAG_LENGTH
    )]
    MinPeerTagLengthOutOfBounds(usize),

    /// A message counter is outside `[0..255]`.
    #[error(
        "counter should be in [{min}..{max}] range. Got {0}.",
        min = MIN_CNT_VALUE,
        max = MAX_CNT_VALUE
    )]
    CounterOutOfBounds(i128),

    /// X25519 with the peer key produced no usable shared secret, e.g. because
    /// the peer key is a low-order point.
    #[error("key exchange with the peer key failed")]
    KeyExchange,

    /// The peer public key equals our own public key, so the two directions of
    /// the session could not be told apart.
    #[error("peer key equals own public key")]
    IdenticalKeys,

    /// A received tag was rejected.
    #[error(transparent)]
    WrongTag(#[from] WrongTag),
}

/// Reasons for rejecting a received tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WrongTag {
    /// The tag is shorter than the session's minimum or longer than a full tag.
    #[error("received tag has invalid length. Expected value in range [{min}..{max}], got {got}.")]
    Length {
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
        /// Length of the received tag.
        got: usize,
    },

    /// The tag has an acceptable length but does not match.
    #[error("received tag doesn't match the expected tag")]
    Mismatch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn messages_name_the_accepted_ranges() {
        let e = Error::InvalidKeySize {
            name: "peer_key",
            expected: 32,
            actual: 31,
        };
        assert_eq!(e.to_string(), "peer_key has invalid size. Expected 32, got 31.");
        assert_eq!(
            Error::MinPeerTagLengthOutOfBounds(33).to_string(),
            "min_peer_tag_len should be in [1..32] range. Got 33."
        );
        assert_eq!(
            Error::CounterOutOfBounds(-1).to_string(),
            "counter should be in [0..255] range. Got -1."
        );
        assert_eq!(
            Error::KeyExchange.to_string(),
            "key exchange with the peer key failed"
        );
        assert_eq!(
            Error::from(WrongTag::Length {
                min: 28,
                max: 32,
                got: 27
            })
            .to_string(),
            "received tag has invalid length. Expected value in range [28..32], got 27."
        );
        assert_eq!(
            Error::WrongTag(WrongTag::Mismatch).to_string(),
            "received tag doesn't match the expected tag"
        );
    }
}

use crate::{Counter, Error, Session, WrongTag};

/// A [Session] that keeps track of message counters.
///
/// Every call to [tag](AutoSession::tag) uses the next sending counter. Every
/// successful [check](AutoSession::check) advances the receiving counter past
/// the counter the tag matched. Both counters wrap from 255 to 0.
///
/// With a skippable range of `n`, [check](AutoSession::check) also accepts
/// tags made with any of the `n` counters following the expected one, so that
/// up to `n` lost messages do not desynchronise the parties.
#[derive(Debug, Clone)]
pub struct AutoSession {
    session: Session,
    sending_counter: u8,
    receiving_counter: u8,
    skippable_range: u8,
}

impl AutoSession {
    /// Wraps `session` with both counters at 0 and no skippable range.
    pub fn new(session: Session) -> Self {
        AutoSession {
            session,
            sending_counter: 0,
            receiving_counter: 0,
            skippable_range: 0,
        }
    }

    /// Sets how many counter values may be skipped when checking a tag.
    pub fn with_skippable_range(mut self, skippable_range: u8) -> Self {
        self.skippable_range = skippable_range;
        self
    }

    /// The wrapped session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Counter the next generated tag will use.
    pub fn sending_counter(&self) -> u8 {
        self.sending_counter
    }

    /// Counter the next received tag is expected to use.
    pub fn receiving_counter(&self) -> u8 {
        self.receiving_counter
    }

    /// Number of counter values [check](AutoSession::check) may skip.
    pub fn skippable_range(&self) -> u8 {
        self.skippable_range
    }

    /// Overrides the sending counter.
    pub fn set_sending_counter<C>(&mut self, counter: C) -> Result<(), Error>
    where
        C: TryInto<Counter, Error = Error>,
    {
        self.sending_counter = counter.try_into()?.value();
        Ok(())
    }

    /// Overrides the receiving counter.
    pub fn set_receiving_counter<C>(&mut self, counter: C) -> Result<(), Error>
    where
        C: TryInto<Counter, Error = Error>,
    {
        self.receiving_counter = counter.try_into()?.value();
        Ok(())
    }

    /// Tags `msg` with the current sending counter and advances the counter.
    pub fn tag(&mut self, msg: &[u8]) -> [u8; 32] {
        let tag = self
            .session
            .tag_with(msg, Counter::from_byte(self.sending_counter));
        self.sending_counter = self.sending_counter.wrapping_add(1);
        tag
    }

    /// Checks a tag from the peer against the receiving counter and the
    /// skippable range after it.
    ///
    /// On success the receiving counter moves past the matching counter. On
    /// failure it is left unchanged.
    pub fn check(&mut self, tag: &[u8], msg: &[u8]) -> Result<(), Error> {
        self.session.check_tag_len(tag)?;

        for skipped in 0..=self.skippable_range {
            let counter = self.receiving_counter.wrapping_add(skipped);
            if self
                .session
                .check_with(tag, msg, Counter::from_byte(counter))
                .is_ok()
            {
                tracing::trace!(counter, skipped, "accepted tag");
                self.receiving_counter = counter.wrapping_add(1);
                return Ok(());
            }
        }
        Err(WrongTag::Mismatch.into())
    }
}

use crate::Error;

/// A message counter in `[0..255]`.
///
/// Sessions accept any primitive integer as a counter and convert it with
/// [TryFrom], so out-of-range values are reported as
/// [Error::CounterOutOfBounds] instead of being truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Counter(u8);

impl Counter {
    pub(crate) const fn from_byte(value: u8) -> Self {
        Counter(value)
    }

    /// The byte fed into the MAC ahead of the message.
    pub fn value(self) -> u8 {
        self.0
    }
}

macro_rules! counter_from_int {
    ($($t:ty),*) => {
        $(
            impl TryFrom<$t> for Counter {
                type Error = Error;

                #[allow(clippy::unnecessary_fallible_conversions)]
                fn try_from(value: $t) -> Result<Self, Error> {
                    u8::try_from(value)
                        .map(Counter)
                        .map_err(|_| Error::CounterOutOfBounds(value as i128))
                }
            }
        )*
    };
}

counter_from_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_byte_value() {
        for n in 0..=255i32 {
            assert_eq!(Counter::try_from(n).map(Counter::value), Ok(n as u8));
        }
    }

    #[test]
    fn rejects_values_outside_a_byte() {
        assert_eq!(Counter::try_from(-1i32), Err(Error::CounterOutOfBounds(-1)));
        assert_eq!(Counter::try_from(256u16), Err(Error::CounterOutOfBounds(256)));
        assert_eq!(
            Counter::try_from(i64::MIN),
            Err(Error::CounterOutOfBounds(i64::MIN as i128))
        );
        assert_eq!(
            Counter::try_from(u64::MAX),
            Err(Error::CounterOutOfBounds(u64::MAX as i128))
        );
    }
}

/// One wire communication error type.
///
/// Protocol anomalies (no presence pulse, collisions, CRC mismatches) are not errors: the
/// search reports them as "no device found" and recovers on its own. Only failures of the
/// platform to drive or sample the line are surfaced here.
#[derive(Debug, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying line.
    Other(E),
    /// The line could not be prepared for use.
    Initialization(E),
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}

impl<E> OneWireError<E> {
    /// Consumes the error, returning the platform error it carries.
    pub fn into_inner(self) -> E {
        match self {
            Self::Other(e) | Self::Initialization(e) => e,
        }
    }
}

use std::{error::Error, fmt};

pub type PeripheralResult<T> = Result<T, PeripheralError>;

#[derive(Debug)]
pub enum PeripheralError {
    /// Stimulus value outside the range the raw encoding can represent.
    OutOfRange {
        quantity: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    Snapshot {
        context: String,
        source: Box<dyn Error + Send + Sync>,
    },
    SnapshotVersion {
        found: u32,
        supported: u32,
    },
}

impl PeripheralError {
    pub(crate) fn snapshot<E>(context: impl Into<String>, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        PeripheralError::Snapshot {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

impl fmt::Display for PeripheralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeripheralError::OutOfRange {
                quantity,
                value,
                min,
                max,
            } => write!(
                f,
                "{quantity} {value} is out of range, use a value from <{min};{max}>"
            ),
            PeripheralError::Snapshot { context, source } => write!(f, "{context}: {source}"),
            PeripheralError::SnapshotVersion { found, supported } => write!(
                f,
                "snapshot version {found} is newer than supported version {supported}"
            ),
        }
    }
}

impl Error for PeripheralError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PeripheralError::Snapshot { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

use crate::types::UserId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A record with an unparsable `userId` or `rating` field. Fatal to
    /// ingestion: no partial dataset is ever served.
    #[error("malformed rating record: {0}")]
    MalformedRecord(#[source] csv::Error),

    /// The dataset contained no rated users, so there is nothing to compare.
    #[error("rating dataset is empty")]
    EmptyDataset,

    /// A neighbor query for a user id absent from the loaded population.
    #[error("unknown user id {0}")]
    UnknownUser(UserId),

    #[error("failed to read rating dataset")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

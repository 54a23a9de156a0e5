//! Error type shared by the smoke-test clients.

use fe2o3_amqp::connection::{self, OpenError};
use fe2o3_amqp::link::{
    DetachError, DispositionError, ReceiverAttachError, RecvError, SendError, SenderAttachError,
};
use fe2o3_amqp::session::{self, BeginError};

/// Everything that can end a client run early.
///
/// Protocol failures are wrapped, not interpreted; the engine's error carries
/// the detail.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configured URL could not be parsed
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    /// Neither an explicit address nor a URL path was configured
    #[error("no target address configured")]
    MissingAddress,

    /// Reading the payload file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The handler did not request a link while handling the start event
    #[error("handler did not request a link")]
    LinkNotRequested,

    /// Opening the connection failed
    #[error(transparent)]
    Open(#[from] OpenError),

    /// Beginning the session failed
    #[error(transparent)]
    Begin(#[from] BeginError),

    /// Attaching the sender link failed
    #[error(transparent)]
    SenderAttach(#[from] SenderAttachError),

    /// Attaching the receiver link failed
    #[error(transparent)]
    ReceiverAttach(#[from] ReceiverAttachError),

    /// Sending a message failed
    #[error(transparent)]
    Send(#[from] SendError),

    /// Receiving a delivery failed
    #[error(transparent)]
    Recv(#[from] RecvError),

    /// Acknowledging a delivery failed
    #[error(transparent)]
    Disposition(#[from] DispositionError),

    /// Closing a link failed
    #[error(transparent)]
    Detach(#[from] DetachError),

    /// Ending the session failed
    #[error(transparent)]
    End(#[from] session::Error),

    /// Closing the connection failed
    #[error(transparent)]
    Close(#[from] connection::Error),

    /// The run did not finish before the configured deadline
    #[error("Timed out")]
    Timeout,
}

/// Result alias with [`ClientError`] as the error type.
pub type Result<T> = std::result::Result<T, ClientError>;

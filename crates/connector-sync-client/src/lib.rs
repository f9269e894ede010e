#![doc = include_str!("../README.md")]

mod connector;
mod invoker;
pub mod queries;
mod remote;
mod session;
mod transport;

pub use connector::ConnectorClient;
pub use invoker::{backoff_delay, Invoker};
pub use remote::ConnectorRemote;
pub use session::CredentialSession;
pub use transport::GraphqlTransport;

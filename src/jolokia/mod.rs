pub mod client;
pub mod mbean;
pub mod request;
pub mod response;
pub mod transport;

pub use client::JolokiaClient;
pub use request::{JolokiaMethod, JolokiaRequest};
pub use response::{normalize, JolokiaResponse};
pub use transport::{Credentials, HttpTransport, JolokiaTransport, RawResponse};

//! Request and response types for the API client.

mod credential;
mod options;
mod response;

pub use credential::{Credential, CredentialSource, NoCredentials};
pub use options::RequestOptions;
pub use response::RawResponse;

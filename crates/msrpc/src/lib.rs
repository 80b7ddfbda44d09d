//! MS-RPC client calls for MS-LSAD and MS-SAMR
//!
//! Each interface operation is a [`RequestCall`]: it marshals its `[in]`
//! parameters after the operation number and names the response object that
//! decodes the `[out]` parameters. [`RpcClient`] moves the marshalled stub
//! over an [`RpcTransport`] and reads the trailing NTSTATUS.
//!
//! ```ignore
//! let mut client = RpcClient::new(transport);
//! let request = SamrEnumerateUsersInDomainRequest::new(domain_handle, 0, 0);
//! let response = client.call(&request)?;
//! for entry in response.payload().entries() {
//!     println!("{} {}", entry.relative_id, entry.name);
//! }
//! ```

mod client;
mod error;
pub mod messages;
pub mod mslsad;
pub mod mssamr;
mod transport;

pub use client::{RpcClient, RpcClientBuilder};
pub use error::{Result, RpcError, TransportError};
pub use messages::{Call, CallResponse, CallState, RequestCall};
pub use transport::RpcTransport;

pub use msrpc_ndr as ndr;

//! ElastiCache IAM credentials.
//!
//! [`IamCredentialProvider`] composes the signer and the token cache into the
//! one operation the cache client needs: "give me a username and password
//! for this identity". The password is a presigned `connect` URL with its
//! `https://` scheme stripped, which is the form the cache's AUTH handshake
//! accepts.
//!
//! # Flow
//!
//! ```text
//! get_credentials() ──► TokenCache ──(miss or expired)──► RequestSigner
//!        ▲                                                      │
//!        └──────────── strip "https://" ◄──── signed URL ◄──────┘
//! ```

mod identity;
mod provider;

pub use identity::Identity;
pub use provider::{Credentials, IamCredentialProvider};

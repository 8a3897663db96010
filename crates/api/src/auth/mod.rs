//! Validation of access tokens issued by the hosted auth provider.
//!
//! Sign-in, sign-up and token refresh happen at the provider; this server
//! only verifies the HS256 tokens it hands out.

pub mod jwt;

//! Account provisioning
//!
//! Binds a wallet's key to an account on its chain. On testnet a failed
//! attempt is classified and replaced by a simulated account so that
//! initialization always ends with an account id; other modes never
//! provision automatically.

mod client;
mod http;
mod outcome;
mod provisioner;

pub use client::*;
pub use http::*;
pub use outcome::*;
pub use provisioner::*;

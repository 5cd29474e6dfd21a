//! Browser implementations of the `market` network seams.
//!
//! SYSTEM CONTEXT
//! ==============
//! `rpc` posts JSON-RPC to the cluster endpoint, `gateway` reads metadata
//! documents and pins uploads through the server proxy, `wallet` bridges to
//! the injected wallet extension, and `market` wires them into the session
//! operations the pages call.
//!
//! Every call has a real `hydrate` branch and a server-render stub; network
//! access only happens in the browser.

pub mod gateway;
pub mod market;
pub mod rpc;
pub mod wallet;

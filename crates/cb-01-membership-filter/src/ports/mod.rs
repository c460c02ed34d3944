//! Ports layer for the membership filter

pub mod inbound;

pub use inbound::MembershipApi;

//! Service layer for the membership filter

mod membership_service;

pub use membership_service::MembershipFilter;

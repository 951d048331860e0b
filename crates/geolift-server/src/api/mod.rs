//! API wire types

pub mod response;

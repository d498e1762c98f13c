//! Company-details domain: the HTTP surface over the intake pipeline.

pub mod routes;

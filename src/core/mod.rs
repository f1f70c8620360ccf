pub mod analysis;
pub mod cluster;
pub mod duplicate;
pub mod extract;
pub mod hash;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub mod connectors;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

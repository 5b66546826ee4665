pub mod constants;
pub mod encoding;
pub mod persisted;
pub mod test_helpers;
pub mod types;

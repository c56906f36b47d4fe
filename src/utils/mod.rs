pub mod errors;
pub mod format;
pub mod retry;
pub mod table;

#[cfg(test)]
pub mod mock_upstream;

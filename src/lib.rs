pub mod balance;
pub mod error;
pub mod money;
pub mod roster;
pub mod routes;
pub mod schemas;
pub mod settlement;

#[cfg(test)]
mod test_support;

pub mod connections;
pub mod devices;
pub mod errors;
pub mod planning;
pub mod project;
pub mod types;

#[cfg(test)]
mod tests;

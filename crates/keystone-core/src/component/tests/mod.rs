// Component test module
#[cfg(test)]
mod identity_tests;
#[cfg(test)]
mod loader_tests;

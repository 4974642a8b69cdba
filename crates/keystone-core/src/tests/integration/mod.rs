#![cfg(test)]

pub mod common;
pub mod container_tests;

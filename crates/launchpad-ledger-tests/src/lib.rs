mod testcase;

#[cfg(test)]
mod component;
#[cfg(test)]
mod deployment;
#[cfg(test)]
mod pull_request;
#[cfg(test)]
mod subscription;

pub use testcase::{ledger_test_case, TestResult};

//! CLI integration tests driving apebuild against fake tools.

#![cfg(unix)]

mod build_tests;
mod plan_tests;

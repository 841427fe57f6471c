#[path = "../common/mod.rs"]
mod common;

mod api_tests;
mod cli_tests;
mod pipeline_tests;

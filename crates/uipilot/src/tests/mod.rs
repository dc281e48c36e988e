
mod query_tests;
mod session_tests;

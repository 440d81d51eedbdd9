mod export_tests;
mod router_tests;
mod utils;

mod export_route_tests;
mod report_tests;
mod upload_tests;

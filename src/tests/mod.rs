mod error_response_tests;
mod events_tests;

mod api_tests;
mod directory_tests;

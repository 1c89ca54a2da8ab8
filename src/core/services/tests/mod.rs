mod ordering_tests;
mod summary_service_tests;

mod compare_tests;
mod listings_tests;
mod recommendations_tests;

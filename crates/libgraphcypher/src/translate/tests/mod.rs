mod cursor_tests;
mod options_tests;
mod predicate_tests;

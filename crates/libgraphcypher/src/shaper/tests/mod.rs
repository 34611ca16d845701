mod exact_average_tests;
mod result_shaper_tests;

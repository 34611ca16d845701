mod db_value_tests;
mod duration_tests;
mod output_coercion_tests;

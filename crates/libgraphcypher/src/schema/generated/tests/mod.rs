mod surface_builder_tests;
mod type_ref_tests;

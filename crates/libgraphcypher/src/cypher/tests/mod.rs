mod cypher_env_tests;
mod statement_builder_tests;

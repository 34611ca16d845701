mod operation_resolver_tests;

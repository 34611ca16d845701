mod request_context_tests;

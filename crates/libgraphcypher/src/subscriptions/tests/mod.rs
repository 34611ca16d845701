mod event_filter_tests;

mod admin_tests;
mod pg_store_tests;
mod rules_tests;

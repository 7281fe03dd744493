mod generate_and_stage_tests;
mod support;

mod link_tests;
mod text_tests;

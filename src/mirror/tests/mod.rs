mod assets_tests;
mod writer_tests;

//! Cross-module tests exercising the engine the way the application does.

mod estimate_tests;

//! Cross-module ECS tests

mod lifecycle;

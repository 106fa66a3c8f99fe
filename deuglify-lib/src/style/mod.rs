pub mod breakpoints;
pub mod class_mapper;
pub mod escape;
pub mod minify;
pub mod rename;
pub mod rule_table;
pub mod synthesizer;
pub mod tokenizer;

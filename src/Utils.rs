//! different utility modules used throughout the project
/// drawing surface: canvas configuration, the `Canvas` trait and a recording canvas that exports to PNG/SVG
pub mod canvas;
/// tiny module to set up logging and save sampled curves into csv
pub mod logger;
/// sampling of parsed equations and smooth Bezier rendering of the samples
pub mod plots;
/// parse task document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into ordered sections
pub mod task_parser;
/// runs a task document from start to finish
pub mod task_runner;

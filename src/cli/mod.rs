// Command-line front end: the local stand-in for the UI and transport layers

pub mod app;

//! External collaborators: transport and HTML parsing.

pub mod parsing;
pub mod web_client;

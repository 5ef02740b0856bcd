pub mod error_messages;

use thiserror::Error;

pub mod client;
pub mod identity;
pub mod server;

pub use client::{ClientCommand, ClientMessage};
pub use identity::{AWAY_SUFFIX, Group, GroupTable, GroupType, to_id};
pub use server::{
    Challenge, ServerFrame, Tokens, field, parse_challenge, parse_server_frame, tokenize_line,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Malformed challenge descriptor: {0:?}")]
    MalformedDescriptor(String),

    #[error("Empty message")]
    EmptyMessage,
}

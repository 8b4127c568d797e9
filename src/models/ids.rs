//! Strongly-typed ID wrappers for document identifiers
//!
//! Documents in the transaction store are keyed by 12-byte object ids,
//! written as 24 hex digits. Using newtype wrappers prevents accidentally
//! mixing up user and transaction ids at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error produced when a string is not a valid object id
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdParseError {
    #[error("expected 24 hex digits, got {0} characters")]
    InvalidLength(usize),

    #[error("invalid hex digit '{0}'")]
    InvalidDigit(char),
}

/// Raw forms an object id can take inside a stored document
#[derive(Deserialize)]
#[serde(untagged)]
enum ObjectIdRepr {
    Hex(String),
    Extended {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

/// A 12-byte document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "ObjectIdRepr", into = "String")]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Parse an object id from its 24-hex-digit form
    pub fn parse_str(s: &str) -> Result<Self, IdParseError> {
        let digits: Vec<char> = s.trim().chars().collect();
        if digits.len() != 24 {
            return Err(IdParseError::InvalidLength(digits.len()));
        }

        let mut bytes = [0u8; 12];
        for (i, pair) in digits.chunks(2).enumerate() {
            let hi = hex_value(pair[0])?;
            let lo = hex_value(pair[1])?;
            bytes[i] = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }

    /// Lowercase hex representation
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

fn hex_value(c: char) -> Result<u8, IdParseError> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or(IdParseError::InvalidDigit(c))
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl TryFrom<ObjectIdRepr> for ObjectId {
    type Error = IdParseError;

    fn try_from(repr: ObjectIdRepr) -> Result<Self, Self::Error> {
        match repr {
            ObjectIdRepr::Hex(s) | ObjectIdRepr::Extended { oid: s } => Self::parse_str(&s),
        }
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_hex()
    }
}

/// Macro to generate ID newtype wrappers over `ObjectId`
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(ObjectId);

        impl $name {
            /// Parse an ID from a string
            pub fn parse(s: &str) -> Result<Self, IdParseError> {
                Ok(Self(ObjectId::parse_str(s)?))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_id!(UserId);
define_id!(TransactionId);

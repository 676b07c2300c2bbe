//! Log Record Module
//!
//! Line format of the operation log: `PUT,<key>,<value>` or `DEL,<key>`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// == Record ==
/// One accepted mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Put { key: String, value: i64 },
    Del { key: String },
}

impl Record {
    pub fn key(&self) -> &str {
        match self {
            Record::Put { key, .. } | Record::Del { key } => key,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Put { key, value } => write!(f, "PUT,{},{}", key, value),
            Record::Del { key } => write!(f, "DEL,{}", key),
        }
    }
}

// == Parse Errors ==
/// Why a log line could not be read back as a record.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("empty line")]
    Empty,

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("{op} record expects {expected} fields, found {found}")]
    FieldCount {
        op: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("empty key")]
    EmptyKey,

    #[error("invalid value '{0}'")]
    InvalidValue(String),
}

impl FromStr for Record {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(RecordError::Empty);
        }

        let fields: Vec<&str> = line.split(',').collect();
        let record = match fields[0] {
            "PUT" => {
                if fields.len() != 3 {
                    return Err(RecordError::FieldCount {
                        op: "PUT",
                        expected: 3,
                        found: fields.len(),
                    });
                }
                let value = fields[2]
                    .parse()
                    .map_err(|_| RecordError::InvalidValue(fields[2].to_string()))?;
                Record::Put {
                    key: fields[1].to_string(),
                    value,
                }
            }
            "DEL" => {
                if fields.len() != 2 {
                    return Err(RecordError::FieldCount {
                        op: "DEL",
                        expected: 2,
                        found: fields.len(),
                    });
                }
                Record::Del {
                    key: fields[1].to_string(),
                }
            }
            other => return Err(RecordError::UnknownOperation(other.to_string())),
        };

        if record.key().is_empty() {
            return Err(RecordError::EmptyKey);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let put = Record::Put {
            key: "x".into(),
            value: -10,
        };
        let del = Record::Del { key: "x".into() };

        assert_eq!(put.to_string(), "PUT,x,-10");
        assert_eq!(del.to_string(), "DEL,x");
    }

    #[test]
    fn test_parse_valid_lines() {
        assert_eq!(
            "PUT,user,42".parse::<Record>(),
            Ok(Record::Put {
                key: "user".into(),
                value: 42
            })
        );
        assert_eq!(
            "DEL,user\r\n".parse::<Record>(),
            Ok(Record::Del { key: "user".into() })
        );
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert_eq!("".parse::<Record>(), Err(RecordError::Empty));
        assert_eq!(
            "GET,x".parse::<Record>(),
            Err(RecordError::UnknownOperation("GET".into()))
        );
        assert!(matches!(
            "PUT,x".parse::<Record>(),
            Err(RecordError::FieldCount { op: "PUT", .. })
        ));
        assert!(matches!(
            "DEL,x,1".parse::<Record>(),
            Err(RecordError::FieldCount { op: "DEL", .. })
        ));
        assert_eq!(
            "PUT,x,ten".parse::<Record>(),
            Err(RecordError::InvalidValue("ten".into()))
        );
        assert_eq!("DEL,".parse::<Record>(), Err(RecordError::EmptyKey));
    }

    #[test]
    fn test_parse_torn_put() {
        // A write cut off before the value leaves a trailing separator
        assert!("PUT,x,".parse::<Record>().is_err());
    }
}

//! Parsing of inbound messages into commands.

use ph_01_location_store::PositionRecord;

use super::{is_signed_decimal, MaxResults, RadiusKm};
use crate::error::{ProtocolError, Result};

pub const VERB_IAMAT: &str = "IAMAT";
pub const VERB_WHATSAT: &str = "WHATSAT";
pub const VERB_AT: &str = "AT";

/// A propagated position update received from another server.
#[derive(Clone, Debug, PartialEq)]
pub struct PeerUpdate {
    /// Server that first accepted the report.
    pub server_id: String,
    /// Rendered time difference, carried through untouched.
    pub time_diff: String,
    pub record: PositionRecord,
}

/// One validated inbound message.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `IAMAT <client_id> <coords> <client_time>`
    Iamat(PositionRecord),
    /// `WHATSAT <client_id> <radius_km> <max_results>`
    Whatsat {
        client_id: String,
        radius: RadiusKm,
        max_results: MaxResults,
    },
    /// `AT <server_id> <time_diff> <client_id> <coords> <client_time>`
    At(PeerUpdate),
}

impl Command {
    /// Tokenize on whitespace and validate by verb.
    ///
    /// # Errors
    ///
    /// Any [`ProtocolError`]; an `AT` message that fails validation always
    /// yields [`ProtocolError::MalformedPeerMessage`].
    pub fn parse(message: &str) -> Result<Self> {
        let tokens: Vec<&str> = message.split_whitespace().collect();
        let Some((&verb, args)) = tokens.split_first() else {
            return Err(ProtocolError::Empty);
        };

        match verb {
            VERB_IAMAT => parse_iamat(args),
            VERB_WHATSAT => parse_whatsat(args),
            VERB_AT => parse_at(args).map_err(|e| match e {
                ProtocolError::MalformedPeerMessage(_) => e,
                other => ProtocolError::MalformedPeerMessage(other.to_string()),
            }),
            other => Err(ProtocolError::UnknownVerb(other.to_string())),
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Iamat(_) => VERB_IAMAT,
            Self::Whatsat { .. } => VERB_WHATSAT,
            Self::At(_) => VERB_AT,
        }
    }
}

fn expect_fields(verb: &'static str, args: &[&str], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ProtocolError::FieldCount {
            verb,
            expected,
            got: args.len(),
        })
    }
}

fn parse_iamat(args: &[&str]) -> Result<Command> {
    expect_fields(VERB_IAMAT, args, 3)?;
    let record = PositionRecord::from_tokens(args[0], args[1], args[2]).map_err(|source| {
        ProtocolError::InvalidPosition {
            verb: VERB_IAMAT,
            source,
        }
    })?;
    Ok(Command::Iamat(record))
}

fn parse_whatsat(args: &[&str]) -> Result<Command> {
    expect_fields(VERB_WHATSAT, args, 3)?;
    Ok(Command::Whatsat {
        client_id: args[0].to_string(),
        radius: RadiusKm::parse(args[1])?,
        max_results: MaxResults::parse(args[2])?,
    })
}

fn parse_at(args: &[&str]) -> Result<Command> {
    expect_fields(VERB_AT, args, 5)?;
    if !is_signed_decimal(args[1]) {
        return Err(ProtocolError::MalformedPeerMessage(format!(
            "time difference {:?} is not a decimal",
            args[1]
        )));
    }
    let record = PositionRecord::from_tokens(args[2], args[3], args[4])
        .map_err(|source| ProtocolError::InvalidPosition {
            verb: VERB_AT,
            source,
        })?;

    Ok(Command::At(PeerUpdate {
        server_id: args[0].to_string(),
        time_diff: args[1].to_string(),
        record,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iamat() {
        let cmd = Command::parse("IAMAT client1 +34.068930-118.445127 1520023934.918963").unwrap();
        let Command::Iamat(record) = cmd else {
            panic!("expected IAMAT");
        };
        assert_eq!(record.client_id, "client1");
        assert_eq!(record.coordinates.as_str(), "+34.068930-118.445127");
        assert_eq!(record.client_time.as_str(), "1520023934.918963");
    }

    #[test]
    fn test_iamat_wrong_arity_and_bad_time() {
        assert_eq!(
            Command::parse("IAMAT client2 bad_time").unwrap_err(),
            ProtocolError::FieldCount {
                verb: VERB_IAMAT,
                expected: 3,
                got: 2
            }
        );
        assert!(matches!(
            Command::parse("IAMAT c +1+1 -5"),
            Err(ProtocolError::InvalidPosition { .. })
        ));
        assert!(matches!(
            Command::parse("IAMAT c 34.0-118.0 5"),
            Err(ProtocolError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn test_parse_whatsat() {
        let cmd = Command::parse("WHATSAT client1 10 5").unwrap();
        assert_eq!(cmd.verb(), VERB_WHATSAT);
        let Command::Whatsat {
            client_id,
            radius,
            max_results,
        } = cmd
        else {
            panic!("expected WHATSAT");
        };
        assert_eq!(client_id, "client1");
        assert_eq!(radius.km(), 10.0);
        assert_eq!(max_results.get(), 5);
    }

    #[test]
    fn test_whatsat_bounds() {
        assert!(Command::parse("WHATSAT c 50 20").is_ok());
        assert!(matches!(
            Command::parse("WHATSAT c 0 5"),
            Err(ProtocolError::InvalidRadius(_))
        ));
        assert!(matches!(
            Command::parse("WHATSAT c 50.0001 5"),
            Err(ProtocolError::InvalidRadius(_))
        ));
        assert!(matches!(
            Command::parse("WHATSAT c 10 21"),
            Err(ProtocolError::InvalidMaxResults(_))
        ));
        assert!(matches!(
            Command::parse("WHATSAT c 10"),
            Err(ProtocolError::FieldCount { .. })
        ));
    }

    #[test]
    fn test_parse_at() {
        let cmd = Command::parse(
            "AT Goloman -0.134963 client1 +34.068930-118.445127 1520023934.918963",
        )
        .unwrap();
        let Command::At(update) = cmd else {
            panic!("expected AT");
        };
        assert_eq!(update.server_id, "Goloman");
        assert_eq!(update.time_diff, "-0.134963");
        assert_eq!(update.record.client_id, "client1");
    }

    #[test]
    fn test_malformed_at_is_never_echoed() {
        for message in [
            "AT Goloman",
            "AT Goloman -0.1 client1 +34-118 notatime",
            "AT Goloman soon client1 +34-118 1.0",
            "AT Goloman +0.1 client1 34.0,118.0 1.0",
        ] {
            let err = Command::parse(message).unwrap_err();
            assert!(
                matches!(err, ProtocolError::MalformedPeerMessage(_)),
                "{message}: {err:?}"
            );
            assert!(!err.is_echoed());
        }
    }

    #[test]
    fn test_unknown_verb_and_empty() {
        assert_eq!(
            Command::parse("HELLO there").unwrap_err(),
            ProtocolError::UnknownVerb("HELLO".into())
        );
        assert_eq!(Command::parse("  \t ").unwrap_err(), ProtocolError::Empty);
        // Verbs are case-sensitive.
        assert!(matches!(
            Command::parse("iamat c +1+1 1"),
            Err(ProtocolError::UnknownVerb(_))
        ));
    }
}

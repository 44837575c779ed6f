//! Decoding of NIP-19 bech32-encoded Nostr entities.
//!
//! Covers the bare entities (`npub`, `note`) and the TLV-carrying shareable
//! identifiers (`nprofile`, `nevent`, `naddr`). Keys and ids decode to
//! lowercase hex; relay hints are passed through as written (normalization
//! happens later in the grammar).

use thiserror::Error;

// TLV types per NIP-19.
const TLV_SPECIAL: u8 = 0;
const TLV_RELAY: u8 = 1;
const TLV_AUTHOR: u8 = 2;
const TLV_KIND: u8 = 3;

/// A decoded NIP-19 entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nip19 {
    /// A bare public key (`npub1…`).
    Npub {
        /// Lowercase hex pubkey.
        pubkey: String,
    },
    /// A bare event id (`note1…`).
    Note {
        /// Lowercase hex event id.
        id: String,
    },
    /// A profile with relay hints (`nprofile1…`).
    Nprofile {
        /// Lowercase hex pubkey.
        pubkey: String,
        /// Relay hint URLs, as encoded.
        relays: Vec<String>,
    },
    /// An event pointer with optional context (`nevent1…`).
    Nevent {
        /// Lowercase hex event id.
        id: String,
        /// Relay hint URLs, as encoded.
        relays: Vec<String>,
        /// Lowercase hex author pubkey, when present.
        author: Option<String>,
        /// Event kind, when present.
        kind: Option<u32>,
    },
    /// A replaceable-event address (`naddr1…`).
    Naddr {
        /// The `d`-tag identifier.
        identifier: String,
        /// Lowercase hex author pubkey.
        pubkey: String,
        /// Event kind.
        kind: u32,
        /// Relay hint URLs, as encoded.
        relays: Vec<String>,
    },
}

impl Nip19 {
    /// The address coordinate `kind:pubkey:identifier` for an `naddr`,
    /// `None` for every other entity.
    pub fn coordinate(&self) -> Option<String> {
        match self {
            Nip19::Naddr {
                identifier,
                pubkey,
                kind,
                ..
            } => Some(format!("{kind}:{pubkey}:{identifier}")),
            _ => None,
        }
    }
}

/// Errors produced by [`decode`].
#[derive(Debug, Error)]
pub enum Nip19Error {
    /// The string is not valid bech32.
    #[error("invalid bech32: {0}")]
    Bech32(#[from] bech32::DecodeError),

    /// The human-readable prefix is not a known NIP-19 entity.
    #[error("unknown NIP-19 prefix: {0}")]
    UnknownPrefix(String),

    /// A bare entity payload was not exactly 32 bytes.
    #[error("expected 32-byte payload, got {0} bytes")]
    BadLength(usize),

    /// A TLV record ran past the end of the payload.
    #[error("truncated TLV payload")]
    TruncatedTlv,

    /// A required TLV record was absent.
    #[error("missing required TLV record: {0}")]
    MissingTlv(&'static str),

    /// A TLV record's value had the wrong size or encoding.
    #[error("malformed TLV record: {0}")]
    MalformedTlv(&'static str),
}

/// Decode a NIP-19 bech32 string into its entity.
pub fn decode(input: &str) -> Result<Nip19, Nip19Error> {
    let (hrp, data) = bech32::decode(input)?;
    let prefix = hrp.to_string().to_ascii_lowercase();
    match prefix.as_str() {
        "npub" => Ok(Nip19::Npub {
            pubkey: hex32(&data)?,
        }),
        "note" => Ok(Nip19::Note { id: hex32(&data)? }),
        "nprofile" => decode_nprofile(&data),
        "nevent" => decode_nevent(&data),
        "naddr" => decode_naddr(&data),
        _ => Err(Nip19Error::UnknownPrefix(prefix)),
    }
}

fn hex32(data: &[u8]) -> Result<String, Nip19Error> {
    if data.len() != 32 {
        return Err(Nip19Error::BadLength(data.len()));
    }
    Ok(hex::encode(data))
}

fn decode_nprofile(payload: &[u8]) -> Result<Nip19, Nip19Error> {
    let mut pubkey = None;
    let mut relays = Vec::new();
    for (t, value) in tlv_records(payload)? {
        match t {
            TLV_SPECIAL => pubkey = Some(hex32(value)?),
            TLV_RELAY => relays.push(tlv_string(value)?),
            _ => {} // unknown TLV types are ignored for forward compatibility
        }
    }
    Ok(Nip19::Nprofile {
        pubkey: pubkey.ok_or(Nip19Error::MissingTlv("pubkey"))?,
        relays,
    })
}

fn decode_nevent(payload: &[u8]) -> Result<Nip19, Nip19Error> {
    let mut id = None;
    let mut relays = Vec::new();
    let mut author = None;
    let mut kind = None;
    for (t, value) in tlv_records(payload)? {
        match t {
            TLV_SPECIAL => id = Some(hex32(value)?),
            TLV_RELAY => relays.push(tlv_string(value)?),
            TLV_AUTHOR => author = Some(hex32(value)?),
            TLV_KIND => kind = Some(tlv_kind(value)?),
            _ => {}
        }
    }
    Ok(Nip19::Nevent {
        id: id.ok_or(Nip19Error::MissingTlv("event id"))?,
        relays,
        author,
        kind,
    })
}

fn decode_naddr(payload: &[u8]) -> Result<Nip19, Nip19Error> {
    let mut identifier = None;
    let mut relays = Vec::new();
    let mut pubkey = None;
    let mut kind = None;
    for (t, value) in tlv_records(payload)? {
        match t {
            TLV_SPECIAL => identifier = Some(tlv_string(value)?),
            TLV_RELAY => relays.push(tlv_string(value)?),
            TLV_AUTHOR => pubkey = Some(hex32(value)?),
            TLV_KIND => kind = Some(tlv_kind(value)?),
            _ => {}
        }
    }
    Ok(Nip19::Naddr {
        identifier: identifier.ok_or(Nip19Error::MissingTlv("identifier"))?,
        pubkey: pubkey.ok_or(Nip19Error::MissingTlv("author"))?,
        kind: kind.ok_or(Nip19Error::MissingTlv("kind"))?,
        relays,
    })
}

/// Walk a `[type, length, value…]*` payload.
fn tlv_records(payload: &[u8]) -> Result<Vec<(u8, &[u8])>, Nip19Error> {
    let mut records = Vec::new();
    let mut i = 0usize;
    while i < payload.len() {
        if i + 2 > payload.len() {
            return Err(Nip19Error::TruncatedTlv);
        }
        let t = payload[i];
        let len = payload[i + 1] as usize;
        let end = i + 2 + len;
        if end > payload.len() {
            return Err(Nip19Error::TruncatedTlv);
        }
        records.push((t, &payload[i + 2..end]));
        i = end;
    }
    Ok(records)
}

fn tlv_string(value: &[u8]) -> Result<String, Nip19Error> {
    String::from_utf8(value.to_vec()).map_err(|_| Nip19Error::MalformedTlv("non-UTF-8 string"))
}

fn tlv_kind(value: &[u8]) -> Result<u32, Nip19Error> {
    let bytes: [u8; 4] = value
        .try_into()
        .map_err(|_| Nip19Error::MalformedTlv("kind must be 4 bytes"))?;
    Ok(u32::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    // The npub/pubkey pair is the published NIP-19 test vector; the TLV
    // entities below were encoded from the same keys.
    const PUBKEY_HEX: &str = "3bf0c63fcb93463407af97a5e5ee64fa883d107ef9e558472c4eb9aaaefa459d";
    const NPUB: &str = "npub180cvv07tjdrrgpa0j7j7tmnyl2yr6yr7l8j4s3evf6u64th6gkwsyjh6w6";
    const EVENT_HEX: &str = "b9f5441e45ca39179320e0031cfb18e34078673dcf14d212ae9a579838be3054";
    const NOTE: &str = "note1h865g8j9egu30yequqp3e7ccudq8seeaeu2dyy4wnftesw97xp2q6pagr5";
    const AUTHOR_HEX: &str = "97c70a44366a6535c145b333f973ea86dfdc2d7a99da618c40c64705ad98e322";
    const NPROFILE: &str = "nprofile1qqsrhuxx8l9ex335q7he0f09aej04zpazpl0ne2cgukyawd24mayt8gpp4mhxue69uhhytnc9e3k7mgx4wuus";
    const NEVENT: &str = "nevent1qqstna2yrezu5wghjvswqqculvvwxsrcvu7u79xjz2hf54uc8zlrq4qzyztuwzjyxe4x2dwpgken87tna2rdlhpd02va5cvvgrrywpddnr3jyqcyqqqqqqg0cr85v";
    const NADDR: &str = "naddr1qq98yetxv4ex2mnrv4esygyhcu9ygdn2v56uz3dnx0uh865xmlwz675emfsccsxxguz6mx8rygpsgqqqw4rs4says3";

    #[test]
    fn decodes_npub() {
        assert_eq!(
            decode(NPUB).unwrap(),
            Nip19::Npub {
                pubkey: PUBKEY_HEX.into()
            }
        );
    }

    #[test]
    fn decodes_note() {
        assert_eq!(
            decode(NOTE).unwrap(),
            Nip19::Note {
                id: EVENT_HEX.into()
            }
        );
    }

    #[test]
    fn decodes_nprofile_with_relay_hint() {
        assert_eq!(
            decode(NPROFILE).unwrap(),
            Nip19::Nprofile {
                pubkey: PUBKEY_HEX.into(),
                relays: vec!["wss://r.x.com".into()],
            }
        );
    }

    #[test]
    fn decodes_nevent_with_author_and_kind() {
        assert_eq!(
            decode(NEVENT).unwrap(),
            Nip19::Nevent {
                id: EVENT_HEX.into(),
                relays: vec![],
                author: Some(AUTHOR_HEX.into()),
                kind: Some(1),
            }
        );
    }

    #[test]
    fn decodes_naddr_and_builds_coordinate() {
        let entity = decode(NADDR).unwrap();
        assert_eq!(
            entity,
            Nip19::Naddr {
                identifier: "references".into(),
                pubkey: AUTHOR_HEX.into(),
                kind: 30023,
                relays: vec![],
            }
        );
        assert_eq!(
            entity.coordinate().unwrap(),
            format!("30023:{AUTHOR_HEX}:references")
        );
    }

    #[test]
    fn rejects_unknown_prefix() {
        // A valid bech32 string with an unrelated prefix.
        assert!(matches!(
            decode("stash180cvv07tjdrrgpa0j7j7tmnyl2yr6yr7l8j4s3evf6u64th6gkwsyrusmx"),
            Err(Nip19Error::UnknownPrefix(_))
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode("npub1notbech32!!").is_err());
        assert!(decode("").is_err());
    }
}

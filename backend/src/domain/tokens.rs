//! Closed lookup tables translating legacy source tokens into canonical enums.
//!
//! Every lookup returns a [`Token`], so an unmapped input is an explicit
//! [`Token::Unknown`] carrying the raw text rather than a silent `None`. Each
//! caller applies its own field policy (`None`, a default, or a fallback
//! variant).

use super::group::{District, Division, GroupGender, GroupKind, GroupStatus};
use super::officer::Office;
use super::person::{PersonGender, VoicePart};

/// Result of a token lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<T> {
    /// The token mapped to a canonical value.
    Known(T),
    /// The token is absent from the table; holds the raw input.
    Unknown(String),
}

impl<T: Copy> Token<T> {
    /// The canonical value, if known.
    pub fn known(&self) -> Option<T> {
        match self {
            Self::Known(value) => Some(*value),
            Self::Unknown(_) => None,
        }
    }

    /// The canonical value, or `fallback` for an unknown token.
    pub fn or(&self, fallback: T) -> T {
        self.known().unwrap_or(fallback)
    }

    /// Log unknown tokens at debug level and return the known value.
    pub fn logged(&self, field: &'static str) -> Option<T> {
        if let Self::Unknown(raw) = self {
            tracing::debug!(field, raw = %raw, "unmapped source token");
        }
        self.known()
    }
}

fn lookup<T: Copy>(raw: Option<&str>, table: &[(&str, T)]) -> Token<T> {
    let raw = raw.unwrap_or_default();
    table
        .iter()
        .find(|(token, _)| *token == raw)
        .map_or_else(|| Token::Unknown(raw.to_owned()), |(_, value)| Token::Known(*value))
}

/// Structure kind: `quartet`, `chorus`, `chapter`, `group`, `district`,
/// `organization`.
pub fn group_kind_token(raw: Option<&str>) -> Token<GroupKind> {
    lookup(
        raw,
        &[
            ("quartet", GroupKind::Quartet),
            ("chorus", GroupKind::Chorus),
            ("chapter", GroupKind::Chapter),
            ("group", GroupKind::Noncomp),
            ("district", GroupKind::District),
            ("organization", GroupKind::International),
        ],
    )
}

/// Structure gender: `men`, `women`, `mixed`.
pub fn group_gender_token(raw: Option<&str>) -> Token<GroupGender> {
    lookup(
        raw,
        &[
            ("men", GroupGender::Male),
            ("women", GroupGender::Female),
            ("mixed", GroupGender::Mixed),
        ],
    )
}

/// Upper-case district code, e.g. `FWD`.
pub fn district_token(raw: Option<&str>) -> Token<District> {
    lookup(
        raw,
        &[
            ("BHS", District::Bhs),
            ("CAR", District::Car),
            ("CSD", District::Csd),
            ("DIX", District::Dix),
            ("EVG", District::Evg),
            ("FWD", District::Fwd),
            ("ILL", District::Ill),
            ("JAD", District::Jad),
            ("LOL", District::Lol),
            ("MAD", District::Mad),
            ("NED", District::Ned),
            ("NSC", District::Nsc),
            ("ONT", District::Ont),
            ("PIO", District::Pio),
            ("RMD", District::Rmd),
            ("SLD", District::Sld),
            ("SUN", District::Sun),
            ("SWD", District::Swd),
        ],
    )
}

/// Division display name, e.g. `MAD Central`.
pub fn division_token(raw: Option<&str>) -> Token<Division> {
    let raw = raw.unwrap_or_default();
    Division::ALL
        .iter()
        .copied()
        .find(|division| division.label() == raw)
        .map_or_else(|| Token::Unknown(raw.to_owned()), Token::Known)
}

/// Structure status UUID. Only `Active` and `Inactive` are reachable.
pub fn group_status_token(raw: Option<&str>) -> Token<GroupStatus> {
    let normalised = raw.unwrap_or_default().trim().to_ascii_lowercase();
    lookup(
        Some(normalised.as_str()),
        &[
            // revoked
            ("64ad817f-f3c6-4b09-a1b0-4bd569b15d03", GroupStatus::Inactive),
            // suspended
            ("d9e3e257-9eca-4cbf-959f-149cca968349", GroupStatus::Inactive),
            // merged
            ("6e3c5cc6-0734-4edf-8f51-40d3a865a94f", GroupStatus::Inactive),
            // closed
            ("bd4721e7-addd-4854-9888-8a705725f748", GroupStatus::Inactive),
            // expired
            ("e04744e6-b743-4247-92c2-2950855b3a93", GroupStatus::Inactive),
            // pending
            ("55a97973-02c3-414a-bbef-22181ad46e85", GroupStatus::Active),
            // pending voluntary
            ("bb1ee6f6-a2c5-4615-b6ad-76130c37b1e6", GroupStatus::Active),
            // awaiting
            ("d7102af8-013a-40e7-bc85-0b00766ed124", GroupStatus::Active),
            // prospective
            ("f3facc00-1990-4c68-9052-39e066906a38", GroupStatus::Active),
            // licensed
            ("4bfee76f-3110-4c32-bade-e5044fdd5fa2", GroupStatus::Active),
            // active
            ("7b9e5e34-a7c5-4f1e-9fc5-656caa74b3c7", GroupStatus::Active),
        ],
    )
}

/// Office machine name, e.g. `manager`.
pub fn office_token(raw: Option<&str>) -> Token<Office> {
    let raw = raw.unwrap_or_default();
    raw.trim()
        .to_ascii_lowercase()
        .parse::<Office>()
        .map_or_else(|_| Token::Unknown(raw.to_owned()), Token::Known)
}

/// Voice part, trimmed and case-insensitive.
pub fn voice_part_token(raw: Option<&str>) -> Token<VoicePart> {
    let raw = raw.unwrap_or_default();
    raw.trim()
        .to_ascii_lowercase()
        .parse::<VoicePart>()
        .map_or_else(|_| Token::Unknown(raw.to_owned()), Token::Known)
}

/// Person gender, trimmed and case-insensitive.
pub fn person_gender_token(raw: Option<&str>) -> Token<PersonGender> {
    let raw = raw.unwrap_or_default();
    raw.trim()
        .to_ascii_lowercase()
        .parse::<PersonGender>()
        .map_or_else(|_| Token::Unknown(raw.to_owned()), Token::Known)
}

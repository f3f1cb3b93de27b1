//! Vote confirmation codes.
//!
//! Each accepted ballot yields a code of three four-symbol groups, e.g.
//! `K7QM-3RXW-HN92`, drawn from an alphabet without look-alike symbols.
//! Members can look their own codes up later; nobody else's.

use crate::constants::{
    CONFIRMATION_CODE_ALPHABET, CONFIRMATION_CODE_GROUPS, CONFIRMATION_CODE_GROUP_LEN,
};
use crate::orm::vote_sessions::SessionType;
use crate::orm::{elections, vote_confirmations};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use sea_orm::{entity::*, query::*, ConnectionTrait, DatabaseConnection, DbErr};
use serde::Serialize;

static CODE_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-HJKMNP-Z2-9]{4}-[A-HJKMNP-Z2-9]{4}-[A-HJKMNP-Z2-9]{4}$")
        .expect("confirmation code pattern is valid")
});

pub fn generate_confirmation_code() -> String {
    generate_with(&mut rand::thread_rng())
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut code =
        String::with_capacity(CONFIRMATION_CODE_GROUPS * (CONFIRMATION_CODE_GROUP_LEN + 1));
    for group in 0..CONFIRMATION_CODE_GROUPS {
        if group > 0 {
            code.push('-');
        }
        for _ in 0..CONFIRMATION_CODE_GROUP_LEN {
            let idx = rng.gen_range(0..CONFIRMATION_CODE_ALPHABET.len());
            code.push(CONFIRMATION_CODE_ALPHABET[idx] as char);
        }
    }
    code
}

pub fn is_valid_code(code: &str) -> bool {
    CODE_FORMAT.is_match(code)
}

/// Canonical form of a code typed by a member: trimmed, uppercased, and
/// regrouped if the hyphens were left out. `None` if it cannot be a code.
pub fn normalize_code(input: &str) -> Option<String> {
    let compact: String = input
        .trim()
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if compact.len() != CONFIRMATION_CODE_GROUPS * CONFIRMATION_CODE_GROUP_LEN {
        return None;
    }

    let grouped = compact
        .as_bytes()
        .chunks(CONFIRMATION_CODE_GROUP_LEN)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("-");

    is_valid_code(&grouped).then(|| grouped)
}

/// Store a fresh code for a ballot. Runs on the ballot's transaction.
pub async fn issue_confirmation<C>(
    conn: &C,
    user_id: i32,
    election_id: i32,
    session_type: SessionType,
    now: NaiveDateTime,
) -> Result<vote_confirmations::Model, DbErr>
where
    C: ConnectionTrait,
{
    vote_confirmations::ActiveModel {
        user_id: Set(user_id),
        election_id: Set(election_id),
        session_type: Set(session_type),
        confirmation_code: Set(generate_confirmation_code()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationReceipt {
    pub confirmation_code: String,
    pub election_id: i32,
    pub election_title: Option<String>,
    pub session_type: SessionType,
    pub created_at: NaiveDateTime,
}

/// Look up a code, scoped to the member who owns it.
pub async fn find_own_confirmation(
    db: &DatabaseConnection,
    user_id: i32,
    code: &str,
) -> Result<Option<ConfirmationReceipt>, DbErr> {
    let code = match normalize_code(code) {
        Some(code) => code,
        None => return Ok(None),
    };

    let found = vote_confirmations::Entity::find()
        .filter(vote_confirmations::Column::ConfirmationCode.eq(code))
        .filter(vote_confirmations::Column::UserId.eq(user_id))
        .find_also_related(elections::Entity)
        .one(db)
        .await?;

    Ok(found.map(|(confirmation, election)| ConfirmationReceipt {
        confirmation_code: confirmation.confirmation_code,
        election_id: confirmation.election_id,
        election_title: election.map(|e| e.title),
        session_type: confirmation.session_type,
        created_at: confirmation.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_codes_match_format() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let code = generate_with(&mut rng);
            assert!(is_valid_code(&code), "bad code {}", code);
            assert_eq!(code.len(), 14);
        }
    }

    #[test]
    fn test_codes_avoid_ambiguous_symbols() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let code = generate_with(&mut rng);
            assert!(!code.contains(['0', 'O', '1', 'I', 'L']));
        }
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" k7qm-3rxw-hn92 "), Some("K7QM-3RXW-HN92".into()));
        assert_eq!(normalize_code("K7QM3RXWHN92"), Some("K7QM-3RXW-HN92".into()));
        assert_eq!(normalize_code("K7QM-3RXW"), None);
        // Look-alike symbols never appear in issued codes
        assert_eq!(normalize_code("K7QM-3RXW-HN90"), None);
        assert_eq!(normalize_code("ÄÄÄÄ-3RXW-HN92"), None);
    }

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("ABCD-EFGH-JK23"));
        assert!(!is_valid_code("abcd-efgh-jk23"));
        assert!(!is_valid_code("ABCD-EFGH-JK2I"));
        assert!(!is_valid_code("ABCDEFGHJK23"));
    }
}

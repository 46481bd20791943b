/*
 * Responsibility
 * - Claims + PolicyConfig → Accepted(identity) / Rejected(reason) の純ロジック
 * - username 解決の strategy chain (EDIPI → custom property → preferred_username)
 * - 既存レコードとの比較による upsert の判定
 * - I/O は持たない (login service 側で store を叩く)
 */
use uuid::Uuid;

use crate::config::PolicyConfig;
use crate::services::auth::claims::Claims;
use crate::services::auth::store::Identity;

// Appended to the generated password so it clears the user store's
// password-strength rules.
const GENERATED_PASSWORD_SUFFIX: &str = "aA_12345678";

const EDIPI_DIGITS: usize = 10;

/// Identity proposed from token claims. What the store ends up holding may
/// differ (it owns the record); the login service re-fetches after writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    IssuerMismatch,
    ClientMismatch,
    MissingEmail,
    MissingUsername,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Accepted(ResolvedIdentity),
    Rejected(RejectReason),
}

/// What to do against the store for a resolved identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Create,
    UpdateUsername { id: Uuid },
    NoChange,
}

/// Run the policy gate and the username strategy chain over decoded claims.
///
/// Rejection is a value, not an error: every reject renders as the same
/// silent fallthrough at the HTTP boundary, but tests and callers can still
/// tell the causes apart.
pub fn resolve(claims: &Claims, policy: &PolicyConfig) -> Resolution {
    // Plain string equality on both checks. An expected value that is unset
    // only matches a token that omits the claim as well.
    if policy.check_issuer && claims.iss.as_deref() != policy.expected_issuer.as_deref() {
        return Resolution::Rejected(RejectReason::IssuerMismatch);
    }
    if policy.check_client && claims.azp.as_deref() != policy.expected_client_id.as_deref() {
        return Resolution::Rejected(RejectReason::ClientMismatch);
    }

    // Email is the lookup key; without it there is no identity to resolve.
    let Some(email) = claims.email.as_deref().filter(|e| !e.trim().is_empty()) else {
        return Resolution::Rejected(RejectReason::MissingEmail);
    };

    let Some(username) = resolve_username(claims, policy) else {
        return Resolution::Rejected(RejectReason::MissingUsername);
    };

    let password = policy
        .assign_random_password
        .then(|| generated_password(claims));

    Resolution::Accepted(ResolvedIdentity {
        username,
        email: email.to_string(),
        first_name: claims.given_name.clone().unwrap_or_default(),
        last_name: claims.family_name.clone().unwrap_or_default(),
        password,
    })
}

/// Username strategy chain, first match wins:
///
/// 1. EDIPI: the configured claim's last dot-separated segment, non-digits
///    stripped, must come out at exactly 10 digits.
/// 2. Custom property: the configured claim's value, verbatim.
/// 3. Default: `preferred_username`.
///
/// No format validation beyond the EDIPI digit count; the store is the one
/// that gets to reject an unusable username.
pub fn resolve_username(claims: &Claims, policy: &PolicyConfig) -> Option<String> {
    if policy.use_edipi_number
        && let Some(name) = policy.edipi_property_name.as_deref()
        && let Some(edipi) = claims.get_str(name).and_then(edipi_digits)
    {
        return Some(edipi);
    }

    if let Some(name) = policy.username_property_name.as_deref()
        && let Some(value) = claims.get_str(name)
    {
        return Some(value.to_string());
    }

    claims
        .preferred_username
        .clone()
        .filter(|u| !u.trim().is_empty())
}

fn edipi_digits(value: &str) -> Option<String> {
    let last = value.rsplit('.').next().unwrap_or(value);
    let digits: String = last.chars().filter(|c| c.is_ascii_digit()).collect();

    (digits.len() == EDIPI_DIGITS).then_some(digits)
}

// Deliberately deterministic: iss + sub + nonce + fixed suffix, absent claims
// as empty strings. Preserved behavior of the plugin this service replaces;
// the flag's name promises more randomness than it delivers.
fn generated_password(claims: &Claims) -> String {
    format!(
        "{}{}{}{}",
        claims.iss.as_deref().unwrap_or_default(),
        claims.sub.as_deref().unwrap_or_default(),
        claims.nonce.as_deref().unwrap_or_default(),
        GENERATED_PASSWORD_SUFFIX
    )
}

/// Compare a resolved identity against what the store holds.
///
/// CREATE when nothing is stored for the email; rewrite the username when it
/// drifted from the recomputed value; otherwise leave the record alone.
pub fn decide_action(existing: Option<&Identity>, resolved: &ResolvedIdentity) -> UpsertAction {
    match existing {
        None => UpsertAction::Create,
        Some(current) if current.username != resolved.username => {
            UpsertAction::UpdateUsername { id: current.id }
        }
        Some(_) => UpsertAction::NoChange,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: serde_json::Value) -> Claims {
        serde_json::from_value(value).unwrap()
    }

    fn base_claims() -> Claims {
        claims(json!({
            "iss": "https://idp.example",
            "azp": "portal",
            "sub": "subject-1",
            "email": "alice@example.com",
            "given_name": "Alice",
            "family_name": "Moore",
            "preferred_username": "alice",
        }))
    }

    fn accepted(resolution: Resolution) -> ResolvedIdentity {
        match resolution {
            Resolution::Accepted(id) => id,
            Resolution::Rejected(reason) => panic!("expected accept, got {reason:?}"),
        }
    }

    #[test]
    fn default_strategy_uses_preferred_username() {
        let id = accepted(resolve(&base_claims(), &PolicyConfig::default()));
        assert_eq!(id.username, "alice");
        assert_eq!(id.email, "alice@example.com");
        assert_eq!(id.first_name, "Alice");
        assert_eq!(id.last_name, "Moore");
        assert_eq!(id.password, None);
    }

    #[test]
    fn issuer_mismatch_rejects() {
        let policy = PolicyConfig {
            check_issuer: true,
            expected_issuer: Some("https://other-idp.example".into()),
            ..Default::default()
        };

        assert_eq!(
            resolve(&base_claims(), &policy),
            Resolution::Rejected(RejectReason::IssuerMismatch)
        );
    }

    #[test]
    fn issuer_check_disabled_ignores_issuer() {
        let policy = PolicyConfig {
            expected_issuer: Some("https://other-idp.example".into()),
            ..Default::default()
        };

        assert!(matches!(
            resolve(&base_claims(), &policy),
            Resolution::Accepted(_)
        ));
    }

    #[test]
    fn client_mismatch_rejects() {
        let policy = PolicyConfig {
            check_client: true,
            expected_client_id: Some("some-other-client".into()),
            ..Default::default()
        };

        assert_eq!(
            resolve(&base_claims(), &policy),
            Resolution::Rejected(RejectReason::ClientMismatch)
        );
    }

    #[test]
    fn matching_issuer_and_client_accept() {
        let policy = PolicyConfig {
            check_issuer: true,
            expected_issuer: Some("https://idp.example".into()),
            check_client: true,
            expected_client_id: Some("portal".into()),
            ..Default::default()
        };

        assert!(matches!(
            resolve(&base_claims(), &policy),
            Resolution::Accepted(_)
        ));
    }

    #[test]
    fn missing_email_rejects() {
        let c = claims(json!({ "preferred_username": "alice" }));
        assert_eq!(
            resolve(&c, &PolicyConfig::default()),
            Resolution::Rejected(RejectReason::MissingEmail)
        );
    }

    #[test]
    fn edipi_strategy_extracts_ten_digits() {
        let policy = PolicyConfig {
            use_edipi_number: true,
            edipi_property_name: Some("x_subject_dn".into()),
            ..Default::default()
        };
        let mut c = base_claims();
        c.extra
            .insert("x_subject_dn".into(), json!("1234.5678.0123456789"));

        let id = accepted(resolve(&c, &policy));
        assert_eq!(id.username, "0123456789");
    }

    #[test]
    fn edipi_strips_non_digits_from_last_segment() {
        let policy = PolicyConfig {
            use_edipi_number: true,
            edipi_property_name: Some("x_subject_dn".into()),
            ..Default::default()
        };
        let mut c = base_claims();
        c.extra
            .insert("x_subject_dn".into(), json!("cn=last.EDIPI-0123456789"));

        let id = accepted(resolve(&c, &policy));
        assert_eq!(id.username, "0123456789");
    }

    #[test]
    fn short_edipi_falls_through_to_default() {
        let policy = PolicyConfig {
            use_edipi_number: true,
            edipi_property_name: Some("x_subject_dn".into()),
            ..Default::default()
        };
        let mut c = base_claims();
        c.extra.insert("x_subject_dn".into(), json!("abc.12345"));

        let id = accepted(resolve(&c, &policy));
        assert_eq!(id.username, "alice");
    }

    #[test]
    fn edipi_disabled_without_property_name() {
        // USE_EDIPI_NUMBER alone is not enough; the claim name must be set.
        let policy = PolicyConfig {
            use_edipi_number: true,
            ..Default::default()
        };

        let id = accepted(resolve(&base_claims(), &policy));
        assert_eq!(id.username, "alice");
    }

    #[test]
    fn custom_property_strategy_is_verbatim() {
        let policy = PolicyConfig {
            username_property_name: Some("upn".into()),
            ..Default::default()
        };
        let mut c = base_claims();
        c.extra.insert("upn".into(), json!("alice@corp.example"));

        let id = accepted(resolve(&c, &policy));
        assert_eq!(id.username, "alice@corp.example");
    }

    #[test]
    fn custom_property_absent_falls_through_to_default() {
        let policy = PolicyConfig {
            username_property_name: Some("upn".into()),
            ..Default::default()
        };

        let id = accepted(resolve(&base_claims(), &policy));
        assert_eq!(id.username, "alice");
    }

    #[test]
    fn edipi_wins_over_custom_property() {
        let policy = PolicyConfig {
            use_edipi_number: true,
            edipi_property_name: Some("x_subject_dn".into()),
            username_property_name: Some("upn".into()),
            ..Default::default()
        };
        let mut c = base_claims();
        c.extra.insert("x_subject_dn".into(), json!("0123456789"));
        c.extra.insert("upn".into(), json!("alice@corp.example"));

        let id = accepted(resolve(&c, &policy));
        assert_eq!(id.username, "0123456789");
    }

    #[test]
    fn no_usable_username_rejects() {
        let c = claims(json!({ "email": "alice@example.com" }));
        assert_eq!(
            resolve(&c, &PolicyConfig::default()),
            Resolution::Rejected(RejectReason::MissingUsername)
        );
    }

    #[test]
    fn generated_password_is_deterministic() {
        let policy = PolicyConfig {
            assign_random_password: true,
            ..Default::default()
        };
        let c = claims(json!({
            "iss": "X",
            "sub": "Y",
            "nonce": "Z",
            "email": "a@example.com",
            "preferred_username": "a",
        }));

        let id = accepted(resolve(&c, &policy));
        assert_eq!(id.password.as_deref(), Some("XYZaA_12345678"));
    }

    #[test]
    fn upsert_decision() {
        let resolved = ResolvedIdentity {
            username: "bob".into(),
            email: "alice@example.com".into(),
            first_name: "Alice".into(),
            last_name: "Moore".into(),
            password: None,
        };

        assert_eq!(decide_action(None, &resolved), UpsertAction::Create);

        let stored = Identity {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            first_name: "Alice".into(),
            last_name: "Moore".into(),
            auth: "jwt".into(),
            password: None,
            confirmed: true,
            policy_agreed: true,
        };

        assert_eq!(
            decide_action(Some(&stored), &resolved),
            UpsertAction::UpdateUsername { id: stored.id }
        );

        let unchanged = ResolvedIdentity {
            username: "alice".into(),
            ..resolved
        };
        assert_eq!(
            decide_action(Some(&stored), &unchanged),
            UpsertAction::NoChange
        );
    }
}

/*
 * Responsibility
 * - ホスト側 framework が問い合わせる auth method の固定回答
 * - 継承階層ではなく定数を返す adapter として表現する
 */
use url::Url;

/// Fixed answers the hosting framework asks of a pluggable auth method.
/// None of these depend on runtime state.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthCapabilities;

impl AuthCapabilities {
    /// Password hashes live in the host's own user store.
    pub fn is_internal(&self) -> bool {
        true
    }

    pub fn prevent_local_passwords(&self) -> bool {
        false
    }

    pub fn can_change_password(&self) -> bool {
        true
    }

    /// No external password-change page; the host default applies.
    pub fn change_password_url(&self) -> Option<Url> {
        None
    }

    pub fn can_reset_password(&self) -> bool {
        true
    }

    pub fn can_be_manually_set(&self) -> bool {
        true
    }

    /// Password login through this method never succeeds: identities are
    /// established from bearer tokens only.
    pub fn password_login(&self, _username: &str, _password: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_answers() {
        let caps = AuthCapabilities;
        assert!(caps.is_internal());
        assert!(!caps.prevent_local_passwords());
        assert!(caps.can_change_password());
        assert!(caps.can_reset_password());
        assert!(caps.can_be_manually_set());
        assert_eq!(caps.change_password_url(), None);
        assert!(!caps.password_login("alice", "any password"));
    }
}

//! Capability detection over the ambient client environment.
//!
//! Pure functions only; the snapshot is taken by the host once per dispatch
//! attempt, never cached across a session (permissions can change).

/// Raw observation of the client environment at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSnapshot {
    pub user_agent: String,
    pub clipboard_available: bool,
}

/// What delivery mechanisms the current environment supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub is_mobile: bool,
    pub is_ios: bool,
    pub is_android: bool,
    pub has_clipboard: bool,
}

/// Classifies the environment into a capability descriptor.
pub fn detect(env: &EnvSnapshot) -> Capability {
    let ua = env.user_agent.to_ascii_lowercase();

    let is_ios = ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod");
    let is_android = ua.contains("android");
    let is_mobile = is_ios || is_android || ua.contains("mobile");

    Capability {
        is_mobile,
        is_ios,
        is_android,
        has_clipboard: env.clipboard_available,
    }
}

/// Whether this is a hardened browser variant known to retain stale
/// cross-session artifacts. First detection triggers a one-time ambient
/// cache clear; the latch lives in `AppState`.
pub fn is_hardened_variant(env: &EnvSnapshot) -> bool {
    env.user_agent.to_ascii_lowercase().contains("brave")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(user_agent: &str) -> EnvSnapshot {
        EnvSnapshot {
            user_agent: user_agent.to_string(),
            clipboard_available: true,
        }
    }

    #[test]
    fn desktop_user_agent_is_not_mobile() {
        let caps = detect(&snapshot(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/126.0",
        ));
        assert!(!caps.is_mobile);
        assert!(!caps.is_ios);
        assert!(!caps.is_android);
        assert!(caps.has_clipboard);
    }

    #[test]
    fn iphone_user_agent_is_ios_mobile() {
        let caps = detect(&snapshot(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148",
        ));
        assert!(caps.is_mobile);
        assert!(caps.is_ios);
        assert!(!caps.is_android);
    }

    #[test]
    fn android_user_agent_is_android_mobile() {
        let caps = detect(&snapshot("Mozilla/5.0 (Linux; Android 14) Mobile Chrome/126.0"));
        assert!(caps.is_mobile);
        assert!(caps.is_android);
        assert!(!caps.is_ios);
    }

    #[test]
    fn clipboard_flag_follows_snapshot() {
        let mut env = snapshot("Chrome/126.0");
        env.clipboard_available = false;
        assert!(!detect(&env).has_clipboard);
    }

    #[test]
    fn brave_is_hardened_variant() {
        assert!(is_hardened_variant(&snapshot("Mozilla/5.0 Brave/1.67")));
        assert!(!is_hardened_variant(&snapshot("Chrome/126.0")));
    }
}

//! Coarse user-agent classification for the "manage my sessions" view.

/// Short device label derived from a User-Agent header.
pub fn device_label(user_agent: &str) -> &'static str {
    if user_agent.contains("Android") {
        "Android phone"
    } else if user_agent.contains("iPhone") || user_agent.contains("iPad") {
        "iPhone / iPad"
    } else if user_agent.contains("Mobile") {
        "Mobile"
    } else if user_agent.contains("Windows") {
        "Windows"
    } else if user_agent.contains("Macintosh") || user_agent.contains("Mac OS") {
        "Mac"
    } else if user_agent.contains("Linux") {
        "Linux"
    } else {
        "Browser"
    }
}

/// Client IP from an `X-Forwarded-For` header value (first hop), if any.
pub fn forwarded_ip(header: &str) -> Option<&str> {
    header.split(',').next().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_agents() {
        assert_eq!(device_label("Mozilla/5.0 (Windows NT 10.0)"), "Windows");
        assert_eq!(device_label("Mozilla/5.0 (iPhone; CPU iPhone OS)"), "iPhone / iPad");
        assert_eq!(device_label("Mozilla/5.0 (Linux; Android 14)"), "Android phone");
        assert_eq!(device_label("curl/8.0"), "Browser");
    }

    #[test]
    fn first_forwarded_hop_wins() {
        assert_eq!(forwarded_ip("10.0.0.1, 192.168.0.1"), Some("10.0.0.1"));
        assert_eq!(forwarded_ip(""), None);
    }
}

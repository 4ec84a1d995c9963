use std::net::IpAddr;

pub const ANON_IPV4: &str = "x.x.x.x";
pub const ANON_IPV6: &str = "x:x:x:x:x:x:x:x";
pub const ANON_UNKNOWN: &str = "-";

// Host part of "host:port" or "[host]:port". None when the input has no port.
fn split_host(addr: &str) -> Option<&str> {
    if let Some(rest) = addr.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        return tail.starts_with(':').then_some(host);
    }
    let (host, _port) = addr.rsplit_once(':')?;
    (!host.contains(':')).then_some(host)
}

/// Reduce a remote address to a placeholder that only reveals the address family.
///
/// IPv4-mapped IPv6 addresses count as IPv4. Anything that is not an IP yields `-`.
pub fn anonymize_ip(addr: &str) -> &'static str {
    let host = split_host(addr).unwrap_or(addr);

    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => ANON_IPV4,
        Ok(IpAddr::V6(ip)) if ip.to_ipv4_mapped().is_some() => ANON_IPV4,
        Ok(IpAddr::V6(_)) => ANON_IPV6,
        Err(_) => ANON_UNKNOWN,
    }
}

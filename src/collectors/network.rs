use crate::collectors::NO_IP;
use crate::config::NetworkConfig;
use std::io;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use tracing::debug;

/// Best-guess private IPv4 address of this host, or `No IP`.
pub fn resolve_local_ip(cfg: &NetworkConfig) -> String {
    let interfaces = local_ip_address::list_afinet_netifas()
        .map_err(|err| debug!(error = %err, "interface enumeration unavailable"))
        .ok();
    resolve_from(interfaces, || outbound_ipv4(&cfg.probe_address))
}

/// Interfaces first (`None` when they cannot be listed), then `outbound`.
fn resolve_from<F>(interfaces: Option<Vec<(String, IpAddr)>>, outbound: F) -> String
where
    F: FnOnce() -> io::Result<Option<Ipv4Addr>>,
{
    if let Some(interfaces) = interfaces {
        if let Some(addr) = first_private_ipv4(interfaces) {
            return addr.to_string();
        }
        debug!("no interface carries a private IPv4 address");
    }

    match outbound() {
        Ok(Some(addr)) => addr.to_string(),
        Ok(None) => NO_IP.to_string(),
        Err(err) => {
            debug!(error = %err, "outbound address probe failed");
            NO_IP.to_string()
        }
    }
}

/// First private address in enumeration order.
pub fn first_private_ipv4<I>(interfaces: I) -> Option<Ipv4Addr>
where
    I: IntoIterator<Item = (String, IpAddr)>,
{
    interfaces.into_iter().find_map(|(_name, ip)| match ip {
        IpAddr::V4(v4) if is_private_ipv4(v4) => Some(v4),
        _ => None,
    })
}

/// 10/8, 172.16/12 and 192.168/16.
pub fn is_private_ipv4(addr: Ipv4Addr) -> bool {
    if addr.is_loopback() {
        return false;
    }
    match addr.octets() {
        [192, 168, _, _] => true,
        [10, _, _, _] => true,
        [172, second, _, _] => (16..=31).contains(&second),
        _ => false,
    }
}

// Connecting a UDP socket only selects a route; no datagram leaves the host.
fn outbound_ipv4(probe_address: &str) -> io::Result<Option<Ipv4Addr>> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect(probe_address)?;
    Ok(accept_outbound(socket.local_addr()?.ip()))
}

fn accept_outbound(ip: IpAddr) -> Option<Ipv4Addr> {
    match ip {
        IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(v4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(s: &str) -> Ipv4Addr {
        s.parse().expect("valid ipv4")
    }

    #[test]
    fn private_range_acceptance() {
        assert!(is_private_ipv4(v4("192.168.1.5")));
        assert!(is_private_ipv4(v4("10.0.0.12")));
        assert!(is_private_ipv4(v4("172.16.0.1")));
        assert!(is_private_ipv4(v4("172.20.0.1")));
        assert!(is_private_ipv4(v4("172.31.255.254")));

        assert!(!is_private_ipv4(v4("127.0.0.1")));
        assert!(!is_private_ipv4(v4("172.15.0.1")));
        assert!(!is_private_ipv4(v4("172.32.0.1")));
        assert!(!is_private_ipv4(v4("203.0.113.5")));
        assert!(!is_private_ipv4(v4("192.169.0.1")));
    }

    #[test]
    fn first_match_wins_in_enumeration_order() {
        let interfaces = vec![
            ("lo".to_string(), IpAddr::V4(Ipv4Addr::LOCALHOST)),
            ("eth0".to_string(), IpAddr::V6("fe80::1".parse().expect("ipv6"))),
            ("wan0".to_string(), IpAddr::V4(v4("203.0.113.5"))),
            ("eth1".to_string(), IpAddr::V4(v4("10.0.0.12"))),
            ("wlan0".to_string(), IpAddr::V4(v4("192.168.1.5"))),
        ];
        assert_eq!(first_private_ipv4(interfaces), Some(v4("10.0.0.12")));
    }

    #[test]
    fn no_private_interface() {
        let interfaces = vec![("lo".to_string(), IpAddr::V4(Ipv4Addr::LOCALHOST))];
        assert_eq!(first_private_ipv4(interfaces), None);
        assert_eq!(first_private_ipv4(Vec::new()), None);
    }

    #[test]
    fn outbound_address_filter() {
        assert_eq!(accept_outbound(IpAddr::V4(Ipv4Addr::LOCALHOST)), None);
        assert_eq!(accept_outbound(IpAddr::V4(Ipv4Addr::UNSPECIFIED)), None);
        assert_eq!(
            accept_outbound(IpAddr::V4(v4("203.0.113.5"))),
            Some(v4("203.0.113.5"))
        );
    }

    fn interfaces(list: &[(&str, &str)]) -> Option<Vec<(String, IpAddr)>> {
        Some(
            list.iter()
                .map(|(name, ip)| (name.to_string(), ip.parse().expect("valid ip")))
                .collect(),
        )
    }

    #[test]
    fn private_interface_skips_outbound_lookup() {
        let label = resolve_from(interfaces(&[("eth0", "192.168.1.5")]), || {
            panic!("outbound lookup must not run")
        });
        assert_eq!(label, "192.168.1.5");
    }

    #[test]
    fn outbound_lookup_when_no_private_interface() {
        let mut ran = false;
        let label = resolve_from(
            interfaces(&[("lo", "127.0.0.1"), ("wan0", "203.0.113.5")]),
            || {
                ran = true;
                Ok(Some(v4("198.51.100.7")))
            },
        );
        assert!(ran);
        assert_eq!(label, "198.51.100.7");
    }

    #[test]
    fn outbound_lookup_when_enumeration_unavailable() {
        let label = resolve_from(None, || Ok(Some(v4("10.1.2.3"))));
        assert_eq!(label, "10.1.2.3");
    }

    #[test]
    fn no_ip_when_outbound_lookup_fails() {
        let label = resolve_from(interfaces(&[("lo", "127.0.0.1")]), || Ok(None));
        assert_eq!(label, NO_IP);

        let label = resolve_from(None, || {
            Err(io::Error::new(io::ErrorKind::Other, "network unreachable"))
        });
        assert_eq!(label, NO_IP);
    }

    #[test]
    fn loopback_probe_is_rejected() {
        assert_eq!(outbound_ipv4("127.0.0.1:9").expect("local route"), None);
    }

    #[test]
    fn resolver_never_returns_empty() {
        let label = resolve_local_ip(&NetworkConfig::default());
        assert!(!label.is_empty());
    }
}

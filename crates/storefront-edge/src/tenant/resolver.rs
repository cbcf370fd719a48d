//! Pure mapping from `(host, path)` to a tenant and an optional rewrite.

use std::net::IpAddr;

use storefront_core::config::TenantConfig;
use storefront_core::types::TenantContext;

/// Outcome of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Tenant the request belongs to.
    pub context: TenantContext,
    /// New path (and query) to route on, when the request must be rewritten.
    pub rewritten: Option<String>,
}

/// Resolves the tenant for `host` and decides whether `path` is rewritten
/// under the vendor prefix. The query string is carried over unchanged.
pub fn resolve(host: &str, path: &str, query: Option<&str>, config: &TenantConfig) -> Resolution {
    let context = resolve_context(host, &config.base_domain);
    let rewritten = rewrite(&context, path, query, config);
    Resolution { context, rewritten }
}

/// Tenant context for a raw `Host` value.
pub fn resolve_context(host: &str, base_domain: &str) -> TenantContext {
    let host = strip_port(host.trim()).to_ascii_lowercase();
    let local = is_local_host(&host);
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let min_labels = if local { 2 } else { 3 };
    let is_ip = host.parse::<IpAddr>().is_ok();
    let subdomain = if !is_ip && labels.len() >= min_labels {
        labels[0].to_string()
    } else {
        String::new()
    };

    if subdomain.is_empty() || host == base_domain.to_ascii_lowercase() {
        TenantContext::main(host)
    } else {
        TenantContext::tenant(host, subdomain)
    }
}

/// `localhost` or any `*.localhost` name.
pub fn is_local_host(host: &str) -> bool {
    host == "localhost" || host.ends_with(".localhost")
}

/// Drops a trailing `:port`, keeping bracketed IPv6 literals intact.
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

fn rewrite(
    context: &TenantContext,
    path: &str,
    query: Option<&str>,
    config: &TenantConfig,
) -> Option<String> {
    let subdomain = context.tenant_slug()?;

    if config
        .exempt_paths
        .iter()
        .any(|prefix| is_under(path, prefix))
    {
        return None;
    }

    let prefix = config.vendor_prefix.trim_end_matches('/');
    if is_under(path, prefix) {
        return None;
    }

    let mut target = format!("{prefix}/{subdomain}{path}");
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    Some(target)
}

/// `path` is `prefix` itself or lies below it on a segment boundary.
fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TenantConfig {
        TenantConfig::default()
    }

    #[test]
    fn test_tenant_host_is_rewritten() {
        let r = resolve("shop.sellexplore.shop", "/products", None, &config());
        assert_eq!(r.context.subdomain, "shop");
        assert!(!r.context.is_main_domain);
        assert_eq!(r.rewritten.as_deref(), Some("/vendor/shop/products"));
    }

    #[test]
    fn test_root_domain_is_canonical() {
        for host in ["sellexplore.shop", "www.sellexplore.shop", "SellExplore.shop:443"] {
            let r = resolve(host, "/products", None, &config());
            assert!(r.context.is_main_domain, "{host}");
            assert_eq!(r.context.host, "sellexplore.shop");
            assert_eq!(r.context.subdomain, "");
            assert_eq!(r.rewritten, None);
        }
    }

    #[test]
    fn test_www_prefix_on_tenant_host() {
        let r = resolve("www.shop.sellexplore.shop", "/", None, &config());
        assert_eq!(r.context.host, "shop.sellexplore.shop");
        assert_eq!(r.rewritten.as_deref(), Some("/vendor/shop/"));
    }

    #[test]
    fn test_local_hosts() {
        let r = resolve("abc.localhost:3000", "/cart", None, &config());
        assert_eq!(r.context.subdomain, "abc");
        assert_eq!(r.rewritten.as_deref(), Some("/vendor/abc/cart"));

        let r = resolve("localhost:3000", "/cart", None, &config());
        assert!(r.context.is_main_domain);
        assert_eq!(r.rewritten, None);
    }

    #[test]
    fn test_two_label_production_host_is_main() {
        let r = resolve("example.com", "/about", None, &config());
        assert!(r.context.is_main_domain);
        assert_eq!(r.rewritten, None);
    }

    #[test]
    fn test_ip_hosts_are_main() {
        let r = resolve("127.0.0.1:3000", "/cart", None, &config());
        assert!(r.context.is_main_domain);
        assert_eq!(r.context.host, "127.0.0.1");
        assert_eq!(r.rewritten, None);
    }

    #[test]
    fn test_exempt_paths_never_rewritten() {
        for path in ["/_next/static/chunks/app.js", "/_next/image", "/favicon.ico"] {
            let r = resolve("shop.sellexplore.shop", path, None, &config());
            assert_eq!(r.rewritten, None, "{path}");
            assert_eq!(r.context.subdomain, "shop");
        }
    }

    #[test]
    fn test_vendor_paths_not_rewritten_twice() {
        let r = resolve("shop.sellexplore.shop", "/vendor/shop/products", None, &config());
        assert_eq!(r.rewritten, None);

        let r = resolve("shop.sellexplore.shop", "/vendors", None, &config());
        assert_eq!(r.rewritten.as_deref(), Some("/vendor/shop/vendors"));
    }

    #[test]
    fn test_query_is_preserved() {
        let r = resolve("shop.sellexplore.shop", "/search", Some("q=shoes&page=2"), &config());
        assert_eq!(r.rewritten.as_deref(), Some("/vendor/shop/search?q=shoes&page=2"));
    }

    #[test]
    fn test_exempt_prefix_needs_segment_boundary() {
        let r = resolve("shop.sellexplore.shop", "/favicon.icons/x", None, &config());
        assert_eq!(r.rewritten.as_deref(), Some("/vendor/shop/favicon.icons/x"));

        let r = resolve("shop.sellexplore.shop", "/_next/staticfoo", None, &config());
        assert_eq!(r.rewritten.as_deref(), Some("/vendor/shop/_next/staticfoo"));

        let r = resolve("shop.sellexplore.shop", "/_next/static", None, &config());
        assert_eq!(r.rewritten, None);
    }

    #[test]
    fn test_configured_exempt_prefix() {
        let mut config = config();
        config.exempt_paths.push("/api/".to_string());
        let r = resolve("shop.sellexplore.shop", "/api/health", None, &config);
        assert_eq!(r.rewritten, None);
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("shop.sellexplore.shop:8080"), "shop.sellexplore.shop");
        assert_eq!(strip_port("shop.sellexplore.shop"), "shop.sellexplore.shop");
        assert_eq!(strip_port("[::1]:3000"), "[::1]");
    }
}

use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use hickory_resolver::config::{NameServerConfig, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::xfer::Protocol;

use crate::core::common::{LookupOptions, ResolverKind};

/// A failed reverse resolution, as reported by the resolver backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// The address has no PTR record.
    NotFound,
    Failed(String),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::NotFound => write!(f, "no PTR record"),
            ResolveError::Failed(e) => write!(f, "{e}"),
        }
    }
}

/// Address to hostname resolution.
///
/// Implementations return the primary name only and need not enforce a
/// deadline themselves.
#[async_trait]
pub trait ReverseResolver: Send + Sync {
    async fn reverse(&self, ip: IpAddr) -> Result<String, ResolveError>;
}

/// The operating system resolver (`getnameinfo`), run on the blocking pool.
#[derive(Debug, Default)]
pub struct SystemResolver;

#[async_trait]
impl ReverseResolver for SystemResolver {
    async fn reverse(&self, ip: IpAddr) -> Result<String, ResolveError> {
        let hostname = tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&ip))
            .await
            .map_err(|e| ResolveError::Failed(e.to_string()))?
            .map_err(|e| ResolveError::Failed(e.to_string()))?;

        // getnameinfo falls back to the numeric form when there is no name.
        match hostname.parse::<IpAddr>() {
            Ok(_) => Err(ResolveError::NotFound),
            Err(_) => Ok(hostname),
        }
    }
}

/// PTR lookups with hickory, against the system configuration or one nameserver.
pub struct HickoryResolver {
    resolver: TokioResolver,
}

impl HickoryResolver {
    pub fn new(nameserver: Option<SocketAddr>) -> Result<Self> {
        let resolver = match nameserver {
            Some(socket_addr) => {
                let mut config = ResolverConfig::new();
                config.add_name_server(NameServerConfig::new(socket_addr, Protocol::Udp));
                TokioResolver::builder_with_config(config, TokioConnectionProvider::default()).build()
            }
            None => TokioResolver::builder_tokio()?.build(),
        };
        Ok(Self { resolver })
    }
}

#[async_trait]
impl ReverseResolver for HickoryResolver {
    async fn reverse(&self, ip: IpAddr) -> Result<String, ResolveError> {
        match self.resolver.reverse_lookup(ip).await {
            Ok(lookup) => match lookup.iter().next() {
                Some(ptr) => Ok(ptr.to_string().trim_end_matches('.').to_owned()),
                None => Err(ResolveError::NotFound),
            },
            Err(e) if e.is_no_records_found() => Err(ResolveError::NotFound),
            Err(e) => Err(ResolveError::Failed(e.to_string())),
        }
    }
}

/// Parse a nameserver as `ip:port`, or a bare ip on port 53.
pub fn parse_nameserver(s: &str) -> Result<SocketAddr> {
    if let Ok(socket_addr) = s.parse::<SocketAddr>() {
        return Ok(socket_addr);
    }
    match s.parse::<IpAddr>() {
        Ok(ip) => Ok(SocketAddr::new(ip, 53)),
        Err(_) => bail!("nameserver: `{s}` is invalid"),
    }
}

/// Build the resolver selected by the lookup options.
pub fn build_resolver(options: &LookupOptions) -> Result<Arc<dyn ReverseResolver>> {
    match options.resolver {
        ResolverKind::System => {
            if options.nameserver.is_some() {
                bail!("a nameserver can only be used with the hickory resolver");
            }
            Ok(Arc::new(SystemResolver))
        }
        ResolverKind::Hickory => {
            let nameserver = options.nameserver.as_deref().map(parse_nameserver).transpose()?;
            Ok(Arc::new(HickoryResolver::new(nameserver)?))
        }
    }
}

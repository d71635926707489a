//! Request strategy: which HTTP methods to try for a target, and in what order.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::core::UrlTarget;

/// HTTP methods the checker knows how to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Head,
    Get,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Head => "HEAD",
            Method::Get => "GET",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Head => reqwest::Method::HEAD,
            Method::Get => reqwest::Method::GET,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, never-empty list of methods to attempt for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPlan {
    methods: Vec<Method>,
}

impl MethodPlan {
    /// Build a plan from the given methods. An empty list becomes `[GET]`.
    pub fn new(methods: Vec<Method>) -> Self {
        if methods.is_empty() {
            return Self::get_only();
        }
        Self { methods }
    }

    /// `[HEAD, GET]`: cheap probe first, compatible fallback second.
    pub fn head_then_get() -> Self {
        Self {
            methods: vec![Method::Head, Method::Get],
        }
    }

    pub fn get_only() -> Self {
        Self {
            methods: vec![Method::Get],
        }
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Always false; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Method> + '_ {
        self.methods.iter().copied()
    }
}

/// Single policy point deciding the [`MethodPlan`] of a target.
///
/// Implementations must be pure: same target, same plan.
pub trait ResolveStrategy: Send + Sync {
    fn resolve(&self, target: &UrlTarget) -> MethodPlan;
}

/// Default strategy: `[HEAD, GET]`, except for hosts known to mishandle
/// HEAD, which get `[GET]`.
#[derive(Debug, Clone, Default)]
pub struct HeadThenGet {
    get_only_hosts: HashSet<String>,
}

impl HeadThenGet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hosts (and their subdomains) that are only ever checked with GET.
    pub fn with_get_only_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let get_only_hosts = hosts
            .into_iter()
            .map(|host| host.as_ref().trim().trim_end_matches('.').to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();
        Self { get_only_hosts }
    }

    fn is_get_only(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.get_only_hosts.iter().any(|entry| {
            host == *entry
                || host
                    .strip_suffix(entry.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

impl ResolveStrategy for HeadThenGet {
    fn resolve(&self, target: &UrlTarget) -> MethodPlan {
        if self.get_only_hosts.is_empty() {
            return MethodPlan::head_then_get();
        }

        let host = reqwest::Url::parse(target.url())
            .ok()
            .and_then(|url| url.host_str().map(str::to_string));

        match host {
            Some(host) if self.is_get_only(&host) => MethodPlan::get_only(),
            _ => MethodPlan::head_then_get(),
        }
    }
}

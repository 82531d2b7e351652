/// Named caches all share this prefix; the suffix is the version token.
pub(crate) const CACHE_PREFIX: &str = "budget-nav-";

/// The minimal resource set needed to boot the app offline. Every path is
/// fetched and cached eagerly at install; any failure aborts the install.
pub(crate) const SHELL_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.webmanifest",
    "/icons/icon-192.png",
    "/icons/icon-512.png",
];

/// The document served when a navigation fetch fails.
pub(crate) const SHELL_DOCUMENT: &str = "/index.html";

const ASSETS_PREFIX: &str = "/assets/";

const STATIC_EXTENSIONS: &[&str] = &[
    "js", "css", "woff", "woff2", "ttf", "png", "svg", "jpg", "jpeg", "webp",
];

pub(crate) fn cache_name(version: &str) -> String {
    format!("{CACHE_PREFIX}{version}")
}

/// An intercepted outgoing request, reduced to what the policy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    /// Top-level page load.
    pub(crate) navigation: bool,
}

impl Request {
    pub(crate) fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            navigation: false,
        }
    }

    pub(crate) fn get(path: &str) -> Self {
        Self::new("GET", path)
    }

    pub(crate) fn navigation(path: &str) -> Self {
        Self {
            navigation: true,
            ..Self::get(path)
        }
    }

    pub(crate) fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

/// A response as the cache sees it: status plus opaque body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Response {
    pub(crate) status: u16,
    pub(crate) body: Vec<u8>,
}

impl Response {
    pub(crate) fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub(crate) fn with_status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The synthesized response surfaced once every fallback is exhausted
    /// (`Response.error()` in the platform API: status zero, empty body).
    pub(crate) fn network_error() -> Self {
        Self {
            status: 0,
            body: Vec::new(),
        }
    }

    pub(crate) fn is_network_error(&self) -> bool {
        self.status == 0
    }

    /// Only plain 200s are worth caching.
    pub(crate) fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Which serving strategy a request falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    /// Not intercepted at all (non-GET).
    PassThrough,
    /// Network-first with the cached shell as fallback.
    Navigation,
    /// Stale-while-revalidate.
    StaticAsset,
    /// Network-first with silent caching and cache fallback.
    NetworkFirst,
}

pub(crate) fn route(request: &Request) -> Route {
    if !request.is_get() {
        return Route::PassThrough;
    }
    if request.navigation {
        return Route::Navigation;
    }
    if is_static_asset(&request.path) {
        return Route::StaticAsset;
    }
    Route::NetworkFirst
}

/// Bundled-asset paths, or anything with a script/style/font/image
/// extension from the fixed allowlist.
fn is_static_asset(path: &str) -> bool {
    if path.starts_with(ASSETS_PREFIX) {
        return true;
    }
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((_, ext)) => STATIC_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

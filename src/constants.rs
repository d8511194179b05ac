pub const USER_AGENT: &str = concat!("Rostrum/", env!("CARGO_PKG_VERSION"));

pub mod timeouts {

    /// Default deadline for a proxied upstream call.
    pub const UPSTREAM_MS: u64 = 8000;

    pub const CONNECT_MS: u64 = 3000;

    /// Deadline for the readiness probe's upstream ping.
    pub const HEALTH_MS: u64 = 2000;
}

pub mod limits {

    pub const MAX_QR_CODE_LEN: usize = 64;

    pub const POOL_MAX_IDLE_PER_HOST: usize = 10;
}

pub mod banners {

    /// Carousel auto-play interval used when the upstream settings row omits one.
    pub const DEFAULT_AUTOPLAY_INTERVAL_MS: i64 = 5000;
}

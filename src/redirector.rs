use crate::anonymize::anonymize_ip;
use crate::blocklist::BlockedPatterns;
use crate::config::{Config, LogLevel, RedirectStatus};
use log::{debug, info};

pub const HEALTH_PATH: &str = "/health";

/// What the engine sees of one inbound request.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub remote_addr: &'a str,
    pub method: &'a str,
    pub path: &'a str,
    pub query: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Health,
    Blocked,
    Redirect {
        location: String,
        status: RedirectStatus,
    },
}

/// Level-gated logger owned by the engine instead of a process-wide setting.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog {
    level: LogLevel,
}

impl RequestLog {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::None && self.level <= level
    }

    /// The access line for a decision; health checks produce none.
    pub fn line(ctx: &RequestContext<'_>, decision: &Decision) -> Option<String> {
        let anon_ip = anonymize_ip(ctx.remote_addr);
        match decision {
            Decision::Health => None,
            Decision::Blocked => Some(format!(
                "{} {} {} -> BLOCKED",
                anon_ip, ctx.method, ctx.path
            )),
            Decision::Redirect { location, status } => Some(format!(
                "{} {} {} -> {} ({})",
                anon_ip, ctx.method, ctx.path, location, status
            )),
        }
    }

    fn record(&self, ctx: &RequestContext<'_>, decision: &Decision) {
        if !self.enabled(LogLevel::Info) {
            return;
        }
        if let Some(line) = Self::line(ctx, decision) {
            info!("{}", line);
        }
    }
}

pub struct Redirector {
    target: String,
    status: RedirectStatus,
    preserve_path: bool,
    // Empty when scanner blocking is disabled or the list failed to load.
    blocked: BlockedPatterns,
    log: RequestLog,
}

impl Redirector {
    pub fn new(config: &Config, blocked: BlockedPatterns) -> Self {
        Self {
            target: config.target.clone(),
            status: config.status,
            preserve_path: config.preserve_path,
            blocked,
            log: RequestLog::new(config.log_level),
        }
    }

    pub fn log_startup(&self, config: &Config) {
        if self.log.enabled(LogLevel::Info) {
            info!("Starting redirect server on :{}", config.port);
            info!(
                "Target: {} (Code: {}, Preserve Path: {}, Block Scanners: {})",
                self.target, self.status, self.preserve_path, config.block_scanners
            );
        }
        if self.log.enabled(LogLevel::Debug) {
            debug!("Log level: {:?}", config.log_level);
        }
        if !self.blocked.is_empty() && self.log.enabled(LogLevel::Info) {
            info!("Blocking {} path patterns", self.blocked.len());
        }
    }

    /// Pure: the same context always produces the same decision.
    pub fn decide(&self, ctx: &RequestContext<'_>) -> Decision {
        if ctx.path == HEALTH_PATH {
            return Decision::Health;
        }

        if !self.blocked.is_empty() && self.blocked.matches(ctx.path) {
            return Decision::Blocked;
        }

        let mut location = self.target.clone();
        if self.preserve_path {
            location.push_str(ctx.path);
            if !ctx.query.is_empty() {
                location.push('?');
                location.push_str(ctx.query);
            }
        }

        Decision::Redirect {
            location,
            status: self.status,
        }
    }

    /// Decide, then log the outcome. Health checks are not logged.
    pub fn handle(&self, ctx: &RequestContext<'_>) -> Decision {
        let decision = self.decide(ctx);
        self.log.record(ctx, &decision);
        decision
    }
}

//! [`DebugLogService`]: the operation table, one method per operation.
//!
//! Every operation checks capabilities first, then evaluates the access
//! policy against freshly loaded settings and the injected clock, then
//! touches the file.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dlv_access::{
    AccessContext, AccessPolicy, AccessSnapshot, Action, Capability, Clock, EnvironmentKind,
    GrantKind, GrantState, OverrideClock,
};
use dlv_config::{SettingKey, Settings, SettingsStore};
use dlv_logs::{DOWNLOAD_MAX_BYTES, DownloadPayload, LogEngine, TailMode};
use tracing::{debug, info, warn};

use crate::error::{Result, ServiceError};
use crate::types::{
    ClearResponse, GrantResponse, RequestContext, StatsResponse, TailQuery, TailResponse,
};

/// Handles viewer requests for one log file.
#[derive(Clone)]
pub struct DebugLogService {
    engine: LogEngine,
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    grants: OverrideClock,
    environment: EnvironmentKind,
}

impl fmt::Debug for DebugLogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugLogService")
            .field("engine", &self.engine)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl DebugLogService {
    /// Wires a service from its collaborators.
    pub fn new(
        engine: LogEngine,
        store: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
        environment: EnvironmentKind,
    ) -> Self {
        let grants = OverrideClock::new(Arc::clone(&store), Arc::clone(&clock));
        Self {
            engine,
            store,
            clock,
            grants,
            environment,
        }
    }

    /// The engine serving this service.
    #[must_use]
    pub const fn engine(&self) -> &LogEngine {
        &self.engine
    }

    /// The configured environment.
    #[must_use]
    pub const fn environment(&self) -> EnvironmentKind {
        self.environment
    }

    fn require(req: &RequestContext<'_>, capability: Capability) -> Result<()> {
        if req.capabilities.has_capability(capability) {
            Ok(())
        } else {
            warn!(%capability, "request rejected: missing capability");
            Err(ServiceError::MissingCapability { capability })
        }
    }

    fn context(&self, req: &RequestContext<'_>, settings: &Settings) -> AccessContext {
        AccessContext::from_settings(self.environment, req.sub_scope, settings)
    }

    fn snapshot(&self, req: &RequestContext<'_>) -> Result<AccessSnapshot> {
        let settings = self.store.get()?;
        Ok(AccessSnapshot::capture(
            &self.context(req, &settings),
            self.clock.now(),
        ))
    }

    fn authorize(&self, req: &RequestContext<'_>, action: Action) -> Result<()> {
        Self::require(req, Capability::View)?;
        let settings = self.store.get()?;
        let decision = AccessPolicy::evaluate(&self.context(req, &settings), self.clock.now());
        if let Some(reason) = decision.reasons(action).primary() {
            warn!(%action, %reason, environment = %self.environment, "action denied");
            return Err(ServiceError::Forbidden { action, reason });
        }
        Ok(())
    }

    /// Current access state. Requires view.
    pub fn access(&self, req: &RequestContext<'_>) -> Result<AccessSnapshot> {
        Self::require(req, Capability::View)?;
        self.snapshot(req)
    }

    /// Tail by lines or minutes. Requires view.
    pub fn get_tail(&self, req: &RequestContext<'_>, query: TailQuery) -> Result<TailResponse> {
        Self::require(req, Capability::View)?;
        let settings = self.store.get()?.normalized();
        let max_lines = settings.max_lines as usize;

        let tail = match query.mode {
            TailMode::Lines => {
                let requested = query
                    .value
                    .unwrap_or_else(|| i64::from(settings.default_lines))
                    .clamp(1, i64::from(settings.max_lines));
                self.engine.tail_by_lines(requested as usize, max_lines)?
            }
            TailMode::Minutes => {
                let minutes = query
                    .value
                    .unwrap_or_else(|| i64::from(settings.default_minutes))
                    .clamp(1, i64::from(u32::MAX));
                self.engine
                    .tail_by_minutes_at(minutes as u32, max_lines, self.clock.now())?
            }
        };
        debug!(mode = %query.mode, returned = tail.line_count_returned, "tail served");

        Ok(TailResponse {
            tail,
            stats: self.engine.stats(),
            access: self.snapshot(req)?,
        })
    }

    /// File attributes and access state. Requires view.
    pub fn get_stats(&self, req: &RequestContext<'_>) -> Result<StatsResponse> {
        Self::require(req, Capability::View)?;
        Ok(StatsResponse {
            stats: self.engine.stats(),
            access: self.snapshot(req)?,
        })
    }

    /// Truncates the log. Requires view and a clear permit.
    pub fn clear_log(&self, req: &RequestContext<'_>) -> Result<ClearResponse> {
        self.authorize(req, Action::Clear)?;
        self.engine.clear()?;
        Ok(ClearResponse {
            cleared: true,
            cleared_at: rfc3339(self.clock.now()),
        })
    }

    /// The whole file, up to 5 MiB. Requires view and a download permit.
    pub fn download_log(&self, req: &RequestContext<'_>) -> Result<DownloadPayload> {
        self.authorize(req, Action::Download)?;
        Ok(self.engine.prepare_download(DOWNLOAD_MAX_BYTES)?)
    }

    /// Starts or ends the temporary logging grant. Requires admin.
    pub fn set_temp_logging(
        &self,
        req: &RequestContext<'_>,
        state: GrantState,
    ) -> Result<GrantResponse> {
        self.toggle(req, GrantKind::TempLogging, state)
    }

    /// Starts or ends the production override grant. Requires admin.
    pub fn set_production_override(
        &self,
        req: &RequestContext<'_>,
        state: GrantState,
    ) -> Result<GrantResponse> {
        self.toggle(req, GrantKind::ProductionOverride, state)
    }

    fn toggle(
        &self,
        req: &RequestContext<'_>,
        kind: GrantKind,
        state: GrantState,
    ) -> Result<GrantResponse> {
        Self::require(req, Capability::Admin)?;
        let grant = self.grants.apply(kind, state)?;
        Ok(GrantResponse {
            success: true,
            message: kind.message(state).to_string(),
            expires_at: grant.expires_at,
            access: self.snapshot(req)?,
        })
    }

    /// Stored settings, as written. Requires admin.
    pub fn settings(&self, req: &RequestContext<'_>) -> Result<Settings> {
        Self::require(req, Capability::Admin)?;
        Ok(self.store.get()?)
    }

    /// Updates one operator-editable setting. Requires admin.
    ///
    /// The raw value is stored; ranges apply when settings are read.
    pub fn update_setting(
        &self,
        req: &RequestContext<'_>,
        key: SettingKey,
        value: &str,
    ) -> Result<Settings> {
        Self::require(req, Capability::Admin)?;
        let mut settings = self.store.get()?;
        settings.set_value(key, value)?;
        self.store.set(&settings)?;
        info!(target: "dlv_audit", %key, value, "setting updated");
        Ok(settings)
    }
}

fn rfc3339(epoch: i64) -> String {
    DateTime::<Utc>::from_timestamp(epoch, 0).map_or_else(|| epoch.to_string(), |t| t.to_rfc3339())
}

//! Owner of the current state snapshot.
//!
//! [`Shell`] reduces each action against its snapshot, swaps in the result and
//! hands the emitted effects to the host in order.

use std::io::BufRead;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::host::{EffectExecutor, ReduceContext, SurfaceRegistry, WindowManager};
use crate::reducer;
use crate::services::localization_engine::{LocalizationEngine, LocalizationEngineTrait};
use crate::types::action::Action;
use crate::types::errors::ReplayError;
use crate::types::settings::ShellSettings;
use crate::types::state::{AppState, StateSnapshot};

pub struct Shell<H> {
    state: Arc<AppState>,
    settings: ShellSettings,
    localization: LocalizationEngine,
    host: H,
}

impl<H> Shell<H>
where
    H: SurfaceRegistry + WindowManager + EffectExecutor,
{
    /// Builds a shell with an empty state, loading translations from
    /// `settings.locales_dir`. Missing translations are logged and the
    /// built-in English error texts are used instead.
    pub fn new(settings: ShellSettings, host: H) -> Self {
        let mut localization = LocalizationEngine::new(&settings.locales_dir);
        match localization.initialize() {
            Ok(()) => {
                if let Err(e) = localization.set_locale(&settings.locale) {
                    warn!(locale = %settings.locale, error = %e, "locale not available, keeping default");
                }
            }
            Err(e) => warn!(error = %e, "translations not loaded"),
        }
        Self::with_localization(settings, localization, host)
    }

    pub fn with_localization(settings: ShellSettings, localization: LocalizationEngine, host: H) -> Self {
        Self {
            state: Arc::new(AppState::new()),
            settings,
            localization,
            host,
        }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::from(self.state.as_ref())
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    pub fn localization(&self) -> &LocalizationEngine {
        &self.localization
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Reduces `action`, publishes the new snapshot, then runs its effects.
    pub fn dispatch(&mut self, action: Action) -> &Arc<AppState> {
        let kind = action.kind();
        let transition = {
            let ctx = ReduceContext {
                surfaces: &self.host,
                windows: &self.host,
                error_text: &self.localization,
                settings: &self.settings,
            };
            reducer::reduce(&self.state, action, &ctx)
        };

        if transition.changed_from(&self.state) {
            debug!(action = kind, effects = transition.effects.len(), "state replaced");
        }
        self.state = transition.state;

        for effect in &transition.effects {
            debug!(action = kind, ?effect, "executing effect");
            self.host.execute(effect);
        }
        &self.state
    }

    /// Dispatches newline-delimited JSON actions from `reader`.
    ///
    /// Blank lines are ignored. Malformed lines are logged and skipped; only
    /// read failures abort. Returns the number of actions dispatched.
    pub fn replay<R: BufRead>(&mut self, reader: R) -> Result<usize, ReplayError> {
        let mut dispatched = 0;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_action(index + 1, &line) {
                Ok(action) => {
                    self.dispatch(action);
                    dispatched += 1;
                }
                Err(e) => warn!(error = %e, "skipping action"),
            }
        }
        info!(dispatched, tabs = self.state.tabs.len(), "replay finished");
        Ok(dispatched)
    }
}

/// Parses one line of an action stream. `line` is 1-based, for messages.
pub fn parse_action(line: usize, text: &str) -> Result<Action, ReplayError> {
    serde_json::from_str(text).map_err(|e| ReplayError::Parse {
        line,
        message: e.to_string(),
    })
}

//! Color palette for terminal output.

use clawnode_common::ConnectionState;
use owo_colors::Style;

/// Named styles. All plain until [`Styles::colorize`] is called, so the
/// `NO_COLOR` path needs no branching at call sites.
#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    /// Labels and secondary text.
    pub dim: Style,
    pub header: Style,
}

impl Styles {
    pub fn colorize(&mut self) {
        *self = Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            info: Style::new().blue(),
            dim: Style::new().dimmed(),
            header: Style::new().bold().cyan(),
        };
    }

    /// Style for a connection state label.
    #[must_use]
    pub fn for_state(&self, state: ConnectionState) -> Style {
        match state {
            ConnectionState::Connected => self.success,
            ConnectionState::Connecting | ConnectionState::Degraded => self.warning,
            ConnectionState::Error => self.error,
            ConnectionState::Disconnected | ConnectionState::Unknown => self.dim,
        }
    }
}
